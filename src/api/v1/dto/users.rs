/*
 * Responsibility
 * - user-facing request/response DTOs
 * - request validation (format checks) via validate()
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::auth::Principal;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub employee_id: Option<String>,
    pub ward_id: Option<i64>,
    pub hospital_id: Option<i64>,
    pub is_active: bool,
    pub is_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Principal> for UserResponse {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            email: p.email,
            name: p.name,
            role: p.role,
            phone: p.phone,
            department: p.department,
            position: p.position,
            employee_id: p.employee_id,
            ward_id: p.ward_id,
            hospital_id: p.hospital_id,
            is_active: p.is_active,
            is_verified: p.is_verified,
            last_login: p.last_login,
            created_at: p.created_at,
        }
    }
}

/// Listing entry (admin listing, department colleagues).
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub ward_id: Option<i64>,
}

impl UpdateMeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(AppError::validation("이름은 비워 둘 수 없습니다.", Some("name")));
        }
        if let Some(phone) = &self.phone
            && phone.len() > 20
        {
            return Err(AppError::validation("전화번호가 너무 깁니다.", Some("phone")));
        }

        Ok(())
    }
}
