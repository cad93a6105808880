/*
 * Responsibility
 * - sqlx queries against the users table
 * - PgUserStore: the UserStore impl injected into the auth resolver
 * - DB errors surface as RepoError; classification happens in error.rs
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;
use crate::services::auth::{Principal, UserStore};

#[derive(Debug, FromRow)]
pub struct UserRow {
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

impl From<UserRow> for Principal {
    fn from(row: UserRow) -> Self {
        // Role flags derive from the role column; head nurses keep nurse
        // capability.
        let is_admin = row.role == "admin";
        let is_nurse = matches!(row.role.as_str(), "nurse" | "head_nurse");

        Principal {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            phone: row.phone,
            department: row.department,
            position: row.position,
            employee_id: row.employee_id,
            ward_id: row.ward_id,
            hospital_id: row.hospital_id,
            is_active: row.is_active,
            is_admin,
            is_nurse,
            is_verified: row.is_verified,
            last_login: row.last_login,
            created_at: row.created_at,
        }
    }
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, name, role, phone, department, position,
               employee_id, ward_id, hospital_id,
               is_active, is_verified, last_login, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> Result<Vec<UserRow>, RepoError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, name, role, phone, department, position,
               employee_id, ward_id, hospital_id,
               is_active, is_verified, last_login, created_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_department(
    db: &PgPool,
    department: &str,
) -> Result<Vec<UserRow>, RepoError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, name, role, phone, department, position,
               employee_id, ward_id, hospital_id,
               is_active, is_verified, last_login, created_at
        FROM users
        WHERE department = $1 AND is_active = TRUE
        ORDER BY name
        "#,
    )
    .bind(department)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn update_profile(
    db: &PgPool,
    user_id: i64,
    name: Option<&str>,
    phone: Option<&str>,
    department: Option<&str>,
    position: Option<&str>,
    ward_id: Option<i64>,
) -> Result<Option<UserRow>, RepoError> {
    // COALESCE keeps the current value for fields the request did not send.
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET
            name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            department = COALESCE($4, department),
            position = COALESCE($5, position),
            ward_id = COALESCE($6, ward_id)
        WHERE id = $1
        RETURNING id, email, name, role, phone, department, position,
                  employee_id, ward_id, hospital_id,
                  is_active, is_verified, last_login, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(phone)
    .bind(department)
    .bind(position)
    .bind(ward_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Postgres-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, RepoError> {
        Ok(find_by_email(&self.db, email).await?.map(Principal::from))
    }
}
