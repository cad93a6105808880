/*
 * Responsibility
 * - the authenticated-context type (Principal) handed to handlers
 * - re-export of the verification/lookup surface (verifier, resolver)
 */
pub mod resolver;
pub mod verifier;

pub use resolver::UserStore;
pub use verifier::{JwtVerifier, TokenClaims, TokenVerify};

use chrono::{DateTime, Utc};

/// Authenticated user context for one request.
///
/// Built fresh from a store lookup on every resolve, never cached and never
/// mutated afterwards. The role flags are fixed at construction; handlers
/// only read.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
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
    pub is_admin: bool,
    pub is_nurse: bool,
    pub is_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}
