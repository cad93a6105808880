/*
 * Responsibility
 * - shared context bound to the Router (Clone-cheap; Arc inside)
 * - the verifier and user store are trait objects so tests can inject fakes
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::{TokenVerify, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub verifier: Arc<dyn TokenVerify>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(db: PgPool, verifier: Arc<dyn TokenVerify>, users: Arc<dyn UserStore>) -> Self {
        Self {
            db,
            verifier,
            users,
        }
    }
}
