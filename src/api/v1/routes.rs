/*
 * Responsibility
 * - v1 URL table
 * - which tier guards a route is decided by the extractor its handler takes
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    users::{get_me, list_colleagues, list_users, update_me},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users))
        .route("/users/me", get(get_me).patch(update_me))
        .route("/users/colleagues", get(list_colleagues))
}
