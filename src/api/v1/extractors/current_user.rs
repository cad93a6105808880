/*
 * Responsibility
 * - per-tier authenticated-user extractors handed to handlers
 * - bearer-header parsing and Json-rejection mapping live here so every
 *   failure on the way into a handler speaks the common error contract
 */
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::services::auth::{Principal, resolver};
use crate::state::AppState;

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Not authenticated", true))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::authentication("Not authenticated", true))
}

/// Active account required (the default tier for protected routes).
pub struct ActiveUser(pub Principal);

impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let principal =
            resolver::resolve_active(state.verifier.as_ref(), state.users.as_ref(), token).await?;

        Ok(Self(principal))
    }
}

/// Admin role required.
pub struct AdminUser(pub Principal);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let principal =
            resolver::resolve_admin(state.verifier.as_ref(), state.users.as_ref(), token).await?;

        Ok(Self(principal))
    }
}

/// Nurse role required.
pub struct NurseUser(pub Principal);

impl FromRequestParts<AppState> for NurseUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let principal =
            resolver::resolve_nurse(state.verifier.as_ref(), state.users.as_ref(), token).await?;

        Ok(Self(principal))
    }
}

/// Json wrapper whose rejection speaks the 422 validation contract instead
/// of axum's default body.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text(), None)),
        }
    }
}
