/*
 * Responsibility
 * - /users handlers (self profile, admin listing, department colleagues)
 * - tier checks happen in the extractors; handlers stay thin
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::users::{UpdateMeRequest, UserResponse, UserSummary},
    api::v1::extractors::{ActiveUser, AdminUser, AppJson, NurseUser},
    error::AppError,
    repos::user_repo::{self, UserRow},
    services::auth::Principal,
    state::AppState,
};

fn summarize(row: UserRow) -> UserSummary {
    UserSummary {
        id: row.id,
        name: row.name,
        email: row.email,
        role: row.role,
        department: row.department,
        position: row.position,
        is_active: row.is_active,
    }
}

pub async fn get_me(ActiveUser(user): ActiveUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    AppJson(req): AppJson<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate()?;

    let row = user_repo::update_profile(
        &state.db,
        user.id,
        req.name.as_deref(),
        req.phone.as_deref(),
        req.department.as_deref(),
        req.position.as_deref(),
        req.ward_id,
    )
    .await?
    .ok_or_else(|| AppError::http(StatusCode::NOT_FOUND, "사용자를 찾을 수 없습니다."))?;

    Ok(Json(UserResponse::from(Principal::from(row))))
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let rows = user_repo::list(&state.db).await?;

    Ok(Json(rows.into_iter().map(summarize).collect()))
}

pub async fn list_colleagues(
    State(state): State<AppState>,
    NurseUser(user): NurseUser,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    // A nurse with no department assignment has no colleague list.
    let Some(department) = user.department.as_deref() else {
        return Ok(Json(Vec::new()));
    };

    let rows = user_repo::list_by_department(&state.db, department).await?;

    Ok(Json(rows.into_iter().map(summarize).collect()))
}
