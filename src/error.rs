/*
 * Responsibility
 * - closed AppError taxonomy shared by the whole request path
 * - IntoResponse: log-then-respond mapping to the JSON error contract
 *   (field names `error` / `message` / `status_code` / `details` are the
 *   wire contract; clients depend on them)
 */
use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

/// Client-visible message for the 422 validation body.
pub const VALIDATION_MESSAGE: &str = "입력 데이터가 올바르지 않습니다.";

/// Client-visible message for the 500 database body. The internal detail is
/// logged and never leaves the server.
pub const DATABASE_MESSAGE: &str = "데이터베이스 오류가 발생했습니다.";

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// HTTP error with a carried status. Extra response headers ride along.
    #[error("{detail}")]
    Http {
        status: StatusCode,
        detail: String,
        headers: Option<HeaderMap>,
    },

    /// Store/driver failure. The payload is internal-only.
    #[error("{0}")]
    Database(String),

    /// 401. `challenge` controls the `WWW-Authenticate: Bearer` header:
    /// attached for token verification failures, absent for unknown users.
    #[error("{message}")]
    Authentication { message: String, challenge: bool },

    /// 403.
    #[error("{0}")]
    Permission(String),

    /// 422 with a structured sub-error list.
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
        details: Vec<ValidationDetail>,
    },
}

impl AppError {
    pub fn http(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
            headers: None,
        }
    }

    pub fn database(detail: impl Into<String>) -> Self {
        Self::Database(detail.into())
    }

    pub fn authentication(message: impl Into<String>, challenge: bool) -> Self {
        Self::Authentication {
            message: message.into(),
            challenge,
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        let message = message.into();
        Self::Validation {
            details: vec![ValidationDetail {
                field: field.map(str::to_owned),
                message: message.clone(),
            }],
            field: field.map(str::to_owned),
            message,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

impl ErrorBody {
    fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            status_code: None,
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Each arm logs before the response is built, so a log record exists
        // for every error response this process ever emits.
        match self {
            AppError::Http {
                status,
                detail,
                headers,
            } => {
                tracing::error!("HTTP Exception: {} - {}", status.as_u16(), detail);
                let body = ErrorBody {
                    status_code: Some(status.as_u16()),
                    ..ErrorBody::new("HTTP Error", detail)
                };
                let mut res = (status, Json(body)).into_response();
                if let Some(extra) = headers {
                    res.headers_mut().extend(extra);
                }
                res
            }
            AppError::Validation {
                message, details, ..
            } => {
                tracing::error!(details = ?details, "Validation Error: {message}");
                let body = ErrorBody {
                    details: Some(details),
                    ..ErrorBody::new("Validation Error", VALIDATION_MESSAGE)
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            AppError::Database(internal) => {
                tracing::error!("Database Error: {internal}");
                // Internal detail stays in the log.
                let body = ErrorBody::new("Database Error", DATABASE_MESSAGE);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            AppError::Authentication { message, challenge } => {
                tracing::warn!("Authentication Error: {message}");
                let body = ErrorBody::new("Authentication Error", message);
                let mut res = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
                if challenge {
                    res.headers_mut()
                        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                }
                res
            }
            AppError::Permission(message) => {
                tracing::warn!("Permission Error: {message}");
                let body = ErrorBody::new("Permission Error", message);
                (StatusCode::FORBIDDEN, Json(body)).into_response()
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        AppError::Database(e.to_string())
    }
}
