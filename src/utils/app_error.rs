use axum::response::{IntoResponse, Response};
use axum::Json;
use hyper::StatusCode;
use serde_json::json;
use tracing::warn;

/// Error taxonomy surfaced to clients as `{"error": kind, "detail": message}`.
/// The kind strings are stable; messages are free to change.
#[derive(Debug)]
pub enum AppError {
    //Malformed or missing input
    Validation(String),
    //Login failures respond with 400, not 401
    BadCredentials(&'static str),
    //Missing, invalid or revoked token, or inactive account
    Unauthenticated,
    //Authenticated but not allowed (non-author mutation)
    Forbidden(&'static str),
    NotFound(&'static str),
    //Duplicate email or username
    Conflict(&'static str),
    InternalServerError,
}

impl AppError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::BadCredentials(_) => "validation",
            Self::Unauthenticated => "auth",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InternalServerError => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Validation(_) | Self::BadCredentials(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = match &self {
            Self::Validation(detail) => detail.clone(),
            Self::BadCredentials(detail)
            | Self::Forbidden(detail)
            | Self::NotFound(detail)
            | Self::Conflict(detail) => (*detail).to_string(),
            Self::Unauthenticated => "Authentication credentials were not provided.".to_string(),
            Self::InternalServerError => "Internal server error".to_string(),
        };

        (status, Json(json!({ "error": self.kind(), "detail": detail }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        warn!("Database error : {e}");
        Self::InternalServerError
    }
}
