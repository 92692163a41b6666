use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use sea_orm::DbErr;
use serde::Serialize;

use crate::extractors::flash::{Flash, set_flash};
use crate::oauth::OAuthError;

/// Structured error response returned by JSON endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `PERMISSION_DENIED`,
    /// `NOT_FOUND`, `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "PERMISSION_DENIED")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Cannot edit a comment you haven't created")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Anonymous visitor on a protected route. Rendered as a redirect to `/`.
    Unauthenticated,
    /// Ownership check failed. Carries the user-visible denial text.
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    /// Code review link already requested. Rendered as a redirect to the
    /// listing with a flash message.
    DuplicateLink,
    Internal(String),
}

fn json_error(status: StatusCode, code: &'static str, message: String) -> Response {
    (status, Json(ErrorBody { code, message })).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            AppError::Unauthenticated => Redirect::to("/").into_response(),
            AppError::Forbidden(msg) => {
                json_error(StatusCode::FORBIDDEN, "PERMISSION_DENIED", msg)
            }
            AppError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => json_error(StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::DuplicateLink => {
                let jar = set_flash(CookieJar::new(), Flash::DuplicateLink);
                (jar, Redirect::to("/codereviews")).into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<OAuthError> for AppError {
    fn from(err: OAuthError) -> Self {
        AppError::Internal(err.to_string())
    }
}
