use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookshelf_core::error::CoreError;
use serde_json::json;

use crate::portal::DispatchError;
use crate::templates::TemplateError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`DispatchError`] and [`CoreError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failure of the API portal, including model errors it passed through.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A domain-level error raised outside the portal.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A page template could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal(message: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %message, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Status, error code and message for a model error.
fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::NoMatch { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::InvalidDto(msg) => (StatusCode::BAD_REQUEST, "INVALID_DTO", msg.clone()),
        CoreError::BrokenRules(rules) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "BROKEN_RULES",
            rules.to_string(),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

impl AppError {
    fn core(&self) -> Option<&CoreError> {
        match self {
            AppError::Core(core) | AppError::Dispatch(DispatchError::Model(core)) => Some(core),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) | AppError::Dispatch(DispatchError::Model(core)) => {
                classify_core_error(core)
            }

            // --- Portal errors ---
            AppError::Dispatch(err @ DispatchError::InvalidUrl(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_URL", err.to_string())
            }
            AppError::Dispatch(err @ DispatchError::InvalidType(_)) => {
                (StatusCode::NOT_FOUND, "INVALID_TYPE", err.to_string())
            }
            AppError::Dispatch(err @ DispatchError::InvalidMethod { .. }) => {
                (StatusCode::NOT_FOUND, "INVALID_METHOD", err.to_string())
            }

            // --- Templates ---
            AppError::Template(TemplateError::NotFound { name }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Page '{name}' not found"),
            ),
            AppError::Template(err) => internal(&err.to_string()),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(CoreError::BrokenRules(rules)) = self.core() {
            body["rules"] = json!(rules);
        }

        (status, axum::Json(body)).into_response()
    }
}
