use crate::rules::BrokenRuleList;
use crate::types::DbId;

/// Errors raised by models and the data layer.
///
/// These pass through the API dispatcher unchanged; the HTTP layer decides
/// how each one is presented.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{entity} not found: {criteria}")]
    NoMatch {
        entity: &'static str,
        criteria: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Broken rules: {0}")]
    BrokenRules(BrokenRuleList),

    #[error("Invalid data transfer object: {0}")]
    InvalidDto(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type used by every model operation.
pub type ModelResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::InvalidDto(err.to_string())
    }
}
