//! The API portal: one generic entry point for every registered model.
//!
//! A request path `<api root>/<model uri>/<method>` selects a model from the
//! [`ModelRegistry`] and one operation on it:
//!
//! ```text
//! insert   create → from_dto(body) → save → to_dto
//! update   fetch(body.method, body.filter) → from_dto(body.dto) → save → to_dto
//! remove   fetch(body.method, body.filter) → remove → save → null
//! <other>  command: create → from_dto(body) → execute(<other>) → to_dto
//!          others:  fetch(<other>, filter from body) → to_dto
//! ```

mod dispatch;
pub mod registry;
pub mod request;

#[cfg(test)]
pub(crate) mod testing;

use bookshelf_core::error::CoreError;
use bookshelf_core::factory::ModelFactory;

pub use registry::{ModelRegistry, RegistrationError};
pub use request::PortalRequest;

/// Per-request dispatch failures.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid model type: {0}")]
    InvalidType(String),

    #[error("Invalid method '{method}' of model '{model}'")]
    InvalidMethod { model: String, method: String },

    /// Raised by the model itself; passed through unchanged.
    #[error(transparent)]
    Model(#[from] CoreError),
}

/// Registry plus dispatcher, shared by every request.
#[derive(Debug)]
pub struct ApiPortal {
    api_root: String,
    registry: ModelRegistry,
}

impl ApiPortal {
    /// Register `factories` below `api_root` (e.g. `/api`).
    pub fn new(
        api_root: &str,
        factories: impl IntoIterator<Item = ModelFactory>,
    ) -> Result<Self, RegistrationError> {
        let registry = ModelRegistry::build(factories)?;
        let api_root = format!("/{}", api_root.trim_matches('/'));
        tracing::info!(api_root = %api_root, models = registry.len(), "API portal ready");
        Ok(Self { api_root, registry })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}
