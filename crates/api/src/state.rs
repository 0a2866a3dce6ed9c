use std::sync::Arc;

use bookshelf_core::schema::SchemaError;
use bookshelf_db::DataLayer;

use crate::config::ServerConfig;
use crate::context::ContextConfig;
use crate::portal::{ApiPortal, RegistrationError};
use crate::templates::TemplateEngine;

/// Failures while wiring the application. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid model schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Model registration failed: {0}")]
    Registration(#[from] RegistrationError),
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Model registry and dispatcher.
    pub portal: Arc<ApiPortal>,
    /// Data access objects, for health checks.
    pub data: Arc<DataLayer>,
    /// Page templates.
    pub templates: TemplateEngine,
    /// Readers turning request headers into a model context.
    pub context: ContextConfig,
}

impl AppState {
    /// Wire state for `config` over `data`, registering every model.
    pub fn new(config: ServerConfig, data: Arc<DataLayer>) -> Result<Self, StartupError> {
        let factories = bookshelf_models::factories(Arc::clone(&data))?;
        let portal = ApiPortal::new(&config.api_root, factories)?;
        Ok(Self {
            templates: TemplateEngine::new(config.template_dir.clone()),
            context: ContextConfig::from_config(&config),
            config: Arc::new(config),
            portal: Arc::new(portal),
            data,
        })
    }
}
