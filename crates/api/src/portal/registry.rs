//! Model registry: URI → factory, built once at startup.

use std::collections::BTreeMap;

use bookshelf_core::factory::ModelFactory;
use bookshelf_core::methods::MethodTableError;

/// Startup failures while registering models. Fatal.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Model {model} does not declare a URI")]
    MissingUri { model: String },

    #[error("Models {first} and {second} both use URI '{uri}'")]
    DuplicateUri {
        uri: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Methods(#[from] MethodTableError),
}

/// Immutable mapping from model URI to factory.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelFactory>,
}

impl ModelRegistry {
    /// Register every factory, failing on the first invalid one.
    pub fn build(
        factories: impl IntoIterator<Item = ModelFactory>,
    ) -> Result<Self, RegistrationError> {
        let mut models: BTreeMap<String, ModelFactory> = BTreeMap::new();

        for factory in factories {
            let uri = factory.uri().trim_matches('/').to_string();
            if uri.is_empty() {
                return Err(RegistrationError::MissingUri {
                    model: factory.model_name().to_string(),
                });
            }
            if let Some(existing) = models.get(&uri) {
                return Err(RegistrationError::DuplicateUri {
                    uri,
                    first: existing.model_name().to_string(),
                    second: factory.model_name().to_string(),
                });
            }
            factory.validate_methods()?;

            tracing::debug!(
                uri = %uri,
                model = factory.model_name(),
                kind = factory.kind(),
                "Model registered",
            );
            models.insert(uri, factory);
        }

        Ok(Self { models })
    }

    pub fn get(&self, uri: &str) -> Option<&ModelFactory> {
        self.models.get(uri)
    }

    /// Registered URIs in sorted order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
