//! Model factories as seen by the API dispatcher.
//!
//! Every registered model is one variant of [`ModelFactory`], decided when
//! the model is registered. Editable models support the `insert`, `update`
//! and `remove` verbs plus their lookup methods; read-only models only run
//! fetch methods; command models are created, filled from the request body
//! and executed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::ModelContext;
use crate::error::ModelResult;
use crate::methods::{MethodResolver, MethodTableError, ResolvedMethod};
use crate::model::{CommandInstance, EditableInstance, ModelInstance};
use crate::types::Dto;

/// What every factory exposes to the registry.
pub trait ModelDescriptor: Send + Sync {
    /// Unique URI segment the model is reachable under, e.g. `admin/book-list`.
    fn uri(&self) -> &str;

    fn model_name(&self) -> &str;

    /// Methods callable through the generic fetch/command path.
    fn methods(&self) -> &dyn MethodResolver;

    /// Check the method table once, at registration.
    fn validate_methods(&self) -> Result<(), MethodTableError>;
}

/// Factory of editable root objects.
#[async_trait]
pub trait EditableFactory: ModelDescriptor {
    /// A blank instance to be filled and inserted.
    async fn create(&self, ctx: &ModelContext) -> ModelResult<Box<dyn EditableInstance>>;

    /// Load an existing instance with one of the lookup methods.
    async fn fetch(
        &self,
        method: &ResolvedMethod,
        filter: Option<Dto>,
        ctx: &ModelContext,
    ) -> ModelResult<Box<dyn EditableInstance>>;
}

/// Factory of read-only objects and collections.
#[async_trait]
pub trait ReadOnlyFactory: ModelDescriptor {
    async fn fetch(
        &self,
        method: &ResolvedMethod,
        filter: Option<Dto>,
        ctx: &ModelContext,
    ) -> ModelResult<Box<dyn ModelInstance>>;
}

/// Factory of command objects.
///
/// `methods()` on the factory and on its instances describe the same table.
#[async_trait]
pub trait CommandFactory: ModelDescriptor {
    async fn create(&self, ctx: &ModelContext) -> ModelResult<Box<dyn CommandInstance>>;
}

/// Registry entry: one model factory, tagged by kind.
#[derive(Clone)]
pub enum ModelFactory {
    Editable(Arc<dyn EditableFactory>),
    ReadOnly(Arc<dyn ReadOnlyFactory>),
    Command(Arc<dyn CommandFactory>),
}

impl ModelFactory {
    pub fn editable(factory: impl EditableFactory + 'static) -> Self {
        ModelFactory::Editable(Arc::new(factory))
    }

    pub fn read_only(factory: impl ReadOnlyFactory + 'static) -> Self {
        ModelFactory::ReadOnly(Arc::new(factory))
    }

    pub fn command(factory: impl CommandFactory + 'static) -> Self {
        ModelFactory::Command(Arc::new(factory))
    }

    pub fn uri(&self) -> &str {
        match self {
            ModelFactory::Editable(f) => f.uri(),
            ModelFactory::ReadOnly(f) => f.uri(),
            ModelFactory::Command(f) => f.uri(),
        }
    }

    pub fn model_name(&self) -> &str {
        match self {
            ModelFactory::Editable(f) => f.model_name(),
            ModelFactory::ReadOnly(f) => f.model_name(),
            ModelFactory::Command(f) => f.model_name(),
        }
    }

    pub fn methods(&self) -> &dyn MethodResolver {
        match self {
            ModelFactory::Editable(f) => f.methods(),
            ModelFactory::ReadOnly(f) => f.methods(),
            ModelFactory::Command(f) => f.methods(),
        }
    }

    pub fn validate_methods(&self) -> Result<(), MethodTableError> {
        match self {
            ModelFactory::Editable(f) => f.validate_methods(),
            ModelFactory::ReadOnly(f) => f.validate_methods(),
            ModelFactory::Command(f) => f.validate_methods(),
        }
    }

    /// Human-readable kind, used in listings and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelFactory::Editable(_) => "editable",
            ModelFactory::ReadOnly(_) => "read-only",
            ModelFactory::Command(_) => "command",
        }
    }
}

impl std::fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelFactory")
            .field("kind", &self.kind())
            .field("uri", &self.uri())
            .field("model", &self.model_name())
            .finish()
    }
}
