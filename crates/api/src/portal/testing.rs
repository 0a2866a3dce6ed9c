//! Stub model for registry and dispatcher tests.

use async_trait::async_trait;
use bookshelf_core::context::ModelContext;
use bookshelf_core::error::ModelResult;
use bookshelf_core::factory::{ModelDescriptor, ReadOnlyFactory};
use bookshelf_core::methods::{MethodResolver, MethodTable, MethodTableError, ResolvedMethod};
use bookshelf_core::model::{ModelInstance, ReadOnlyRoot};
use bookshelf_core::types::Dto;
use serde_json::json;

#[derive(Debug, Clone, Copy)]
pub enum StubOp {
    Direct,
    Shadowed,
}

/// Read-only model echoing the method it ran and the filter it got.
///
/// `shadowed` is both a method and an alias of `direct`.
pub struct StubFactory {
    uri: String,
    methods: MethodTable<StubOp>,
}

impl StubFactory {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            methods: MethodTable::new()
                .method("direct", StubOp::Direct)
                .method("shadowed", StubOp::Shadowed)
                .alias("alias", "direct")
                .alias("shadowed", "direct"),
        }
    }

    pub fn without_methods(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            methods: MethodTable::new(),
        }
    }
}

impl ModelDescriptor for StubFactory {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn model_name(&self) -> &str {
        "Stub"
    }

    fn methods(&self) -> &dyn MethodResolver {
        &self.methods
    }

    fn validate_methods(&self) -> Result<(), MethodTableError> {
        self.methods.validate("Stub")
    }
}

#[async_trait]
impl ReadOnlyFactory for StubFactory {
    async fn fetch(
        &self,
        method: &ResolvedMethod,
        filter: Option<Dto>,
        _ctx: &ModelContext,
    ) -> ModelResult<Box<dyn ModelInstance>> {
        let op = match self.methods.get(method) {
            Some(StubOp::Direct) => "direct",
            Some(StubOp::Shadowed) => "shadowed",
            None => "none",
        };
        Ok(Box::new(ReadOnlyRoot::new(
            "Stub",
            json!({ "op": op, "filter": filter }),
        )))
    }
}
