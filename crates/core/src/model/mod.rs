//! Model kinds, instance contracts and the generic containers that
//! implement them.
//!
//! - [`EditableRoot`] wraps an [`EditableModel`] and drives its
//!   [`ModelState`] through `from_dto` / `remove` / `save`.
//! - [`ReadOnlyRoot`] and [`ReadOnlyCollection`] wrap fetched data.
//! - [`Command`] wraps a [`CommandModel`] whose named methods run on the
//!   deserialized input.

mod command;
mod editable;
mod read_only;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, ModelResult};
use crate::methods::{MethodResolver, ResolvedMethod};
use crate::rules::BrokenRuleList;
use crate::schema::ModelSchema;
use crate::types::Dto;

pub use command::{Command, CommandModel};
pub use editable::{EditableModel, EditableRoot};
pub use read_only::{ReadOnlyCollection, ReadOnlyRoot};

/// Runtime shape of a model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    EditableRootObject,
    ReadOnlyRootObject,
    ReadOnlyRootCollection,
    CommandObject,
}

/// Persistence state of an editable instance.
///
/// ```text
/// create ──> Created ──save──> Pristine <──save── Changed
///                                 │  from_dto ──────^
///   any state ──remove──> Removed ──save──> (deleted)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelState {
    /// New and never saved.
    Created,
    /// Loaded from or saved to the data layer, unchanged since.
    Pristine,
    /// Loaded and modified.
    Changed,
    /// Marked for deletion.
    Removed,
}

/// Anything the dispatcher can serialize back to the caller.
pub trait ModelInstance: Send + Sync {
    fn model_name(&self) -> &str;

    fn model_type(&self) -> ModelType;

    /// Plain-data representation of the instance.
    fn to_dto(&self) -> ModelResult<Dto>;

    /// Total number of items available to a collection, which may exceed
    /// the number of items it holds.
    fn total_items(&self) -> Option<u64> {
        None
    }
}

/// An editable root object.
#[async_trait]
pub trait EditableInstance: ModelInstance {
    fn state(&self) -> ModelState;

    /// Copy writable properties from `dto` into the instance.
    fn from_dto(&mut self, dto: &Dto) -> ModelResult<()>;

    /// Mark the instance for deletion; the next `save` deletes it.
    fn remove(&mut self);

    fn broken_rules(&self) -> BrokenRuleList;

    /// Insert, update or delete according to the current state.
    async fn save(&mut self) -> ModelResult<()>;
}

/// A command object: input properties, named methods, output properties.
#[async_trait]
pub trait CommandInstance: ModelInstance {
    fn from_dto(&mut self, dto: &Dto) -> ModelResult<()>;

    fn methods(&self) -> &dyn MethodResolver;

    async fn execute(&mut self, method: &ResolvedMethod) -> ModelResult<()>;
}

fn debug_instance(name: &str, model_type: ModelType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ModelInstance")
        .field("model_name", &name)
        .field("model_type", &model_type)
        .finish_non_exhaustive()
}

impl fmt::Debug for dyn ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_instance(self.model_name(), self.model_type(), f)
    }
}

impl fmt::Debug for dyn EditableInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_instance(self.model_name(), self.model_type(), f)
    }
}

impl fmt::Debug for dyn CommandInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_instance(self.model_name(), self.model_type(), f)
    }
}

/// Serialize `value`, failing with an internal error.
pub(crate) fn to_dto<T: Serialize>(value: &T) -> ModelResult<Dto> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(e.to_string()))
}

fn to_map<T: Serialize>(value: &T) -> ModelResult<Map<String, Value>> {
    match to_dto(value)? {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::Internal(format!(
            "model data must serialize to an object, got {other}"
        ))),
    }
}

/// Overlay the writable properties of `dto` onto `current`.
///
/// Unknown, key and read-only properties in `dto` are ignored.
pub(crate) fn apply_dto<T>(schema: &ModelSchema, current: &T, dto: &Dto) -> ModelResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(incoming) = dto else {
        return Err(CoreError::InvalidDto(format!(
            "{} expects a JSON object",
            schema.name()
        )));
    };

    let mut merged = to_map(current)?;
    for (name, value) in incoming {
        if schema.property(name).is_some_and(|p| p.is_writable()) {
            merged.insert(name.clone(), value.clone());
        }
    }

    let broken = schema.validate(&merged);
    let type_errors: BrokenRuleList = broken
        .iter()
        .filter(|r| r.rule == "type")
        .cloned()
        .collect();
    if !type_errors.is_empty() {
        return Err(CoreError::BrokenRules(type_errors));
    }

    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Evaluate the schema against the serialized form of `data`.
pub(crate) fn validate<T: Serialize>(schema: &ModelSchema, data: &T) -> BrokenRuleList {
    match to_map(data) {
        Ok(map) => schema.validate(&map),
        Err(err) => {
            tracing::error!(model = schema.name(), error = %err, "Cannot validate model data");
            BrokenRuleList::default()
        }
    }
}
