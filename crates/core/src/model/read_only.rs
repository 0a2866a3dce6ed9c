use serde::Serialize;

use super::{to_dto, ModelInstance, ModelType};
use crate::error::ModelResult;
use crate::types::Dto;

/// A fetched, read-only object.
#[derive(Debug, Clone)]
pub struct ReadOnlyRoot<T> {
    model_name: String,
    data: T,
}

impl<T: Serialize + Send + Sync> ReadOnlyRoot<T> {
    pub fn new(model_name: impl Into<String>, data: T) -> Self {
        Self {
            model_name: model_name.into(),
            data,
        }
    }
}

impl<T: Serialize + Send + Sync> ModelInstance for ReadOnlyRoot<T> {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_type(&self) -> ModelType {
        ModelType::ReadOnlyRootObject
    }

    fn to_dto(&self) -> ModelResult<Dto> {
        to_dto(&self.data)
    }
}

/// A fetched, read-only list of items.
///
/// `total_items` counts every item matching the fetch, so a paged
/// collection reports more than it holds.
#[derive(Debug, Clone)]
pub struct ReadOnlyCollection<T> {
    model_name: String,
    items: Vec<T>,
    total_items: u64,
}

impl<T: Serialize + Send + Sync> ReadOnlyCollection<T> {
    /// A complete collection; the total equals the number of items.
    pub fn new(model_name: impl Into<String>, items: Vec<T>) -> Self {
        let total_items = items.len() as u64;
        Self::paged(model_name, items, total_items)
    }

    /// One page of a larger result.
    pub fn paged(model_name: impl Into<String>, items: Vec<T>, total_items: u64) -> Self {
        Self {
            model_name: model_name.into(),
            items,
            total_items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Serialize + Send + Sync> ModelInstance for ReadOnlyCollection<T> {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_type(&self) -> ModelType {
        ModelType::ReadOnlyRootCollection
    }

    fn to_dto(&self) -> ModelResult<Dto> {
        to_dto(&self.items)
    }

    fn total_items(&self) -> Option<u64> {
        Some(self.total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[derive(Serialize)]
    struct Item {
        title: &'static str,
    }

    #[test]
    fn collection_serializes_items_and_reports_total() {
        let list = ReadOnlyCollection::paged("BookList", vec![Item { title: "Dune" }], 12);
        assert_eq!(list.model_type(), ModelType::ReadOnlyRootCollection);
        assert_eq!(list.to_dto().unwrap(), json!([{"title": "Dune"}]));
        assert_eq!(list.total_items(), Some(12));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn object_has_no_total() {
        let view = ReadOnlyRoot::new("BookView", Item { title: "Emma" });
        assert_eq!(view.model_type(), ModelType::ReadOnlyRootObject);
        assert_eq!(view.total_items(), None);
        assert_eq!(view.to_dto().unwrap(), json!({"title": "Emma"}));
    }

    #[test]
    fn boxed_instances_debug_with_name_and_type() {
        let items = vec![Item { title: "Dune" }];
        let boxed: Box<dyn ModelInstance> = Box::new(ReadOnlyCollection::new("BookList", items));
        let printed = format!("{boxed:?}");
        assert!(printed.contains("BookList"));
        assert!(printed.contains("ReadOnlyRootCollection"));

        let result: ModelResult<Box<dyn ModelInstance>> = Ok(boxed);
        assert_matches!(result, Ok(instance) if instance.model_name() == "BookList");
    }
}
