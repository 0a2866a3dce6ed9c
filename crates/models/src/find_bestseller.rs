//! `FindBestseller`: command finding the best-selling book of a period.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::context::ModelContext;
use bookshelf_core::error::{CoreError, ModelResult};
use bookshelf_core::factory::{CommandFactory, ModelDescriptor};
use bookshelf_core::methods::{MethodResolver, MethodTable, MethodTableError};
use bookshelf_core::model::{Command, CommandInstance, CommandModel};
use bookshelf_core::schema::{ModelSchema, PropertyKind, SchemaError};
use bookshelf_core::types::DbId;
use bookshelf_db::DataLayer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const URI: &str = "find-bestseller";
pub const MODEL_NAME: &str = "FindBestseller";

/// Input period (`from`, `to`, both optional) and the book found for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindBestseller {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub book_key: Option<DbId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub copies_sold: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestsellerOp {
    Find,
}

#[async_trait]
impl CommandModel for FindBestseller {
    type Dao = DataLayer;
    type Op = BestsellerOp;

    async fn execute(
        &mut self,
        op: BestsellerOp,
        dao: &DataLayer,
        _ctx: &ModelContext,
    ) -> ModelResult<()> {
        match op {
            BestsellerOp::Find => {
                let Some(top) = dao.sales.top_seller(self.from, self.to).await? else {
                    return Err(CoreError::NoMatch {
                        entity: MODEL_NAME,
                        criteria: "no sales in the requested period".to_string(),
                    });
                };
                let book = dao
                    .books
                    .find_by_key(top.book_key)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "Book",
                        id: top.book_key,
                    })?;

                self.book_key = Some(book.book_key);
                self.title = Some(book.title);
                self.author = Some(book.author);
                self.copies_sold = Some(top.copies_sold);
            }
        }
        Ok(())
    }
}

pub fn schema() -> Result<ModelSchema, SchemaError> {
    ModelSchema::builder(MODEL_NAME)
        .property("from", PropertyKind::Date)
        .property("to", PropertyKind::Date)
        .property("book_key", PropertyKind::Integer)
        .read_only()
        .property("title", PropertyKind::Text)
        .read_only()
        .property("author", PropertyKind::Text)
        .read_only()
        .property("copies_sold", PropertyKind::Integer)
        .read_only()
        .build()
}

pub struct FindBestsellerFactory {
    schema: Arc<ModelSchema>,
    methods: Arc<MethodTable<BestsellerOp>>,
    data: Arc<DataLayer>,
}

impl FindBestsellerFactory {
    pub fn new(data: Arc<DataLayer>) -> Result<Self, SchemaError> {
        let methods = MethodTable::new()
            .method("execute", BestsellerOp::Find)
            .alias("find", "execute");
        Ok(Self {
            schema: Arc::new(schema()?),
            methods: Arc::new(methods),
            data,
        })
    }
}

impl ModelDescriptor for FindBestsellerFactory {
    fn uri(&self) -> &str {
        URI
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn methods(&self) -> &dyn MethodResolver {
        self.methods.as_ref()
    }

    fn validate_methods(&self) -> Result<(), MethodTableError> {
        self.methods.validate(MODEL_NAME)
    }
}

#[async_trait]
impl CommandFactory for FindBestsellerFactory {
    async fn create(&self, ctx: &ModelContext) -> ModelResult<Box<dyn CommandInstance>> {
        let command = Command::<FindBestseller>::create(
            Arc::clone(&self.schema),
            Arc::clone(&self.methods),
            Arc::clone(&self.data),
            ctx.clone(),
        )?;
        Ok(Box::new(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    async fn run(input: serde_json::Value) -> ModelResult<serde_json::Value> {
        let factory = FindBestsellerFactory::new(Arc::new(DataLayer::in_memory())).unwrap();
        let mut command = factory.create(&ModelContext::anonymous()).await?;
        command.from_dto(&input)?;
        let method = command.methods().resolve("find").unwrap();
        command.execute(&method).await?;
        command.to_dto()
    }

    #[tokio::test]
    async fn finds_all_time_bestseller() {
        let dto = run(json!({})).await.unwrap();
        assert_eq!(dto["title"], "The Hobbit");
        assert_eq!(dto["copies_sold"], 27);
    }

    #[tokio::test]
    async fn finds_bestseller_of_a_period() {
        let dto = run(json!({"from": "2024-02-01", "to": "2024-02-29"}))
            .await
            .unwrap();
        assert_eq!(dto["title"], "Kindred");
        assert_eq!(dto["from"], "2024-02-01");
    }

    #[tokio::test]
    async fn outputs_cannot_be_supplied_by_the_caller() {
        let input = json!({"from": "2024-03-01", "to": "2024-03-31", "title": "Fake"});
        let dto = run(input).await.unwrap();
        assert_eq!(dto["title"], "The Hobbit");
    }

    #[tokio::test]
    async fn empty_period_is_no_match() {
        let result = run(json!({"from": "1990-01-01", "to": "1990-12-31"})).await;
        assert_matches!(result, Err(CoreError::NoMatch { .. }));
    }

    #[tokio::test]
    async fn malformed_date_breaks_rules() {
        let result = run(json!({"from": "yesterday"})).await;
        assert_matches!(result, Err(CoreError::BrokenRules(_)));
    }
}
