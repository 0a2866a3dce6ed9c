//! `Book`: editable root object reachable under `books`.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::authorization::{Operation, ROLE_ADMIN, ROLE_EDITOR};
use bookshelf_core::context::ModelContext;
use bookshelf_core::error::{CoreError, ModelResult};
use bookshelf_core::factory::{EditableFactory, ModelDescriptor};
use bookshelf_core::methods::{MethodResolver, MethodTable, MethodTableError, ResolvedMethod};
use bookshelf_core::model::{EditableInstance, EditableModel, EditableRoot};
use bookshelf_core::schema::{ModelSchema, PropertyKind, SchemaError};
use bookshelf_core::types::{DbId, Dto};
use bookshelf_db::models::book::{BookRecord, NewBook};
use bookshelf_db::DataLayer;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filter;

pub const URI: &str = "books";
pub const MODEL_NAME: &str = "Book";

/// Editable book data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub book_key: Option<DbId>,
    pub author: String,
    pub title: String,
    pub publish_date: Option<NaiveDate>,
    pub price: f64,
    pub used: bool,
}

impl Book {
    fn stored_key(&self) -> ModelResult<DbId> {
        self.book_key
            .ok_or_else(|| CoreError::Internal("Book has not been stored yet".to_string()))
    }

    fn to_new(&self) -> NewBook {
        NewBook {
            author: self.author.clone(),
            title: self.title.clone(),
            publish_date: self.publish_date,
            price: self.price,
            used: self.used,
        }
    }
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Self {
            book_key: Some(r.book_key),
            author: r.author,
            title: r.title,
            publish_date: r.publish_date,
            price: r.price,
            used: r.used,
        }
    }
}

#[async_trait]
impl EditableModel for Book {
    type Dao = DataLayer;

    async fn insert(&mut self, dao: &DataLayer, _ctx: &ModelContext) -> ModelResult<()> {
        let record = dao.books.insert(self.to_new()).await?;
        self.book_key = Some(record.book_key);
        Ok(())
    }

    async fn update(&mut self, dao: &DataLayer, _ctx: &ModelContext) -> ModelResult<()> {
        let key = self.stored_key()?;
        dao.books.update(self.to_new().into_record(key)).await?;
        Ok(())
    }

    async fn delete(&self, dao: &DataLayer, _ctx: &ModelContext) -> ModelResult<()> {
        dao.books.delete(self.stored_key()?).await
    }
}

/// Lookup methods of `books`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookLookup {
    ByKey,
    ByTitle,
}

pub fn schema() -> Result<ModelSchema, SchemaError> {
    ModelSchema::builder(MODEL_NAME)
        .key("book_key", PropertyKind::Integer)
        .property("author", PropertyKind::Text)
        .required()
        .max_length(100)
        .property("title", PropertyKind::Text)
        .required()
        .max_length(200)
        .property("publish_date", PropertyKind::Date)
        .property("price", PropertyKind::Decimal)
        .min_value(0.0)
        .property("used", PropertyKind::Boolean)
        .allow_roles(Operation::Create, &[ROLE_EDITOR, ROLE_ADMIN])
        .allow_roles(Operation::Update, &[ROLE_EDITOR, ROLE_ADMIN])
        .allow_roles(Operation::Remove, &[ROLE_EDITOR, ROLE_ADMIN])
        .build()
}

pub struct BookFactory {
    schema: Arc<ModelSchema>,
    methods: MethodTable<BookLookup>,
    data: Arc<DataLayer>,
}

impl BookFactory {
    pub fn new(data: Arc<DataLayer>) -> Result<Self, SchemaError> {
        let methods = MethodTable::new()
            .method("fetch", BookLookup::ByKey)
            .method("get-by-title", BookLookup::ByTitle)
            .alias("get-by-key", "fetch")
            .alias("getByTitle", "get-by-title");
        Ok(Self {
            schema: Arc::new(schema()?),
            methods,
            data,
        })
    }

    fn wrap(&self, book: Book, ctx: &ModelContext) -> ModelResult<Box<dyn EditableInstance>> {
        let root = EditableRoot::fetched(
            book,
            Arc::clone(&self.schema),
            Arc::clone(&self.data),
            ctx.clone(),
        )?;
        Ok(Box::new(root))
    }
}

impl ModelDescriptor for BookFactory {
    fn uri(&self) -> &str {
        URI
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn methods(&self) -> &dyn MethodResolver {
        &self.methods
    }

    fn validate_methods(&self) -> Result<(), MethodTableError> {
        self.methods.validate(MODEL_NAME)
    }
}

#[async_trait]
impl EditableFactory for BookFactory {
    async fn create(&self, ctx: &ModelContext) -> ModelResult<Box<dyn EditableInstance>> {
        let root = EditableRoot::<Book>::create(
            Arc::clone(&self.schema),
            Arc::clone(&self.data),
            ctx.clone(),
        )?;
        Ok(Box::new(root))
    }

    async fn fetch(
        &self,
        method: &ResolvedMethod,
        filter: Option<Dto>,
        ctx: &ModelContext,
    ) -> ModelResult<Box<dyn EditableInstance>> {
        let lookup = self.methods.get(method).ok_or_else(|| {
            CoreError::Internal(format!("{MODEL_NAME} has no method '{}'", method.name))
        })?;

        let record = match lookup {
            BookLookup::ByKey => {
                let key = filter::key(filter.as_ref(), "book_key")?;
                self.data
                    .books
                    .find_by_key(key)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: MODEL_NAME,
                        id: key,
                    })?
            }
            BookLookup::ByTitle => {
                let title = filter::text(filter.as_ref(), "title")?;
                self.data
                    .books
                    .find_by_title(&title)
                    .await?
                    .ok_or_else(|| CoreError::NoMatch {
                        entity: MODEL_NAME,
                        criteria: format!("title '{title}'"),
                    })?
            }
        };

        self.wrap(record.into(), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use bookshelf_core::context::UserInfo;
    use bookshelf_core::model::ModelState;
    use serde_json::json;

    fn factory() -> BookFactory {
        BookFactory::new(Arc::new(DataLayer::in_memory())).unwrap()
    }

    fn editor() -> ModelContext {
        ModelContext::for_user(UserInfo::new("ed", &[ROLE_EDITOR]))
    }

    #[test]
    fn method_table_is_valid() {
        assert!(factory().validate_methods().is_ok());
    }

    #[tokio::test]
    async fn fetch_by_key_and_alias() {
        let f = factory();
        let method = f.methods().resolve("get-by-key").unwrap();
        let filter = Some(json!({"book_key": 1}));
        let book = f
            .fetch(&method, filter, &ModelContext::anonymous())
            .await
            .unwrap();

        let dto = book.to_dto().unwrap();
        assert_eq!(dto["title"], "Dune");
        assert_eq!(dto["publish_date"], "1965-08-01");
        assert_eq!(book.state(), ModelState::Pristine);
    }

    #[tokio::test]
    async fn fetch_unknown_title_is_no_match() {
        let f = factory();
        let method = f.methods().resolve("getByTitle").unwrap();
        let result = f
            .fetch(&method, Some(json!("Ulysses")), &ModelContext::anonymous())
            .await;
        assert_matches!(result, Err(CoreError::NoMatch { entity: "Book", .. }));
    }

    #[tokio::test]
    async fn anonymous_users_cannot_create_books() {
        let result = factory().create(&ModelContext::anonymous()).await;
        assert_matches!(result, Err(CoreError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn created_book_gets_next_key() {
        let f = factory();
        let mut book = f.create(&editor()).await.unwrap();
        book.from_dto(&json!({"author": "A", "title": "T", "price": 1.5}))
            .unwrap();
        book.save().await.unwrap();

        let dto = book.to_dto().unwrap();
        assert_eq!(dto["book_key"], 11);
        assert_eq!(dto["author"], "A");
        assert_eq!(dto["title"], "T");
    }

    #[tokio::test]
    async fn negative_price_breaks_rules() {
        let f = factory();
        let mut book = f.create(&editor()).await.unwrap();
        book.from_dto(&json!({"author": "A", "title": "T", "price": -3}))
            .unwrap();

        assert_matches!(book.save().await, Err(CoreError::BrokenRules(broken))
            if broken.for_property("price").count() == 1);
    }
}
