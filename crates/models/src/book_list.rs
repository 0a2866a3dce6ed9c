//! `BookList`: read-only collection of book summaries.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::authorization::Operation;
use bookshelf_core::context::ModelContext;
use bookshelf_core::error::{CoreError, ModelResult};
use bookshelf_core::factory::{ModelDescriptor, ReadOnlyFactory};
use bookshelf_core::methods::{MethodResolver, MethodTable, MethodTableError, ResolvedMethod};
use bookshelf_core::model::{ModelInstance, ReadOnlyCollection};
use bookshelf_core::schema::{ModelSchema, PropertyKind, SchemaError};
use bookshelf_core::types::{DbId, Dto};
use bookshelf_db::models::book::BookRecord;
use bookshelf_db::DataLayer;
use serde::Serialize;

use crate::filter;

pub const URI: &str = "book-list";
pub const MODEL_NAME: &str = "BookList";

/// One row of a book list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookListItem {
    pub book_key: DbId,
    pub author: String,
    pub title: String,
}

impl From<BookRecord> for BookListItem {
    fn from(r: BookRecord) -> Self {
        Self {
            book_key: r.book_key,
            author: r.author,
            title: r.title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookListFetch {
    All,
    ByAuthor,
    Range,
}

pub(crate) fn schema(model_name: &str) -> Result<ModelSchema, SchemaError> {
    ModelSchema::builder(model_name)
        .key("book_key", PropertyKind::Integer)
        .property("author", PropertyKind::Text)
        .property("title", PropertyKind::Text)
        .build()
}

/// Loads book list items for the `BookList` family of models.
pub(crate) async fn load(
    data: &DataLayer,
    fetch: BookListFetch,
    filter: Option<&Dto>,
) -> ModelResult<(Vec<BookListItem>, u64)> {
    let (records, total) = match fetch {
        BookListFetch::All => {
            let all = data.books.list_all().await?;
            let total = all.len() as u64;
            (all, total)
        }
        BookListFetch::ByAuthor => {
            let author = filter::text(filter, "author")?;
            let found = data.books.list_by_author(&author).await?;
            let total = found.len() as u64;
            (found, total)
        }
        BookListFetch::Range => {
            let from = filter::position(filter, "from")?;
            let to = filter::position(filter, "to")?;
            data.books.list_range(from, to).await?
        }
    };
    let items = records.into_iter().map(BookListItem::from).collect();
    Ok((items, total))
}

pub struct BookListFactory {
    schema: ModelSchema,
    methods: MethodTable<BookListFetch>,
    data: Arc<DataLayer>,
}

impl BookListFactory {
    pub fn new(data: Arc<DataLayer>) -> Result<Self, SchemaError> {
        let methods = MethodTable::new()
            .method("get-all", BookListFetch::All)
            .method("get-by-author", BookListFetch::ByAuthor)
            .method("get-from-to", BookListFetch::Range)
            .alias("all", "get-all")
            .alias("page", "get-from-to");
        Ok(Self {
            schema: schema(MODEL_NAME)?,
            methods,
            data,
        })
    }
}

impl ModelDescriptor for BookListFactory {
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
impl ReadOnlyFactory for BookListFactory {
    async fn fetch(
        &self,
        method: &ResolvedMethod,
        filter: Option<Dto>,
        ctx: &ModelContext,
    ) -> ModelResult<Box<dyn ModelInstance>> {
        self.schema.check_access(Operation::Fetch, ctx)?;
        let fetch = self.methods.get(method).ok_or_else(|| {
            CoreError::Internal(format!("{MODEL_NAME} has no method '{}'", method.name))
        })?;

        let (items, total) = load(&self.data, fetch, filter.as_ref()).await?;
        tracing::debug!(
            model = MODEL_NAME,
            count = items.len(),
            total,
            "Book list fetched"
        );
        Ok(Box::new(ReadOnlyCollection::paged(MODEL_NAME, items, total)))
    }
}
