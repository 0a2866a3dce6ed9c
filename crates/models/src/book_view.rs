//! `BookView`: read-only, locale-formatted view of one book.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::authorization::Operation;
use bookshelf_core::context::ModelContext;
use bookshelf_core::error::{CoreError, ModelResult};
use bookshelf_core::factory::{ModelDescriptor, ReadOnlyFactory};
use bookshelf_core::methods::{MethodResolver, MethodTable, MethodTableError, ResolvedMethod};
use bookshelf_core::model::{ModelInstance, ReadOnlyRoot};
use bookshelf_core::schema::{ModelSchema, PropertyKind, SchemaError};
use bookshelf_core::types::{DbId, Dto};
use bookshelf_db::models::book::BookRecord;
use bookshelf_db::DataLayer;
use chrono::NaiveDate;
use serde::Serialize;

use crate::filter;

pub const URI: &str = "book-view";
pub const MODEL_NAME: &str = "BookView";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    pub book_key: DbId,
    pub author: String,
    pub title: String,
    pub published: Option<String>,
    pub price: String,
    pub condition: &'static str,
}

impl BookView {
    pub fn from_record(record: BookRecord, locale: &str) -> Self {
        Self {
            book_key: record.book_key,
            author: record.author,
            title: record.title,
            published: record.publish_date.map(|d| format_date(d, locale)),
            price: format_price(record.price, locale),
            condition: if record.used { "used" } else { "new" },
        }
    }
}

fn language(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

fn format_date(date: NaiveDate, locale: &str) -> String {
    match language(locale) {
        "de" | "hu" | "ru" => date.format("%d.%m.%Y").to_string(),
        "fr" | "es" | "it" => date.format("%d/%m/%Y").to_string(),
        "en" => date.format("%B %-d, %Y").to_string(),
        _ => date.format("%Y-%m-%d").to_string(),
    }
}

fn format_price(price: f64, locale: &str) -> String {
    let plain = format!("{price:.2}");
    match language(locale) {
        "de" | "hu" | "fr" | "es" | "it" | "ru" => plain.replace('.', ","),
        _ => plain,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum BookViewFetch {
    ByKey,
}

pub fn schema() -> Result<ModelSchema, SchemaError> {
    ModelSchema::builder(MODEL_NAME)
        .key("book_key", PropertyKind::Integer)
        .property("author", PropertyKind::Text)
        .property("title", PropertyKind::Text)
        .property("published", PropertyKind::Text)
        .property("price", PropertyKind::Text)
        .property("condition", PropertyKind::Text)
        .build()
}

pub struct BookViewFactory {
    schema: ModelSchema,
    methods: MethodTable<BookViewFetch>,
    data: Arc<DataLayer>,
}

impl BookViewFactory {
    pub fn new(data: Arc<DataLayer>) -> Result<Self, SchemaError> {
        Ok(Self {
            schema: schema()?,
            methods: MethodTable::new()
                .method("fetch", BookViewFetch::ByKey)
                .alias("get-by-key", "fetch"),
            data,
        })
    }
}

impl ModelDescriptor for BookViewFactory {
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
impl ReadOnlyFactory for BookViewFactory {
    async fn fetch(
        &self,
        method: &ResolvedMethod,
        filter: Option<Dto>,
        ctx: &ModelContext,
    ) -> ModelResult<Box<dyn ModelInstance>> {
        self.schema.check_access(Operation::Fetch, ctx)?;
        let BookViewFetch::ByKey = self.methods.get(method).ok_or_else(|| {
            CoreError::Internal(format!("{MODEL_NAME} has no method '{}'", method.name))
        })?;

        let key = filter::key(filter.as_ref(), "book_key")?;
        let record = self
            .data
            .books
            .find_by_key(key)
            .await?
            .ok_or(CoreError::NotFound {
                entity: MODEL_NAME,
                id: key,
            })?;
        let view = BookView::from_record(record, &ctx.locale);
        Ok(Box::new(ReadOnlyRoot::new(MODEL_NAME, view)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::model::ModelType;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1965, 8, 1).unwrap()
    }

    #[test]
    fn dates_follow_locale() {
        assert_eq!(format_date(date(), "en-US"), "August 1, 1965");
        assert_eq!(format_date(date(), "de"), "01.08.1965");
        assert_eq!(format_date(date(), "fr_FR"), "01/08/1965");
        assert_eq!(format_date(date(), "ja"), "1965-08-01");
    }

    #[test]
    fn prices_use_locale_decimal_separator() {
        assert_eq!(format_price(9.5, "en"), "9.50");
        assert_eq!(format_price(9.5, "hu-HU"), "9,50");
    }

    #[tokio::test]
    async fn fetch_returns_read_only_object() {
        let factory = BookViewFactory::new(Arc::new(DataLayer::in_memory())).unwrap();
        let method = factory.methods().resolve("fetch").unwrap();
        let ctx = ModelContext::new(None, "de");

        let view = factory.fetch(&method, Some(json!(2)), &ctx).await.unwrap();

        assert_eq!(view.model_type(), ModelType::ReadOnlyRootObject);
        let dto = view.to_dto().unwrap();
        assert_eq!(dto["title"], "Emma");
        assert_eq!(dto["published"], "23.12.1815");
        assert_eq!(dto["price"], "4,50");
        assert_eq!(dto["condition"], "used");
    }
}
