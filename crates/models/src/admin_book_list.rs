//! `AdminBookList`: the full book list, restricted to administrators.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::authorization::{Operation, ROLE_ADMIN};
use bookshelf_core::context::ModelContext;
use bookshelf_core::error::{CoreError, ModelResult};
use bookshelf_core::factory::{ModelDescriptor, ReadOnlyFactory};
use bookshelf_core::methods::{MethodResolver, MethodTable, MethodTableError, ResolvedMethod};
use bookshelf_core::model::{ModelInstance, ReadOnlyCollection};
use bookshelf_core::schema::{ModelSchema, PropertyKind, SchemaError};
use bookshelf_core::types::Dto;
use bookshelf_db::DataLayer;

use crate::book_list::{self, BookListFetch};

pub const URI: &str = "admin/book-list";
pub const MODEL_NAME: &str = "AdminBookList";

pub fn schema() -> Result<ModelSchema, SchemaError> {
    ModelSchema::builder(MODEL_NAME)
        .key("book_key", PropertyKind::Integer)
        .property("author", PropertyKind::Text)
        .property("title", PropertyKind::Text)
        .allow(Operation::Fetch, ROLE_ADMIN)
        .build()
}

pub struct AdminBookListFactory {
    schema: ModelSchema,
    methods: MethodTable<BookListFetch>,
    data: Arc<DataLayer>,
}

impl AdminBookListFactory {
    pub fn new(data: Arc<DataLayer>) -> Result<Self, SchemaError> {
        Ok(Self {
            schema: schema()?,
            methods: MethodTable::new().method("get-all", BookListFetch::All),
            data,
        })
    }
}

impl ModelDescriptor for AdminBookListFactory {
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
impl ReadOnlyFactory for AdminBookListFactory {
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

        let (items, total) = book_list::load(&self.data, fetch, filter.as_ref()).await?;
        Ok(Box::new(ReadOnlyCollection::paged(MODEL_NAME, items, total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use bookshelf_core::authorization::ROLE_EDITOR;
    use bookshelf_core::context::UserInfo;

    fn factory() -> AdminBookListFactory {
        AdminBookListFactory::new(Arc::new(DataLayer::in_memory())).unwrap()
    }

    async fn get_all(ctx: ModelContext) -> ModelResult<Box<dyn ModelInstance>> {
        let f = factory();
        let method = f.methods().resolve("get-all").unwrap();
        f.fetch(&method, None, &ctx).await
    }

    #[tokio::test]
    async fn admins_get_every_book() {
        let ctx = ModelContext::for_user(UserInfo::new("root", &[ROLE_ADMIN]));
        let list = get_all(ctx).await.unwrap();
        assert_eq!(list.total_items(), Some(10));
    }

    #[tokio::test]
    async fn other_users_are_refused() {
        assert_matches!(
            get_all(ModelContext::anonymous()).await,
            Err(CoreError::Unauthorized(_))
        );
        let editor = ModelContext::for_user(UserInfo::new("ed", &[ROLE_EDITOR]));
        assert_matches!(get_all(editor).await, Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn has_no_aliases() {
        assert!(factory().methods().resolve("all").is_none());
    }
}
