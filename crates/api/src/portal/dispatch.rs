use std::sync::Arc;

use bookshelf_core::context::ModelContext;
use bookshelf_core::error::CoreError;
use bookshelf_core::factory::{CommandFactory, EditableFactory, ModelFactory};
use bookshelf_core::methods::{MethodResolver, ResolvedMethod};
use bookshelf_core::model::{ModelInstance, ModelType};
use bookshelf_core::types::Dto;
use serde_json::{json, Value};

use super::request::{effective_filter, parse_url, LookupBody, Verb};
use super::{ApiPortal, DispatchError, PortalRequest};

impl ApiPortal {
    /// Run one request against its model and return the serialized result.
    pub async fn dispatch(
        &self,
        request: PortalRequest,
        ctx: &ModelContext,
    ) -> Result<Dto, DispatchError> {
        let target = parse_url(&self.api_root, &request.url)?;
        let factory = self
            .registry
            .get(target.model_uri)
            .ok_or_else(|| DispatchError::InvalidType(target.model_uri.to_string()))?;

        tracing::debug!(
            model = factory.model_name(),
            method = target.method,
            user = ?ctx.user_name(),
            "Dispatching API request",
        );

        let verb = Verb::parse(target.method);
        match (verb, factory) {
            (Verb::Insert, ModelFactory::Editable(f)) => insert(f, request.body, ctx).await,
            (Verb::Update, ModelFactory::Editable(f)) => update(f, request.body, ctx).await,
            (Verb::Remove, ModelFactory::Editable(f)) => remove(f, request.body, ctx).await,
            (Verb::Insert | Verb::Update | Verb::Remove, _) => {
                Err(invalid_method(factory.model_name(), target.method))
            }
            (Verb::Method(name), ModelFactory::Command(f)) => {
                execute(f, name, request.body, ctx).await
            }
            (Verb::Method(name), ModelFactory::Editable(f)) => {
                let method = resolve(f.methods(), f.model_name(), name)?;
                let filter = effective_filter(request.body);
                let instance = f.fetch(&method, filter, ctx).await?;
                Ok(instance.to_dto()?)
            }
            (Verb::Method(name), ModelFactory::ReadOnly(f)) => {
                let method = resolve(f.methods(), f.model_name(), name)?;
                let filter = effective_filter(request.body);
                let instance = f.fetch(&method, filter, ctx).await?;
                serialize_result(instance.as_ref())
            }
        }
    }
}

fn invalid_method(model: &str, method: &str) -> DispatchError {
    DispatchError::InvalidMethod {
        model: model.to_string(),
        method: method.to_string(),
    }
}

fn resolve(
    methods: &dyn MethodResolver,
    model: &str,
    requested: &str,
) -> Result<ResolvedMethod, DispatchError> {
    let method = methods
        .resolve(requested)
        .ok_or_else(|| invalid_method(model, requested))?;
    if method.via_alias {
        tracing::debug!(
            model,
            alias = requested,
            method = %method.name,
            "Method alias resolved"
        );
    }
    Ok(method)
}

/// Plain DTO, except read-only collections which carry their total.
fn serialize_result(instance: &dyn ModelInstance) -> Result<Dto, DispatchError> {
    let dto = instance.to_dto()?;
    match instance.model_type() {
        ModelType::ReadOnlyRootCollection => Ok(json!({
            "modelType": ModelType::ReadOnlyRootCollection,
            "collection": dto,
            "totalItems": instance.total_items().unwrap_or_default(),
        })),
        _ => Ok(dto),
    }
}

async fn insert(
    factory: &Arc<dyn EditableFactory>,
    body: Dto,
    ctx: &ModelContext,
) -> Result<Dto, DispatchError> {
    let mut instance = factory.create(ctx).await?;
    instance.from_dto(&body)?;
    instance.save().await?;
    Ok(instance.to_dto()?)
}

async fn update(
    factory: &Arc<dyn EditableFactory>,
    body: Dto,
    ctx: &ModelContext,
) -> Result<Dto, DispatchError> {
    let lookup = LookupBody::from_body(body)?;
    let method = resolve(factory.methods(), factory.model_name(), &lookup.method)?;
    let dto = lookup
        .dto
        .ok_or_else(|| CoreError::InvalidDto("update requires a 'dto' object".to_string()))?;

    let mut instance = factory.fetch(&method, lookup.filter, ctx).await?;
    instance.from_dto(&dto)?;
    instance.save().await?;
    Ok(instance.to_dto()?)
}

async fn remove(
    factory: &Arc<dyn EditableFactory>,
    body: Dto,
    ctx: &ModelContext,
) -> Result<Dto, DispatchError> {
    let lookup = LookupBody::from_body(body)?;
    let method = resolve(factory.methods(), factory.model_name(), &lookup.method)?;

    let mut instance = factory.fetch(&method, lookup.filter, ctx).await?;
    instance.remove();
    instance.save().await?;
    Ok(Value::Null)
}

async fn execute(
    factory: &Arc<dyn CommandFactory>,
    name: &str,
    body: Dto,
    ctx: &ModelContext,
) -> Result<Dto, DispatchError> {
    let input = if body.is_null() { json!({}) } else { body };

    let mut command = factory.create(ctx).await?;
    command.from_dto(&input)?;
    let method = resolve(command.methods(), factory.model_name(), name)?;
    command.execute(&method).await?;
    Ok(command.to_dto()?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use bookshelf_core::authorization::ROLE_EDITOR;
    use bookshelf_core::context::UserInfo;
    use bookshelf_db::DataLayer;
    use serde_json::json;

    use super::*;
    use crate::portal::testing::StubFactory;

    fn portal() -> ApiPortal {
        let data = Arc::new(DataLayer::in_memory());
        let mut factories = bookshelf_models::factories(data).unwrap();
        factories.push(ModelFactory::read_only(StubFactory::new("stub")));
        ApiPortal::new("/api", factories).unwrap()
    }

    fn editor() -> ModelContext {
        ModelContext::for_user(UserInfo::new("ed", &[ROLE_EDITOR]))
    }

    async fn call(portal: &ApiPortal, url: &str, body: Dto) -> Result<Dto, DispatchError> {
        let request = PortalRequest::new(url, body);
        portal.dispatch(request, &editor()).await
    }

    #[tokio::test]
    async fn url_outside_api_root_is_invalid() {
        let result = call(&portal(), "/other/books/fetch", json!(1)).await;
        assert_matches!(result, Err(DispatchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn unknown_model_is_invalid_type() {
        let result = call(&portal(), "/api/authors/fetch", json!(1)).await;
        assert_matches!(result, Err(DispatchError::InvalidType(uri)) if uri == "authors");
    }

    #[tokio::test]
    async fn unknown_model_fails_before_method_resolution() {
        let p = portal();
        let result = call(&p, "/api/authors/no-such-method", Value::Null).await;
        assert_matches!(result, Err(DispatchError::InvalidType(uri)) if uri == "authors");

        let write = call(&p, "/api/authors/insert", json!({})).await;
        assert_matches!(write, Err(DispatchError::InvalidType(_)));
    }

    #[tokio::test]
    async fn unknown_method_is_invalid_method() {
        let result = call(&portal(), "/api/books/get-by-isbn", json!(1)).await;
        assert_matches!(
            result,
            Err(DispatchError::InvalidMethod { method, .. }) if method == "get-by-isbn"
        );
    }

    #[tokio::test]
    async fn direct_method_wins_over_alias() {
        let p = portal();
        let direct = call(&p, "/api/stub/shadowed", Value::Null).await.unwrap();
        assert_eq!(direct["op"], "shadowed");

        let aliased = call(&p, "/api/stub/alias", Value::Null).await.unwrap();
        assert_eq!(aliased["op"], "direct");
    }

    #[tokio::test]
    async fn fetch_receives_derived_filter() {
        let p = portal();
        let range = json!({"from": 1, "to": 5});

        let empty = json!({"$isEmpty": true});
        let result = call(&p, "/api/stub/direct", empty).await.unwrap();
        assert_eq!(result["filter"], Value::Null);

        let explicit = json!({"$filter": range.clone()});
        let result = call(&p, "/api/stub/direct", explicit).await.unwrap();
        assert_eq!(result["filter"], range);

        let result = call(&p, "/api/stub/direct", range.clone()).await.unwrap();
        assert_eq!(result["filter"], range);
    }

    #[tokio::test]
    async fn insert_returns_stored_book() {
        let book = json!({"author": "A", "title": "T"});
        let dto = call(&portal(), "/api/books/insert", book).await.unwrap();
        assert!(dto["book_key"].is_i64());
        assert_eq!(dto["author"], "A");
        assert_eq!(dto["title"], "T");
    }

    #[tokio::test]
    async fn update_changes_fetched_book() {
        let p = portal();
        let dto = call(
            &p,
            "/api/books/update",
            json!({"method": "get-by-key", "filter": 2, "dto": {"price": 6.25}}),
        )
        .await
        .unwrap();
        assert_eq!(dto["price"], 6.25);
        assert_eq!(dto["title"], "Emma");

        let reloaded = call(&p, "/api/books/fetch", json!(2)).await.unwrap();
        assert_eq!(reloaded["price"], 6.25);
    }

    #[tokio::test]
    async fn remove_resolves_to_null() {
        let p = portal();
        let lookup = json!({"method": "fetch", "filter": 5});
        let result = call(&p, "/api/books/remove", lookup).await.unwrap();
        assert_eq!(result, Value::Null);

        let gone = call(&p, "/api/books/fetch", json!(5)).await;
        assert_matches!(gone, Err(DispatchError::Model(CoreError::NotFound { id: 5, .. })));
    }

    #[tokio::test]
    async fn write_verbs_on_read_only_models_are_invalid() {
        let p = portal();
        for verb in ["insert", "update", "remove"] {
            let result = call(&p, &format!("/api/book-list/{verb}"), json!({})).await;
            assert_matches!(result, Err(DispatchError::InvalidMethod { .. }), "{verb}");
        }
    }

    #[tokio::test]
    async fn collections_are_wrapped_with_total() {
        let page = json!({"$filter": {"from": 1, "to": 5}});
        let dto = call(&portal(), "/api/book-list/page", page).await.unwrap();
        assert_eq!(dto["modelType"], "ReadOnlyRootCollection");
        assert_eq!(dto["collection"].as_array().unwrap().len(), 5);
        assert_eq!(dto["totalItems"], 10);
    }

    #[tokio::test]
    async fn objects_are_not_wrapped() {
        let key = json!({"book_key": 1});
        let result = call(&portal(), "/api/book-view/get-by-key", key).await;
        let dto = result.unwrap();
        assert_eq!(dto["title"], "Dune");
        assert!(dto.get("modelType").is_none());
    }

    #[tokio::test]
    async fn command_runs_resolved_method() {
        let dto = call(&portal(), "/api/find-bestseller/find", Value::Null)
            .await
            .unwrap();
        assert_eq!(dto["title"], "The Hobbit");
    }

    #[tokio::test]
    async fn command_rejects_unknown_method() {
        let result = call(&portal(), "/api/find-bestseller/fetch", json!({})).await;
        assert_matches!(result, Err(DispatchError::InvalidMethod { .. }));
    }

    #[tokio::test]
    async fn model_errors_pass_through() {
        let request = PortalRequest::new("/api/books/insert", json!({"author": "A"}));
        let result = portal().dispatch(request, &ModelContext::anonymous()).await;
        assert_matches!(
            result,
            Err(DispatchError::Model(CoreError::Unauthorized(_)))
        );
    }
}
