use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{apply_dto, to_dto, validate, EditableInstance, ModelInstance, ModelState, ModelType};
use crate::authorization::Operation;
use crate::context::ModelContext;
use crate::error::{CoreError, ModelResult};
use crate::rules::BrokenRuleList;
use crate::schema::ModelSchema;
use crate::types::Dto;

/// Data and persistence hooks of an editable root model.
///
/// Implementors only describe how their data reaches the data layer;
/// state tracking, authorization and validation live in [`EditableRoot`].
#[async_trait]
pub trait EditableModel: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Data access object the hooks talk to.
    type Dao: ?Sized + Send + Sync + 'static;

    /// Persist a new instance. Must fill in generated keys.
    async fn insert(&mut self, dao: &Self::Dao, ctx: &ModelContext) -> ModelResult<()>;

    /// Persist changes to an existing instance.
    async fn update(&mut self, dao: &Self::Dao, ctx: &ModelContext) -> ModelResult<()>;

    /// Delete an existing instance.
    async fn delete(&self, dao: &Self::Dao, ctx: &ModelContext) -> ModelResult<()>;
}

/// Generic editable root object.
pub struct EditableRoot<M: EditableModel> {
    data: M,
    state: ModelState,
    is_new: bool,
    schema: Arc<ModelSchema>,
    dao: Arc<M::Dao>,
    ctx: ModelContext,
}

impl<M: EditableModel> EditableRoot<M> {
    /// A blank, unsaved instance. Requires the `Create` permission.
    pub fn create(
        schema: Arc<ModelSchema>,
        dao: Arc<M::Dao>,
        ctx: ModelContext,
    ) -> ModelResult<Self> {
        schema.check_access(Operation::Create, &ctx)?;
        Ok(Self {
            data: M::default(),
            state: ModelState::Created,
            is_new: true,
            schema,
            dao,
            ctx,
        })
    }

    /// An instance loaded from the data layer. Requires the `Fetch` permission.
    pub fn fetched(
        data: M,
        schema: Arc<ModelSchema>,
        dao: Arc<M::Dao>,
        ctx: ModelContext,
    ) -> ModelResult<Self> {
        schema.check_access(Operation::Fetch, &ctx)?;
        Ok(Self {
            data,
            state: ModelState::Pristine,
            is_new: false,
            schema,
            dao,
            ctx,
        })
    }

    fn ensure_valid(&self) -> ModelResult<()> {
        let broken = self.broken_rules();
        if broken.is_empty() {
            Ok(())
        } else {
            tracing::debug!(model = self.schema.name(), broken = %broken, "Save rejected");
            Err(CoreError::BrokenRules(broken))
        }
    }
}

impl<M: EditableModel> ModelInstance for EditableRoot<M> {
    fn model_name(&self) -> &str {
        self.schema.name()
    }

    fn model_type(&self) -> ModelType {
        ModelType::EditableRootObject
    }

    fn to_dto(&self) -> ModelResult<Dto> {
        to_dto(&self.data)
    }
}

#[async_trait]
impl<M: EditableModel> EditableInstance for EditableRoot<M> {
    fn state(&self) -> ModelState {
        self.state
    }

    fn from_dto(&mut self, dto: &Dto) -> ModelResult<()> {
        if self.state == ModelState::Removed {
            return Err(CoreError::Validation(format!(
                "{} has been removed and cannot be changed",
                self.schema.name()
            )));
        }
        self.data = apply_dto(&self.schema, &self.data, dto)?;
        if self.state == ModelState::Pristine {
            self.state = ModelState::Changed;
        }
        Ok(())
    }

    fn remove(&mut self) {
        self.state = ModelState::Removed;
    }

    fn broken_rules(&self) -> BrokenRuleList {
        validate(&self.schema, &self.data)
    }

    async fn save(&mut self) -> ModelResult<()> {
        let model = self.schema.name().to_string();
        match self.state {
            ModelState::Pristine => {
                tracing::debug!(model = %model, "Nothing to save");
            }
            ModelState::Created => {
                self.schema.check_access(Operation::Create, &self.ctx)?;
                self.ensure_valid()?;
                self.data.insert(&*self.dao, &self.ctx).await?;
                self.state = ModelState::Pristine;
                self.is_new = false;
                tracing::info!(model = %model, user = ?self.ctx.user_name(), "Inserted");
            }
            ModelState::Changed => {
                self.schema.check_access(Operation::Update, &self.ctx)?;
                self.ensure_valid()?;
                self.data.update(&*self.dao, &self.ctx).await?;
                self.state = ModelState::Pristine;
                tracing::info!(model = %model, user = ?self.ctx.user_name(), "Updated");
            }
            ModelState::Removed => {
                self.schema.check_access(Operation::Remove, &self.ctx)?;
                if !self.is_new {
                    self.data.delete(&*self.dao, &self.ctx).await?;
                    tracing::info!(model = %model, user = ?self.ctx.user_name(), "Deleted");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_matches::assert_matches;
    use serde::Deserialize;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;
    use crate::authorization::ROLE_EDITOR;
    use crate::context::UserInfo;
    use crate::schema::PropertyKind;

    #[derive(Default)]
    struct NoteStore {
        rows: Mutex<BTreeMap<i64, String>>,
    }

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    struct Note {
        id: i64,
        text: Option<String>,
    }

    #[async_trait]
    impl EditableModel for Note {
        type Dao = NoteStore;

        async fn insert(&mut self, dao: &NoteStore, _ctx: &ModelContext) -> ModelResult<()> {
            let mut rows = dao.rows.lock().await;
            self.id = rows.len() as i64 + 1;
            rows.insert(self.id, self.text.clone().unwrap_or_default());
            Ok(())
        }

        async fn update(&mut self, dao: &NoteStore, _ctx: &ModelContext) -> ModelResult<()> {
            dao.rows
                .lock()
                .await
                .insert(self.id, self.text.clone().unwrap_or_default());
            Ok(())
        }

        async fn delete(&self, dao: &NoteStore, _ctx: &ModelContext) -> ModelResult<()> {
            dao.rows.lock().await.remove(&self.id);
            Ok(())
        }
    }

    fn schema() -> Arc<ModelSchema> {
        Arc::new(
            ModelSchema::builder("Note")
                .key("id", PropertyKind::Integer)
                .property("text", PropertyKind::Text)
                .required()
                .allow(Operation::Remove, ROLE_EDITOR)
                .build()
                .unwrap(),
        )
    }

    fn editor() -> ModelContext {
        ModelContext::for_user(UserInfo::new("ed", &[ROLE_EDITOR]))
    }

    #[tokio::test]
    async fn created_instance_is_inserted_on_save() {
        let store = Arc::new(NoteStore::default());
        let mut note = EditableRoot::<Note>::create(schema(), store.clone(), editor()).unwrap();
        assert_eq!(note.state(), ModelState::Created);

        note.from_dto(&json!({"id": 99, "text": "hello"})).unwrap();
        assert_eq!(note.state(), ModelState::Created);

        note.save().await.unwrap();
        assert_eq!(note.state(), ModelState::Pristine);
        // Keys come from the data layer, never from the DTO.
        assert_eq!(note.to_dto().unwrap(), json!({"id": 1, "text": "hello"}));
        assert_eq!(store.rows.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn broken_rules_block_save() {
        let store = Arc::new(NoteStore::default());
        let mut note = EditableRoot::<Note>::create(schema(), store.clone(), editor()).unwrap();

        let result = note.save().await;
        assert_matches!(result, Err(CoreError::BrokenRules(broken)) if broken.len() == 1);
        assert!(store.rows.lock().await.is_empty());
        assert_eq!(note.state(), ModelState::Created);
    }

    #[tokio::test]
    async fn fetched_instance_becomes_changed_then_pristine() {
        let store = Arc::new(NoteStore::default());
        let data = Note {
            id: 7,
            text: Some("old".into()),
        };
        let mut note = EditableRoot::fetched(data, schema(), store.clone(), editor()).unwrap();
        assert_eq!(note.state(), ModelState::Pristine);

        note.from_dto(&json!({"text": "new"})).unwrap();
        assert_eq!(note.state(), ModelState::Changed);

        note.save().await.unwrap();
        assert_eq!(note.state(), ModelState::Pristine);
        let stored = store.rows.lock().await.get(&7).cloned();
        assert_eq!(stored.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn removed_instance_is_deleted_and_frozen() {
        let store = Arc::new(NoteStore::default());
        store.rows.lock().await.insert(3, "bye".into());
        let data = Note {
            id: 3,
            text: Some("bye".into()),
        };
        let mut note = EditableRoot::fetched(data, schema(), store.clone(), editor()).unwrap();

        note.remove();
        note.save().await.unwrap();
        assert!(store.rows.lock().await.is_empty());
        let result = note.from_dto(&json!({"text": "again"}));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn removing_requires_permission() {
        let store = Arc::new(NoteStore::default());
        let data = Note {
            id: 3,
            text: Some("keep".into()),
        };
        let mut note =
            EditableRoot::fetched(data, schema(), store, ModelContext::anonymous()).unwrap();

        note.remove();
        assert_matches!(note.save().await, Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn non_object_dto_is_rejected() {
        let store = Arc::new(NoteStore::default());
        let mut note = EditableRoot::<Note>::create(schema(), store, editor()).unwrap();
        let result = note.from_dto(&json!(["text"]));
        assert_matches!(result, Err(CoreError::InvalidDto(_)));

        let result = note.from_dto(&json!({"text": 12}));
        assert_matches!(result, Err(CoreError::BrokenRules(_)));
    }
}
