use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{apply_dto, to_dto, validate, CommandInstance, ModelInstance, ModelType};
use crate::authorization::Operation;
use crate::context::ModelContext;
use crate::error::{CoreError, ModelResult};
use crate::methods::{MethodResolver, MethodTable, ResolvedMethod};
use crate::schema::ModelSchema;
use crate::types::Dto;

/// Input/output data and operations of a command model.
#[async_trait]
pub trait CommandModel: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    type Dao: ?Sized + Send + Sync + 'static;

    /// The command's closed set of operations.
    type Op: Copy + Send + Sync + 'static;

    /// Run `op`, storing results in the command's output properties.
    async fn execute(
        &mut self,
        op: Self::Op,
        dao: &Self::Dao,
        ctx: &ModelContext,
    ) -> ModelResult<()>;
}

/// Generic command object.
pub struct Command<C: CommandModel> {
    data: C,
    schema: Arc<ModelSchema>,
    methods: Arc<MethodTable<C::Op>>,
    dao: Arc<C::Dao>,
    ctx: ModelContext,
}

impl<C: CommandModel> Command<C> {
    /// A blank command. Requires the `Create` permission.
    pub fn create(
        schema: Arc<ModelSchema>,
        methods: Arc<MethodTable<C::Op>>,
        dao: Arc<C::Dao>,
        ctx: ModelContext,
    ) -> ModelResult<Self> {
        schema.check_access(Operation::Create, &ctx)?;
        Ok(Self {
            data: C::default(),
            schema,
            methods,
            dao,
            ctx,
        })
    }
}

impl<C: CommandModel> ModelInstance for Command<C> {
    fn model_name(&self) -> &str {
        self.schema.name()
    }

    fn model_type(&self) -> ModelType {
        ModelType::CommandObject
    }

    fn to_dto(&self) -> ModelResult<Dto> {
        to_dto(&self.data)
    }
}

#[async_trait]
impl<C: CommandModel> CommandInstance for Command<C> {
    fn from_dto(&mut self, dto: &Dto) -> ModelResult<()> {
        self.data = apply_dto(&self.schema, &self.data, dto)?;
        Ok(())
    }

    fn methods(&self) -> &dyn MethodResolver {
        self.methods.as_ref()
    }

    async fn execute(&mut self, method: &ResolvedMethod) -> ModelResult<()> {
        self.schema.check_access(Operation::Execute, &self.ctx)?;

        let op = self.methods.get(method).ok_or_else(|| {
            CoreError::Internal(format!(
                "{} has no method '{}'",
                self.schema.name(),
                method.name
            ))
        })?;

        let broken = validate(&self.schema, &self.data);
        if !broken.is_empty() {
            return Err(CoreError::BrokenRules(broken));
        }

        self.data.execute(op, &*self.dao, &self.ctx).await?;
        tracing::info!(
            model = self.schema.name(),
            method = %method.name,
            user = ?self.ctx.user_name(),
            "Command executed",
        );
        Ok(())
    }
}
