//! Role-based access rules for model operations.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::context::ModelContext;
use crate::error::CoreError;

/// Well-known role names used by the demo models.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";

/// Operations a model can guard with an access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Fetch,
    Update,
    Remove,
    Execute,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Fetch => "fetch",
            Operation::Update => "update",
            Operation::Remove => "remove",
            Operation::Execute => "execute",
        };
        f.write_str(name)
    }
}

/// Roles allowed to perform each operation.
///
/// An operation with no entry is open to every caller, including anonymous
/// ones. An operation with an entry requires a user holding at least one of
/// the listed roles.
#[derive(Debug, Clone, Default)]
pub struct AccessRules {
    allowed: BTreeMap<Operation, Vec<String>>,
}

impl AccessRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `role` to perform `operation`.
    pub fn allow(&mut self, operation: Operation, role: &str) {
        let roles = self.allowed.entry(operation).or_default();
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
    }

    pub fn is_restricted(&self, operation: Operation) -> bool {
        self.allowed.contains_key(&operation)
    }

    /// Check whether the context's user may perform `operation` on `model`.
    pub fn check(
        &self,
        model: &str,
        operation: Operation,
        ctx: &ModelContext,
    ) -> Result<(), CoreError> {
        let Some(roles) = self.allowed.get(&operation) else {
            return Ok(());
        };

        let user = ctx.user.as_ref().ok_or_else(|| {
            CoreError::Unauthorized(format!("Signing in is required to {operation} {model}"))
        })?;

        if roles.iter().any(|role| user.is_in_role(role)) {
            Ok(())
        } else {
            tracing::debug!(
                model,
                %operation,
                user = %user.user_name,
                "Access denied",
            );
            Err(CoreError::Forbidden(format!(
                "User {} is not permitted to {operation} {model}",
                user.user_name
            )))
        }
    }
}
