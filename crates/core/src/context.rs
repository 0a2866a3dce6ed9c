//! Per-request execution context handed to every model operation.

use serde::{Deserialize, Serialize};

/// Locale used when the caller does not ask for one.
pub const DEFAULT_LOCALE: &str = "en";

/// The authenticated caller, as far as the models are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_name: String,
    pub roles: Vec<String>,
}

impl UserInfo {
    pub fn new(user_name: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            user_name: user_name.into(),
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
        }
    }

    /// Returns `true` if the user holds the given role.
    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Current user and locale for one request.
///
/// Built by the transport layer from its configured readers and passed
/// explicitly; models never consult global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelContext {
    pub user: Option<UserInfo>,
    pub locale: String,
}

impl ModelContext {
    pub fn new(user: Option<UserInfo>, locale: impl Into<String>) -> Self {
        Self {
            user,
            locale: locale.into(),
        }
    }

    /// Context without a user, using the default locale.
    pub fn anonymous() -> Self {
        Self::new(None, DEFAULT_LOCALE)
    }

    /// Context for the given user, using the default locale.
    pub fn for_user(user: UserInfo) -> Self {
        Self::new(Some(user), DEFAULT_LOCALE)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.user_name.as_str())
    }
}

impl Default for ModelContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
