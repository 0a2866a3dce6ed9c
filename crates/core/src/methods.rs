//! Named model operations and their aliases.
//!
//! Each model declares its callable operations as a closed enum and maps
//! URL-friendly names onto it with a [`MethodTable`]. Aliases let callers
//! use alternative names (`get-by-key` for `fetch`). Resolution always
//! prefers an exact method name over an alias.

use std::collections::BTreeMap;

/// Outcome of resolving a requested method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMethod {
    /// The name the caller asked for.
    pub requested: String,
    /// The method that will actually run.
    pub name: String,
    /// Whether `requested` went through the alias map.
    pub via_alias: bool,
}

/// Object-safe view of a [`MethodTable`], used by the dispatcher.
pub trait MethodResolver: Send + Sync {
    /// Resolve `requested` to a declared method: exact name first, then alias.
    fn resolve(&self, requested: &str) -> Option<ResolvedMethod>;
}

/// Problems detected when a model's method table is registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MethodTableError {
    #[error("Model {model} declares no methods")]
    Empty { model: String },

    #[error("Model {model} declares method '{method}' twice")]
    DuplicateMethod { model: String, method: String },

    #[error("Model {model} maps alias '{alias}' to unknown method '{target}'")]
    DanglingAlias {
        model: String,
        alias: String,
        target: String,
    },
}

/// Method names mapped onto a model's operation enum, plus aliases.
#[derive(Debug, Clone)]
pub struct MethodTable<Op> {
    methods: BTreeMap<String, Op>,
    aliases: BTreeMap<String, String>,
    duplicates: Vec<String>,
}

impl<Op: Copy> MethodTable<Op> {
    pub fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
            aliases: BTreeMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Declare a method.
    pub fn method(mut self, name: &str, op: Op) -> Self {
        if self.methods.insert(name.to_string(), op).is_some() {
            self.duplicates.push(name.to_string());
        }
        self
    }

    /// Map `alias` onto the declared method `target`.
    pub fn alias(mut self, alias: &str, target: &str) -> Self {
        self.aliases.insert(alias.to_string(), target.to_string());
        self
    }

    /// Check the table once, when its model is registered.
    pub fn validate(&self, model: &str) -> Result<(), MethodTableError> {
        if self.methods.is_empty() {
            return Err(MethodTableError::Empty {
                model: model.to_string(),
            });
        }
        if let Some(method) = self.duplicates.first() {
            return Err(MethodTableError::DuplicateMethod {
                model: model.to_string(),
                method: method.clone(),
            });
        }
        for (alias, target) in &self.aliases {
            if !self.methods.contains_key(target) {
                return Err(MethodTableError::DanglingAlias {
                    model: model.to_string(),
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
            if self.methods.contains_key(alias) {
                tracing::warn!(
                    model,
                    alias = %alias,
                    "Alias is shadowed by a method of the same name"
                );
            }
        }
        Ok(())
    }

    /// Exact method name first, then the alias map.
    pub fn find(&self, requested: &str) -> Option<ResolvedMethod> {
        if self.methods.contains_key(requested) {
            return Some(ResolvedMethod {
                requested: requested.to_string(),
                name: requested.to_string(),
                via_alias: false,
            });
        }
        let target = self.aliases.get(requested)?;
        self.methods.contains_key(target).then(|| ResolvedMethod {
            requested: requested.to_string(),
            name: target.clone(),
            via_alias: true,
        })
    }

    /// Operation for an already-resolved method.
    pub fn get(&self, method: &ResolvedMethod) -> Option<Op> {
        self.methods.get(&method.name).copied()
    }
}

impl<Op: Copy> Default for MethodTable<Op> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Op: Copy + Send + Sync> MethodResolver for MethodTable<Op> {
    fn resolve(&self, requested: &str) -> Option<ResolvedMethod> {
        self.find(requested)
    }
}
