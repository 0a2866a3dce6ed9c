//! Declarative model definitions.
//!
//! A [`ModelSchema`] lists a model's properties, the validation rules on
//! them and the roles allowed to perform each operation. Schemas are built
//! once, when the model factory is constructed:
//!
//! ```
//! use bookshelf_core::authorization::{Operation, ROLE_EDITOR};
//! use bookshelf_core::schema::{ModelSchema, PropertyKind};
//!
//! let schema = ModelSchema::builder("Book")
//!     .key("book_key", PropertyKind::Integer)
//!     .property("title", PropertyKind::Text)
//!     .required()
//!     .max_length(200)
//!     .allow(Operation::Create, ROLE_EDITOR)
//!     .build()
//!     .unwrap();
//!
//! assert!(schema.property("title").unwrap().is_writable());
//! assert!(!schema.property("book_key").unwrap().is_writable());
//! ```

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};

use crate::authorization::{AccessRules, Operation};
use crate::context::ModelContext;
use crate::error::CoreError;
use crate::rules::{evaluate_rules, BrokenRule, BrokenRuleList, RuleKind, ValidationRule};

/// JSON shape expected for a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    Date,
}

impl PropertyKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            PropertyKind::Text => value.is_string(),
            PropertyKind::Integer => value.is_i64() || value.is_u64(),
            PropertyKind::Decimal => value.is_number(),
            PropertyKind::Boolean => value.is_boolean(),
            PropertyKind::Date => value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            PropertyKind::Text => "text",
            PropertyKind::Integer => "an integer",
            PropertyKind::Decimal => "a number",
            PropertyKind::Boolean => "a boolean",
            PropertyKind::Date => "a date (YYYY-MM-DD)",
        }
    }
}

/// One model property.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    pub is_key: bool,
    pub read_only: bool,
}

impl PropertyDef {
    /// Key and read-only properties are never set from a DTO.
    pub fn is_writable(&self) -> bool {
        !self.is_key && !self.read_only
    }
}

/// Errors found while building a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Model {model} declares property '{property}' twice")]
    DuplicateProperty { model: String, property: String },

    #[error("Model {model} declares more than one key property")]
    MultipleKeys { model: String },

    #[error("Model {model} has a {rule} rule that is not attached to a property")]
    DetachedRule { model: String, rule: &'static str },

    #[error("Model {model} has an invalid pattern on '{property}': {source}")]
    InvalidPattern {
        model: String,
        property: String,
        #[source]
        source: regex::Error,
    },
}

/// Properties, rules and access rules of one model.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    name: String,
    properties: Vec<PropertyDef>,
    rules: Vec<ValidationRule>,
    access: AccessRules,
}

impl ModelSchema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            properties: Vec::new(),
            rules: Vec::new(),
            access: AccessRules::new(),
            errors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn key(&self) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.is_key)
    }

    /// Check the caller's permission for `operation` on this model.
    pub fn check_access(&self, operation: Operation, ctx: &ModelContext) -> Result<(), CoreError> {
        self.access.check(&self.name, operation, ctx)
    }

    /// Evaluate type checks and validation rules against a DTO map.
    pub fn validate(&self, data: &Map<String, Value>) -> BrokenRuleList {
        let mut broken: Vec<BrokenRule> = self
            .properties
            .iter()
            .filter_map(|p| {
                let value = data.get(&p.name).filter(|v| !v.is_null())?;
                (!p.kind.accepts(value)).then(|| BrokenRule {
                    property: p.name.clone(),
                    rule: "type",
                    message: format!("{} must be {}", p.name, p.kind.describe()),
                })
            })
            .collect();
        broken.extend(evaluate_rules(&self.rules, data).iter().cloned());
        broken.into_iter().collect()
    }
}

/// Fluent builder for [`ModelSchema`].
///
/// Rule methods (`required`, `max_length`, ...) and `read_only` apply to the
/// most recently declared property.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    properties: Vec<PropertyDef>,
    rules: Vec<ValidationRule>,
    access: AccessRules,
    errors: Vec<SchemaError>,
}

impl SchemaBuilder {
    /// Declare the key property. Keys are assigned by the data layer.
    pub fn key(mut self, name: &str, kind: PropertyKind) -> Self {
        if self.properties.iter().any(|p| p.is_key) {
            self.errors.push(SchemaError::MultipleKeys {
                model: self.name.clone(),
            });
        }
        self.push_property(name, kind, true)
    }

    pub fn property(self, name: &str, kind: PropertyKind) -> Self {
        self.push_property(name, kind, false)
    }

    /// Mark the current property as read-only.
    pub fn read_only(mut self) -> Self {
        if let Some(p) = self.properties.last_mut() {
            p.read_only = true;
        }
        self
    }

    pub fn required(self) -> Self {
        self.rule(RuleKind::Required)
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(RuleKind::MinLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(RuleKind::MaxLength(max))
    }

    pub fn min_value(self, min: f64) -> Self {
        self.rule(RuleKind::MinValue(min))
    }

    pub fn max_value(self, max: f64) -> Self {
        self.rule(RuleKind::MaxValue(max))
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        let property = self
            .properties
            .last()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        match Regex::new(pattern) {
            Ok(re) => self.rule(RuleKind::Pattern(re)),
            Err(source) => {
                self.errors.push(SchemaError::InvalidPattern {
                    model: self.name.clone(),
                    property,
                    source,
                });
                self
            }
        }
    }

    /// Allow `role` to perform `operation`.
    pub fn allow(mut self, operation: Operation, role: &str) -> Self {
        self.access.allow(operation, role);
        self
    }

    /// Allow each of `roles` to perform `operation`.
    pub fn allow_roles(mut self, operation: Operation, roles: &[&str]) -> Self {
        for role in roles {
            self.access.allow(operation, role);
        }
        self
    }

    pub fn build(mut self) -> Result<ModelSchema, SchemaError> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        Ok(ModelSchema {
            name: self.name,
            properties: self.properties,
            rules: self.rules,
            access: self.access,
        })
    }

    fn push_property(mut self, name: &str, kind: PropertyKind, is_key: bool) -> Self {
        if self.properties.iter().any(|p| p.name == name) {
            self.errors.push(SchemaError::DuplicateProperty {
                model: self.name.clone(),
                property: name.to_string(),
            });
        }
        self.properties.push(PropertyDef {
            name: name.to_string(),
            kind,
            is_key,
            read_only: is_key,
        });
        self
    }

    fn rule(mut self, kind: RuleKind) -> Self {
        match self.properties.last() {
            Some(p) => {
                let rule = ValidationRule::new(p.name.clone(), kind);
                self.rules.push(rule);
            }
            None => self.errors.push(SchemaError::DetachedRule {
                model: self.name.clone(),
                rule: kind.name(),
            }),
        }
        self
    }
}
