//! Property validation rules and the broken-rule list they produce.

use std::fmt;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// The check a [`ValidationRule`] performs on one property value.
#[derive(Debug, Clone)]
pub enum RuleKind {
    Required,
    MinLength(usize),
    MaxLength(usize),
    MinValue(f64),
    MaxValue(f64),
    Pattern(Regex),
}

impl RuleKind {
    /// Stable rule identifier reported in broken rules.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength(_) => "min_length",
            RuleKind::MaxLength(_) => "max_length",
            RuleKind::MinValue(_) => "min_value",
            RuleKind::MaxValue(_) => "max_value",
            RuleKind::Pattern(_) => "pattern",
        }
    }
}

/// A rule attached to a single model property.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub property: String,
    pub kind: RuleKind,
}

impl ValidationRule {
    pub fn new(property: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            property: property.into(),
            kind,
        }
    }

    /// Check the rule against the property's value inside `data`.
    ///
    /// Only `Required` enforces presence; the other rules pass on a missing
    /// or null value and on values of the wrong JSON type.
    pub fn check(&self, data: &Map<String, Value>) -> Option<BrokenRule> {
        let value = data.get(&self.property).filter(|v| !v.is_null());

        let broken = match (&self.kind, value) {
            (RuleKind::Required, None) => true,
            (RuleKind::Required, Some(Value::String(s))) => s.trim().is_empty(),
            (RuleKind::Required, Some(_)) => false,
            (_, None) => false,
            (RuleKind::MinLength(min), Some(Value::String(s))) => s.chars().count() < *min,
            (RuleKind::MaxLength(max), Some(Value::String(s))) => s.chars().count() > *max,
            (RuleKind::MinValue(min), Some(v)) => v.as_f64().is_some_and(|n| n < *min),
            (RuleKind::MaxValue(max), Some(v)) => v.as_f64().is_some_and(|n| n > *max),
            (RuleKind::Pattern(re), Some(Value::String(s))) => !re.is_match(s),
            _ => false,
        };

        broken.then(|| BrokenRule {
            property: self.property.clone(),
            rule: self.kind.name(),
            message: self.message(),
        })
    }

    fn message(&self) -> String {
        let p = &self.property;
        match &self.kind {
            RuleKind::Required => format!("{p} is required"),
            RuleKind::MinLength(n) => format!("{p} must be at least {n} characters long"),
            RuleKind::MaxLength(n) => format!("{p} must be at most {n} characters long"),
            RuleKind::MinValue(n) => format!("{p} must be at least {n}"),
            RuleKind::MaxValue(n) => format!("{p} must be at most {n}"),
            RuleKind::Pattern(re) => format!("{p} must match the pattern {}", re.as_str()),
        }
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenRule {
    pub property: String,
    pub rule: &'static str,
    pub message: String,
}

/// All rules that failed for one model instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BrokenRuleList(Vec<BrokenRule>);

impl BrokenRuleList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrokenRule> {
        self.0.iter()
    }

    /// Broken rules reported for the given property.
    pub fn for_property<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a BrokenRule> {
        self.0.iter().filter(move |r| r.property == property)
    }
}

impl FromIterator<BrokenRule> for BrokenRuleList {
    fn from_iter<I: IntoIterator<Item = BrokenRule>>(iter: I) -> Self {
        BrokenRuleList(iter.into_iter().collect())
    }
}

impl fmt::Display for BrokenRuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|r| r.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Evaluate every rule against a DTO map.
pub fn evaluate_rules(rules: &[ValidationRule], data: &Map<String, Value>) -> BrokenRuleList {
    rules.iter().filter_map(|rule| rule.check(data)).collect()
}
