//! Helpers for reading fetch filters.
//!
//! A filter is either a bare value (`3`, `"Dune"`) or an object carrying
//! the value under a named field (`{"book_key": 3}`).

use bookshelf_core::error::{CoreError, ModelResult};
use bookshelf_core::types::{DbId, Dto};
use chrono::NaiveDate;
use serde_json::Value;

fn field<'a>(filter: Option<&'a Dto>, name: &str) -> Option<&'a Value> {
    let value = match filter? {
        Value::Object(map) => map.get(name),
        bare => Some(bare),
    };
    value.filter(|v| !v.is_null())
}

fn missing(name: &str, expected: &str) -> CoreError {
    CoreError::Validation(format!("Filter must provide '{name}' as {expected}"))
}

/// Integer key, bare or under `name`. Numeric strings are accepted.
pub fn key(filter: Option<&Dto>, name: &str) -> ModelResult<DbId> {
    let key = match field(filter, name) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    key.ok_or_else(|| missing(name, "an integer"))
}

/// Non-empty text, bare or under `name`.
pub fn text(filter: Option<&Dto>, name: &str) -> ModelResult<String> {
    match field(filter, name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(missing(name, "non-empty text")),
    }
}

/// Positive integer under `name`.
pub fn position(filter: Option<&Dto>, name: &str) -> ModelResult<u64> {
    let value = match filter {
        Some(Value::Object(map)) => map.get(name),
        _ => None,
    };
    value
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .ok_or_else(|| missing(name, "a positive integer"))
}

/// Optional `YYYY-MM-DD` date.
pub fn date(value: Option<&str>, name: &str) -> ModelResult<Option<NaiveDate>> {
    value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| missing(name, "a date")))
        .transpose()
}
