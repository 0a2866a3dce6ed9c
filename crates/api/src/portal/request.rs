//! Parsing of portal requests: URL, verb and body conventions.

use bookshelf_core::error::CoreError;
use bookshelf_core::types::Dto;
use serde::Deserialize;
use serde_json::Value;

use super::DispatchError;

/// One inbound API call, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalRequest {
    /// Request path, e.g. `/api/books/get-by-title`.
    pub url: String,
    /// Parsed JSON body; `Null` when the request carried none.
    pub body: Dto,
}

impl PortalRequest {
    pub fn new(url: impl Into<String>, body: Dto) -> Self {
        Self {
            url: url.into(),
            body,
        }
    }
}

/// Model URI and method segment of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTarget<'a> {
    pub model_uri: &'a str,
    pub method: &'a str,
}

/// Split `url` into model URI and method, below `api_root`.
///
/// The path must continue with `/` after the API root, and the remainder
/// is split at its last `/`. Model URIs may therefore contain slashes
/// (`admin/book-list/get-all`), method names may not.
pub fn parse_url<'a>(api_root: &str, url: &'a str) -> Result<RequestTarget<'a>, DispatchError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let rest = path
        .strip_prefix(api_root.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| DispatchError::InvalidUrl(url.to_string()))?;

    match rest.rfind('/') {
        Some(split) if split >= 1 && split + 1 < rest.len() => Ok(RequestTarget {
            model_uri: &rest[..split],
            method: &rest[split + 1..],
        }),
        _ => Err(DispatchError::InvalidUrl(url.to_string())),
    }
}

/// Method segments with a fixed meaning, checked before method resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb<'a> {
    Insert,
    Update,
    Remove,
    /// Any other name: a fetch method or a command method.
    Method(&'a str),
}

impl<'a> Verb<'a> {
    pub fn parse(method: &'a str) -> Self {
        match method {
            "insert" => Verb::Insert,
            "update" => Verb::Update,
            "remove" => Verb::Remove,
            other => Verb::Method(other),
        }
    }
}

/// Filter passed to a fetch method.
///
/// `{"$isEmpty": true}` and a missing body mean no filter, an object with a
/// `$filter` field passes that field, anything else is the filter itself.
pub fn effective_filter(body: Dto) -> Option<Dto> {
    match body {
        Value::Null => None,
        Value::Object(ref map) if map.get("$isEmpty") == Some(&Value::Bool(true)) => None,
        Value::Object(mut map) if map.contains_key("$filter") => {
            map.remove("$filter").filter(|f| !f.is_null())
        }
        other => Some(other),
    }
}

/// Body of `update` and `remove`: which lookup to run and with what filter.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupBody {
    pub method: String,
    #[serde(default)]
    pub filter: Option<Dto>,
    #[serde(default)]
    pub dto: Option<Dto>,
}

impl LookupBody {
    pub fn from_body(body: Dto) -> Result<Self, DispatchError> {
        let lookup: Self = serde_json::from_value(body)
            .map_err(|e| CoreError::InvalidDto(format!("expected method and filter: {e}")))?;
        Ok(lookup)
    }
}
