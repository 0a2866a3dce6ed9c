/// Primary keys handed out by the data layer.
pub type DbId = i64;

/// Plain-data JSON representation exchanged with API callers.
pub type Dto = serde_json::Value;
