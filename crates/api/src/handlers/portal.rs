//! Handler of the API portal route.

use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::Json;
use bookshelf_core::types::Dto;
use serde_json::Value;

use crate::context::RequestContext;
use crate::error::{AppError, AppResult};
use crate::portal::PortalRequest;
use crate::state::AppState;

/// POST <api root>/{model uri}/{method}
///
/// Hands the request to the portal and returns the serialized result;
/// `remove` answers with `null`.
pub async fn dispatch(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> AppResult<Json<Dto>> {
    let body = parse_body(&body)?;
    let result = state
        .portal
        .dispatch(PortalRequest::new(uri.path(), body), &ctx)
        .await?;
    Ok(Json(result))
}

/// JSON body of a portal request; an empty body is `null`.
fn parse_body(bytes: &[u8]) -> AppResult<Dto> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Request body is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_body_is_null() {
        assert_eq!(parse_body(b"").unwrap(), Value::Null);
        assert_eq!(parse_body(b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(parse_body(br#"{"a": 1}"#).unwrap(), json!({"a": 1}));
        assert_matches!(parse_body(b"{a"), Err(AppError::BadRequest(_)));
    }
}
