//! API portal route, nested below the configured API root.

use axum::routing::post;
use axum::Router;

use crate::handlers::portal;
use crate::state::AppState;

/// ```text
/// POST /{*path} -> dispatch    e.g. /books/get-by-title, /admin/book-list/get-all
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{*path}", post(portal::dispatch))
}
