use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Rendered HTML pages.
///
/// ```text
/// GET /       -> index
/// GET /books  -> books
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/books", get(pages::books))
}
