//! Server-rendered pages.

use axum::extract::State;
use axum::response::Html;

use crate::error::AppResult;
use crate::state::AppState;
use crate::templates::TemplateValues;

/// Values every page can use.
fn page_values(state: &AppState) -> TemplateValues {
    let mut values = TemplateValues::new();
    values.insert("title", state.config.app_title.clone());
    values.insert("apiRoot", state.portal.api_root().to_string());
    values
}

/// GET / -- application overview with the registered models.
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let mut values = page_values(&state);
    let models: Vec<&str> = state.portal.registry().uris().collect();
    values.insert("models", models.join(" "));

    let html = state.templates.render("index.html", &values).await?;
    Ok(Html(html))
}

/// GET /books -- book list page; the data is loaded through the portal.
pub async fn books(State(state): State<AppState>) -> AppResult<Html<String>> {
    let html = state
        .templates
        .render("books.html", &page_values(&state))
        .await?;
    Ok(Html(html))
}
