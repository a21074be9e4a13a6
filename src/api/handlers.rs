use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    controller::PageSnapshot,
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
};

use super::AppState;

/// Longest search term accepted from the page
pub const MAX_TERM_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct SearchTermRequest {
    pub term: String,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Full page
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.controller.render_page().await?))
}

/// Feed sections only, polled by the page script
pub async fn feeds(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.controller.render_feeds().await?))
}

/// JSON snapshot of both feeds
pub async fn get_state(State(state): State<AppState>) -> Json<PageSnapshot> {
    Json(state.controller.snapshot().await)
}

/// Keystroke from the search box
pub async fn set_search_term(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SearchTermRequest>,
) -> AppResult<StatusCode> {
    if request.term.chars().count() > MAX_TERM_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Search term cannot exceed {} characters",
            MAX_TERM_CHARS
        )));
    }

    tracing::debug!(request_id = %request_id, term = %request.term, "Search term updated");
    state.controller.set_search_term(request.term);

    Ok(StatusCode::NO_CONTENT)
}
