pub mod admin;
pub mod api;
pub mod pages;

use axum::response::Html;
use catalog_api::ApiError;
use catalog_search::{RequestParameters, SearchRequest};
use serde::Serialize;

use crate::middleware::RequestId;
use crate::server::AppState;

/// Request-scoped search context for one listing request.
pub(crate) fn search_request(
    path: &str,
    raw_query: Option<&str>,
    request_id: &RequestId,
) -> SearchRequest {
    let params = RequestParameters::parse(raw_query.unwrap_or_default());
    SearchRequest::new(path, params).with_request_id(request_id.as_str())
}

pub(crate) fn render_html<S: Serialize>(
    state: &AppState,
    template: &str,
    ctx: S,
) -> Result<Html<String>, ApiError> {
    state.templates.render(template, ctx).map(Html).map_err(|e| {
        tracing::error!(template, error = %e, "template rendering failed");
        ApiError::internal("Template rendering failed")
    })
}
