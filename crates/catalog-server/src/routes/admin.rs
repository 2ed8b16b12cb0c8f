//! Admin change-list routes.

use axum::{
    Extension, Router,
    extract::{RawQuery, State},
    response::Html,
    routing::get,
};
use catalog_api::ApiError;
use catalog_storage::CatalogStorage;
use minijinja::context;

use super::{render_html, search_request};
use crate::admin::{ChangeList, books};
use crate::middleware::RequestId;
use crate::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/books/book/", get(book_changelist))
        .route("/admin/books/author/", get(author_changelist))
}

pub async fn book_changelist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let admin = &state.admin.books;
    let request = search_request(&admin.path(), query.as_deref(), &request_id);
    let cl_query = admin.changelist_query(&request)?;

    let records = state.storage.list_books(&cl_query.filter).await?;
    let full_count = state.storage.count_books().await?;
    let rows = records.iter().map(books::book_row).collect();
    let cl = ChangeList::build(admin, &request.params, &cl_query, rows, full_count);

    tracing::debug!(
        model = admin.model_name,
        filter = %cl_query.filter,
        results = cl.result_count,
        "change list"
    );
    render_html(&state, "change_list.html", context! { cl })
}

pub async fn author_changelist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let admin = &state.admin.authors;
    let request = search_request(&admin.path(), query.as_deref(), &request_id);
    let cl_query = admin.changelist_query(&request)?;

    let records = state.storage.list_authors(&cl_query.filter).await?;
    let full_count = state.storage.count_authors().await?;
    let rows = records.iter().map(books::author_row).collect();
    let cl = ChangeList::build(admin, &request.params, &cl_query, rows, full_count);

    tracing::debug!(
        model = admin.model_name,
        filter = %cl_query.filter,
        results = cl.result_count,
        "change list"
    );
    render_html(&state, "change_list.html", context! { cl })
}
