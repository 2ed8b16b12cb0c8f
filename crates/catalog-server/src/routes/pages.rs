//! HTML list pages backed by the public filter sets.

use axum::{
    Extension, Router,
    extract::{RawQuery, State},
    response::Html,
    routing::get,
};
use catalog_api::{ApiError, AuthorOut, BookOut};
use catalog_core::Genre;
use catalog_storage::CatalogStorage;
use minijinja::context;
use std::collections::BTreeMap;

use super::{render_html, search_request};
use crate::middleware::RequestId;
use crate::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authors/", get(author_list))
        .route("/books/", get(book_list))
}

/// Invalid filter input re-renders the form with its errors and an empty
/// listing.
pub async fn author_list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let request = search_request("/authors/", query.as_deref(), &request_id);
    let filter_set = &state.filters.authors;

    let (authors, errors) = match filter_set.filter_request(&request) {
        Ok(filter) => (state.storage.list_authors(&filter).await?, None),
        Err(errors) => (Vec::new(), Some(errors)),
    };
    let authors: Vec<AuthorOut> = authors.iter().map(AuthorOut::from).collect();

    render_html(
        &state,
        "author_list.html",
        context! {
            form => filter_set.form().bind(&request.params, errors.as_ref()),
            authors,
            has_errors => errors.is_some(),
        },
    )
}

pub async fn book_list(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let request = search_request("/books/", query.as_deref(), &request_id);
    let filter_set = &state.filters.books;

    let (books, errors) = match filter_set.filter_request(&request) {
        Ok(filter) => (state.storage.list_books(&filter).await?, None),
        Err(errors) => (Vec::new(), Some(errors)),
    };
    let books: Vec<BookOut> = books.iter().map(BookOut::from).collect();
    let genre_labels: BTreeMap<&str, &str> = Genre::choices().into_iter().collect();

    render_html(
        &state,
        "book_list.html",
        context! {
            form => filter_set.form().bind(&request.params, errors.as_ref()),
            books,
            genre_labels,
            has_errors => errors.is_some(),
        },
    )
}
