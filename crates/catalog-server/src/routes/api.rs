//! Read-only REST API.

use axum::{
    Extension, Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, header},
    routing::get,
};
use catalog_api::{ApiError, AuthorOut, BookOut};
use catalog_storage::CatalogStorage;
use serde::Serialize;

use super::search_request;
use crate::middleware::RequestId;
use crate::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/", get(api_root))
        .route("/api/authors/", get(list_authors))
        .route("/api/authors/{id}/", get(get_author))
        .route("/api/books/", get(list_books))
        .route("/api/books/{id}/", get(get_book))
}

#[derive(Debug, Serialize)]
pub struct ApiRoot {
    pub authors: String,
    pub books: String,
}

/// Absolute base URL: the configured one, else derived from the `Host` header.
fn base_url(state: &AppState, headers: &HeaderMap) -> Result<url::Url, ApiError> {
    let mut base = match state.config.base_url() {
        Some(base) => base.to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{host}/")
        }
    };
    if !base.ends_with('/') {
        base.push('/');
    }
    url::Url::parse(&base).map_err(|e| ApiError::internal(format!("invalid base URL: {e}")))
}

pub async fn api_root(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiRoot>, ApiError> {
    let base = base_url(&state, &headers)?;
    let join = |path: &str| {
        base.join(path)
            .map(String::from)
            .map_err(|e| ApiError::internal(e.to_string()))
    };
    Ok(Json(ApiRoot {
        authors: join("api/authors/")?,
        books: join("api/books/")?,
    }))
}

pub async fn list_authors(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<AuthorOut>>, ApiError> {
    let request = search_request("/api/authors/", query.as_deref(), &request_id);
    let filter = state.filters.authors.filter_request(&request)?;
    let authors = state.storage.list_authors(&filter).await?;
    Ok(Json(authors.iter().map(AuthorOut::from).collect()))
}

/// Non-numeric ids are treated like missing records.
fn parse_id(raw: &str, model: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("No {model} matches the given query.")))
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AuthorOut>, ApiError> {
    let id = parse_id(&id, "Author")?;
    let author = state
        .storage
        .get_author(id)
        .await?
        .ok_or_else(|| ApiError::not_found("No Author matches the given query."))?;
    Ok(Json(AuthorOut::from(&author)))
}

pub async fn list_books(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<BookOut>>, ApiError> {
    let request = search_request("/api/books/", query.as_deref(), &request_id);
    let filter = state.filters.books.filter_request(&request)?;
    let books = state.storage.list_books(&filter).await?;
    Ok(Json(books.iter().map(BookOut::from).collect()))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookOut>, ApiError> {
    let id = parse_id(&id, "Book")?;
    let book = state
        .storage
        .get_book(id)
        .await?
        .ok_or_else(|| ApiError::not_found("No Book matches the given query."))?;
    Ok(Json(BookOut::from(&book)))
}
