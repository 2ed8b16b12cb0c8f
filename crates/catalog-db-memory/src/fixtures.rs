//! Seed data in the `dumpdata` JSON layout:
//!
//! ```json
//! [
//!   {"model": "books.author", "pk": 1, "fields": {"name": "Mary Shelley"}},
//!   {"model": "books.book", "pk": 1, "fields": {"title": "Frankenstein", "author": 1,
//!     "genre": "hor", "publication_date": "1818-01-01", "isbn": "9780486282114",
//!     "price": "4.50"}}
//! ]
//! ```
//!
//! Authors are inserted before books regardless of their order in the file.

use catalog_core::{Author, Book, Genre};
use catalog_storage::{CatalogStorage, StorageError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use time::Date;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(tag = "model")]
enum FixtureEntry {
    #[serde(rename = "books.author")]
    Author { pk: u64, fields: AuthorFields },
    #[serde(rename = "books.book")]
    Book { pk: u64, fields: BookFields },
}

#[derive(Debug, Deserialize)]
struct AuthorFields {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BookFields {
    title: String,
    author: u64,
    genre: Genre,
    #[serde(with = "catalog_core::date::iso")]
    publication_date: Date,
    isbn: String,
    price: Decimal,
}

/// Counts of records loaded from one fixture document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureSummary {
    pub authors: usize,
    pub books: usize,
}

pub async fn load_fixtures(
    storage: &dyn CatalogStorage,
    json: &str,
) -> Result<FixtureSummary, StorageError> {
    let entries: Vec<FixtureEntry> =
        serde_json::from_str(json).map_err(|e| StorageError::fixture(e.to_string()))?;

    let (authors, books): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| matches!(e, FixtureEntry::Author { .. }));

    let mut summary = FixtureSummary::default();
    for entry in authors.into_iter().chain(books) {
        match entry {
            FixtureEntry::Author { pk, fields } => {
                storage
                    .insert_author(Author::new(fields.name).with_id(pk))
                    .await?;
                summary.authors += 1;
            }
            FixtureEntry::Book { pk, fields } => {
                let book = Book::new(
                    fields.title,
                    fields.author,
                    fields.genre,
                    fields.publication_date,
                    fields.isbn,
                    fields.price,
                )
                .with_id(pk);
                storage.insert_book(book).await?;
                summary.books += 1;
            }
        }
    }
    Ok(summary)
}

pub async fn load_fixtures_file(
    storage: &dyn CatalogStorage,
    path: impl AsRef<Path>,
) -> Result<FixtureSummary, StorageError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::fixture(format!("{}: {e}", path.display())))?;
    let summary = load_fixtures(storage, &json).await?;
    info!(
        path = %path.display(),
        authors = summary.authors,
        books = summary.books,
        "loaded fixtures"
    );
    Ok(summary)
}
