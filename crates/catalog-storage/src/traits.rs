//! Storage trait for catalog backends.

use async_trait::async_trait;
use catalog_core::{Author, Book};
use catalog_search::FilterExpression;

use crate::error::StorageError;
use crate::types::{AuthorRecord, BookRecord};

/// Contract every catalog storage backend implements.
///
/// Listings are always ordered by primary key. Implementations must be
/// thread-safe (`Send + Sync`).
///
/// ```ignore
/// async fn fantasy(storage: &dyn CatalogStorage) -> Result<Vec<BookRecord>, StorageError> {
///     let query = FilterExpression::predicate("genre", Lookup::Exact, "fan");
///     storage.list_books(&query).await
/// }
/// ```
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Authors matching `filter`, each with their published books.
    async fn list_authors(&self, filter: &FilterExpression)
    -> Result<Vec<AuthorRecord>, StorageError>;

    /// Returns `None` if no author has this id.
    async fn get_author(&self, id: u64) -> Result<Option<AuthorRecord>, StorageError>;

    async fn list_books(&self, filter: &FilterExpression) -> Result<Vec<BookRecord>, StorageError>;

    async fn get_book(&self, id: u64) -> Result<Option<BookRecord>, StorageError>;

    async fn count_authors(&self) -> Result<usize, StorageError>;

    async fn count_books(&self) -> Result<usize, StorageError>;

    /// Stores a new author. An id of `0` asks the backend to assign one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the id is taken and
    /// `StorageError::InvalidRecord` if validation fails.
    async fn insert_author(&self, author: Author) -> Result<Author, StorageError>;

    /// Stores a new book.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::BrokenReference` if the author does not exist.
    async fn insert_book(&self, book: Book) -> Result<Book, StorageError>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
