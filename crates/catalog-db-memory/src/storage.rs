use async_trait::async_trait;
use catalog_core::{Author, Book};
use catalog_search::FilterExpression;
use catalog_storage::{AuthorRecord, BookRecord, CatalogStorage, StorageError};
use papaya::HashMap as PapayaHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const AUTHOR: &str = "Author";
const BOOK: &str = "Book";

/// In-memory catalog storage backend using papaya lock-free HashMaps.
///
/// Primary keys are assigned from per-model atomic counters; explicit ids
/// (fixtures) push the counter past them. Filter expressions are evaluated
/// record by record and results are sorted by primary key.
#[derive(Debug)]
pub struct InMemoryStorage {
    pub(crate) authors: Arc<PapayaHashMap<u64, Author>>,
    pub(crate) books: Arc<PapayaHashMap<u64, Book>>,
    author_ids: AtomicU64,
    book_ids: AtomicU64,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            authors: Arc::new(PapayaHashMap::new()),
            books: Arc::new(PapayaHashMap::new()),
            author_ids: AtomicU64::new(1),
            book_ids: AtomicU64::new(1),
        }
    }

    /// Resolve the id to store under: `0` draws from the counter, an explicit
    /// id moves the counter past it.
    fn claim_id(counter: &AtomicU64, requested: u64) -> u64 {
        if requested == 0 {
            counter.fetch_add(1, Ordering::SeqCst)
        } else {
            counter.fetch_max(requested + 1, Ordering::SeqCst);
            requested
        }
    }

    fn author_snapshot(&self, id: u64) -> Option<Author> {
        self.authors.pin().get(&id).cloned()
    }

    fn books_by_author(&self) -> std::collections::HashMap<u64, Vec<Book>> {
        let mut grouped: std::collections::HashMap<u64, Vec<Book>> =
            std::collections::HashMap::new();
        let guard = self.books.pin();
        for (_, book) in guard.iter() {
            grouped.entry(book.author_id).or_default().push(book.clone());
        }
        for books in grouped.values_mut() {
            books.sort_by_key(|b| b.id);
        }
        grouped
    }

    fn book_record(&self, book: Book) -> Result<BookRecord, StorageError> {
        let author = self.author_snapshot(book.author_id).ok_or_else(|| {
            StorageError::broken_reference(BOOK, book.id, AUTHOR, book.author_id)
        })?;
        Ok(BookRecord::new(book, author))
    }
}

#[async_trait]
impl CatalogStorage for InMemoryStorage {
    async fn list_authors(
        &self,
        filter: &FilterExpression,
    ) -> Result<Vec<AuthorRecord>, StorageError> {
        let mut by_author = self.books_by_author();
        let guard = self.authors.pin();
        let mut records: Vec<AuthorRecord> = guard
            .iter()
            .map(|(id, author)| {
                AuthorRecord::new(author.clone(), by_author.remove(id).unwrap_or_default())
            })
            .filter(|record| filter.matches(record))
            .collect();
        records.sort_by_key(AuthorRecord::id);
        debug!(filter = %filter, matched = records.len(), "listed authors");
        Ok(records)
    }

    async fn get_author(&self, id: u64) -> Result<Option<AuthorRecord>, StorageError> {
        let Some(author) = self.author_snapshot(id) else {
            return Ok(None);
        };
        let books = self.books_by_author().remove(&id).unwrap_or_default();
        Ok(Some(AuthorRecord::new(author, books)))
    }

    async fn list_books(&self, filter: &FilterExpression) -> Result<Vec<BookRecord>, StorageError> {
        let books: Vec<Book> = self.books.pin().iter().map(|(_, b)| b.clone()).collect();
        let mut records = Vec::with_capacity(books.len());
        for book in books {
            let record = self.book_record(book)?;
            if filter.matches(&record) {
                records.push(record);
            }
        }
        records.sort_by_key(BookRecord::id);
        debug!(filter = %filter, matched = records.len(), "listed books");
        Ok(records)
    }

    async fn get_book(&self, id: u64) -> Result<Option<BookRecord>, StorageError> {
        let book = self.books.pin().get(&id).cloned();
        book.map(|b| self.book_record(b)).transpose()
    }

    async fn count_authors(&self) -> Result<usize, StorageError> {
        Ok(self.authors.pin().len())
    }

    async fn count_books(&self) -> Result<usize, StorageError> {
        Ok(self.books.pin().len())
    }

    async fn insert_author(&self, mut author: Author) -> Result<Author, StorageError> {
        author
            .validate()
            .map_err(|e| StorageError::invalid_record(AUTHOR, e.to_string()))?;
        author.id = Self::claim_id(&self.author_ids, author.id);

        let guard = self.authors.pin();
        guard
            .try_insert(author.id, author.clone())
            .map_err(|_| StorageError::already_exists(AUTHOR, author.id))?;
        Ok(author)
    }

    async fn insert_book(&self, mut book: Book) -> Result<Book, StorageError> {
        book.normalize_price();
        book.validate()
            .map_err(|e| StorageError::invalid_record(BOOK, e.to_string()))?;
        if self.author_snapshot(book.author_id).is_none() {
            return Err(StorageError::broken_reference(
                BOOK,
                book.id,
                AUTHOR,
                book.author_id,
            ));
        }
        book.id = Self::claim_id(&self.book_ids, book.id);

        let guard = self.books.pin();
        guard
            .try_insert(book.id, book.clone())
            .map_err(|_| StorageError::already_exists(BOOK, book.id))?;
        Ok(book)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
