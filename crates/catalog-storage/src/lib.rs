//! # catalog-storage
//!
//! Storage abstraction layer for the catalog server.
//!
//! This crate defines the trait and listing types that storage backends
//! implement; backends live in separate crates. Filtering is expressed as a
//! [`catalog_search::FilterExpression`] evaluated against [`BookRecord`] and
//! [`AuthorRecord`] through the [`catalog_search::Record`] trait.

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::CatalogStorage;
pub use types::{AuthorRecord, BookRecord};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn CatalogStorage>;
