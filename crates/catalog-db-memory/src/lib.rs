//! In-memory catalog storage backend.
//!
//! Implements [`CatalogStorage`] on papaya lock-free HashMaps and loads seed
//! data from `dumpdata`-style JSON fixtures.
//!
//! ```ignore
//! use catalog_db_memory::{InMemoryStorage, load_fixtures_file};
//!
//! let storage = InMemoryStorage::new();
//! load_fixtures_file(&storage, "fixtures/catalog.json").await?;
//! ```

pub mod factory;
pub mod fixtures;
pub mod storage;

pub use catalog_storage::{CatalogStorage, DynStorage, StorageError};
pub use factory::{StorageBackend, create_storage};
pub use fixtures::{FixtureSummary, load_fixtures, load_fixtures_file};
pub use storage::InMemoryStorage;
