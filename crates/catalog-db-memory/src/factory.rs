use std::sync::Arc;

use catalog_storage::{DynStorage, StorageError};

use crate::InMemoryStorage;

/// Supported storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// In-memory storage implemented on top of papaya::HashMap
    #[default]
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(Self::Memory),
            other => Err(StorageError::internal(format!(
                "unsupported storage backend '{other}'"
            ))),
        }
    }
}

/// Create a storage instance for `backend`.
pub fn create_storage(backend: StorageBackend) -> DynStorage {
    match backend {
        StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
    }
}
