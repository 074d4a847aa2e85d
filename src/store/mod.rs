//! Key-value store adapter.
//!
//! The service only needs four operations over opaque byte values keyed by
//! string. Backends make no transactional promises across keys.

pub mod memory;
pub mod spanner;

#[cfg(test)]
pub mod failing;
#[cfg(test)]
pub mod vanishing;

pub use memory::MemoryStore;
pub use spanner::SpannerStore;

use async_trait::async_trait;
use std::sync::Arc;

/// Failure of a single key-value operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read key '{key}': {source}")]
    Get {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write key '{key}': {source}")]
    Put {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to delete key '{key}': {source}")]
    Delete {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to list keys with prefix '{prefix}': {source}")]
    List {
        prefix: String,
        #[source]
        source: anyhow::Error,
    },
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
    /// Keys beginning with `prefix`, in backend enumeration order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

pub type SharedStore = Arc<dyn KvStore>;
