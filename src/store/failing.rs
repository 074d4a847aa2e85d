use async_trait::async_trait;

use super::{KvStore, StoreError};

/// Store double whose every operation fails.
pub struct FailingStore;

fn unavailable() -> anyhow::Error {
    anyhow::anyhow!("backend unavailable")
}

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Get {
            key: key.to_string(),
            source: unavailable(),
        })
    }

    async fn put(&self, key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
        Err(StoreError::Put {
            key: key.to_string(),
            source: unavailable(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        Err(StoreError::Delete {
            key: key.to_string(),
            source: unavailable(),
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::List {
            prefix: prefix.to_string(),
            source: unavailable(),
        })
    }
}
