use async_trait::async_trait;

use super::{KvStore, MemoryStore, StoreError};

/// Store double that lists one key which is already gone when fetched,
/// as if it were deleted between enumeration and read.
#[derive(Clone)]
pub struct VanishingStore {
    inner: MemoryStore,
    ghost_key: String,
}

impl VanishingStore {
    pub fn new(ghost_key: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            ghost_key: ghost_key.to_string(),
        }
    }
}

#[async_trait]
impl KvStore for VanishingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if key == self.ghost_key {
            return Ok(None);
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = self.inner.list(prefix).await?;
        if self.ghost_key.starts_with(prefix) {
            keys.insert(0, self.ghost_key.clone());
        }
        Ok(keys)
    }
}
