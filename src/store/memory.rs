use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{KvStore, StoreError};

/// Process-local store, keys enumerate in lexicographic order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.write().await.insert(key.to_string(), value);
        tracing::debug!("Stored key: {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.write().await.remove(key);
        tracing::debug!("Deleted key: {}", key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let map = self.inner.read().await;
        let keys = map
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();

        store.put("a", b"one".to_vec()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"one".to_vec()));

        store.put("a", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"two".to_vec()));

        store.delete("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);

        // deleting again is fine
        store.delete("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_by_prefix_is_sorted_and_scoped() {
        let store = MemoryStore::new();
        for key in ["locations:3", "other:1", "locations:1", "locations;", "location", "locations:2"] {
            store.put(key, Vec::new()).await.unwrap();
        }

        let keys = store.list("locations:").await.unwrap();
        assert_eq!(keys, vec!["locations:1", "locations:2", "locations:3"]);

        assert!(store.list("missing:").await.unwrap().is_empty());
        assert_eq!(store.list("").await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.put("k", b"v".to_vec()).await.unwrap();
        assert_eq!(other.len().await, 1);
    }
}
