use chrono::Utc;
use uuid::Uuid;

use crate::codec::{self, EncodeError};
use crate::models::{Location, LocationDataDocument, LocationGroup, PathPoint};
use crate::store::{KvStore, SharedStore, StoreError};

/// Reserved namespace for location documents in the shared store
pub const KEY_PREFIX: &str = "locations:";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A freshly stored group together with the key it was written under
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedGroup {
    pub key: String,
    pub group: LocationGroup,
}

/// Store key for a write at `millis`, made unique by the group id.
pub fn store_key(millis: i64, location_id: &str) -> String {
    format!("{}{}:{}", KEY_PREFIX, millis, location_id)
}

/// Location submissions over a key-value store
///
/// Holds nothing but the injected store handle; every operation is
/// independent and none of them is atomic across keys.
#[derive(Clone)]
pub struct LocationService {
    store: SharedStore,
}

impl LocationService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Persist one path as a new group under a fresh key.
    pub async fn submit_path(&self, points: Vec<PathPoint>) -> Result<SubmittedGroup, ServiceError> {
        let group = LocationGroup {
            location_id: Uuid::new_v4().to_string(),
            locations: points.into_iter().map(Location::from).collect(),
        };
        let document = LocationDataDocument {
            location_groups: vec![group.clone()],
        };

        let key = store_key(Utc::now().timestamp_millis(), &group.location_id);
        let bytes = codec::encode(&document)?;
        self.store.put(&key, bytes).await?;

        tracing::info!("Stored {} locations under key: {}", group.locations.len(), key);

        Ok(SubmittedGroup { key, group })
    }

    /// Every stored group, flattened in store enumeration order.
    ///
    /// Keys that disappear between listing and fetching, and documents that
    /// fail to decode, are skipped.
    pub async fn list_all_groups(&self) -> Result<Vec<LocationGroup>, ServiceError> {
        let keys = self.store.list(KEY_PREFIX).await?;
        let mut groups = Vec::new();

        for key in &keys {
            let Some(bytes) = self.store.get(key).await? else {
                tracing::warn!("Skipping key that vanished before it could be read: {}", key);
                continue;
            };
            match codec::decode(&bytes) {
                Ok(document) => groups.extend(document.location_groups),
                Err(e) => tracing::warn!("Skipping undecodable document at {}: {}", key, e),
            }
        }

        tracing::debug!("Collected {} groups from {} keys", groups.len(), keys.len());
        Ok(groups)
    }

    /// Delete every stored document, returning how many keys were removed.
    pub async fn clear_all(&self) -> Result<usize, ServiceError> {
        let keys = self.store.list(KEY_PREFIX).await?;
        for key in &keys {
            self.store.delete(key).await?;
        }

        tracing::info!("Cleared {} location documents", keys.len());
        Ok(keys.len())
    }
}
