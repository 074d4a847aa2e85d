use crate::service::LocationService;
use crate::store::SharedStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: LocationService,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            service: LocationService::new(store.clone()),
            store,
        }
    }
}
