use std::sync::Arc;

use review_store::ReviewStore;

pub mod error;
pub mod http;
pub mod routes;

/// Shared handler state. Cloning is cheap; every clone sees the same store.
#[derive(Clone)]
pub struct AppState {
    store: Arc<ReviewStore>,
}

impl AppState {
    pub fn new(store: ReviewStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &ReviewStore {
        &self.store
    }
}
