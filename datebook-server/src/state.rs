use datebook_core::LocalStore;

/// Shared application state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    store: LocalStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve an existing store, e.g. one seeded by a test.
    pub fn with_store(store: LocalStore) -> Self {
        AppState { store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}
