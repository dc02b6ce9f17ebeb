//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::db::LocalRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self { repository }
    }

    /// State backed by an existing in-memory repository.
    ///
    /// The caller keeps its handle, so tests can seed and inspect the same data.
    pub fn with_local(repository: &LocalRepository) -> Self {
        Self::new(Arc::new(repository.clone()))
    }
}
