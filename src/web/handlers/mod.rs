//! API handlers and shared state.

pub mod file;
pub mod stats;

pub use file::{download_file, upload_files};
pub use stats::{get_stats, stats_page};

use crate::storage::FileStorage;
use crate::web::middleware::ApiKeyState;
use crate::web::page::StatsPage;

/// Default request body limit for uploads (1 GiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

/// Application state shared by all handlers.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage root.
    pub storage: FileStorage,
    /// Shared secret for protected routes.
    pub auth: ApiKeyState,
    /// Stats page renderer.
    pub stats_page: StatsPage,
    /// Maximum upload request body size in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a new application state.
    pub fn new(storage: FileStorage, auth: ApiKeyState) -> Self {
        Self {
            storage,
            auth,
            stats_page: StatsPage::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Use a custom stats page template.
    pub fn with_stats_page(mut self, stats_page: StatsPage) -> Self {
        self.stats_page = stats_page;
        self
    }

    /// Set the upload body limit.
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
