//! Response DTOs for the web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::storage::{format_size, StatsSnapshot};

/// One stored file of an upload batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedFile {
    /// Filename inside the batch folder.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Human-readable size.
    pub size_formatted: String,
}

impl UploadedFile {
    /// Describe a stored file.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            size_formatted: format_size(size),
        }
    }
}

/// Result of an upload request.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Batch identifier, also the folder name under the storage root.
    pub folder: String,
    /// Stored files in arrival order.
    pub files: Vec<UploadedFile>,
    /// Sum of all file sizes in bytes.
    pub total_size: u64,
    /// Human-readable total size.
    pub total_size_formatted: String,
}

impl UploadResponse {
    /// Build the response for a finished batch.
    pub fn new(folder: impl Into<String>, files: Vec<UploadedFile>) -> Self {
        let total_size = files.iter().map(|f| f.size).sum();
        Self {
            folder: folder.into(),
            files,
            total_size,
            total_size_formatted: format_size(total_size),
        }
    }
}

/// Storage statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of folders.
    pub folders: u64,
    /// Number of files.
    pub files: u64,
    /// Human-readable total size.
    pub size: String,
    /// Total size in bytes.
    pub bytes: u64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(stats: StatsSnapshot) -> Self {
        Self {
            folders: stats.folders,
            files: stats.files,
            size: stats.formatted_size(),
            bytes: stats.total_size,
        }
    }
}
