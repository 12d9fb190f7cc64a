//! Storage module for filedrop.
//!
//! Everything the service keeps lives in one directory tree, the storage root:
//!
//! ```text
//! {root}/
//! ├── 0b6f6c2e-1f5d-4b8e-9a57-3c2f0e9d1a44/
//! │   ├── report.pdf
//! │   └── notes.txt
//! └── 8d1e4a90-77c3-4f0b-b2a6-5e9c8f1d2b37/
//!     └── photo.jpg
//! ```
//!
//! Each upload request gets its own batch directory named by a random UUID.
//! There is no index besides the filesystem itself.

mod size;
mod stats;
mod store;

pub use size::format_size;
pub use stats::StatsSnapshot;
pub use store::{
    sanitize_filename, Batch, BatchIdGenerator, FileStorage, RandomBatchIds, StoredFile,
    MAX_BATCH_ID_ATTEMPTS,
};
