//! Physical file storage: batch directories, streamed writes and confined reads.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::StatsSnapshot;
use crate::{FiledropError, Result};

/// How many fresh identifiers to try before giving up on a batch.
pub const MAX_BATCH_ID_ATTEMPTS: usize = 5;

/// Source of batch directory names.
pub trait BatchIdGenerator: Send + Sync {
    /// Produce a new identifier. It is used verbatim as a directory name.
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs (122 random bits).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBatchIds;

impl BatchIdGenerator for RandomBatchIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// A freshly created batch directory.
#[derive(Debug, Clone)]
pub struct Batch {
    id: String,
    path: PathBuf,
}

impl Batch {
    /// Batch identifier (the directory name).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Absolute path of the batch directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A regular file located under the storage root.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Canonical path on disk.
    pub path: PathBuf,
    /// Last segment of the requested path, used as the download filename.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// Storage root and the operations performed under it.
#[derive(Clone)]
pub struct FileStorage {
    /// Canonical storage root.
    root: PathBuf,
    /// Batch identifier source.
    ids: Arc<dyn BatchIdGenerator>,
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl FileStorage {
    /// Open the storage root, creating it if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let root = std::fs::canonicalize(&root)?;

        Ok(Self {
            root,
            ids: Arc::new(RandomBatchIds),
        })
    }

    /// Replace the batch identifier source.
    pub fn with_id_generator(mut self, ids: Arc<dyn BatchIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Canonical path of the storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a new, empty batch directory.
    ///
    /// The directory is created non-recursively, so an identifier that is
    /// already on disk is detected and a new one drawn.
    pub async fn create_batch(&self) -> Result<Batch> {
        for _ in 0..MAX_BATCH_ID_ATTEMPTS {
            let id = self.ids.next_id();
            let path = self.root.join(&id);

            match tokio::fs::create_dir(&path).await {
                Ok(()) => {
                    tracing::debug!(batch = %id, "Created batch directory");
                    return Ok(Batch { id, path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::warn!(batch = %id, "Batch identifier already in use, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(FiledropError::Conflict(format!(
            "no unused batch identifier after {MAX_BATCH_ID_ATTEMPTS} attempts"
        )))
    }

    /// Stream `content` into `filename` inside `batch`.
    ///
    /// Chunks are written as they arrive; the whole file is never held in
    /// memory. Returns the number of bytes written. A failing chunk aborts
    /// the write with the chunk's error and leaves the partial file on disk.
    pub async fn write_file<S, B, E>(&self, batch: &Batch, filename: &str, content: S) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<FiledropError>,
    {
        let filename = sanitize_filename(filename)?;
        let mut file = tokio::fs::File::create(batch.path.join(&filename)).await?;

        futures::pin_mut!(content);
        let mut written = 0u64;
        while let Some(chunk) = content.next().await {
            let chunk = chunk.map_err(Into::<FiledropError>::into)?;
            let bytes = chunk.as_ref();
            file.write_all(bytes).await?;
            written += bytes.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    /// Resolve a client-supplied relative path to a regular file under the root.
    ///
    /// Paths that climb out of the root, absolute paths, symlinks leading
    /// outside, directories and missing entries all resolve to `NotFound`.
    pub async fn resolve_file(&self, relative: &str) -> Result<StoredFile> {
        let relative_path = confine(relative).ok_or_else(|| {
            tracing::warn!(path = %relative, "Rejected download path outside storage root");
            not_found()
        })?;

        let canonical = match tokio::fs::canonicalize(self.root.join(&relative_path)).await {
            Ok(path) => path,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return Err(e.into()),
            Err(_) => return Err(not_found()),
        };

        if !canonical.starts_with(&self.root) {
            tracing::warn!(path = %relative, "Rejected download path resolving outside storage root");
            return Err(not_found());
        }

        let metadata = tokio::fs::metadata(&canonical).await?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        let name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(not_found)?;

        Ok(StoredFile {
            path: canonical,
            name,
            size: metadata.len(),
        })
    }

    /// Scan the whole root on the blocking thread pool.
    pub async fn stats(&self) -> Result<StatsSnapshot> {
        let root = self.root.clone();
        let snapshot = tokio::task::spawn_blocking(move || StatsSnapshot::scan(&root))
            .await
            .map_err(io::Error::other)??;
        Ok(snapshot)
    }
}

fn not_found() -> FiledropError {
    FiledropError::NotFound("File".to_string())
}

/// Keep only plain name segments; `None` if any segment would leave the root.
fn confine(relative: &str) -> Option<PathBuf> {
    let mut confined = PathBuf::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => confined.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if confined.as_os_str().is_empty() {
        None
    } else {
        Some(confined)
    }
}

/// Reduce a client-supplied filename to a single safe path segment.
///
/// Browsers on some platforms send full paths; only the part after the last
/// `/` or `\` is kept.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    if base.is_empty() || base == "." || base == ".." {
        return Err(FiledropError::Validation(format!(
            "invalid filename: {name:?}"
        )));
    }

    if base.chars().any(char::is_control) {
        return Err(FiledropError::Validation(format!(
            "filename contains control characters: {name:?}"
        )));
    }

    Ok(base.to_string())
}
