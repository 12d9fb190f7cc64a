//! Aggregate statistics over the storage root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::format_size;

/// Folder count, file count and total size of everything stored.
///
/// Computed fresh on every request; nothing is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Directories below the root (the root itself is not counted).
    pub folders: u64,
    /// Non-directory entries below the root.
    pub files: u64,
    /// Sum of regular file sizes in bytes.
    pub total_size: u64,
}

impl StatsSnapshot {
    /// Total size formatted with [`format_size`].
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }

    /// Walk `root` recursively and tally its contents.
    ///
    /// Symbolic links are never followed. They count as files but add nothing
    /// to the size. Any unreadable directory aborts the whole scan.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let mut snapshot = Self::default();
        let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let file_type = entry.file_type()?;

                if file_type.is_dir() {
                    snapshot.folders += 1;
                    pending.push(entry.path());
                } else {
                    snapshot.files += 1;
                    if file_type.is_file() {
                        snapshot.total_size += entry.metadata()?.len();
                    }
                }
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_empty_root() {
        let temp_dir = TempDir::new().unwrap();

        let stats = StatsSnapshot::scan(temp_dir.path()).unwrap();

        assert_eq!(stats, StatsSnapshot::default());
        assert_eq!(stats.formatted_size(), "0 B");
    }

    #[test]
    fn test_scan_counts_nested_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir(root.join("c")).unwrap();
        fs::write(root.join("top.bin"), vec![0u8; 10]).unwrap();
        fs::write(root.join("a/one.txt"), vec![0u8; 100]).unwrap();
        fs::write(root.join("a/b/two.txt"), vec![0u8; 924]).unwrap();

        let stats = StatsSnapshot::scan(root).unwrap();

        assert_eq!(stats.folders, 3);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.total_size, 1034);
    }

    #[test]
    fn test_scan_formatted_size() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("batch")).unwrap();
        fs::write(root.join("batch/a"), vec![1u8; 100]).unwrap();
        fs::write(root.join("batch/b"), vec![2u8; 924]).unwrap();

        let stats = StatsSnapshot::scan(root).unwrap();

        assert_eq!(stats.total_size, 1024);
        assert_eq!(stats.formatted_size(), "1.00 KB");
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();

        let result = StatsSnapshot::scan(&temp_dir.path().join("missing"));

        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_does_not_follow_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(outside.path().join("big.bin"), vec![0u8; 4096]).unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("link")).unwrap();

        let stats = StatsSnapshot::scan(root).unwrap();

        assert_eq!(stats.folders, 0);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.total_size, 0);
    }
}
