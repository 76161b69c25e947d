//! ArtifactDir port - the flat storage directory the sweeper evicts from
//!
//! The directory listing is the only source of truth; there is no index.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, sockets, fifos and anything else that is not a plain file.
    Other,
}

#[derive(Debug, Clone)]
pub struct ArtifactEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// `None` when the filesystem could not report it (e.g. the file vanished mid-listing).
    pub modified: Option<SystemTime>,
}

impl ArtifactEntry {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait ArtifactDir: Send + Sync {
    fn root(&self) -> &Path;

    /// Lists the directory. An error here means the whole listing failed.
    async fn entries(&self) -> io::Result<Vec<ArtifactEntry>>;

    async fn remove(&self, path: &Path) -> io::Result<()>;
}

/// `ArtifactDir` backed by a real directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalDir {
    root: PathBuf,
}

impl LocalDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactDir for LocalDir {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn entries(&self) -> io::Result<Vec<ArtifactEntry>> {
        let mut listing = fs::read_dir(&self.root).await?;
        let mut entries = Vec::new();

        while let Some(entry) = listing.next_entry().await? {
            let path = entry.path();

            // file_type() does not follow symlinks
            let kind = match entry.file_type().await {
                Ok(t) if t.is_file() => EntryKind::File,
                Ok(t) if t.is_dir() => EntryKind::Dir,
                Ok(_) => EntryKind::Other,
                Err(e) => {
                    debug!("Janitor: could not stat {}: {}", path.display(), e);
                    continue;
                }
            };

            let modified = if kind == EntryKind::File {
                match entry.metadata().await.and_then(|m| m.modified()) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        debug!("Janitor: no modification time for {}: {}", path.display(), e);
                        None
                    }
                }
            } else {
                None
            };

            entries.push(ArtifactEntry { path, kind, modified });
        }

        Ok(entries)
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_files_and_directories_with_kinds() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("presentation-1.pptx"), b"deck").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let store = LocalDir::new(dir.path());
        let mut entries = store.entries().await.unwrap();
        entries.sort_by_key(|e| e.name());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), "nested");
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert!(entries[0].modified.is_none());
        assert_eq!(entries[1].name(), "presentation-1.pptx");
        assert_eq!(entries[1].kind, EntryKind::File);
        assert!(entries[1].modified.is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_not_plain_files() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("real.pptx");
        std::fs::write(&target, b"deck").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.pptx")).unwrap();

        let store = LocalDir::new(dir.path());
        let entries = store.entries().await.unwrap();
        let link = entries.iter().find(|e| e.name() == "link.pptx").unwrap();

        assert_eq!(link.kind, EntryKind::Other);
    }

    #[tokio::test]
    async fn missing_directory_fails_the_listing() {
        let dir = TempDir::new().unwrap();
        let store = LocalDir::new(dir.path().join("absent"));

        let err = store.entries().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
