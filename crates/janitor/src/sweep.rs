//! Sweep pass - one scan-and-evict cycle over the storage directory.

use crate::error::JanitorError;
use crate::store::{ArtifactDir, EntryKind};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info, warn};

/// Outcome of a single pass.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Directory entries looked at, of any kind.
    pub scanned: usize,
    pub removed: Vec<PathBuf>,
    /// Expired files whose deletion failed; they stay for the next pass.
    pub failed: Vec<(PathBuf, String)>,
    /// Regular files still inside the retention window.
    pub retained: usize,
    /// Entries that are not regular files or have no modification time.
    pub skipped: usize,
    pub duration_ms: u64,
}

impl SweepReport {
    pub fn has_deletions(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// A file is expired once its age is strictly greater than the retention window.
/// Files modified after `now` have no age yet and are never expired.
pub fn is_expired(now: SystemTime, modified: SystemTime, retention: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age > retention,
        Err(_) => false,
    }
}

/// Runs one pass against `dir`, evaluating every entry against the fixed instant `now`.
///
/// Only a failed directory listing is an error. Per-file failures are logged,
/// recorded in the report and the pass moves on to the next entry.
pub async fn sweep_once(
    dir: &dyn ArtifactDir,
    retention: Duration,
    now: SystemTime,
) -> Result<SweepReport, JanitorError> {
    let start = Instant::now();
    let mut report = SweepReport::default();

    let entries = dir.entries().await.map_err(|source| JanitorError::ReadDir {
        path: dir.root().to_path_buf(),
        source,
    })?;

    for entry in entries {
        report.scanned += 1;

        if entry.kind != EntryKind::File {
            debug!("Janitor: skipping non-file entry {}", entry.path.display());
            report.skipped += 1;
            continue;
        }

        let Some(modified) = entry.modified else {
            report.skipped += 1;
            continue;
        };

        if !is_expired(now, modified, retention) {
            report.retained += 1;
            continue;
        }

        let age = now.duration_since(modified).unwrap_or_default();
        match dir.remove(&entry.path).await {
            Ok(()) => {
                let modified_at: DateTime<Local> = modified.into();
                info!(
                    "🧹 Janitor: removed {} (age {}s, modified {})",
                    entry.name(),
                    age.as_secs(),
                    modified_at.format("%Y-%m-%d %H:%M:%S")
                );
                report.removed.push(entry.path);
            }
            Err(e) => {
                warn!("⚠️ Janitor: failed to remove {}: {}", entry.name(), e);
                report.failed.push((entry.path, e.to_string()));
            }
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    Ok(report)
}
