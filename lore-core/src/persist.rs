//! Snapshot persistence.
//!
//! Every save writes a brand-new timestamp-named file; snapshots are never
//! overwritten or deleted here (file lifecycle management is an external
//! concern). Loading replays every parseable snapshot in the directory into
//! one merged accumulator.

use crate::brain::Brain;
use crate::memory::now_millis;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load and merge every snapshot in `dir`.
///
/// A file that fails to read or parse is logged and skipped; one corrupt
/// snapshot never aborts the load. A missing directory means no prior
/// knowledge and yields an empty brain.
pub async fn load_all(dir: impl AsRef<Path>) -> Result<Brain, PersistError> {
    let dir = dir.as_ref();
    let mut brain = Brain::new();

    if !dir.exists() {
        return Ok(brain);
    }

    let mut loaded = 0usize;
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|ext| ext == "json").unwrap_or(false) {
            match load_snapshot(&path).await {
                Ok(snapshot) => {
                    brain.merge(snapshot);
                    loaded += 1;
                }
                Err(e) => log::warn!("Skipping snapshot {}: {e}", path.display()),
            }
        }
    }

    log::debug!("Replayed {loaded} snapshots from {}", dir.display());
    Ok(brain)
}

async fn load_snapshot(path: &Path) -> Result<Brain, PersistError> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Write `brain` to a brand-new snapshot file in `dir`, creating the
/// directory if absent. Returns the path of the new file.
///
/// The snapshot is written whole to a temporary file and renamed into
/// place, so a failed write never leaves a partial snapshot visible.
pub async fn save(brain: &Brain, dir: impl AsRef<Path>) -> Result<PathBuf, PersistError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;

    let path = fresh_snapshot_path(dir, now_millis());
    let content = serde_json::to_string_pretty(brain)?;

    let temp = path.with_extension("tmp");
    fs::write(&temp, content).await?;
    fs::rename(&temp, &path).await?;

    Ok(path)
}

/// Pick an unused `brain-<ms>.json` name, disambiguating with a counter
/// when several saves land in the same millisecond.
fn fresh_snapshot_path(dir: &Path, now_ms: u64) -> PathBuf {
    let base = dir.join(format!("brain-{now_ms}.json"));
    if !base.exists() {
        return base;
    }

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("brain-{now_ms}-{counter}.json"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
