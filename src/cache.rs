//! Per-book reading progress on disk.
//!
//! Each book gets a directory under the cache root named by a SHA-256 of its
//! path; progress lives in a small `progress.toml` inside it. Write failures
//! are logged and otherwise ignored so playback never stalls on IO.

use crate::playback::checkpoint::{ProgressCheckpoint, ProgressSink, ProgressSource};
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PROGRESS_FILE: &str = "progress.toml";

/// Directory holding cached state for `book_path`.
pub fn hash_dir(cache_root: &Path, book_path: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(book_path.as_os_str().to_string_lossy().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    cache_root.join(hash)
}

#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    pub fn new(cache_root: &Path, book_path: &Path) -> Self {
        Self {
            path: hash_dir(cache_root, book_path).join(PROGRESS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<ProgressCheckpoint>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };
        let checkpoint = toml::from_str(&data)
            .with_context(|| format!("invalid progress file {}", self.path.display()))?;
        Ok(Some(checkpoint))
    }

    pub fn save(&self, checkpoint: ProgressCheckpoint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string(&checkpoint).context("failed to serialize progress")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl ProgressSource for FileProgressStore {
    fn load_checkpoint(&self) -> Option<ProgressCheckpoint> {
        match self.load() {
            Ok(checkpoint) => {
                if let Some(cp) = &checkpoint {
                    debug!(index = cp.word_index, wpm = cp.words_per_minute, "Loaded progress");
                }
                checkpoint
            }
            Err(err) => {
                warn!("Ignoring stored progress: {err:#}");
                None
            }
        }
    }
}

impl ProgressSink for FileProgressStore {
    fn on_checkpoint(&self, checkpoint: ProgressCheckpoint) {
        if let Err(err) = self.save(checkpoint) {
            warn!(
                index = checkpoint.word_index,
                "Failed to persist progress: {err:#}"
            );
        }
    }
}
