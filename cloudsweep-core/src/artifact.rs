//! Artifact persistence
//!
//! One text file per run, named by wall-clock timestamp at millisecond
//! resolution. Sequential runs therefore never collide; an exact collision
//! would require sub-millisecond concurrent invocations, which this
//! single-shot design does not support, and simply overwrites.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing::debug;

use crate::error::{Result, SweepError};

/// Fixed filename suffix for enumeration artifacts
pub const ARTIFACT_SUFFIX: &str = "-cloudlist.txt";

/// Writes run output into a target directory, creating it on demand
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persist captured output, returning the path of the new artifact
    pub fn persist(&self, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|err| SweepError::artifact_write(&self.dir, err))?;

        let stamp = Local::now().format("%Y%m%d%H%M%S%3f");
        let path = self.dir.join(format!("{stamp}{ARTIFACT_SUFFIX}"));

        fs::write(&path, content).map_err(|err| SweepError::artifact_write(&path, err))?;
        debug!(path = %path.display(), bytes = content.len(), "artifact written");

        Ok(path)
    }
}
