/// Structured error types for cloudsweep-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (cloudsweep-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.
///
/// Note that most failure modes of a run are NOT errors: timeouts, missing
/// tools, kills, and non-zero exits are classification data carried in the
/// run report. `SweepError` covers only the true error boundary — I/O while
/// persisting an artifact and subprocess plumbing failures.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cloudsweep-core operations
#[derive(Error, Debug)]
pub enum SweepError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Artifact could not be written (permissions, disk full)
    #[error("Failed to write artifact {path:?}: {source}")]
    ArtifactWrite { path: PathBuf, source: io::Error },

    /// Child process could not be launched for a reason other than absence
    #[error("Failed to launch {tool:?}: {source}")]
    Spawn { tool: PathBuf, source: io::Error },
}

/// Result type alias for cloudsweep-core operations
pub type Result<T> = std::result::Result<T, SweepError>;

impl SweepError {
    /// Create an artifact write error
    pub fn artifact_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ArtifactWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a spawn error
    pub fn spawn(tool: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Spawn {
            tool: tool.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let err = SweepError::artifact_write("/tmp/outputs/x.txt", io_err);
        assert!(err.to_string().contains("Failed to write artifact"));
        assert!(err.to_string().contains("/tmp/outputs/x.txt"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let sweep_err: SweepError = io_err.into();

        assert!(matches!(sweep_err, SweepError::Io { .. }));
    }
}
