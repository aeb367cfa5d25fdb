//! Runner configuration and external tool resolution
//!
//! The original deployment hard-codes the tool at `/go/bin/cloudlist`; here
//! the tool path and output directory are explicit inputs with defaults
//! matching that behavior, overridable from the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the external enumeration binary, as looked up on PATH
pub const TOOL_NAME: &str = "cloudlist";

/// Default directory for enumeration artifacts, relative to the working dir
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Enumeration run timeout in seconds
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 300;

/// Pre-flight probe timeout in seconds
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Configuration for a [`Runner`](crate::Runner)
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Explicit tool path; `None` resolves from PATH and known locations
    pub tool: Option<PathBuf>,
    /// Directory artifacts are written to (created on demand)
    pub output_dir: PathBuf,
    /// Bound on the enumeration run
    pub run_timeout: Duration,
    /// Bound on the `-version` probe
    pub probe_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tool: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            run_timeout: Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
        }
    }
}

/// Resolve the enumeration tool binary.
///
/// An explicit path always wins, even if it does not exist (the probe will
/// report it unavailable). Otherwise try PATH first, then the known install
/// locations used by the upstream `go install` flow.
pub fn resolve_tool(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    which::which(TOOL_NAME).ok().or_else(|| {
        let mut candidates = vec![PathBuf::from("/go/bin").join(TOOL_NAME)];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join("go").join("bin").join(TOOL_NAME));
        }

        candidates.into_iter().find(|p| p.exists())
    })
}
