//! Result classification and the run report
//!
//! Every terminal condition of a run is a classification tag carried as
//! data, so callers branch on the report instead of catching error types.
//! The one tie-break rule: non-empty stdout always wins over exit-code
//! failure when deciding whether to persist an artifact — partial
//! enumeration data is never discarded.

use std::path::PathBuf;

use serde::Serialize;

use crate::invoke::{ExecutionResult, Termination};

/// Terminal classification of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    /// Missing or empty provider; no subprocess was attempted
    Usage,
    /// Tool resolution or the pre-flight probe failed; nothing was invoked
    ToolUnavailable,
    /// The run exceeded its timeout and the child was killed
    TimedOut,
    /// The binary disappeared between probe and invocation
    NotFound,
    /// Forcibly terminated by the platform (resource limits, OOM kill)
    Killed,
    /// Ran to completion with a non-zero exit code
    ErrorExit { code: i32 },
    /// Ran to completion with exit code zero
    Success,
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }

    /// Process exit status for this classification: 0 for success, 1 for
    /// every other terminal condition.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Map an execution result onto the classification table
pub fn classify(result: &ExecutionResult) -> RunStatus {
    match result.termination {
        Termination::TimedOut => RunStatus::TimedOut,
        Termination::NotFound => RunStatus::NotFound,
        Termination::Killed => RunStatus::Killed,
        Termination::Normal => {
            if result.exit_code == 0 {
                RunStatus::Success
            } else {
                RunStatus::ErrorExit {
                    code: result.exit_code,
                }
            }
        }
    }
}

/// Whether captured stdout should be persisted for this classification.
///
/// Timeouts and absent binaries capture nothing; everything else persists
/// whenever stdout has content, regardless of exit code.
pub fn should_persist(status: RunStatus, stdout: &str) -> bool {
    if stdout.trim().is_empty() {
        return false;
    }

    !matches!(
        status,
        RunStatus::Usage | RunStatus::ToolUnavailable | RunStatus::TimedOut | RunStatus::NotFound
    )
}

/// Outcome of one run, suitable for operator display or JSON emission
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub provider: String,
    pub status: RunStatus,
    /// Path of the persisted artifact, when any stdout was captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    pub stdout_bytes: usize,
    /// Captured error stream, kept for non-zero exits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    pub duration_ms: u64,
}

impl RunReport {
    /// Report for a run rejected before any subprocess work
    pub fn rejected(provider: impl Into<String>, status: RunStatus, duration_ms: u64) -> Self {
        Self {
            provider: provider.into(),
            status,
            artifact: None,
            stdout_bytes: 0,
            stderr: None,
            duration_ms,
        }
    }
}
