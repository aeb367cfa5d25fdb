//! Run orchestration
//!
//! One `execute` call is one complete run: validate the provider, resolve
//! and probe the tool, invoke it under the timeout, classify the result,
//! and persist whatever stdout was captured. Everything terminal comes back
//! as classification data in the [`RunReport`]; only persistence and
//! plumbing failures are errors.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::artifact::ArtifactWriter;
use crate::config::{resolve_tool, RunnerConfig};
use crate::error::Result;
use crate::invoke::{self, Invocation};
use crate::outcome::{classify, should_persist, RunReport, RunStatus};
use crate::probe::probe_tool;

/// Single-shot enumeration runner
pub struct Runner {
    config: RunnerConfig,
    writer: ArtifactWriter,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        let writer = ArtifactWriter::new(config.output_dir.clone());
        Self { config, writer }
    }

    /// Run one enumeration for the given provider.
    pub async fn execute(&self, provider: &str) -> Result<RunReport> {
        let started = Instant::now();
        let provider = provider.trim();

        if provider.is_empty() {
            return Ok(RunReport::rejected(
                provider,
                RunStatus::Usage,
                elapsed_ms(started),
            ));
        }

        note_local_virtualenv();

        let Some(tool) = resolve_tool(self.config.tool.as_deref()) else {
            info!("enumeration tool not found on PATH or in known install locations");
            return Ok(RunReport::rejected(
                provider,
                RunStatus::ToolUnavailable,
                elapsed_ms(started),
            ));
        };

        if !probe_tool(&tool, self.config.probe_timeout).await {
            info!(tool = %tool.display(), "tool failed the version probe");
            return Ok(RunReport::rejected(
                provider,
                RunStatus::ToolUnavailable,
                elapsed_ms(started),
            ));
        }

        let invocation = Invocation::new(tool, provider, self.config.run_timeout);
        info!("executing: {}", invocation.command_line());

        let result = invoke::execute(&invocation).await?;
        let status = classify(&result);

        let artifact = if should_persist(status, &result.stdout) {
            Some(self.writer.persist(&result.stdout)?)
        } else {
            None
        };

        match status {
            RunStatus::Success => {
                info!(bytes = result.stdout.len(), "enumeration completed");
            }
            RunStatus::Killed => {
                warn!(
                    partial = artifact.is_some(),
                    "child was forcibly terminated (likely memory or resource limits)"
                );
            }
            RunStatus::TimedOut => {
                warn!(timeout_secs = self.config.run_timeout.as_secs(), "run timed out");
            }
            RunStatus::NotFound => {
                warn!("tool disappeared between probe and invocation");
            }
            RunStatus::ErrorExit { code } => {
                warn!(code, partial = artifact.is_some(), "tool exited non-zero");
            }
            RunStatus::Usage | RunStatus::ToolUnavailable => {}
        }

        let stderr = if !status.is_success() && !result.stderr.trim().is_empty() {
            Some(result.stderr)
        } else {
            None
        };

        Ok(RunReport {
            provider: provider.to_string(),
            status,
            artifact,
            stdout_bytes: result.stdout.len(),
            stderr,
            duration_ms: elapsed_ms(started),
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Note a local Python virtualenv if one is present. The enumeration tool
/// manages its own configuration; this never alters behavior.
fn note_local_virtualenv() {
    let venv = Path::new("venv");
    if venv.is_dir() {
        if venv.join("bin").join("python3").exists() {
            debug!("local virtualenv found at venv/ (ignored)");
        } else {
            debug!("venv/ directory present without a python3 interpreter (ignored)");
        }
    }
}
