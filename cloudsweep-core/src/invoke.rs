//! Subprocess invocation with timeout enforcement
//!
//! One enumeration run is one child process, bounded by a wall-clock
//! timeout. The child is spawned with `kill_on_drop` so a timed-out run
//! cannot leave a stray process behind.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SweepError};

/// Immutable description of one enumeration run
#[derive(Debug, Clone)]
pub struct Invocation {
    pub tool: PathBuf,
    pub provider: String,
    pub timeout: Duration,
}

impl Invocation {
    pub fn new(tool: impl Into<PathBuf>, provider: impl Into<String>, timeout: Duration) -> Self {
        Self {
            tool: tool.into(),
            provider: provider.into(),
            timeout,
        }
    }

    /// Arguments passed to the tool (provider selection, silent output mode)
    pub fn args(&self) -> Vec<String> {
        vec![
            "-provider".to_string(),
            self.provider.clone(),
            "-silent".to_string(),
        ]
    }

    /// Human-readable command line, for traces and `--dry-run`
    pub fn command_line(&self) -> String {
        format!("{} {}", self.tool.display(), self.args().join(" "))
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.tool);
        command
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

/// How the child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Ran to completion and reported an exit code
    Normal,
    /// Exceeded the invocation timeout and was killed
    TimedOut,
    /// Forcibly terminated by the platform (signal on Unix)
    Killed,
    /// The binary could not be found at spawn time
    NotFound,
}

/// Captured result of one subprocess run, consumed once by the classifier
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub termination: Termination,
}

impl ExecutionResult {
    fn empty(termination: Termination) -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: String::new(),
            termination,
        }
    }
}

/// Run the invocation to completion or until its timeout expires.
///
/// Timeout and absent-binary conditions are data, not errors; only plumbing
/// failures (pipe I/O, non-NotFound spawn errors) surface as `SweepError`.
pub async fn execute(invocation: &Invocation) -> Result<ExecutionResult> {
    let child = match invocation.command().spawn() {
        Ok(child) => child,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(ExecutionResult::empty(Termination::NotFound));
        }
        Err(err) => return Err(SweepError::spawn(&invocation.tool, err)),
    };

    let output = match tokio::time::timeout(invocation.timeout, child.wait_with_output()).await {
        Ok(output) => output?,
        // Dropping the in-flight future kills the child (kill_on_drop).
        Err(_) => return Ok(ExecutionResult::empty(Termination::TimedOut)),
    };

    let termination = if forcibly_terminated(&output.status) {
        Termination::Killed
    } else {
        Termination::Normal
    };
    debug!(?termination, code = output.status.code(), "child exited");

    Ok(ExecutionResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        termination,
    })
}

/// Whether the platform reports the process as forcibly terminated.
///
/// On Unix this is termination by any signal, not a specific numeric code.
#[cfg(unix)]
fn forcibly_terminated(status: &std::process::ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal().is_some()
}

#[cfg(not(unix))]
fn forcibly_terminated(_status: &std::process::ExitStatus) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Point the tool at a generated wrapper script; the Invocation arg
    /// shape is fixed, so tests drive a real shell through a fixture.
    fn shell_invocation(dir: &tempfile::TempDir, script: &str, timeout: Duration) -> Invocation {
        use std::io::Write;

        let path = dir.path().join("tool.sh");
        let mut file = std::fs::File::create(&path).unwrap();
        // The wrapper ignores the -provider/-silent arguments.
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(file, "{script}").unwrap();
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
        }

        Invocation::new(path, "aws", timeout)
    }

    #[tokio::test]
    async fn test_successful_run_captures_stdout() {
        let dir = tempfile::TempDir::new().unwrap();
        let invocation = shell_invocation(
            &dir,
            "printf '1.2.3.4\\n5.6.7.8\\n'",
            Duration::from_secs(5),
        );

        let result = execute(&invocation).await.unwrap();
        assert_eq!(result.termination, Termination::Normal);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "1.2.3.4\n5.6.7.8\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_keeps_partial_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let invocation = shell_invocation(
            &dir,
            "echo partial\necho oops >&2\nexit 3",
            Duration::from_secs(5),
        );

        let result = execute(&invocation).await.unwrap();
        assert_eq!(result.termination, Termination::Normal);
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout, "partial\n");
        assert_eq!(result.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_timeout_is_reported_as_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let invocation = shell_invocation(&dir, "sleep 30", Duration::from_millis(100));

        let result = execute(&invocation).await.unwrap();
        assert_eq!(result.termination, Termination::TimedOut);
        assert!(result.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_found() {
        let invocation = Invocation::new(
            "/nonexistent/cloudlist",
            "aws",
            Duration::from_secs(5),
        );

        let result = execute(&invocation).await.unwrap();
        assert_eq!(result.termination, Termination::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_termination_is_killed_with_partial_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let invocation = shell_invocation(&dir, "echo partial\nkill -9 $$", Duration::from_secs(5));

        let result = execute(&invocation).await.unwrap();
        assert_eq!(result.termination, Termination::Killed);
        assert_eq!(result.stdout, "partial\n");
    }

    #[test]
    fn test_command_line_rendering() {
        let invocation = Invocation::new("/go/bin/cloudlist", "aws", Duration::from_secs(300));
        assert_eq!(
            invocation.command_line(),
            "/go/bin/cloudlist -provider aws -silent"
        );
    }
}
