//! Pre-flight dependency probe
//!
//! A cheap `-version` invocation confirms the enumeration tool is installed
//! and responsive before the real run is attempted. All failure modes
//! collapse to `false`: absent binary, non-zero exit, or a hung process
//! that outlives the probe timeout (killed on drop).

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Returns true if the tool responds to `-version` within the timeout
pub async fn probe_tool(tool: &Path, timeout: Duration) -> bool {
    let mut command = Command::new(tool);
    command
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            debug!(tool = %tool.display(), %err, "probe spawn failed");
            return false;
        }
    };

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(err)) => {
            debug!(tool = %tool.display(), %err, "probe wait failed");
            false
        }
        Err(_) => {
            debug!(tool = %tool.display(), "probe timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture_tool(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("cloudlist");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(file, "{body}").unwrap();
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
        }

        path
    }

    #[tokio::test]
    async fn test_probe_succeeds_for_responsive_tool() {
        let dir = TempDir::new().unwrap();
        let tool = fixture_tool(&dir, "echo 1.0.0\nexit 0");

        assert!(probe_tool(&tool, Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_probe_fails_for_missing_tool() {
        assert!(!probe_tool(Path::new("/nonexistent/cloudlist"), Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_probe_fails_for_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        let tool = fixture_tool(&dir, "exit 1");

        assert!(!probe_tool(&tool, Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_probe_fails_when_tool_hangs() {
        let dir = TempDir::new().unwrap();
        let tool = fixture_tool(&dir, "sleep 30");

        assert!(!probe_tool(&tool, Duration::from_millis(100)).await);
    }
}
