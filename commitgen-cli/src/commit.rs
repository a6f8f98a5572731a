// commitgen-cli/src/commit.rs

//! Hands a generated message to `git commit`.

use anyhow::{anyhow, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::Path;
use tracing::{debug, info, warn};

/// Asks whether to commit with the message just shown. Defaults to yes.
pub fn confirm_commit() -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Commit staged changes with this message?")
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Runs `git commit -F -` in `working_dir`, feeding `message` on stdin.
///
/// Returns git's stdout (the commit summary).
pub fn create_commit(message: &str, working_dir: &Path) -> Result<String> {
    debug!(length = message.len(), dir = ?working_dir, "Running git commit");

    let output = duct::cmd!("git", "commit", "-F", "-")
        .dir(working_dir)
        .stdin_bytes(message.as_bytes().to_vec())
        .stdout_capture()
        .stderr_capture()
        .unchecked() // inspect the status ourselves
        .run()
        .context("Failed to spawn git commit")?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let reason = if stderr.is_empty() { &stdout } else { &stderr };
        warn!(status = %output.status, "git commit failed: {}", reason);
        return Err(anyhow!("git commit failed: {}", reason));
    }

    info!("Created commit.");
    Ok(stdout)
}
