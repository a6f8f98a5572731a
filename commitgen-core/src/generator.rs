// commitgen-core/src/generator.rs

//! The whole pipeline: guard, run, validate, reclassify.

use crate::config::{check_enabled, InvocationConfig};
use crate::errors::GenerateError;
use crate::runner::{CommandRunner, ShellCommandRunner, DEFAULT_TIMEOUT};
use crate::validate::{check_upstream_error, validate, ValidatedMessage};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Produces one commit message (or one classified error) per call.
///
/// Holds no per-call state; concurrent calls each own their process and deadline.
#[derive(Clone)]
pub struct CommitMessageGenerator {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl Default for CommitMessageGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitMessageGenerator {
    /// A generator backed by the live shell runner and the 30 second deadline.
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ShellCommandRunner))
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs the configured command and returns its validated output.
    ///
    /// # Errors
    ///
    /// Exactly one [`GenerateError`] describing the first step that failed.
    /// Nothing is spawned when the guard rejects `config`.
    pub async fn generate(&self, config: &InvocationConfig) -> Result<ValidatedMessage, GenerateError> {
        check_enabled(config).map_err(|e| {
            info!(kind = ?e.kind(), "Commit message generation not available: {}", e);
            e
        })?;

        debug!(command = %config.command, timeout = ?self.timeout, "Executing LLM command");
        let raw = self.runner.run(&config.command, self.timeout).await?;

        let message = validate(&raw).map_err(|e| {
            error!(kind = ?e.kind(), raw_bytes = raw.len(), "Generated message rejected: {}", e);
            e
        })?;
        let message = check_upstream_error(message).map_err(|e| {
            error!("LLM command reported an error: {}", e);
            e
        })?;

        debug!(
            length = message.text.len(),
            warnings = message.warnings.len(),
            "Successfully generated commit message: {} characters",
            message.text.len()
        );
        Ok(message)
    }

    /// Blocking form of [`generate`](Self::generate) for callers without a runtime.
    ///
    /// Builds a current-thread runtime per call. Must not be called from
    /// inside an async context.
    pub fn generate_blocking(&self, config: &InvocationConfig) -> Result<ValidatedMessage, GenerateError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build runtime for blocking generation");
                GenerateError::ExecutionFailed {
                    detail: format!("failed to start async runtime: {}", e),
                }
            })?;
        runtime.block_on(self.generate(config))
    }
}
