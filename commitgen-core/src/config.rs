// commitgen-core/src/config.rs

//! Configuration structures and the invocation guard.

use crate::errors::{ConfigError, GenerateError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level layout of a `Commitgen.toml` file.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitgenConfig {
    #[serde(default)]
    pub llm: LlmConfig,
}

/// The `[llm]` table.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Shell command whose stdout becomes the commit message.
    #[serde(default)]
    pub command: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    pub fn invocation(&self) -> InvocationConfig {
        InvocationConfig::new(self.enabled, self.command.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CommitgenConfig {
    pub fn from_toml_str(config_toml_content: &str) -> Result<CommitgenConfig, ConfigError> {
        let config: CommitgenConfig = match toml::from_str(config_toml_content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse TOML content");
                return Err(ConfigError::Parse(e));
            }
        };

        if config.llm.timeout_secs == 0 {
            return Err(ConfigError::invalid("'llm.timeout_secs' must be greater than zero."));
        }
        if config.llm.enabled && config.llm.command.trim().is_empty() {
            // Not fatal: the guard reports it when generation is attempted.
            tracing::warn!("'llm.enabled' is true but 'llm.command' is empty.");
        }

        tracing::debug!(enabled = config.llm.enabled, "Parsed commitgen configuration.");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<CommitgenConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// The two settings one generation needs. Passed explicitly into every call,
/// never read from shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationConfig {
    pub enabled: bool,
    pub command: String,
}

impl InvocationConfig {
    pub fn new(enabled: bool, command: impl Into<String>) -> Self {
        Self {
            enabled,
            command: command.into(),
        }
    }

    /// Why generation cannot run with this configuration, if it cannot.
    ///
    /// Front ends use this to disable the action up front; [`check_enabled`]
    /// applies the same rules again inside the pipeline.
    pub fn disabled_reason(&self) -> Option<GenerateError> {
        if !self.enabled {
            Some(GenerateError::FeatureDisabled)
        } else if self.command.is_empty() {
            Some(GenerateError::CommandNotConfigured)
        } else {
            None
        }
    }
}

/// Rejects a disabled feature or an empty command before anything is spawned.
pub fn check_enabled(config: &InvocationConfig) -> Result<(), GenerateError> {
    match config.disabled_reason() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
