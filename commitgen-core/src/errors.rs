// commitgen-core/src/errors.rs
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Discriminant of a [`GenerateError`], stable enough to serialize and match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FeatureDisabled,
    CommandNotConfigured,
    Timeout,
    ExecutionFailed,
    CommandFailed,
    EmptyResponse,
    OversizedResponse,
    InvalidEncoding,
    UpstreamReportedError,
}

impl ErrorKind {
    /// The text shown to a user when the error carries no detail of its own.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::FeatureDisabled => "LLM commit generation is disabled in config",
            ErrorKind::CommandNotConfigured => "LLM command is not configured",
            ErrorKind::Timeout => "LLM command timed out",
            ErrorKind::ExecutionFailed => "Failed to execute LLM command",
            ErrorKind::CommandFailed => "LLM command failed",
            ErrorKind::EmptyResponse => "Empty response from LLM command",
            ErrorKind::OversizedResponse => "Generated message is unreasonably large",
            ErrorKind::InvalidEncoding => "Generated message contains invalid UTF-8 characters",
            ErrorKind::UpstreamReportedError => "LLM command reported an error",
        }
    }
}

/// Every way a single commit message generation can fail.
///
/// All variants are terminal for the invocation that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("LLM commit generation is disabled in config")]
    FeatureDisabled,

    #[error("LLM command is not configured")]
    CommandNotConfigured,

    /// The deadline fired before the process exited.
    #[error("command timed out after {} seconds", .timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    /// Spawn failure, or a non-zero exit that wrote nothing to stderr.
    #[error("failed to execute LLM command: {detail}")]
    ExecutionFailed { detail: String },

    /// Non-zero exit; `stderr` is the trimmed standard error text.
    #[error("LLM command failed: {stderr}")]
    CommandFailed { stderr: String },

    #[error("empty response from LLM command")]
    EmptyResponse,

    #[error("generated message unreasonably large ({bytes} bytes) - possible script error")]
    OversizedResponse { bytes: usize },

    #[error("generated message contains invalid UTF-8 characters")]
    InvalidEncoding,

    /// Zero exit, but the command printed an `error:` message instead of a commit message.
    #[error("{message}")]
    UpstreamReportedError { message: String },
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::FeatureDisabled => ErrorKind::FeatureDisabled,
            GenerateError::CommandNotConfigured => ErrorKind::CommandNotConfigured,
            GenerateError::Timeout { .. } => ErrorKind::Timeout,
            GenerateError::ExecutionFailed { .. } => ErrorKind::ExecutionFailed,
            GenerateError::CommandFailed { .. } => ErrorKind::CommandFailed,
            GenerateError::EmptyResponse => ErrorKind::EmptyResponse,
            GenerateError::OversizedResponse { .. } => ErrorKind::OversizedResponse,
            GenerateError::InvalidEncoding => ErrorKind::InvalidEncoding,
            GenerateError::UpstreamReportedError { .. } => ErrorKind::UpstreamReportedError,
        }
    }

    /// Diagnostic detail to show verbatim, when the failure has one.
    pub fn detail(&self) -> Option<String> {
        match self {
            GenerateError::Timeout { .. } => Some(self.to_string()),
            GenerateError::ExecutionFailed { detail } => Some(detail.clone()),
            GenerateError::CommandFailed { stderr } => Some(stderr.clone()),
            GenerateError::OversizedResponse { bytes } => Some(bytes.to_string()),
            GenerateError::UpstreamReportedError { message } => Some(message.clone()),
            GenerateError::FeatureDisabled
            | GenerateError::CommandNotConfigured
            | GenerateError::EmptyResponse
            | GenerateError::InvalidEncoding => None,
        }
    }

    /// Text for an error dialog: the full error when it carries detail,
    /// otherwise the kind's canned message.
    pub fn user_facing(&self) -> String {
        match self.detail() {
            Some(_) => self.to_string(),
            None => self.kind().user_message().to_string(),
        }
    }
}

/// Errors while reading or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_uses_whole_seconds() {
        let err = GenerateError::Timeout {
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "command timed out after 30 seconds");
        assert_eq!(err.detail().as_deref(), Some("command timed out after 30 seconds"));
    }

    #[test]
    fn timeout_message_keeps_fractional_seconds() {
        let err = GenerateError::Timeout {
            timeout: Duration::from_millis(500),
        };
        assert_eq!(err.to_string(), "command timed out after 0.5 seconds");
    }

    #[test]
    fn user_facing_prefers_detail() {
        let err = GenerateError::UpstreamReportedError {
            message: "error: API rate limit exceeded".to_string(),
        };
        assert_eq!(err.user_facing(), "error: API rate limit exceeded");

        let err = GenerateError::CommandFailed {
            stderr: "boom".to_string(),
        };
        assert_eq!(err.user_facing(), "LLM command failed: boom");
    }

    #[test]
    fn user_facing_falls_back_to_kind_message() {
        assert_eq!(
            GenerateError::FeatureDisabled.user_facing(),
            ErrorKind::FeatureDisabled.user_message()
        );
        assert_eq!(
            GenerateError::EmptyResponse.user_facing(),
            "Empty response from LLM command"
        );
        assert_eq!(GenerateError::InvalidEncoding.detail(), None);
    }

    #[test]
    fn oversized_detail_is_byte_count() {
        let err = GenerateError::OversizedResponse { bytes: 102_401 };
        assert_eq!(err.kind(), ErrorKind::OversizedResponse);
        assert_eq!(err.detail().as_deref(), Some("102401"));
        assert!(err.to_string().contains("unreasonably large (102401 bytes)"));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let rendered = toml::to_string(&std::collections::BTreeMap::from([(
            "kind",
            ErrorKind::UpstreamReportedError,
        )]))
        .unwrap();
        assert_eq!(rendered.trim(), "kind = \"upstream_reported_error\"");
    }
}
