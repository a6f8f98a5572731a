// commitgen-core/src/validate.rs

//! Output-shape policy for generated commit messages.

use crate::errors::GenerateError;
use serde::Serialize;
use tracing::warn;

/// Anything larger is treated as a misbehaving command dumping unrelated data.
pub const MAX_MESSAGE_BYTES: usize = 100 * 1024;
/// Conventional commit subject length. Exceeding it only produces a warning.
pub const SUBJECT_LINE_LIMIT: usize = 72;
/// Prefix a command prints to report its own failure while exiting zero.
pub const UPSTREAM_ERROR_PREFIX: &str = "error:";

/// A commit message that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedMessage {
    pub text: String,
    /// Advisory findings; none of them made validation fail.
    pub warnings: Vec<String>,
}

/// Strips leading and trailing whitespace from raw command output.
///
/// Valid UTF-8 is trimmed as text (Unicode whitespace); anything else is
/// trimmed of ASCII whitespace so the encoding check still sees the bad bytes.
/// Trimming is idempotent.
pub fn trim_output(raw: &[u8]) -> &[u8] {
    match std::str::from_utf8(raw) {
        Ok(text) => text.trim().as_bytes(),
        Err(_) => trim_ascii_whitespace(raw),
    }
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Trims `raw` and runs the checks in order; the first failure wins.
///
/// 1. empty → [`GenerateError::EmptyResponse`]
/// 2. more than [`MAX_MESSAGE_BYTES`] → [`GenerateError::OversizedResponse`]
/// 3. not UTF-8 → [`GenerateError::InvalidEncoding`]
/// 4. subject longer than [`SUBJECT_LINE_LIMIT`] characters → warning only
pub fn validate(raw: &[u8]) -> Result<ValidatedMessage, GenerateError> {
    let message = trim_output(raw);

    if message.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    if message.len() > MAX_MESSAGE_BYTES {
        return Err(GenerateError::OversizedResponse {
            bytes: message.len(),
        });
    }
    let text = std::str::from_utf8(message).map_err(|_| GenerateError::InvalidEncoding)?;

    let mut warnings = Vec::new();
    if let Some(subject) = text.lines().next() {
        let subject_len = subject.chars().count();
        if subject_len > SUBJECT_LINE_LIMIT {
            warn!("Generated commit subject exceeds {} characters: {}", SUBJECT_LINE_LIMIT, subject_len);
            warnings.push(format!(
                "commit subject is {} characters long (recommended maximum is {})",
                subject_len, SUBJECT_LINE_LIMIT
            ));
        }
    }

    Ok(ValidatedMessage {
        text: text.to_string(),
        warnings,
    })
}

/// Reclassifies a message that starts with [`UPSTREAM_ERROR_PREFIX`].
pub fn check_upstream_error(message: ValidatedMessage) -> Result<ValidatedMessage, GenerateError> {
    if message.text.starts_with(UPSTREAM_ERROR_PREFIX) {
        return Err(GenerateError::UpstreamReportedError {
            message: message.text,
        });
    }
    Ok(message)
}
