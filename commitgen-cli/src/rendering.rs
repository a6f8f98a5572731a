// commitgen-cli/src/rendering.rs

use anyhow::{Context, Result};
use colored::*;
use commitgen_core::{ErrorKind, GenerateError, ValidatedMessage};
use serde::Serialize;

#[derive(Serialize, Debug)]
struct JsonError {
    kind: ErrorKind,
    detail: Option<String>,
    message: String,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum JsonReport<'a> {
    Success {
        message: &'a str,
        warnings: &'a [String],
    },
    Failure {
        error: JsonError,
    },
}

/// Serializes a generation result as a single JSON object.
pub fn render_json(result: &Result<ValidatedMessage, GenerateError>) -> Result<String> {
    let report = match result {
        Ok(message) => JsonReport::Success {
            message: &message.text,
            warnings: &message.warnings,
        },
        Err(err) => JsonReport::Failure {
            error: JsonError {
                kind: err.kind(),
                detail: err.detail(),
                message: err.user_facing(),
            },
        },
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize result as JSON")
}

#[derive(Serialize, Debug)]
struct JsonCommitReport<'a> {
    message: &'a str,
    warnings: &'a [String],
    committed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_error: Option<String>,
}

/// Serializes a generated message together with what `git commit` did with it.
pub fn render_commit_json(message: &ValidatedMessage, commit: &Result<String>) -> Result<String> {
    let report = JsonCommitReport {
        message: &message.text,
        warnings: &message.warnings,
        committed: commit.is_ok(),
        summary: commit.as_ref().ok().map(String::as_str),
        commit_error: commit.as_ref().err().map(|e| format!("{:#}", e)),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize commit result as JSON")
}

/// The message alone on stdout, so it can be piped.
pub fn print_message(message: &ValidatedMessage) {
    println!("{}", message.text);
}

pub fn print_error(err: &GenerateError) {
    eprintln!("{} {}", "Error:".red().bold(), err.user_facing());
}

/// Extra guidance for the two configuration errors.
pub fn config_hint(err: &GenerateError) -> Option<String> {
    match err.kind() {
        ErrorKind::FeatureDisabled => Some(format!(
            "Set `enabled = true` under [llm] in {} (or pass --command).",
            crate::config::CONFIG_FILENAME
        )),
        ErrorKind::CommandNotConfigured => Some(format!(
            "Set `command` under [llm] in {} (or pass --command).",
            crate::config::CONFIG_FILENAME
        )),
        _ => None,
    }
}

pub fn print_preview(message: &ValidatedMessage) {
    println!("{}", "Generated commit message:".cyan().bold());
    println!("{}", "-".repeat(40).dimmed());
    println!("{}", message.text);
    println!("{}", "-".repeat(40).dimmed());
}
