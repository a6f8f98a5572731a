// commitgen-core/src/lib.rs

#![doc = include_str!("../../README.md")]

pub mod config;
pub mod errors;
pub mod generator;
pub mod runner;
pub mod validate;

#[cfg(test)]
mod generator_tests;

pub use config::{check_enabled, CommitgenConfig, InvocationConfig, LlmConfig};
pub use errors::{ConfigError, ErrorKind, GenerateError};
pub use generator::CommitMessageGenerator;
pub use runner::{CommandRunner, ExecutionOutcome, ShellCommandRunner, DEFAULT_TIMEOUT};
pub use validate::ValidatedMessage;

pub use async_trait::async_trait;
