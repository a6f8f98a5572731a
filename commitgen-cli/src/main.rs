// commitgen-cli/src/main.rs
mod commit;
mod config;
mod models;
mod rendering;

use anyhow::{anyhow, Context, Result};
use colored::*;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use commitgen_core::{CommitMessageGenerator, GenerateError, InvocationConfig, ValidatedMessage};
use tracing::{debug, error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::models::cli::{Cli, Commands};

const LOG_FILE_NAME: &str = "commitgen.log";

/// Stderr plus a file under the cache directory. The returned guard must
/// live until exit so buffered file lines get flushed.
fn init_logging(verbose: u8) -> Result<(WorkerGuard, PathBuf)> {
    let default_level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    let log_dir = dirs::cache_dir()
        .or_else(dirs::runtime_dir)
        .unwrap_or_else(env::temp_dir)
        .join("commitgen");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(LOG_FILE_NAME);

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let local_timer = LocalTime::new(time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_ansi(false) // No colors in file
        .with_target(true)
        .with_line_number(true)
        .with_timer(local_timer.clone());

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(local_timer)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized. Level determined by RUST_LOG or -v flags (default: {}). Logging to stderr and {}",
        default_level,
        log_path.display()
    );
    Ok((guard, log_path))
}

fn report_failure(err: &GenerateError, json: bool) -> Result<()> {
    if json {
        println!("{}", rendering::render_json(&Err(err.clone()))?);
    } else {
        rendering::print_error(err);
        if let Some(hint) = rendering::config_hint(err) {
            eprintln!("{}", hint.dimmed());
        }
    }
    Ok(())
}

fn print_result(result: &Result<ValidatedMessage, GenerateError>, json: bool) -> Result<bool> {
    if json {
        println!("{}", rendering::render_json(result)?);
        return Ok(result.is_ok());
    }
    match result {
        Ok(message) => {
            rendering::print_message(message);
            Ok(true)
        }
        Err(err) => {
            report_failure(err, false)?;
            Ok(false)
        }
    }
}

/// Generate, show, confirm, commit. A failed generation never reaches git.
fn run_commit(result: Result<ValidatedMessage, GenerateError>, yes: bool, json: bool) -> Result<bool> {
    let message = match result {
        Ok(message) => message,
        Err(err) => {
            report_failure(&err, json)?;
            return Ok(false);
        }
    };

    let working_dir = env::current_dir().context("Failed to get current directory")?;

    if json {
        // One report, written once git has finished.
        let outcome = commit::create_commit(&message.text, &working_dir);
        println!("{}", rendering::render_commit_json(&message, &outcome)?);
        if let Err(e) = &outcome {
            error!("Commit failed: {:#}", e);
        }
        return Ok(outcome.is_ok());
    }

    rendering::print_preview(&message);
    if !yes && !commit::confirm_commit()? {
        println!("{}", "Commit cancelled.".yellow());
        return Ok(true);
    }

    let summary = commit::create_commit(&message.text, &working_dir)?;
    if !summary.is_empty() {
        println!("{}", summary);
    }
    Ok(true)
}

async fn run(cli: Cli) -> Result<bool> {
    if cli.json && matches!(cli.command, Some(Commands::Commit { yes: false })) {
        return Err(anyhow!("--json with `commit` requires --yes"));
    }

    let cwd = env::current_dir().context("Failed to get current directory")?;
    let (llm, source) = config::load_llm_config(cli.config.as_deref(), &cwd)?;
    let llm = config::apply_overrides(llm, cli.llm_command.clone(), cli.timeout);
    debug!(source = ?source, enabled = llm.enabled, timeout_secs = llm.timeout_secs, "Resolved LLM configuration");

    let invocation: InvocationConfig = llm.invocation();
    // Gate the action up front, the way a UI would disable it.
    if let Some(reason) = invocation.disabled_reason() {
        report_failure(&reason, cli.json)?;
        return Ok(false);
    }

    let generator = CommitMessageGenerator::new().with_timeout(llm.timeout());
    let result = generator.generate(&invocation).await;

    match cli.command {
        Some(Commands::Commit { yes }) => run_commit(result, yes, cli.json),
        None => print_result(&result, cli.json),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env may hold API keys the configured command needs.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _guard = match init_logging(cli.verbose) {
        Ok((guard, _log_path)) => guard,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Operation failed: {:#}", e);
            eprintln!("{} Operation failed: {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
