use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// commitgen: generate a commit message by running your configured command.
/// Prints the message by default; `commit` also creates the commit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase message verbosity.
    ///
    /// Specify multiple times for more verbose output:
    ///  -v:  INFO level
    ///  -vv: DEBUG level
    ///  -vvv: TRACE level (most verbose)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of searching for Commitgen.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run this command instead of the configured one (implies enabled).
    #[arg(long = "command", global = true, value_name = "SHELL_COMMAND")]
    pub llm_command: Option<String>,

    /// Seconds to wait for the command before killing it.
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print the result as JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Generate a message and commit the staged changes with it.
    Commit {
        /// Commit without asking for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}
