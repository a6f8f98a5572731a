// commitgen-cli/src/config.rs

//! Finds and loads the configuration file, then applies command-line overrides.

use anyhow::{anyhow, Context, Result};
use commitgen_core::{CommitgenConfig, LlmConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILENAME: &str = "Commitgen.toml";
const USER_CONFIG_DIR: &str = "commitgen";
const USER_CONFIG_FILE: &str = "config.toml";

/// Walks up from `start` looking for `Commitgen.toml`.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.is_file() {
            return Some(config_path);
        }
        current = current.parent()?;
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
}

/// Picks the file to load: an explicit path (which must exist), else the
/// nearest project file, else the user file. `None` means run on defaults.
pub fn locate_config(
    explicit: Option<&Path>,
    cwd: &Path,
    user_path: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(anyhow!("Config file {:?} does not exist.", path));
        }
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(path) = find_project_config(cwd) {
        return Ok(Some(path));
    }
    Ok(user_path.filter(|p| p.is_file()))
}

/// Loads the `[llm]` section from wherever [`locate_config`] points.
pub fn load_llm_config(explicit: Option<&Path>, cwd: &Path) -> Result<(LlmConfig, Option<PathBuf>)> {
    let located = locate_config(explicit, cwd, user_config_path())?;
    let config = match &located {
        Some(path) => {
            info!("Found configuration file at: {:?}", path);
            CommitgenConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?
        }
        None => {
            debug!("No configuration file found; using defaults.");
            CommitgenConfig::default()
        }
    };
    Ok((config.llm, located))
}

/// `--command` replaces the configured command and turns the feature on;
/// `--timeout` replaces the deadline.
pub fn apply_overrides(mut llm: LlmConfig, command: Option<String>, timeout_secs: Option<u64>) -> LlmConfig {
    if let Some(command) = command {
        debug!(command = %command, "Using command from the command line.");
        llm.command = command;
        llm.enabled = true;
    }
    if let Some(secs) = timeout_secs {
        llm.timeout_secs = secs;
    }
    llm
}
