use crate::corpus::SearchOptions;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "fzr";
const CONFIG_FILE: &str = "config.json";

/// Overrides the config file location
pub const CONFIG_ENV: &str = "FZR_CONFIG";

/// Fewest result lines interactive mode will draw
pub const MIN_LINES: usize = 3;

/// Application configuration stored in the user config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Number of search workers. 0 means the number of CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Candidates claimed by a worker at a time
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Result lines shown in interactive mode
    #[serde(default = "default_lines")]
    pub lines: usize,

    /// Input prompt
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Prefix each result with its score
    #[serde(default)]
    pub show_scores: bool,

    /// Show `[available/total]` under the prompt
    #[serde(default)]
    pub show_info: bool,
}

fn default_workers() -> usize {
    0 // 0 means use CPU count
}

fn default_batch_size() -> usize {
    crate::corpus::DEFAULT_BATCH_SIZE
}

fn default_lines() -> usize {
    10
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            batch_size: default_batch_size(),
            lines: default_lines(),
            prompt: default_prompt(),
            show_scores: false,
            show_info: false,
        }
    }
}

impl AppConfig {
    /// Load config from the user config directory, or return default if not found
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Reject values no command-line flag could have produced.
    ///
    /// Run after file values and flags are merged; `usize::MAX` lines stands
    /// for "max".
    pub fn validate(&self) -> Result<()> {
        if self.lines < MIN_LINES {
            bail!(
                "invalid line count {}: expected a number >= {} or \"max\"",
                self.lines,
                MIN_LINES
            );
        }
        Ok(())
    }

    /// Get the effective worker count (resolves 0 to CPU count)
    pub fn effective_workers(&self) -> usize {
        self.search_options().effective_workers()
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            workers: self.workers,
            batch_size: self.batch_size,
        }
    }
}

/// Path of the config file: `$FZR_CONFIG`, else `<config dir>/fzr/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|base| base.join(APP_NAME).join(CONFIG_FILE))
}
