//! Configuration loading for prepost

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = ".prepostrc.json";

/// Optional per-project settings. CLI flags override everything here.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Config {
    /// Answer token counted as affirmative (default "はい").
    pub yes_token: Option<String>,
    /// Default respondent for the per-respondent views.
    pub respondent: Option<String>,
    /// Force colors on or off.
    pub color: Option<bool>,
}

impl Config {
    /// Fold CLI flags into the config; CLI wins.
    pub fn merge_with_cli(mut self, respondent: Option<String>) -> Self {
        if respondent.is_some() {
            self.respondent = respondent;
        }
        self
    }
}

/// Find and load the config file. Searches the work directory then its
/// parents; an explicit path must exist.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in config: {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

/// Search for the config file in a directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
