//! CLI configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level carnet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarnetConfig {
    /// Built-in policy id used when `--policy` is not given.
    #[serde(default = "default_policy")]
    pub default_policy: String,
    /// Directory for generated transcripts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Student label used when `--student` is not given.
    #[serde(default)]
    pub student: Option<String>,
}

fn default_policy() -> String {
    "alger-med1".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./carnet-results")
}

impl Default for CarnetConfig {
    fn default() -> Self {
        Self {
            default_policy: default_policy(),
            output_dir: default_output_dir(),
            student: None,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `carnet.toml` in the current directory
/// 2. `~/.config/carnet/config.toml`
///
/// Environment variable overrides: `CARNET_POLICY`, `CARNET_STUDENT`.
pub fn load_config_from(path: Option<&Path>) -> Result<CarnetConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("carnet.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            global.exists().then_some(global)
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CarnetConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CarnetConfig::default(),
    };

    if let Ok(policy) = std::env::var("CARNET_POLICY") {
        config.default_policy = policy;
    }
    if let Ok(student) = std::env::var("CARNET_STUDENT") {
        config.student = Some(student);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("carnet"))
}
