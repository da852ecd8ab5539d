//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level assessgate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessgateConfig {
    /// Output format when `--format` is not given: text, json, or markdown.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Where `evaluate --save` writes reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Exit non-zero from `evaluate` when the assessment cannot be submitted.
    #[serde(default)]
    pub fail_on_errors: bool,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./assessgate-results")
}

impl Default for AssessgateConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            output_dir: default_output_dir(),
            fail_on_errors: false,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `assessgate.toml` in the current directory
/// 2. `~/.config/assessgate/config.toml`
///
/// `ASSESSGATE_FORMAT` overrides `default_format`.
pub fn load_config_from(path: Option<&Path>) -> Result<AssessgateConfig> {
    let mut config = read_config(path)?;
    if let Ok(format) = std::env::var("ASSESSGATE_FORMAT") {
        tracing::debug!(format = %format, "default format taken from ASSESSGATE_FORMAT");
        config.default_format = format;
    }
    Ok(config)
}

fn read_config(path: Option<&Path>) -> Result<AssessgateConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => [Some(PathBuf::from("assessgate.toml")), global_config_path()]
            .into_iter()
            .flatten()
            .find(|candidate| candidate.exists()),
    };

    let Some(path) = config_path else {
        return Ok(AssessgateConfig::default());
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<AssessgateConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn global_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("assessgate")
            .join("config.toml"),
    )
}
