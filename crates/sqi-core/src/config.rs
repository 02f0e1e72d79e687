//! SQI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level SQI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqiConfig {
    /// Version tag of the diagnostic agent prompt, stamped into exports.
    #[serde(default = "default_prompt_version")]
    pub diagnostic_prompt_version: String,
    /// Engine identifier, stamped into exports.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Output directory for exported payloads.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default output format for `sqi compute`.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Diagnostic agent prompt text kept alongside the version tag.
    #[serde(default)]
    pub diagnostic_prompt: Option<String>,
}

fn default_prompt_version() -> String {
    "v1".to_string()
}
fn default_engine() -> String {
    "sqi-v0.1".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./sqi-results")
}
fn default_format() -> String {
    "json".to_string()
}

impl Default for SqiConfig {
    fn default() -> Self {
        Self {
            diagnostic_prompt_version: default_prompt_version(),
            engine: default_engine(),
            output_dir: default_output_dir(),
            default_format: default_format(),
            diagnostic_prompt: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `sqi.toml` in the current directory
/// 2. `~/.config/sqi/config.toml`
///
/// Environment variable overrides: `SQI_PROMPT_VERSION`, `SQI_ENGINE_ID`,
/// `SQI_OUTPUT_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<SqiConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("sqi.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SqiConfig::default(),
    };

    if let Ok(version) = std::env::var("SQI_PROMPT_VERSION") {
        config.diagnostic_prompt_version = version;
    }
    if let Ok(engine) = std::env::var("SQI_ENGINE_ID") {
        config.engine = engine;
    }
    if let Ok(dir) = std::env::var("SQI_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a TOML string into a config, expanding `${VAR}` references.
pub fn parse_config_str(content: &str) -> Result<SqiConfig> {
    let mut config: SqiConfig = toml::from_str(content)?;
    config.diagnostic_prompt_version = resolve_env_vars(&config.diagnostic_prompt_version);
    config.engine = resolve_env_vars(&config.engine);
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    config.diagnostic_prompt = config.diagnostic_prompt.as_deref().map(resolve_env_vars);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("sqi"))
}
