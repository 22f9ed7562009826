use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::prune::DEFAULT_MAX_MISSES;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "conncomp.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub prune: PruneConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PruneConfig {
    #[serde(default = "default_max_misses")]
    pub max_misses: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            max_misses: default_max_misses(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_base")]
    pub base: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub max_misses: Option<u32>,
    pub seed: Option<u64>,
    pub base: Option<PathBuf>,
}

impl Config {
    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(max_misses) = overrides.max_misses {
            self.prune.max_misses = max_misses;
        }
        if let Some(seed) = overrides.seed {
            self.prune.seed = Some(seed);
        }
        if let Some(base) = &overrides.base {
            self.output.base.clone_from(base);
        }
        self
    }
}

/// Load `conncomp.toml` from `project_root`, falling back to
/// `<config_dir>/conncomp/config.toml`, then to defaults.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<Config> {
    let local = project_root.join(CONFIG_FILE);
    if local.exists() {
        return load_config_file(&local);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    let user = config_dir.join("conncomp/config.toml");
    if user.exists() {
        return load_config_file(&user);
    }

    Ok(Config::default())
}

/// Parse one config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid config TOML.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_max_misses() -> u32 {
    DEFAULT_MAX_MISSES
}

fn default_base() -> PathBuf {
    PathBuf::from("processed")
}
