use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::changelog::ChangeTypes;

/// Roadmap file used when neither the command line nor the config names one
pub const DEFAULT_ROADMAP_FILE: &str = "ROADMAP.json";

const CONFIG_ENV_VAR: &str = "ROADMAP_CONFIG";
const CONFIG_FILE_NAME: &str = ".roadmap.config";

/// User configuration for roadmap tooling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapConfig {
    /// Path to the roadmap document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_file: Option<PathBuf>,

    /// Change types accepted in addition to the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_change_types: Vec<String>,
}

impl RoadmapConfig {
    /// Loads the config from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// Loads the config, falling back to defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            debug!("No config at {:?}, using defaults", path.as_ref());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Loads the user's config from `$ROADMAP_CONFIG` or `~/.roadmap.config`
    ///
    /// Falls back to defaults when no config location can be determined.
    pub fn load_user() -> Result<Self> {
        Self::load_located(locate_config(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            dirs::home_dir(),
        ))
    }

    fn load_located(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_or_default(path),
            None => {
                debug!("No home directory and ${} unset, using defaults", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Save the config to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// The roadmap document to operate on
    pub fn roadmap_path(&self) -> PathBuf {
        self.default_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROADMAP_FILE))
    }

    /// Built-in change types plus the configured extras
    pub fn change_types(&self) -> ChangeTypes {
        ChangeTypes::default().with_extra(self.extra_change_types.iter().cloned())
    }
}

/// Gets the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    locate_config(
        std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        dirs::home_dir(),
    )
    .context("Failed to determine home directory")
}

// The env override wins; otherwise ~/.roadmap.config
fn locate_config(env_override: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    env_override.or_else(|| home_dir.map(|home| home.join(CONFIG_FILE_NAME)))
}
