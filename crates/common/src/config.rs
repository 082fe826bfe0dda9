//! Suite configuration
//!
//! Settings come from the process environment first and from the
//! profile settings file `config/<profile>.yaml` second. Every key is
//! required; there are no defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const GOOGLE_URL: &str = "GOOGLE_URL";
pub const MOROSYSTEMS_URL: &str = "MOROSYSTEMS_URL";
pub const MORO_CAREER_URL: &str = "MORO_CAREER_URL";
pub const TODO_TASKS_API_URL: &str = "TODO_TASKS_API_URL";

/// Selects the settings file profile
pub const PROFILE_VAR: &str = "JOURNEYCHECK_ENV";

/// Overrides the directory holding the profile files
pub const CONFIG_DIR_VAR: &str = "JOURNEYCHECK_CONFIG_DIR";

pub const DEFAULT_PROFILE: &str = "dev";

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Resolved suite settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub gui: GuiUrls,
    pub api: ApiUrls,
}

/// Browser journey targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuiUrls {
    pub google: String,
    pub morosystems: String,
    pub moro_career: String,
}

/// API targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUrls {
    pub todo_tasks: String,
}

impl Settings {
    /// Settings for this process, loaded on first use and cached afterwards
    pub fn global() -> Result<&'static Settings> {
        SETTINGS.get_or_try_init(Settings::load)
    }

    /// Load settings for the profile named by `JOURNEYCHECK_ENV`
    pub fn load() -> Result<Self> {
        let profile = non_empty_env(PROFILE_VAR).unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let dir = non_empty_env(CONFIG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config"));
        Self::load_profile(&dir, &profile)
    }

    /// Load settings from the environment, falling back to `<dir>/<profile>.yaml`
    pub fn load_profile(dir: &Path, profile: &str) -> Result<Self> {
        let file = ProfileFile::read(&dir.join(format!("{profile}.yaml")))?;
        Self::from_lookup(|key| non_empty_env(key).or_else(|| file.get(key)))
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::MissingConfiguration(key.to_string()))
        };

        Ok(Self {
            gui: GuiUrls {
                google: required(GOOGLE_URL)?,
                morosystems: required(MOROSYSTEMS_URL)?,
                moro_career: required(MORO_CAREER_URL)?,
            },
            api: ApiUrls {
                todo_tasks: required(TODO_TASKS_API_URL)?,
            },
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Flat `KEY: value` map read from a profile file
#[derive(Debug, Default)]
struct ProfileFile {
    values: HashMap<String, String>,
}

impl ProfileFile {
    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No profile settings file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let values: HashMap<String, String> = serde_yaml::from_str(&content).map_err(|e| {
            Error::InvalidConfiguration(format!("{}: {}", path.display(), e))
        })?;
        debug!("Loaded {} setting(s) from {}", values.len(), path.display());
        Ok(Self { values })
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
