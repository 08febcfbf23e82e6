use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "tracker.yaml";
pub const DEFAULT_STATE_FILE: &str = "tracker_state.json";

/// Session settings, read from YAML. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SessionConfig {
    /// Where the session is persisted between runs.
    pub state_file: PathBuf,
    pub prompt: String,
    /// Save after every successful command instead of only on exit.
    pub autosave: bool,
    /// Pretty-print JSON state files.
    pub pretty: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            prompt: "> ".to_string(),
            autosave: false,
            pretty: true,
        }
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))?;
        Ok(config)
    }

    /// Use `explicit` when given (it must exist), else `tracker.yaml` in the
    /// working directory when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
