use crate::error::{Result, StacksError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for stacks, stored next to the data as config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StacksConfig {
    /// Sweep issued books past their due date into overdue at startup
    #[serde(default = "default_flag_overdue")]
    pub flag_overdue: bool,
}

fn default_flag_overdue() -> bool {
    true
}

impl Default for StacksConfig {
    fn default() -> Self {
        Self {
            flag_overdue: default_flag_overdue(),
        }
    }
}

impl StacksConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(StacksError::Io)?;
        let config: StacksConfig =
            serde_json::from_str(&content).map_err(StacksError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(StacksError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(StacksError::Serialization)?;
        fs::write(config_path, content).map_err(StacksError::Io)?;
        Ok(())
    }
}
