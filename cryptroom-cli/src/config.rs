use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cryptroom"),
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn from_args(data_dir: Option<PathBuf>, verbose: bool) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: data_dir.unwrap_or(defaults.data_dir),
            verbose,
        }
    }

    pub fn log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!("cryptroom={},cryptroom_core={}", level, level)
    }
}
