//! Configuration types for chatline.
//!
//! This module defines the configuration schema: grouping window,
//! separator wording, display time zone and logging defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::format::{LabelStyle, DEFAULT_YESTERDAY_LABEL};
use crate::render::RenderOptions;
use crate::timeline::GroupingPolicy;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".chatline/config.json";

/// Main configuration for chatline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum gap before a new time separator, in seconds.
    #[serde(default = "default_grouping_window_seconds")]
    pub grouping_window_seconds: u64,

    /// Label prefix for timestamps on the previous day.
    #[serde(default = "default_yesterday_label")]
    pub yesterday_label: String,

    /// Fixed display offset from UTC in minutes. `None` uses local time.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,

    /// Use ASCII speaker symbols in transcripts.
    #[serde(default)]
    pub ascii: bool,

    /// Fallback tracing filter when `CHATLINE_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_grouping_window_seconds() -> u64 {
    180
}

fn default_yesterday_label() -> String {
    DEFAULT_YESTERDAY_LABEL.into()
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults if the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Grouping policy for new timelines.
    pub fn grouping_policy(&self) -> GroupingPolicy {
        GroupingPolicy::from_seconds(self.grouping_window_seconds)
    }

    /// Separator label wording.
    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            yesterday: self.yesterday_label.clone(),
        }
    }

    /// Transcript rendering options.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            ascii: self.ascii,
            labels: self.label_style(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grouping_window_seconds: default_grouping_window_seconds(),
            yesterday_label: default_yesterday_label(),
            utc_offset_minutes: None,
            ascii: false,
            log_level: default_log_level(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
