//! Configuration loading
//!
//! TOML-based, loaded once at startup. A missing config file yields the
//! built-in default document below (this default drives the fallback
//! behavior the tests pin down); a present-but-malformed file is an error,
//! because silently ignoring a broken config hides real mistakes.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Built-in default configuration, used when no config file exists
const DEFAULT_CONFIG: &str = r#"
[data_source]
type = "json"
url = "http://localhost:3001/api/weekly-reports/data"
json_path = "data/weekly_data.json"

[template]
path = "./templates/weekly_report_template.pptx"

[output]
directory = "./reports"
filename_pattern = "VLines_Weekly_Report_{date}.pptx"

[schedule]
day = "monday"
time = "09:00"
"#;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_source: DataSourceConfig,
    pub template: TemplateConfig,
    pub output: OutputConfig,
    pub schedule: ScheduleConfig,
}

/// `data_source.type` selects the acquisition strategy: `api`, `json`,
/// `database`, or empty/unset for the built-in sample
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    #[serde(rename = "type")]
    pub source_type: String,
    pub url: String,
    pub json_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// Must contain `{date}`; may contain `{week}`
    pub filename_pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub day: String,
    pub time: String,
}

// Per-table defaults come from the built-in document, so a partial config
// file inherits the documented values key by key.
impl Default for DataSourceConfig {
    fn default() -> Self {
        Config::default().data_source
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Config::default().template
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Config::default().output
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Config::default().schedule
    }
}

impl Config {
    /// Load from a TOML file. A missing file is not an error: the built-in
    /// default configuration is returned instead.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_str(&content)?;
                info!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse from a TOML string. Absent tables and keys take their defaults.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl Default for Config {
    // Constructed literally (mirroring DEFAULT_CONFIG) rather than parsed:
    // deserializing with container-level #[serde(default)] eagerly evaluates
    // Config::default(), so parsing here would recurse forever.
    fn default() -> Self {
        Config {
            data_source: DataSourceConfig {
                source_type: "json".to_string(),
                url: "http://localhost:3001/api/weekly-reports/data".to_string(),
                json_path: PathBuf::from("data/weekly_data.json"),
            },
            template: TemplateConfig {
                path: PathBuf::from("./templates/weekly_report_template.pptx"),
            },
            output: OutputConfig {
                directory: PathBuf::from("./reports"),
                filename_pattern: "VLines_Weekly_Report_{date}.pptx".to_string(),
            },
            schedule: ScheduleConfig {
                day: "monday".to_string(),
                time: "09:00".to_string(),
            },
        }
    }
}
