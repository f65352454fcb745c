use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::inventory::{Coleccion, Sede};
use crate::report::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Where sessions are stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Defaults for new sessions
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Summary report service
    #[serde(default)]
    pub report: ReportConfig,

    /// Scanning behaviour
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Storage medium for the session collection
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    // @backend: SQLite key/value table
    #[default]
    Sqlite,
    // @backend: checksummed JSON file
    JsonFile,
    // @backend: volatile, lost on exit
    Memory,
}

impl std::fmt::Display for StorageBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sqlite => "sqlite",
            Self::JsonFile => "json_file",
            Self::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for StorageBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "json_file" | "json" => Ok(Self::JsonFile),
            "memory" => Ok(Self::Memory),
            _ => Err(anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

/// Storage settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: StorageBackendKind,

    /// Data directory; the platform data directory when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// The configured data directory, or the platform default
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::database::DatabaseConnection::default_data_dir(),
        }
    }
}

/// Values used by `new` when the user leaves them out
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub sede: Sede,

    #[serde(default)]
    pub coleccion: Coleccion,
}

/// Summary report service settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportConfig {
    // @field: API key; reports are disabled without one
    #[serde(default)]
    pub api_key: Option<String>,

    // @field: Model name
    #[serde(default = "default_report_model")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "default_report_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_report_model(),
            endpoint: default_report_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Scanning settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptureConfig {
    /// Ring the terminal bell after each recorded scan
    #[serde(default = "default_true")]
    pub bell: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { bell: true }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_report_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_report_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Load `path`, or create it with defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.report.timeout_secs == 0 {
            return Err(anyhow!("Report timeout must be greater than zero"));
        }

        if self.report.model.trim().is_empty() {
            return Err(anyhow!("Report model cannot be empty"));
        }

        let endpoint = url::Url::parse(&self.report.endpoint)
            .with_context(|| format!("Invalid report endpoint: {}", self.report.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("Report endpoint must use http or https: {}", self.report.endpoint));
        }

        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(anyhow!("Storage data_dir cannot be empty"));
            }
        }

        Ok(())
    }
}
