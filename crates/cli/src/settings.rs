use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use club38_storage::{GeminiConfig, gemini};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Settings are merged from defaults, an optional JSON file, the environment and command-line
/// flags. Later sources win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Seconds
    pub timeout: u64,
    pub data_dir: PathBuf,
    pub user: Option<String>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
            timeout: gemini::DEFAULT_TIMEOUT.as_secs(),
            data_dir: PathBuf::from(".club38"),
            user: None,
            log_level: "warn".to_string(),
        }
    }
}

/// Command-line flags overriding the settings.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Settings file in JSON format
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Gemini model
    #[arg(long, global = true)]
    pub model: Option<String>,
    /// Timeout of model requests in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    /// Directory containing the stored user data
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// User whose data is used
    #[arg(long, short, global = true)]
    pub user: Option<String>,
    /// Minimum level of log messages written to stderr
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl Settings {
    pub fn load(
        overrides: &Overrides,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let mut settings = match overrides
            .config
            .clone()
            .or_else(|| var("CLUB38_CONFIG").map(PathBuf::from))
        {
            Some(path) => Settings::from_file(&path)?,
            None => Settings::default(),
        };
        settings.apply_env(var)?;
        settings.apply_overrides(overrides);
        settings.log_level()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), SettingsError> {
        if let Some(api_key) = var("GEMINI_API_KEY") {
            self.gemini_api_key = Some(api_key);
        }
        if let Some(model) = var("CLUB38_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = var("CLUB38_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(timeout) = var("CLUB38_TIMEOUT") {
            self.timeout = timeout
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidValue {
                    key: "CLUB38_TIMEOUT",
                    value: timeout,
                })?;
        }
        if let Some(data_dir) = var("CLUB38_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(user) = var("CLUB38_USER") {
            self.user = Some(user);
        }
        if let Some(log_level) = var("CLUB38_LOG_LEVEL") {
            self.log_level = log_level;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(model) = &overrides.model {
            self.model.clone_from(model);
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if let Some(data_dir) = &overrides.data_dir {
            self.data_dir.clone_from(data_dir);
        }
        if let Some(user) = &overrides.user {
            self.user = Some(user.clone());
        }
        if let Some(log_level) = &overrides.log_level {
            self.log_level.clone_from(log_level);
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, SettingsError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| SettingsError::InvalidValue {
            key: "log level",
            value: self.log_level.clone(),
        })
    }

    #[must_use]
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone().filter(|key| !key.is_empty()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
