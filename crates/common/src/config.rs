use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

pub const DEFAULT_FLAG_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
            .map_err(AppError::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerBackend {
    #[default]
    Basic,
    Enhanced,
}

impl AnalyzerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Enhanced => "enhanced",
        }
    }
}

impl fmt::Display for AnalyzerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Rule file on disk. `None` selects the dataset bundled with the analyzer.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    #[serde(default = "AnalyzerConfig::default_flag_threshold")]
    pub flag_threshold: u8,
    #[serde(default)]
    pub backend: AnalyzerBackend,
}

impl AnalyzerConfig {
    const fn default_flag_threshold() -> u8 {
        DEFAULT_FLAG_THRESHOLD
    }

    /// Threshold on the 0..=100 score scale; larger configured values are capped.
    pub fn flag_threshold(&self) -> u8 {
        self.flag_threshold.min(100)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            flag_threshold: Self::default_flag_threshold(),
            backend: AnalyzerBackend::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,
}
