pub mod config;
pub mod errors;
pub mod logging;
pub mod text;

pub use crate::config::{AnalyzerBackend, AnalyzerConfig, AppConfig};
pub use crate::errors::{AppError, Result};
