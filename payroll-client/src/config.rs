//! Client configuration, read from a TOML file.
//!
//! Every section and key is optional; anything left out takes the default
//! shown below.
//!
//! ```toml
//! [service]
//! base_url = "http://127.0.0.1:8000"
//! calculate_path = "/api/v1/calculate_payroll_tax"
//! pdf_export_path = "/api/v1/export/pdf"
//! excel_export_path = "/api/v1/export/excel"
//! timeout_secs = 30
//!
//! [store]
//! backend = "sqlite"
//! connection_string = "payroll.db"
//!
//! [logging]
//! level = "info"
//! stdout = true
//! # file = "payroll.log"
//!
//! [export]
//! directory = "."
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use payroll_core::{ExportFormat, StoreConfig};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "payroll.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub service: ServiceConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub calculate_path: String,
    pub pdf_export_path: String,
    pub excel_export_path: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            calculate_path: "/api/v1/calculate_payroll_tax".to_string(),
            pdf_export_path: "/api/v1/export/pdf".to_string(),
            excel_export_path: "/api/v1/export/excel".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn calculate_url(&self) -> String {
        self.join(&self.calculate_path)
    }

    pub fn export_url(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Pdf => self.join(&self.pdf_export_path),
            ExportFormat::Excel => self.join(&self.excel_export_path),
        }
    }

    fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub stdout: bool,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stdout: true,
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where exported documents are written.
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse configuration")
    }

    /// Reads the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Reads `path` if given. Otherwise reads [`DEFAULT_CONFIG_FILE`] when it
    /// exists and falls back to defaults when it does not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    tracing::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }
}
