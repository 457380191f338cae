//! Optional TOML configuration.
//!
//! Every key is optional; command-line flags override file values.
//!
//! ```toml
//! tables = "revdisp-data/tables"
//! tolerance = "0.01"
//! year = 2024
//! seed = 42
//! count = 1000
//! log_level = "info"
//! log_file = "revdisp.log"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use revdisp_core::DEFAULT_TOLERANCE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory of parameter table CSV files; the built-in tables when unset.
    pub tables: Option<PathBuf>,

    /// Largest difference at which engine and reference still agree.
    pub tolerance: Decimal,

    /// Default tax year.
    pub year: i32,

    /// Default generator seed.
    pub seed: u64,

    /// Default number of generated households.
    pub count: usize,

    pub log_level: String,

    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tables: None,
            tolerance: DEFAULT_TOLERANCE,
            year: 2024,
            seed: 42,
            count: 100,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("invalid configuration")?;
        if config.tolerance < Decimal::ZERO {
            anyhow::bail!("tolerance must not be negative, got {}", config.tolerance);
        }
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                Self::from_toml(&contents).with_context(|| format!("in {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}
