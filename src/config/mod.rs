//! Calculator configuration.
//!
//! Values come from built-in defaults, an optional TOML file and
//! `CALCULATOR_*` environment variables (see [`load`]). Everything is checked
//! by [`CalculatorConfig::validate`] before a calculator is built.

mod load;

pub use load::{ENV_PREFIX, default_config_path};

use crate::error::{CalcError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "calculator.log";
const HISTORY_FILE_NAME: &str = "calculator_history.csv";

/// Settings consumed by the calculator engine and its collaborators.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Root directory for logs and history.
    pub base_dir: PathBuf,
    /// Maximum number of calculations kept in history.
    pub max_history_size: usize,
    /// Persist history after every successful calculation.
    pub auto_save: bool,
    /// Decimal places used when displaying results.
    pub precision: u32,
    /// Upper bound on the magnitude of any operand.
    pub max_input_value: Decimal,
    /// Overrides `base_dir/logs`.
    pub log_dir: Option<PathBuf>,
    /// Overrides `base_dir/history`.
    pub history_dir: Option<PathBuf>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            max_history_size: 100,
            auto_save: true,
            precision: 10,
            max_input_value: Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0),
            log_dir: None,
            history_dir: None,
        }
    }
}

impl CalculatorConfig {
    /// Default configuration rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("logs"))
    }

    pub fn history_dir(&self) -> PathBuf {
        self.history_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("history"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir().join(LOG_FILE_NAME)
    }

    pub fn history_file(&self) -> PathBuf {
        self.history_dir().join(HISTORY_FILE_NAME)
    }

    /// Reject non-positive limits.
    pub fn validate(&self) -> Result<()> {
        if self.max_history_size == 0 {
            return Err(CalcError::configuration("max_history_size must be positive"));
        }
        if self.precision == 0 {
            return Err(CalcError::configuration("precision must be positive"));
        }
        if self.max_input_value <= Decimal::ZERO {
            return Err(CalcError::configuration("max_input_value must be positive"));
        }
        Ok(())
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("zcalc"))
        .unwrap_or_else(|| PathBuf::from("."))
}
