//! Loading configuration from TOML files and the environment.

use super::CalculatorConfig;
use crate::error::{CalcError, Result};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix shared by all configuration environment variables.
pub const ENV_PREFIX: &str = "CALCULATOR_";

/// `$XDG_CONFIG_HOME/zcalc/config.toml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zcalc").join("config.toml"))
}

impl CalculatorConfig {
    /// Build the effective configuration.
    ///
    /// Reads `path` if given, otherwise the default config file when it
    /// exists, then applies `CALCULATOR_*` environment overrides and
    /// validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            CalcError::configuration(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml(&content)
            .map_err(|err| CalcError::configuration(format!("{}: {err}", path.display())))
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("BASE_DIR") {
            self.base_dir = PathBuf::from(value);
        }
        if let Some(value) = var("LOG_DIR") {
            self.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = var("HISTORY_DIR") {
            self.history_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = var("MAX_HISTORY_SIZE") {
            self.max_history_size = parse_env("MAX_HISTORY_SIZE", &value)?;
        }
        if let Some(value) = var("AUTO_SAVE") {
            self.auto_save = parse_bool("AUTO_SAVE", &value)?;
        }
        if let Some(value) = var("PRECISION") {
            self.precision = parse_env("PRECISION", &value)?;
        }
        if let Some(value) = var("MAX_INPUT_VALUE") {
            let trimmed = value.trim();
            self.max_input_value = Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|_| invalid_env("MAX_INPUT_VALUE", &value))?;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid_env(name, value))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid_env(name, value)),
    }
}

fn invalid_env(name: &str, value: &str) -> CalcError {
    CalcError::configuration(format!("invalid value for {ENV_PREFIX}{name}: '{value}'"))
}
