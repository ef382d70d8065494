//! Operand validation.
//!
//! Turns raw user input into bounded decimals before anything reaches an
//! operation.

use crate::config::CalculatorConfig;
use crate::error::{CalcError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// An operand as it arrives from the caller, before validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawOperand<'a> {
    Text(&'a str),
    Decimal(Decimal),
    Integer(i64),
    Float(f64),
}

impl<'a> From<&'a str> for RawOperand<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for RawOperand<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for RawOperand<'_> {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<i64> for RawOperand<'_> {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RawOperand<'_> {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for RawOperand<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Parse and bound-check a single operand.
///
/// Strings are trimmed and may use plain or scientific notation. The absolute
/// value must not exceed `config.max_input_value`.
pub fn validate_number<'a>(
    raw: impl Into<RawOperand<'a>>,
    config: &CalculatorConfig,
) -> Result<Decimal> {
    let value = match raw.into() {
        RawOperand::Decimal(value) => value,
        RawOperand::Integer(value) => Decimal::from(value),
        // Go through the shortest round-trip text so 3.14 stays 3.14.
        RawOperand::Float(value) if value.is_finite() => parse_decimal(&value.to_string(), config)?,
        RawOperand::Float(value) => {
            return Err(CalcError::validation(format!(
                "Invalid number format: {value}"
            )));
        }
        RawOperand::Text(text) => parse_decimal(text, config)?,
    };

    if value.abs() > config.max_input_value {
        return Err(exceeds_max(config));
    }

    Ok(value)
}

fn exceeds_max(config: &CalculatorConfig) -> CalcError {
    CalcError::validation(format!(
        "Value exceeds maximum allowed: {}",
        config.max_input_value
    ))
}

fn parse_decimal(raw: &str, config: &CalculatorConfig) -> Result<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| match trimmed.parse::<f64>() {
            // Well-formed but too large for a decimal.
            Ok(value) if value.is_finite() && value.abs() >= 1.0 => exceeds_max(config),
            _ => CalcError::validation(format!("Invalid number format: {trimmed}")),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CalculatorConfig {
        CalculatorConfig {
            max_input_value: Decimal::from(1000),
            ..CalculatorConfig::default()
        }
    }

    #[test]
    fn test_validate_integer() {
        assert_eq!(validate_number(42, &config()).unwrap(), Decimal::from(42));
    }

    #[test]
    fn test_validate_float() {
        assert_eq!(
            validate_number(3.14, &config()).unwrap(),
            Decimal::from_str("3.14").unwrap()
        );
    }

    #[test]
    fn test_validate_string_is_trimmed() {
        assert_eq!(
            validate_number("  7.5  ", &config()).unwrap(),
            Decimal::from_str("7.5").unwrap()
        );
    }

    #[test]
    fn test_validate_scientific_notation() {
        assert_eq!(validate_number("1e2", &config()).unwrap(), Decimal::from(100));
    }

    #[test]
    fn test_validate_exceeds_max() {
        let err = validate_number("1001", &config()).unwrap_err();
        assert!(matches!(err, CalcError::Validation(_)));
        assert_eq!(err.to_string(), "Value exceeds maximum allowed: 1000");

        assert!(validate_number("-1001", &config()).is_err());
        assert!(validate_number("1000", &config()).is_ok());
    }

    #[test]
    fn test_validate_out_of_decimal_range_exceeds_max() {
        for raw in ["1e30", "-1e30", "123456789012345678901234567890123"] {
            let err = validate_number(raw, &config()).unwrap_err();
            assert_eq!(err.to_string(), "Value exceeds maximum allowed: 1000", "{raw}");
        }

        let err = validate_number(1e300, &config()).unwrap_err();
        assert_eq!(err.to_string(), "Value exceeds maximum allowed: 1000");
    }

    #[test]
    fn test_validate_invalid_format() {
        let err = validate_number("not_a_number", &config()).unwrap_err();
        assert!(matches!(err, CalcError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid number format: not_a_number");

        assert!(validate_number("", &config()).is_err());
        assert!(validate_number(f64::NAN, &config()).is_err());
        assert!(validate_number(f64::INFINITY, &config()).is_err());
    }
}
