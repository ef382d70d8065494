//! Immutable records of applied operations.

use super::operations::Operation;
use crate::error::{CalcError, Result};
use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// One successful application of an operation.
///
/// The result is computed once, at construction, and never changes. Two
/// calculations are equal when their operation name, operands and result are
/// equal; the timestamp is ignored.
#[derive(Clone, Debug)]
pub struct Calculation {
    operation: String,
    operand1: Decimal,
    operand2: Decimal,
    result: Decimal,
    timestamp: DateTime<Utc>,
}

impl Calculation {
    /// Apply `operation` to the operands and record the result.
    ///
    /// Domain failures reported by the operation pass through unchanged; any
    /// other failure becomes `Operation failed: <cause>`.
    pub fn new(operation: &dyn Operation, operand1: Decimal, operand2: Decimal) -> Result<Self> {
        let result = operation
            .execute(operand1, operand2)
            .map_err(|err| match err.downcast::<CalcError>() {
                Ok(err) => err,
                Err(err) => CalcError::operation(format!("Operation failed: {err:#}")),
            })?;

        Ok(Self {
            operation: operation.name().to_string(),
            operand1,
            operand2,
            result,
            timestamp: Utc::now(),
        })
    }

    /// Rebuild a calculation from persisted fields.
    pub(crate) fn restore(
        operation: String,
        operand1: Decimal,
        operand2: Decimal,
        result: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operation,
            operand1,
            operand2,
            result,
            timestamp,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn operand1(&self) -> Decimal {
        self.operand1
    }

    pub fn operand2(&self) -> Decimal {
        self.operand2
    }

    pub fn result(&self) -> Decimal {
        self.result
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Format the result rounded to `precision` places, without trailing zeros.
    pub fn format_result(&self, precision: u32) -> String {
        self.result.round_dp(precision).normalize().to_string()
    }
}

impl PartialEq for Calculation {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation
            && self.operand1 == other.operand1
            && self.operand2 == other.operand2
            && self.result == other.result
    }
}

impl Eq for Calculation {}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operation, self.operand1, self.operand2, self.result
        )
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (with offset) as well as naive timestamps, which are
/// taken to be UTC.
pub(crate) fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let naive: NaiveDateTime = raw
        .parse()
        .with_context(|| format!("invalid timestamp '{raw}'"))?;
    Ok(naive.and_utc())
}
