//! Built-in arithmetic operations.
//!
//! Every operation is a stateless value exposing `execute(a, b)` and a display
//! name. Domain failures (division by zero and friends) are returned as
//! [`CalcError::Operation`] so they reach the user verbatim; numeric failures
//! from the decimal backend are plain errors and get wrapped by the caller.

use crate::error::CalcError;
use anyhow::{Context, bail};
use rust_decimal::{Decimal, MathematicalOps};
use std::fmt;

/// A binary arithmetic operation over decimals.
pub trait Operation: fmt::Debug {
    /// Human-readable name used in history entries (e.g. `Addition`).
    fn name(&self) -> &str;

    /// Apply the operation to two operands.
    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal>;
}

impl fmt::Display for dyn Operation + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn domain_error(message: &str) -> anyhow::Error {
    CalcError::operation(message).into()
}

fn overflow(value: Option<Decimal>) -> anyhow::Result<Decimal> {
    value.context("arithmetic overflow")
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Addition;

impl Operation for Addition {
    fn name(&self) -> &str {
        "Addition"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        overflow(a.checked_add(b))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Subtraction;

impl Operation for Subtraction {
    fn name(&self) -> &str {
        "Subtraction"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        overflow(a.checked_sub(b))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Multiplication;

impl Operation for Multiplication {
    fn name(&self) -> &str {
        "Multiplication"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        overflow(a.checked_mul(b))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Division;

impl Operation for Division {
    fn name(&self) -> &str {
        "Division"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        if b.is_zero() {
            return Err(domain_error("Division by zero is not allowed"));
        }
        overflow(a.checked_div(b))
    }
}

/// `a` raised to a non-negative exponent `b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Power;

impl Operation for Power {
    fn name(&self) -> &str {
        "Power"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        if b < Decimal::ZERO {
            return Err(domain_error("Negative exponents not supported"));
        }
        // Fractional exponents of a negative base have no real result.
        if a < Decimal::ZERO && !b.fract().is_zero() {
            bail!("math domain error");
        }
        overflow(a.checked_powd(b))
    }
}

/// The `b`-th root of `a`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Root;

impl Operation for Root {
    fn name(&self) -> &str {
        "Root"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        if a < Decimal::ZERO {
            return Err(domain_error("Cannot calculate root of negative number"));
        }
        if b.is_zero() {
            return Err(domain_error("Zero root is undefined"));
        }
        // 0^(1/b) with b < 0 is 1/0.
        if a.is_zero() && b < Decimal::ZERO {
            bail!("division by zero");
        }
        if b == Decimal::TWO {
            return overflow(a.sqrt());
        }
        let exponent = overflow(Decimal::ONE.checked_div(b))?;
        overflow(a.checked_powd(exponent))
    }
}

/// Remainder of `a / b`, carrying the sign of `a`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Modulus;

impl Operation for Modulus {
    fn name(&self) -> &str {
        "Modulus"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        if b.is_zero() {
            return Err(domain_error("Modulus by zero is not allowed"));
        }
        overflow(a.checked_rem(b))
    }
}

/// `floor(a / b)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerDivision;

impl Operation for IntegerDivision {
    fn name(&self) -> &str {
        "IntegerDivision"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        if b.is_zero() {
            return Err(domain_error("Integer division by zero is not allowed"));
        }
        Ok(overflow(a.checked_div(b))?.floor())
    }
}

/// `a` expressed as a percentage of `b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Percentage;

impl Operation for Percentage {
    fn name(&self) -> &str {
        "Percentage"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        if b.is_zero() {
            return Err(domain_error("Cannot calculate percentage of zero"));
        }
        let ratio = overflow(a.checked_div(b))?;
        overflow(ratio.checked_mul(Decimal::ONE_HUNDRED))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AbsoluteDifference;

impl Operation for AbsoluteDifference {
    fn name(&self) -> &str {
        "AbsoluteDifference"
    }

    fn execute(&self, a: Decimal, b: Decimal) -> anyhow::Result<Decimal> {
        Ok(overflow(a.checked_sub(b))?.abs())
    }
}
