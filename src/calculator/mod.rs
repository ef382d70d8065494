//! Calculator engine and its building blocks.
//!
//! This module provides:
//! - Stateless decimal operations and a registry to look them up by name
//! - Operand validation against the configured bounds
//! - Immutable calculation records and history snapshots
//! - The [`Calculator`] engine with undo/redo

mod calculation;
mod engine;
mod memento;
mod operations;
mod registry;
mod validation;

pub(crate) use calculation::parse_timestamp;

pub use calculation::Calculation;
pub use engine::Calculator;
pub use memento::CalculatorMemento;
pub use operations::{
    AbsoluteDifference, Addition, Division, IntegerDivision, Modulus, Multiplication, Operation,
    Percentage, Power, Root, Subtraction,
};
pub use registry::OperationRegistry;
pub use validation::{RawOperand, validate_number};
