//! Interactive decimal calculator with undo/redo and persistent history.

pub mod calculator;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod repl;

pub use calculator::{Calculation, Calculator, Operation, OperationRegistry};
pub use config::CalculatorConfig;
pub use error::{CalcError, Result};
