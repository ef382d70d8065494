//! Line-oriented command loop around the calculator engine.

use crate::calculator::{Calculator, OperationRegistry};
use crate::error::CalcError;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Reads commands from `input` and writes responses to `output`.
pub struct Repl<R, W> {
    calculator: Calculator,
    registry: OperationRegistry,
    input: R,
    output: W,
}

/// What the loop should do after a command.
enum Flow {
    Continue,
    Exit,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(calculator: Calculator, registry: OperationRegistry, input: R, output: W) -> Self {
        Self {
            calculator,
            registry,
            input,
            output,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Run until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Calculator started. Type 'help' for commands.")?;

        loop {
            let Some(line) = self.prompt("\nEnter command: ")? else {
                writeln!(self.output, "\nInput terminated. Exiting...")?;
                break;
            };
            let command = line.trim().to_lowercase();
            if command.is_empty() {
                continue;
            }

            if let Flow::Exit = self.dispatch(&command)? {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: &str) -> io::Result<Flow> {
        match command {
            "help" => self.print_help()?,
            "exit" => {
                match self.calculator.save_history() {
                    Ok(()) => writeln!(self.output, "History saved successfully.")?,
                    Err(err) => writeln!(self.output, "Warning: Could not save history: {err}")?,
                }
                writeln!(self.output, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
            "history" => self.print_history()?,
            "clear" => {
                self.calculator.clear_history();
                writeln!(self.output, "History cleared")?;
            }
            "undo" => {
                let message = if self.calculator.undo() {
                    "Operation undone"
                } else {
                    "Nothing to undo"
                };
                writeln!(self.output, "{message}")?;
            }
            "redo" => {
                let message = if self.calculator.redo() {
                    "Operation redone"
                } else {
                    "Nothing to redo"
                };
                writeln!(self.output, "{message}")?;
            }
            "save" => match self.calculator.save_history() {
                Ok(()) => writeln!(self.output, "History saved successfully")?,
                Err(err) => writeln!(self.output, "Error saving history: {err}")?,
            },
            "load" => match self.calculator.load_history() {
                Ok(()) => writeln!(self.output, "History loaded successfully")?,
                Err(err) => writeln!(self.output, "Error loading history: {err}")?,
            },
            name if self.registry.contains(name) => return self.calculate(name),
            other => writeln!(
                self.output,
                "Unknown command: '{other}'. Type 'help' for available commands."
            )?,
        }
        Ok(Flow::Continue)
    }

    fn calculate(&mut self, name: &str) -> io::Result<Flow> {
        writeln!(self.output, "\nEnter numbers (or 'cancel' to abort):")?;
        let a = match self.operand("First number: ")? {
            Some(Operand::Value(a)) => a,
            Some(Operand::Cancel) => return self.cancelled(),
            None => return Ok(Flow::Exit),
        };
        let b = match self.operand("Second number: ")? {
            Some(Operand::Value(b)) => b,
            Some(Operand::Cancel) => return self.cancelled(),
            None => return Ok(Flow::Exit),
        };

        match self.apply(name, &a, &b) {
            Ok(result) => writeln!(self.output, "\nResult: {result}")?,
            Err(err) => {
                warn!("{name} failed: {err}");
                writeln!(self.output, "Error: {err}")?;
            }
        }
        for err in self.calculator.take_observer_errors() {
            warn!("{err:#}");
            writeln!(self.output, "Warning: {err:#}")?;
        }
        Ok(Flow::Continue)
    }

    fn cancelled(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "Operation cancelled")?;
        Ok(Flow::Continue)
    }

    fn apply(&mut self, name: &str, a: &str, b: &str) -> Result<String, CalcError> {
        let operation = self.registry.create(name)?;
        self.calculator.set_operation(operation);
        self.calculator.perform_operation(a, b)?;

        let precision = self.calculator.config().precision;
        Ok(self
            .calculator
            .history()
            .last()
            .map(|calc| calc.format_result(precision))
            .unwrap_or_default())
    }

    fn operand(&mut self, prompt: &str) -> io::Result<Option<Operand>> {
        // Running out of input in the middle of an operation ends the session.
        Ok(self.prompt(prompt)?.map(|line| {
            let value = line.trim();
            if value.eq_ignore_ascii_case("cancel") {
                Operand::Cancel
            } else {
                Operand::Value(value.to_string())
            }
        }))
    }

    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nAvailable commands:")?;
        writeln!(
            self.output,
            "  {} - Perform calculations",
            self.registry.names().join(", ")
        )?;
        for (command, description) in [
            ("history", "Show calculation history"),
            ("clear", "Clear calculation history"),
            ("undo", "Undo the last calculation"),
            ("redo", "Redo the last undone calculation"),
            ("save", "Save calculation history to file"),
            ("load", "Load calculation history from file"),
            ("exit", "Exit the calculator"),
        ] {
            writeln!(self.output, "  {command} - {description}")?;
        }
        Ok(())
    }

    fn print_history(&mut self) -> io::Result<()> {
        if self.calculator.history().is_empty() {
            return writeln!(self.output, "No calculations in history");
        }
        writeln!(self.output, "\nCalculation History:")?;
        for (i, entry) in self.calculator.show_history().enumerate() {
            writeln!(self.output, "{}. {entry}", i + 1)?;
        }
        Ok(())
    }
}

enum Operand {
    Value(String),
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Calculation;
    use crate::config::CalculatorConfig;
    use crate::history::HistoryObserver;
    use std::io::Cursor;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn run(script: &str) -> (TempDir, String, usize) {
        let dir = tempfile::tempdir().unwrap();
        let config = CalculatorConfig {
            auto_save: false,
            ..CalculatorConfig::with_base_dir(dir.path())
        };
        let calculator = Calculator::new(config).unwrap();
        let mut output = Vec::new();
        let mut repl = Repl::new(
            calculator,
            OperationRegistry::default(),
            Cursor::new(script.to_string()),
            &mut output,
        );
        repl.run().unwrap();
        let history_len = repl.calculator().history().len();
        drop(repl);
        (dir, String::from_utf8(output).unwrap(), history_len)
    }

    #[test]
    fn test_addition_and_history() {
        let (_dir, output, len) = run("add\n2\n3\nhistory\n");
        assert!(output.contains("Result: 5"));
        assert!(output.contains("1. Addition(2, 3) = 5"));
        assert_eq!(len, 1);
    }

    #[test]
    fn test_result_uses_precision() {
        let (_dir, output, _) = run("divide\n1\n3\n");
        assert!(output.contains("Result: 0.3333333333"));
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let (_dir, output, len) = run("divide\n10\n0\nadd\nabc\n1\nadd\n1\n1\n");
        assert!(output.contains("Error: Division by zero is not allowed"));
        assert!(output.contains("Error: Invalid number format: abc"));
        assert!(output.contains("Result: 2"));
        assert_eq!(len, 1);
    }

    #[test]
    fn test_cancel_aborts_operation() {
        let (_dir, output, len) = run("add\ncancel\nmultiply\n2\nCANCEL\n");
        assert_eq!(output.matches("Operation cancelled").count(), 2);
        assert_eq!(len, 0);
    }

    #[test]
    fn test_observer_failure_is_reported_after_result() {
        struct Unwritable;

        impl HistoryObserver for Unwritable {
            fn update(
                &self,
                _calculation: &Calculation,
                _history: &[Calculation],
            ) -> anyhow::Result<()> {
                anyhow::bail!("read-only file system")
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut calculator = Calculator::new(CalculatorConfig::with_base_dir(dir.path())).unwrap();
        calculator.add_observer(Rc::new(Unwritable));
        let mut output = Vec::new();
        let mut repl = Repl::new(
            calculator,
            OperationRegistry::default(),
            Cursor::new("add\n2\n3\n".to_string()),
            &mut output,
        );
        repl.run().unwrap();
        assert_eq!(repl.calculator().history().len(), 1);
        drop(repl);

        let output = String::from_utf8(output).unwrap();
        let result = output.find("Result: 5").unwrap();
        let warning = output
            .find("Warning: Observer failed for Addition(2, 3) = 5: read-only file system")
            .unwrap();
        assert!(result < warning);
    }

    #[test]
    fn test_cancel_on_first_operand_returns_to_prompt() {
        let (_dir, output, len) = run("add\ncancel\nadd\n2\n3\n");
        assert_eq!(output.matches("Operation cancelled").count(), 1);
        assert!(!output.contains("Unknown command"));
        assert!(output.contains("Result: 5"));
        assert_eq!(len, 1);
    }

    #[test]
    fn test_undo_redo_commands() {
        let (_dir, output, len) = run("undo\nadd\n1\n1\nundo\nredo\nredo\n");
        assert!(output.contains("Nothing to undo"));
        assert!(output.contains("Operation undone"));
        assert!(output.contains("Operation redone"));
        assert!(output.contains("Nothing to redo"));
        assert_eq!(len, 1);
    }

    #[test]
    fn test_clear_and_empty_history() {
        let (_dir, output, len) = run("add\n1\n1\nclear\nhistory\n");
        assert!(output.contains("History cleared"));
        assert!(output.contains("No calculations in history"));
        assert_eq!(len, 0);
    }

    #[test]
    fn test_exit_saves_history() {
        let (dir, output, _) = run("add\n2\n3\nexit\nadd\n1\n1\n");
        assert!(output.contains("History saved successfully."));
        assert!(output.contains("Goodbye!"));
        // Nothing after `exit` is processed.
        assert_eq!(output.matches("Result:").count(), 1);

        let saved =
            std::fs::read_to_string(dir.path().join("history/calculator_history.csv")).unwrap();
        assert!(saved.contains("Addition,2,3,5,"));
    }

    #[test]
    fn test_unknown_command_and_help() {
        let (_dir, output, _) = run("frobnicate\nhelp\n");
        assert!(output.contains("Unknown command: 'frobnicate'"));
        assert!(output.contains("abs_diff, add, divide"));
        assert!(output.contains("undo - Undo the last calculation"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_dir, output, _) = run("");
        assert!(output.contains("Input terminated. Exiting..."));
    }
}
