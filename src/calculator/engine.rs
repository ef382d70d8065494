//! The calculator engine.
//!
//! Owns the history and the undo/redo stacks. Every successful
//! `perform_operation` snapshots the previous history onto the undo stack;
//! undo and redo swap snapshots between the two stacks.

use super::calculation::Calculation;
use super::memento::CalculatorMemento;
use super::operations::Operation;
use super::validation::{RawOperand, validate_number};
use crate::config::CalculatorConfig;
use crate::error::{CalcError, Result};
use crate::history::{HistoryObserver, HistoryStore};
use rust_decimal::Decimal;
use std::rc::Rc;

pub struct Calculator {
    config: CalculatorConfig,
    history: Vec<Calculation>,
    undo_stack: Vec<CalculatorMemento>,
    redo_stack: Vec<CalculatorMemento>,
    operation: Option<Box<dyn Operation>>,
    observers: Vec<Rc<dyn HistoryObserver>>,
    observer_errors: Vec<anyhow::Error>,
    store: HistoryStore,
}

impl Calculator {
    /// Validate `config` and prepare the history directory.
    ///
    /// History is not loaded; call [`load_history`](Self::load_history).
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(config.history_dir())?;

        Ok(Self {
            store: HistoryStore::new(config.history_file()),
            config,
            history: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            operation: None,
            observers: Vec::new(),
            observer_errors: Vec::new(),
        })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn history(&self) -> &[Calculation] {
        &self.history
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn operation(&self) -> Option<&dyn Operation> {
        self.operation.as_deref()
    }

    pub fn set_operation(&mut self, operation: Box<dyn Operation>) {
        self.operation = Some(operation);
    }

    pub fn add_observer(&mut self, observer: Rc<dyn HistoryObserver>) {
        self.observers.push(observer);
    }

    /// Remove `observer` (compared by identity). Unknown observers are ignored.
    pub fn remove_observer(&mut self, observer: &Rc<dyn HistoryObserver>) {
        self.observers
            .retain(|existing| !std::ptr::addr_eq(Rc::as_ptr(existing), Rc::as_ptr(observer)));
    }

    /// Validate both operands, apply the active operation and record it.
    ///
    /// On failure the history and both stacks are left untouched. Observer
    /// failures do not affect the returned result; they are kept for
    /// [`take_observer_errors`](Self::take_observer_errors).
    pub fn perform_operation<'a, 'b>(
        &mut self,
        a: impl Into<RawOperand<'a>>,
        b: impl Into<RawOperand<'b>>,
    ) -> Result<Decimal> {
        self.observer_errors.clear();
        let operation = self.operation.as_deref().ok_or(CalcError::OperationNotSet)?;
        let a = validate_number(a, &self.config)?;
        let b = validate_number(b, &self.config)?;
        let calculation = Calculation::new(operation, a, b)?;
        let result = calculation.result();

        let snapshot = CalculatorMemento::new(&self.history);
        push_bounded(&mut self.undo_stack, snapshot, self.config.max_history_size);
        self.redo_stack.clear();

        self.history.push(calculation.clone());
        trim_oldest(&mut self.history, self.config.max_history_size);

        self.notify(&calculation);
        Ok(result)
    }

    /// Restore the previous snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = CalculatorMemento::new(&self.history);
        push_bounded(&mut self.redo_stack, current, self.config.max_history_size);
        self.history = previous.into_history();
        true
    }

    /// Reapply the last undone snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = CalculatorMemento::new(&self.history);
        push_bounded(&mut self.undo_stack, current, self.config.max_history_size);
        self.history = next.into_history();
        true
    }

    /// Drop the history together with both stacks.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// One `Operation(a, b) = result` line per calculation, oldest first.
    pub fn show_history(&self) -> impl Iterator<Item = String> + '_ {
        self.history.iter().map(ToString::to_string)
    }

    pub fn save_history(&self) -> Result<()> {
        self.store.save(&self.history)
    }

    /// Replace the history with the persisted one and reset undo/redo.
    pub fn load_history(&mut self) -> Result<()> {
        let mut history = self.store.load()?;
        trim_oldest(&mut history, self.config.max_history_size);
        self.history = history;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }

    /// Failures reported by observers during the last `perform_operation`.
    pub fn take_observer_errors(&mut self) -> Vec<anyhow::Error> {
        std::mem::take(&mut self.observer_errors)
    }

    fn notify(&mut self, calculation: &Calculation) {
        for observer in &self.observers {
            if let Err(err) = observer.update(calculation, &self.history) {
                self.observer_errors
                    .push(err.context(format!("Observer failed for {calculation}")));
            }
        }
    }
}

fn trim_oldest<T>(items: &mut Vec<T>, max: usize) {
    if items.len() > max {
        let excess = items.len() - max;
        items.drain(..excess);
    }
}

fn push_bounded(stack: &mut Vec<CalculatorMemento>, memento: CalculatorMemento, max: usize) {
    stack.push(memento);
    trim_oldest(stack, max);
}
