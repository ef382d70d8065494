//! Name-keyed registry of operation constructors.

use super::operations::{
    AbsoluteDifference, Addition, Division, IntegerDivision, Modulus, Multiplication, Operation,
    Percentage, Power, Root, Subtraction,
};
use crate::error::{CalcError, Result};
use std::collections::HashMap;

type Constructor = Box<dyn Fn() -> Box<dyn Operation>>;

/// Maps lowercase command names to operation constructors.
///
/// `OperationRegistry::default()` carries the built-in operations; more can be
/// added (or existing ones overridden) at runtime with [`register`](Self::register).
pub struct OperationRegistry {
    constructors: HashMap<String, Constructor>,
}

impl OperationRegistry {
    /// Create a registry with no operations.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register `O` under `name`, replacing any previous entry.
    pub fn register<O>(&mut self, name: &str) -> Result<()>
    where
        O: Operation + Default + 'static,
    {
        let key = normalize(name);
        if key.is_empty() {
            return Err(CalcError::InvalidOperation(
                "Operation name must not be empty".to_string(),
            ));
        }
        if O::default().name().trim().is_empty() {
            return Err(CalcError::InvalidOperation(format!(
                "Operation registered as '{key}' has no display name"
            )));
        }

        self.constructors.insert(key, constructor::<O>());
        Ok(())
    }

    /// Build a fresh operation for `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Operation>> {
        let key = normalize(name);
        self.constructors
            .get(&key)
            .map(|constructor| constructor())
            .ok_or(CalcError::UnknownOperation(key))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&normalize(name))
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert_builtin<O: Operation + Default + 'static>(&mut self, name: &str) {
        self.constructors.insert(name.to_string(), constructor::<O>());
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.insert_builtin::<Addition>("add");
        registry.insert_builtin::<Subtraction>("subtract");
        registry.insert_builtin::<Multiplication>("multiply");
        registry.insert_builtin::<Division>("divide");
        registry.insert_builtin::<Power>("power");
        registry.insert_builtin::<Root>("root");
        registry.insert_builtin::<Modulus>("modulus");
        registry.insert_builtin::<IntegerDivision>("int_divide");
        registry.insert_builtin::<Percentage>("percent");
        registry.insert_builtin::<AbsoluteDifference>("abs_diff");
        registry
    }
}

fn constructor<O: Operation + Default + 'static>() -> Constructor {
    Box::new(|| Box::new(O::default()) as Box<dyn Operation>)
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
