//! Observers notified after each successful calculation.

use super::store::HistoryStore;
use crate::calculator::Calculation;
use crate::config::CalculatorConfig;
use tracing::{debug, info};

/// Reacts to new calculations.
///
/// `history` is the engine's history after `calculation` was appended.
pub trait HistoryObserver {
    fn update(&self, calculation: &Calculation, history: &[Calculation]) -> anyhow::Result<()>;
}

/// Emits an info event for every calculation.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingObserver;

impl HistoryObserver for LoggingObserver {
    fn update(&self, calculation: &Calculation, _history: &[Calculation]) -> anyhow::Result<()> {
        info!(
            "Calculation performed: {} ({}, {}) = {}",
            calculation.operation(),
            calculation.operand1(),
            calculation.operand2(),
            calculation.result()
        );
        Ok(())
    }
}

/// Persists the full history after every calculation when auto-save is on.
#[derive(Clone, Debug)]
pub struct AutoSaveObserver {
    store: HistoryStore,
    enabled: bool,
}

impl AutoSaveObserver {
    pub fn new(store: HistoryStore, enabled: bool) -> Self {
        Self { store, enabled }
    }

    /// Save to `config.history_file()` according to `config.auto_save`.
    pub fn from_config(config: &CalculatorConfig) -> Self {
        Self::new(HistoryStore::new(config.history_file()), config.auto_save)
    }
}

impl HistoryObserver for AutoSaveObserver {
    fn update(&self, _calculation: &Calculation, history: &[Calculation]) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.store.save(history)?;
        debug!(path = %self.store.path().display(), "History auto-saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Addition;
    use rust_decimal::Decimal;

    fn calc() -> Calculation {
        Calculation::new(&Addition, Decimal::TWO, Decimal::ONE).unwrap()
    }

    #[test]
    fn test_logging_observer_accepts_calculation() {
        let calc = calc();
        assert!(LoggingObserver.update(&calc, std::slice::from_ref(&calc)).is_ok());
    }

    #[test]
    fn test_autosave_writes_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("calc.csv"));
        let observer = AutoSaveObserver::new(store.clone(), true);

        let history = vec![calc(), calc()];
        observer.update(&history[1], &history).unwrap();

        assert_eq!(store.load().unwrap(), history);
    }

    #[test]
    fn test_autosave_disabled_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalculatorConfig {
            auto_save: false,
            ..CalculatorConfig::with_base_dir(dir.path())
        };
        let observer = AutoSaveObserver::from_config(&config);

        let history = vec![calc()];
        observer.update(&history[0], &history).unwrap();

        assert!(!config.history_file().exists());
    }

    #[test]
    fn test_autosave_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let observer = AutoSaveObserver::new(HistoryStore::new(dir.path()), true);

        let history = vec![calc()];
        let err = observer.update(&history[0], &history).unwrap_err();
        assert!(err.to_string().starts_with("Failed to save history:"));
    }
}
