//! Snapshots of the calculation history used for undo and redo.

use super::calculation::Calculation;
use chrono::{DateTime, Utc};

/// An independent copy of the history at one point in time.
#[derive(Clone, Debug)]
pub struct CalculatorMemento {
    history: Vec<Calculation>,
    timestamp: DateTime<Utc>,
}

impl CalculatorMemento {
    pub fn new(history: &[Calculation]) -> Self {
        Self {
            history: history.to_vec(),
            timestamp: Utc::now(),
        }
    }

    pub fn history(&self) -> &[Calculation] {
        &self.history
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn into_history(self) -> Vec<Calculation> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::operations::Addition;
    use rust_decimal::Decimal;

    #[test]
    fn test_snapshot_is_independent_of_live_history() {
        let mut live = vec![Calculation::new(&Addition, Decimal::ONE, Decimal::ONE).unwrap()];
        let memento = CalculatorMemento::new(&live);

        live.push(Calculation::new(&Addition, Decimal::TWO, Decimal::TWO).unwrap());
        live.remove(0);

        assert_eq!(memento.history().len(), 1);
        assert_eq!(memento.history()[0].operand1(), Decimal::ONE);
        assert!(memento.timestamp() <= Utc::now());
    }

    #[test]
    fn test_into_history() {
        let calc = Calculation::new(&Addition, Decimal::TWO, Decimal::ONE).unwrap();
        let memento = CalculatorMemento::new(std::slice::from_ref(&calc));
        assert_eq!(memento.into_history(), vec![calc]);
    }
}
