//! Collaborators that react to, and persist, the calculation history.
//!
//! - [`HistoryStore`] reads and writes the CSV history file
//! - [`HistoryObserver`] implementations are notified after each calculation

mod observer;
mod store;

pub use observer::{AutoSaveObserver, HistoryObserver, LoggingObserver};
pub use store::{COLUMNS, HistoryStore};
