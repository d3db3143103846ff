//! Append-only history store for scored behavior windows.

mod history;

pub use history::{HistoryStore, ScoredRecord};
