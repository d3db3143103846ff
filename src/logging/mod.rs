//! Structured logging setup.

mod format;

pub use format::{LogEvent, StructuredLogger};
