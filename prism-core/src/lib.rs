//! prism-core: the edit history shared by every PRISM editing surface.
//!
//! Design rules:
//! - History is linear and bounded; the oldest versions fall off first.
//! - Every transition is total. Undo/redo past either end does nothing.
//! - The store never does I/O and never sees failed edits.

pub mod config;
pub mod history;

pub use config::{ConfigError, HistoryConfig};
pub use history::{HistoryAction, HistoryState, DEFAULT_CAPACITY};
