// Editor module for PRISM.

pub mod session;

pub use session::{EditSession, EditorError};
