//! prism-editor: the edit-session controller and its runtime setup.
//!
//! An [`EditSession`] owns the history for one source image and is handed a
//! [`GenerationBackend`](prism_ai::GenerationBackend) and a
//! [`PersistenceBackend`](prism_gallery::PersistenceBackend) at construction.
//! There is no global client; hosts and tests pass their own.

pub mod config;
pub mod editor;
pub mod logging;

pub use config::{load_config, save_config, EditorConfig, CONFIG_FILE_EXT};
pub use editor::{EditSession, EditorError};
pub use logging::init_tracing;
