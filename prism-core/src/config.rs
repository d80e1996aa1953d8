//! History settings as they appear in the editor's config file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DEFAULT_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of versions an edit session keeps.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            tracing::error!("history capacity must be at least 1");
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
}
