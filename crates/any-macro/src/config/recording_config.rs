use crate::config::default_consecutive_block;

use serde::{Deserialize, Serialize};

/// Recording behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Whether immediate repeats of the same command collapse to one entry.
    #[serde(default = "default_consecutive_block")]
    pub consecutive_block: bool,
}
