use crate::config::default_command_latency_ms;

use serde::{Deserialize, Serialize};

/// Playback behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Milliseconds between a command starting and its terminated event.
    #[serde(default = "default_command_latency_ms")]
    pub command_latency_ms: u64,
}
