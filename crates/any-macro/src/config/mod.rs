#[allow(clippy::module_inception)]
mod config;
mod playback_config;
mod recording_config;
mod storage_config;

pub(crate) use {
    config::Config, playback_config::PlaybackConfig, recording_config::RecordingConfig,
    storage_config::StorageConfig,
};

pub(crate) const DEFAULT_CONSECUTIVE_BLOCK: bool = false;
pub(crate) const DEFAULT_COMMAND_LATENCY_MS: u64 = 25;

pub(crate) fn default_consecutive_block() -> bool {
    DEFAULT_CONSECUTIVE_BLOCK
}

pub(crate) fn default_command_latency_ms() -> u64 {
    DEFAULT_COMMAND_LATENCY_MS
}
