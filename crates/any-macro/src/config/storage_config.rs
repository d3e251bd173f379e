use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Macro library storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Macro library file. Empty means the platform data directory.
    #[serde(default)]
    pub macros_path: Option<PathBuf>,
}
