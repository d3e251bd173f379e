use serde::{Deserialize, Serialize};

use std::fmt;

/// Command id the host fires for interactive selection. Recording treats it
/// as UI noise, not user intent.
pub const SELECT_COMMAND_ID: &str = "SelectCommand";

/// Reserved command id that cancels any in-progress playback when it appears
/// on the starting-event stream.
pub const HALT_COMMAND_ID: &str = "AnyMacro_HaltPlayback";

/// Opaque, stable identifier naming one host-invokable command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(String);

impl CommandId {
    /// Wraps a raw host identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CommandId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Reduces a user-supplied name to identifier characters.
///
/// Hyphens and spaces become underscores; alphanumerics and underscores are
/// kept; anything else is dropped. The result is a total function of the
/// input, so the same name always derives the same macro id.
pub fn to_identifier(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            '-' | ' ' => Some('_'),
            c if c.is_alphanumeric() || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}
