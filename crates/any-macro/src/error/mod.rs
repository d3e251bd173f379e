use any_macro_core::MacroError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the any-macro binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error from any-macro-core.
    #[error("Macro engine error: {source} {location}")]
    Macro {
        /// The underlying engine error.
        #[source]
        source: MacroError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A host-event script line could not be parsed.
    #[error("Script error: {reason} {location}")]
    ScriptError {
        /// Which line failed and why.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<MacroError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<MacroError> for AppError {
    #[track_caller]
    fn from(source: MacroError) -> Self {
        AppError::Macro {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
