use error_location::ErrorLocation;
use thiserror::Error;

/// Recording/playback engine errors with source location tracking.
#[derive(Error, Debug)]
pub enum MacroError {
    /// A persisted macro record is missing a required field.
    #[error("Invalid macro record: {reason} {location}")]
    InvalidRecord {
        /// Which field failed validation and why.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The user cancelled the naming prompt, or entered an empty name.
    #[error("Macro naming cancelled {location}")]
    NamingCancelled {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The user answered no (or cancelled) a deletion confirmation.
    #[error("Deletion not confirmed {location}")]
    ConfirmationDeclined {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host rejected a subscribe/execute/trigger request.
    #[error("Host call failed: {reason} {location}")]
    HostCall {
        /// Description of the rejected call.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The persistence store could not be read or written.
    #[error("Store IO error: {source} {location}")]
    StoreIo {
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The persisted store contents are not valid JSON.
    #[error("Store format error: {source} {location}")]
    StoreFormat {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Manual From impls with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<std::io::Error> for MacroError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        MacroError::StoreIo {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

impl From<serde_json::Error> for MacroError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        MacroError::StoreFormat {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`MacroError`].
pub type Result<T> = std::result::Result<T, MacroError>;
