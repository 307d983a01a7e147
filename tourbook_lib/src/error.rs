//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding storage, file, serialization and input validation failures.
#[derive(Debug)]
pub enum TourbookError {
    /// An error from the underlying API client.
    Api(tourbook_api::Error),
    /// The local key/value store failed.
    Store(rusqlite::Error),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// Reading or writing a local file failed.
    Io(std::io::Error),
    /// A configuration or draft file could not be parsed.
    Config(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl TourbookError {
    /// True when the API rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}

impl fmt::Display for TourbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Store(e) => write!(f, "Local store error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for TourbookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tourbook_api::Error> for TourbookError {
    fn from(e: tourbook_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<rusqlite::Error> for TourbookError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(e)
    }
}

impl From<serde_json::Error> for TourbookError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<std::io::Error> for TourbookError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
