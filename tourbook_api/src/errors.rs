//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or undecodable response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status. `message` is the server's
    /// `message` field when present, otherwise a body snippet.
    #[error("Request failed with status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    /// The API rejected the bearer token (HTTP 401).
    #[error("Unauthorized: the session token is missing, invalid or expired")]
    Unauthorized,
    /// An authenticated endpoint was called without a token.
    #[error("This operation requires a session token")]
    MissingToken,
}

impl Error {
    /// True for errors that mean the stored token should be discarded.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}
