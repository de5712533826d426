//! Error types

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid service URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Unexpected HTTP status without a usable error body
    #[error("HTTP error: {status}")]
    Http {
        /// Response status code
        status: u16,
    },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The service rejected the request
    #[error("{0}")]
    Rejected(String),

    /// The identity was removed on the service
    #[error("user_deleted")]
    UserDeleted,
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for coinspace_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::UserDeleted => coinspace_core::Error::UserDeleted,
            Error::Rejected(msg) => coinspace_core::Error::Auth(msg),
            Error::InvalidUrl(msg) => coinspace_core::Error::Configuration(msg),
            other => coinspace_core::Error::Transport(other.to_string()),
        }
    }
}
