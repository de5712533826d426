//! Error types

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Encryption error
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Storage error (generic)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for coinspace_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Encryption(msg) => coinspace_core::Error::Decryption(msg),
            other => coinspace_core::Error::Storage(other.to_string()),
        }
    }
}

impl From<coinspace_core::Error> for Error {
    fn from(e: coinspace_core::Error) -> Self {
        match e {
            coinspace_core::Error::Decryption(msg) => Error::Encryption(msg),
            other => Error::Storage(other.to_string()),
        }
    }
}
