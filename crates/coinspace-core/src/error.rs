//! Error types for Coin Space Core
//!
//! Error taxonomy for seed generation, authentication, the seed vault and
//! wallet session dispatch.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Coin Space Core errors
///
/// Errors are `Clone` so that one failure can be reported to every completion
/// path registered for a flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Off-thread seed generation failed (message sanitized)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Registration or login rejected by the auth gateway
    #[error("Auth error: {0}")]
    Auth(String),

    /// The identity was removed on the auth gateway
    #[error("user_deleted")]
    UserDeleted,

    /// Vault reveal failed (wrong or expired token, or corrupt ciphertext)
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Unknown network name or invalid session configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote service unreachable or returned garbage
    #[error("Transport error: {0}")]
    Transport(String),

    /// Storage collaborator failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// No persisted credentials to open
    #[error("No stored credentials")]
    NoCredentials,

    /// Operation needs an open seed/identity
    #[error("No open wallet session")]
    NoSession,

    /// Invalid seed
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Key derivation error
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Send request rejected by validation
    #[error("Invalid send: {0}")]
    InvalidSend(String),

    /// History record that cannot be represented
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if error is a user-facing error (vs internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Auth(_)
                | Error::UserDeleted
                | Error::Generation(_)
                | Error::InvalidSend(_)
                | Error::NoCredentials
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::Auth(_) => "The PIN was not accepted. Please try again.".to_string(),
            Error::UserDeleted => {
                "This wallet was removed. Please restore it from your passphrase.".to_string()
            }
            Error::Generation(reason) => format!("Could not prepare the wallet: {}", reason),
            Error::InvalidSend(reason) => format!("Cannot send: {}", reason),
            Error::NoCredentials => "No wallet found on this device.".to_string(),
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Generation(_) | Error::InvalidSeed(_) => ErrorCategory::Generation,
            Error::Auth(_) | Error::UserDeleted => ErrorCategory::Auth,
            Error::Decryption(_) => ErrorCategory::Vault,
            Error::Configuration(_) => ErrorCategory::Configuration,
            Error::Transport(_) => ErrorCategory::Network,
            Error::Storage(_) | Error::NoCredentials => ErrorCategory::Storage,
            Error::NoSession | Error::KeyDerivation(_) => ErrorCategory::Wallet,
            Error::InvalidSend(_) | Error::InvalidTransaction(_) => ErrorCategory::Transaction,
            Error::Other(_) => ErrorCategory::Internal,
        }
    }
}

impl From<coinspace_params::Error> for Error {
    fn from(e: coinspace_params::Error) -> Self {
        Error::Configuration(e.to_string())
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Seed/mnemonic generation errors
    Generation,
    /// Auth gateway errors
    Auth,
    /// Seed vault errors
    Vault,
    /// Session configuration errors
    Configuration,
    /// Network-related errors
    Network,
    /// Storage-related errors
    Storage,
    /// Wallet session errors
    Wallet,
    /// Transaction-related errors
    Transaction,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Generation => write!(f, "Generation"),
            ErrorCategory::Auth => write!(f, "Auth"),
            ErrorCategory::Vault => write!(f, "Vault"),
            ErrorCategory::Configuration => write!(f, "Configuration"),
            ErrorCategory::Network => write!(f, "Network"),
            ErrorCategory::Storage => write!(f, "Storage"),
            ErrorCategory::Wallet => write!(f, "Wallet"),
            ErrorCategory::Transaction => write!(f, "Transaction"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_detection() {
        assert!(Error::Auth("bad pin".to_string()).is_user_error());
        assert!(Error::UserDeleted.is_user_error());
        assert!(!Error::Transport("test".to_string()).is_user_error());
        assert!(!Error::Decryption("test".to_string()).is_user_error());
    }

    #[test]
    fn test_user_deleted_display_matches_wire_message() {
        assert_eq!(Error::UserDeleted.to_string(), "user_deleted");
    }

    #[test]
    fn test_user_messages() {
        let msg = Error::Generation("invalid word".to_string()).user_message();
        assert!(msg.contains("invalid word"));

        let msg = Error::InvalidSend("amount must be positive".to_string()).user_message();
        assert!(msg.contains("amount must be positive"));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(Error::UserDeleted.category(), ErrorCategory::Auth);
        assert_eq!(
            Error::Decryption("test".to_string()).category(),
            ErrorCategory::Vault
        );
        assert_eq!(
            Error::Configuration("test".to_string()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            Error::Transport("test".to_string()).category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_unknown_network_maps_to_configuration() {
        let err: Error = coinspace_params::Error::UnknownNetwork("dogecoin".to_string()).into();
        assert!(matches!(err, Error::Configuration(msg) if msg.contains("dogecoin")));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Vault.to_string(), "Vault");
        assert_eq!(ErrorCategory::Network.to_string(), "Network");
    }
}
