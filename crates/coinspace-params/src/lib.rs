//! Coin Space network parameters and constants
//!
//! This crate provides the closed set of supported networks, their family
//! (hierarchical-account vs account-model), confirmation policy,
//! denominations and BIP-32 serialization prefixes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod consensus;
pub mod denomination;
pub mod network;

pub use consensus::ConfirmationPolicy;
pub use denomination::{Denomination, DenominationSet};
pub use network::{Network, NetworkFamily, NetworkName};

/// Error types for parameter operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Network name is not one of the supported networks
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Denomination is not available for the network
    #[error("Unknown denomination {denomination} for network {network}")]
    UnknownDenomination {
        /// Network the denomination was requested for
        network: NetworkName,
        /// Requested denomination symbol
        denomination: String,
    },
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
