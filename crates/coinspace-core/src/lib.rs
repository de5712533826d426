//! Coin Space wallet core
//!
//! Seed and identity handling, the token-keyed seed vault, off-thread seed
//! generation, per-network account derivation and wallets, transaction
//! normalization, the dynamic fee cache, and the contracts of the remote
//! collaborators the session manager talks to.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod accounts;
pub mod auth;
pub mod cipher;
pub mod error;
pub mod fees;
pub mod generator;
pub mod keys;
pub mod transaction;
pub mod vault;
pub mod wallet;

pub use accounts::{Account, AccountBranches, AccountDeriver, NetworkAccounts};
pub use auth::{AuthGateway, USER_DELETED};
pub use cipher::{EncryptionAlgorithm, SymmetricKey};
pub use error::{Error, ErrorCategory, Result};
pub use fees::{DynamicFees, FeeCache, FeeSchedule, FeeService, FEE_CACHE_TTL};
pub use generator::{GeneratedSeed, GenerationRequest, GenerationWorker, SeedGenerator};
pub use keys::{generate_entropy, AuthToken, Identity, Mnemonic, Pin, Seed, ENTROPY_LEN};
pub use transaction::{
    normalize, CanonicalTransaction, Direction, RawAccountTx, RawHierarchicalTx, RawTransaction,
    TxEndpoint,
};
pub use vault::{EncryptedSeedRecord, SeedVault};
pub use wallet::{EthereumWallet, HdWallet, HistoryProvider, NetworkWallet, WalletSession};
