//! Coin Space wallet session manager
//!
//! Ties the seed generator, auth gateway, seed vault, stores and network
//! wallets together behind [`WalletManager`], and publishes lifecycle
//! events for UI layers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod completion;
pub mod config;
pub mod events;
pub mod manager;

pub use bootstrap::{build_manager, production_collaborators};
pub use completion::{Completion, CompletionReceivers};
pub use config::{WalletConfig, SITE_URL_ENV};
pub use events::{EventBus, WalletEvent, OPENING_SYNCHRONIZING};
pub use manager::{Collaborators, CreatedWallet, DispatcherPhase, WalletManager};

pub use coinspace_core::{DynamicFees, Error, Result};
