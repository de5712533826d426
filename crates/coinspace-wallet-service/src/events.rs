//! Lifecycle signals
//!
//! Fire-and-forget notifications for UI layers. Nothing waits for a
//! subscriber, and events sent while nobody listens are dropped.

use coinspace_core::{AuthToken, Identity, Pin, Seed};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 32;

/// Progress text before the wallet session is initialized
pub const OPENING_SYNCHRONIZING: &str = "Synchronizing Wallet";

/// Wallet lifecycle event
#[derive(Debug, Clone)]
pub enum WalletEvent {
    /// `wallet-opening`: progress message
    Opening(String),
    /// `wallet-auth`: the gateway issued a token for the PIN
    Auth {
        /// Issued token
        token: AuthToken,
        /// PIN it was issued for
        pin: Pin,
    },
    /// `wallet-init`: a seed and identity were assigned
    Init {
        /// Seed
        seed: Seed,
        /// Identity derived from the seed
        identity: Identity,
    },
}

/// Broadcast bus for [`WalletEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WalletEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// New bus without subscribers
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.sender.subscribe()
    }

    /// Emit `event`
    pub fn emit(&self, event: WalletEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Emit a `wallet-opening` progress message
    pub fn opening(&self, message: &str) {
        tracing::debug!("wallet-opening: {}", message);
        self.emit(WalletEvent::Opening(message.to_string()));
    }
}
