//! Confirmation policy per network family

use crate::network::NetworkName;

/// Minimum confirmations for hierarchical-account (UTXO) networks
pub const HIERARCHICAL_MIN_CONF: u32 = 4;

/// Minimum confirmations for account-model networks
pub const ACCOUNT_MODEL_MIN_CONF: u32 = 12;

/// Confirmation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Confirmations required before a transaction is treated as settled
    pub min_conf: u32,
}

impl ConfirmationPolicy {
    /// Policy for hierarchical-account networks
    pub const fn hierarchical() -> Self {
        Self {
            min_conf: HIERARCHICAL_MIN_CONF,
        }
    }

    /// Policy for account-model networks (probabilistic finality needs more depth)
    pub const fn account_model() -> Self {
        Self {
            min_conf: ACCOUNT_MODEL_MIN_CONF,
        }
    }

    /// Get policy by network name
    pub fn for_network(name: NetworkName) -> Self {
        name.params().confirmations
    }

    /// Whether `confirmations` satisfies this policy
    pub const fn is_confirmed(&self, confirmations: u32) -> bool {
        confirmations >= self.min_conf
    }
}
