//! Coin Space network definitions

use crate::{consensus::ConfirmationPolicy, Error, Result};
use bip32::Prefix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Litecoin BIP-32 extended private key version (`Ltpv`)
const LITECOIN_XPRV_VERSION: u32 = 0x019d_9cfe;
/// Litecoin BIP-32 extended public key version (`Ltub`)
const LITECOIN_XPUB_VERSION: u32 = 0x019d_a462;

/// Every network a wallet session can be opened for.
///
/// The set is closed: adding a network means adding a variant here, and every
/// `match` over it must then handle the new network explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkName {
    /// Bitcoin mainnet
    Bitcoin,
    /// Bitcoin Cash
    #[serde(rename = "bitcoincash")]
    BitcoinCash,
    /// Litecoin
    Litecoin,
    /// Bitcoin testnet
    Testnet,
    /// Ethereum mainnet
    Ethereum,
}

impl NetworkName {
    /// All supported networks
    pub const ALL: [NetworkName; 5] = [
        NetworkName::Bitcoin,
        NetworkName::BitcoinCash,
        NetworkName::Litecoin,
        NetworkName::Testnet,
        NetworkName::Ethereum,
    ];

    /// Wire name (the string used by remote services and storage)
    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkName::Bitcoin => "bitcoin",
            NetworkName::BitcoinCash => "bitcoincash",
            NetworkName::Litecoin => "litecoin",
            NetworkName::Testnet => "testnet",
            NetworkName::Ethereum => "ethereum",
        }
    }

    /// Network family
    pub const fn family(&self) -> NetworkFamily {
        match self {
            NetworkName::Bitcoin
            | NetworkName::BitcoinCash
            | NetworkName::Litecoin
            | NetworkName::Testnet => NetworkFamily::Hierarchical,
            NetworkName::Ethereum => NetworkFamily::AccountModel,
        }
    }

    /// Full parameter set for this network
    pub fn params(&self) -> Network {
        Network::from_name(*self)
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NetworkName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::UnknownNetwork(s.to_string()))
    }
}

/// How a network addresses funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkFamily {
    /// UTXO networks with BIP-32 account trees (external/internal branches)
    Hierarchical,
    /// Account-model networks; the seed itself is the account handle
    AccountModel,
}

impl NetworkFamily {
    /// Whether fee estimates must be fetched from the remote fee service
    pub const fn uses_dynamic_fees(&self) -> bool {
        matches!(self, NetworkFamily::Hierarchical)
    }
}

/// Network configuration
#[derive(Debug, Clone)]
pub struct Network {
    /// Network name
    pub name: NetworkName,
    /// Network family
    pub family: NetworkFamily,
    /// Human-readable name
    pub display_name: &'static str,
    /// Confirmation policy
    pub confirmations: ConfirmationPolicy,
}

impl Network {
    /// Get Bitcoin parameters
    pub fn bitcoin() -> Self {
        Self {
            name: NetworkName::Bitcoin,
            family: NetworkFamily::Hierarchical,
            display_name: "Bitcoin",
            confirmations: ConfirmationPolicy::hierarchical(),
        }
    }

    /// Get Bitcoin Cash parameters
    pub fn bitcoin_cash() -> Self {
        Self {
            name: NetworkName::BitcoinCash,
            family: NetworkFamily::Hierarchical,
            display_name: "Bitcoin Cash",
            confirmations: ConfirmationPolicy::hierarchical(),
        }
    }

    /// Get Litecoin parameters
    pub fn litecoin() -> Self {
        Self {
            name: NetworkName::Litecoin,
            family: NetworkFamily::Hierarchical,
            display_name: "Litecoin",
            confirmations: ConfirmationPolicy::hierarchical(),
        }
    }

    /// Get Bitcoin testnet parameters
    pub fn testnet() -> Self {
        Self {
            name: NetworkName::Testnet,
            family: NetworkFamily::Hierarchical,
            display_name: "Bitcoin Testnet",
            confirmations: ConfirmationPolicy::hierarchical(),
        }
    }

    /// Get Ethereum parameters
    pub fn ethereum() -> Self {
        Self {
            name: NetworkName::Ethereum,
            family: NetworkFamily::AccountModel,
            display_name: "Ethereum",
            confirmations: ConfirmationPolicy::account_model(),
        }
    }

    /// Get network by name
    pub fn from_name(name: NetworkName) -> Self {
        match name {
            NetworkName::Bitcoin => Self::bitcoin(),
            NetworkName::BitcoinCash => Self::bitcoin_cash(),
            NetworkName::Litecoin => Self::litecoin(),
            NetworkName::Testnet => Self::testnet(),
            NetworkName::Ethereum => Self::ethereum(),
        }
    }

    /// Minimum confirmations before a transaction counts as settled
    pub fn min_conf(&self) -> u32 {
        self.confirmations.min_conf
    }

    /// BIP-32 prefixes `(private, public)` used to serialize account keys.
    ///
    /// Returns `None` for account-model networks, which never derive branches.
    pub fn bip32_prefixes(&self) -> Option<(Prefix, Prefix)> {
        match self.name {
            NetworkName::Bitcoin | NetworkName::BitcoinCash => Some((Prefix::XPRV, Prefix::XPUB)),
            NetworkName::Testnet => Some((Prefix::TPRV, Prefix::TPUB)),
            NetworkName::Litecoin => Some((
                Prefix::from_parts_unchecked("Ltpv", LITECOIN_XPRV_VERSION),
                Prefix::from_parts_unchecked("Ltub", LITECOIN_XPUB_VERSION),
            )),
            NetworkName::Ethereum => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_networks() {
        for name in NetworkName::ALL {
            assert_eq!(name.as_str().parse::<NetworkName>().unwrap(), name);
        }
        assert!(" Bitcoin ".parse::<NetworkName>().is_err());
        assert!("Bitcoin".parse::<NetworkName>().is_err());
        assert!("bitcoin ".parse::<NetworkName>().is_err());
    }

    #[test]
    fn test_parse_unknown_network() {
        let err = "dogecoin".parse::<NetworkName>().unwrap_err();
        assert_eq!(err, Error::UnknownNetwork("dogecoin".to_string()));
    }

    #[test]
    fn test_families_and_min_conf() {
        assert_eq!(Network::bitcoin().min_conf(), 4);
        assert_eq!(Network::litecoin().min_conf(), 4);
        assert_eq!(Network::ethereum().min_conf(), 12);
        assert_eq!(NetworkName::Ethereum.family(), NetworkFamily::AccountModel);
        assert!(!NetworkName::Ethereum.family().uses_dynamic_fees());
        assert!(NetworkName::Testnet.family().uses_dynamic_fees());
    }

    #[test]
    fn test_bip32_prefixes() {
        assert!(Network::ethereum().bip32_prefixes().is_none());
        let (private, public) = Network::testnet().bip32_prefixes().unwrap();
        assert_eq!(private.as_str(), "tprv");
        assert_eq!(public.as_str(), "tpub");
        let (private, _) = Network::litecoin().bip32_prefixes().unwrap();
        assert_eq!(private.as_str(), "Ltpv");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&NetworkName::BitcoinCash).unwrap();
        assert_eq!(json, "\"bitcoincash\"");
        let parsed: NetworkName = serde_json::from_str("\"ethereum\"").unwrap();
        assert_eq!(parsed, NetworkName::Ethereum);
    }
}
