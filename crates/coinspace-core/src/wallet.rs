//! Network wallets and the session wrapper around them

use crate::accounts::{AccountBranches, AccountDeriver, NetworkAccounts};
use crate::keys::Seed;
use crate::transaction::RawTransaction;
use crate::{Error, Result};
use async_trait::async_trait;
use coinspace_params::{Denomination, DenominationSet, Network, NetworkFamily, NetworkName};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const CASHADDR_PAYLOAD_LEN: usize = 42;
const ACCOUNT_ADDRESS_HEX_LEN: usize = 40;

/// Wallet for a hierarchical (UTXO) network
#[derive(Debug, Clone)]
pub struct HdWallet {
    network: Network,
    accounts: AccountBranches,
}

impl HdWallet {
    /// Network parameters
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// External and internal branches
    pub fn accounts(&self) -> &AccountBranches {
        &self.accounts
    }
}

/// Wallet for an account-model network
#[derive(Debug, Clone)]
pub struct EthereumWallet {
    network: Network,
    seed: Seed,
}

impl EthereumWallet {
    /// Network parameters
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Seed acting as the account handle
    pub fn seed(&self) -> &Seed {
        &self.seed
    }
}

/// Network-specific wallet implementation
#[derive(Debug, Clone)]
pub enum NetworkWallet {
    /// bitcoin, bitcoincash, litecoin, testnet
    Hierarchical(HdWallet),
    /// ethereum
    AccountModel(EthereumWallet),
}

impl NetworkWallet {
    /// Build the wallet for `network`, reusing `current` branches when they
    /// belong to the same network
    pub fn new(seed: &Seed, network: Network, current: Option<&AccountBranches>) -> Result<Self> {
        let wallet = match AccountDeriver::derive_or_reuse(seed, &network, current)? {
            NetworkAccounts::Branches(accounts) => {
                NetworkWallet::Hierarchical(HdWallet { network, accounts })
            }
            NetworkAccounts::Seed(seed) => {
                NetworkWallet::AccountModel(EthereumWallet { network, seed })
            }
        };
        Ok(wallet)
    }

    /// Network parameters
    pub fn network(&self) -> &Network {
        match self {
            NetworkWallet::Hierarchical(w) => &w.network,
            NetworkWallet::AccountModel(w) => &w.network,
        }
    }

    /// Network name
    pub fn network_name(&self) -> NetworkName {
        self.network().name
    }

    /// Confirmations required before a transaction is settled
    pub fn min_conf(&self) -> u32 {
        self.network().min_conf()
    }

    /// Derived branches, for hierarchical wallets
    pub fn accounts(&self) -> Option<&AccountBranches> {
        match self {
            NetworkWallet::Hierarchical(w) => Some(&w.accounts),
            NetworkWallet::AccountModel(_) => None,
        }
    }

    /// Check a send request before it is handed to the network backend.
    ///
    /// `spendable` is the balance available to spend, when the caller knows it.
    pub fn validate_send(&self, to: &str, amount: u64, spendable: Option<u64>) -> Result<()> {
        let to = to.trim();
        if to.is_empty() {
            return Err(Error::InvalidSend("recipient address is required".to_string()));
        }

        let valid_address = match self.network().family {
            NetworkFamily::Hierarchical => is_hierarchical_address(to),
            NetworkFamily::AccountModel => is_account_address(to),
        };
        if !valid_address {
            return Err(Error::InvalidSend(format!(
                "invalid {} address",
                self.network().display_name
            )));
        }

        if amount == 0 {
            return Err(Error::InvalidSend("amount must be positive".to_string()));
        }

        if let Some(balance) = spendable {
            if amount > balance {
                return Err(Error::InvalidSend(format!(
                    "insufficient funds: {} requested, {} available",
                    amount, balance
                )));
            }
        }

        Ok(())
    }
}

fn is_hierarchical_address(address: &str) -> bool {
    let payload = address.split_once(':').map_or(address, |(_, p)| p);
    is_base58(payload) || is_bech32(payload) || is_cashaddr(payload)
}

fn is_base58(s: &str) -> bool {
    (25..=35).contains(&s.len()) && s.chars().all(|c| BASE58_ALPHABET.contains(c))
}

fn is_bech32(s: &str) -> bool {
    let mixed_case =
        s.chars().any(|c| c.is_ascii_lowercase()) && s.chars().any(|c| c.is_ascii_uppercase());
    if s.len() > 90 || mixed_case {
        return false;
    }
    let lower = s.to_ascii_lowercase();
    match lower.rsplit_once('1') {
        Some((hrp, data)) => {
            !hrp.is_empty() && data.len() >= 6 && data.chars().all(|c| BECH32_CHARSET.contains(c))
        }
        None => false,
    }
}

fn is_cashaddr(s: &str) -> bool {
    s.len() == CASHADDR_PAYLOAD_LEN
        && (s.starts_with('q') || s.starts_with('p'))
        && s.chars().all(|c| BECH32_CHARSET.contains(c))
}

fn is_account_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(hex) => {
            hex.len() == ACCOUNT_ADDRESS_HEX_LEN && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// The active wallet session
#[derive(Debug, Clone)]
pub struct WalletSession {
    /// Display denomination
    pub denomination: Denomination,
    /// Network wallet
    pub wallet: NetworkWallet,
}

impl WalletSession {
    /// Open a session for `network`, reusing branches held by `previous`
    pub fn open(
        seed: &Seed,
        network: NetworkName,
        previous: Option<&WalletSession>,
    ) -> Result<Self> {
        let current = previous.and_then(|s| s.wallet.accounts());
        let wallet = NetworkWallet::new(seed, network.params(), current)?;
        Ok(Self {
            denomination: DenominationSet::for_network(network).default,
            wallet,
        })
    }

    /// Network name
    pub fn network_name(&self) -> NetworkName {
        self.wallet.network_name()
    }

    /// Switch the display denomination
    pub fn set_denomination(&mut self, symbol: &str) -> Result<()> {
        let network = self.network_name();
        self.denomination = DenominationSet::for_network(network).find(network, symbol)?;
        Ok(())
    }
}

/// Source of raw transaction history for an initialized wallet
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch the wallet's history
    async fn transaction_history(&self, wallet: &NetworkWallet) -> Result<Vec<RawTransaction>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Seed {
        Seed::from_bytes(&[3u8; 64]).unwrap()
    }

    #[test]
    fn test_dispatch_by_family() {
        for name in NetworkName::ALL {
            let session = WalletSession::open(&seed(), name, None).unwrap();
            assert_eq!(session.network_name(), name);
            match (&session.wallet, name.family()) {
                (NetworkWallet::Hierarchical(w), NetworkFamily::Hierarchical) => {
                    assert_eq!(w.accounts().network, name);
                    assert_eq!(session.wallet.min_conf(), 4);
                }
                (NetworkWallet::AccountModel(w), NetworkFamily::AccountModel) => {
                    assert_eq!(w.seed(), &seed());
                    assert_eq!(session.wallet.min_conf(), 12);
                }
                _ => panic!("wrong wallet variant for {}", name),
            }
        }
    }

    #[test]
    fn test_default_denomination() {
        let session = WalletSession::open(&seed(), NetworkName::BitcoinCash, None).unwrap();
        assert_eq!(session.denomination.symbol, "BCH");
        let session = WalletSession::open(&seed(), NetworkName::Testnet, None).unwrap();
        assert_eq!(session.denomination.symbol, "BTC");
    }

    #[test]
    fn test_set_denomination() {
        let mut session = WalletSession::open(&seed(), NetworkName::Ethereum, None).unwrap();
        session.set_denomination("Gwei").unwrap();
        assert_eq!(session.denomination.decimals, 9);
        assert!(matches!(session.set_denomination("BTC"), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_previous_branches_reused() {
        let first = WalletSession::open(&seed(), NetworkName::Bitcoin, None).unwrap();
        let other = Seed::from_bytes(&[4u8; 64]).unwrap();
        let second = WalletSession::open(&other, NetworkName::Bitcoin, Some(&first)).unwrap();
        assert_eq!(first.wallet.accounts(), second.wallet.accounts());
    }

    #[test]
    fn test_validate_send_hierarchical() {
        let session = WalletSession::open(&seed(), NetworkName::Bitcoin, None).unwrap();
        let wallet = &session.wallet;
        assert!(wallet.validate_send("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", 1_000, None).is_ok());
        assert!(wallet
            .validate_send("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", 1_000, Some(5_000))
            .is_ok());
        assert!(wallet
            .validate_send("bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a", 1, None)
            .is_ok());
        assert!(matches!(
            wallet.validate_send("0OIl-not-an-address", 1_000, None),
            Err(Error::InvalidSend(_))
        ));
        assert!(matches!(
            wallet.validate_send("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", 0, None),
            Err(Error::InvalidSend(msg)) if msg.contains("positive")
        ));
        assert!(matches!(
            wallet.validate_send("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", 6_000, Some(5_000)),
            Err(Error::InvalidSend(msg)) if msg.contains("insufficient")
        ));
    }

    #[test]
    fn test_validate_send_account_model() {
        let session = WalletSession::open(&seed(), NetworkName::Ethereum, None).unwrap();
        let wallet = &session.wallet;
        assert!(wallet
            .validate_send("0x52908400098527886E0F7030069857D2E4169EE7", 1, None)
            .is_ok());
        assert!(wallet.validate_send("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", 1, None).is_err());
        assert!(wallet.validate_send("0x1234", 1, None).is_err());
        assert!(wallet.validate_send("", 1, None).is_err());
    }
}
