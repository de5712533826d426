//! Account derivation
//!
//! Hierarchical networks get one hardened root account (`m/0'`) with an
//! external (`m/0'/0`) and an internal (`m/0'/1`) branch. Account-model
//! networks use the seed itself as the account handle.

use crate::keys::Seed;
use crate::{Error, Result};
use bip32::{ChildNumber, Prefix, XPrv};
use coinspace_params::{Network, NetworkName};
use std::fmt;
use zeroize::Zeroizing;

/// Root account path
pub const ROOT_ACCOUNT_PATH: &str = "m/0'";
/// External (receive) branch path
pub const EXTERNAL_BRANCH_PATH: &str = "m/0'/0";
/// Internal (change) branch path
pub const INTERNAL_BRANCH_PATH: &str = "m/0'/1";

const ROOT_ACCOUNT_INDEX: u32 = 0;
const EXTERNAL_BRANCH_INDEX: u32 = 0;
const INTERNAL_BRANCH_INDEX: u32 = 1;

/// One derivation branch
#[derive(Clone)]
pub struct Account {
    key: XPrv,
    path: &'static str,
    private_prefix: Prefix,
    public_prefix: Prefix,
}

impl Account {
    /// Derivation path of this branch
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Serialized extended private key
    pub fn xprv(&self) -> Zeroizing<String> {
        self.key.to_string(self.private_prefix)
    }

    /// Serialized extended public key
    pub fn xpub(&self) -> String {
        self.key.public_key().to_string(self.public_prefix)
    }

    /// Compressed public key of the branch node
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.key.public_key().to_bytes()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("path", &self.path)
            .field("xpub", &self.xpub())
            .finish()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && *self.xprv() == *other.xprv()
    }
}

impl Eq for Account {}

/// External and internal branches for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBranches {
    /// Network the branches were serialized for
    pub network: NetworkName,
    /// Receive branch
    pub external: Account,
    /// Change branch
    pub internal: Account,
}

/// What a network wallet is constructed from
#[derive(Debug, Clone)]
pub enum NetworkAccounts {
    /// Hierarchical networks: derived branches
    Branches(AccountBranches),
    /// Account-model networks: the seed is the account handle
    Seed(Seed),
}

/// Derives per-network accounts from a seed
pub struct AccountDeriver;

impl AccountDeriver {
    /// Derive the accounts `network` needs from `seed`
    pub fn derive(seed: &Seed, network: &Network) -> Result<NetworkAccounts> {
        match network.bip32_prefixes() {
            Some((private_prefix, public_prefix)) => {
                let branches =
                    Self::derive_branches(seed, network.name, private_prefix, public_prefix)?;
                Ok(NetworkAccounts::Branches(branches))
            }
            None => Ok(NetworkAccounts::Seed(seed.clone())),
        }
    }

    /// Like [`AccountDeriver::derive`], but hands back `current` unchanged
    /// when it already holds branches for the same network
    pub fn derive_or_reuse(
        seed: &Seed,
        network: &Network,
        current: Option<&AccountBranches>,
    ) -> Result<NetworkAccounts> {
        if let Some(branches) = current.filter(|b| b.network == network.name) {
            tracing::debug!("Reusing derived accounts for {}", network.name);
            return Ok(NetworkAccounts::Branches(branches.clone()));
        }
        Self::derive(seed, network)
    }

    fn derive_branches(
        seed: &Seed,
        network: NetworkName,
        private_prefix: Prefix,
        public_prefix: Prefix,
    ) -> Result<AccountBranches> {
        let master = XPrv::new(seed.as_bytes()).map_err(key_error)?;
        let root = master
            .derive_child(ChildNumber::new(ROOT_ACCOUNT_INDEX, true).map_err(key_error)?)
            .map_err(key_error)?;

        let branch = |index: u32, path: &'static str| -> Result<Account> {
            let key = root
                .derive_child(ChildNumber::new(index, false).map_err(key_error)?)
                .map_err(key_error)?;
            Ok(Account {
                key,
                path,
                private_prefix,
                public_prefix,
            })
        };

        tracing::debug!("Derived branches below {} for {}", ROOT_ACCOUNT_PATH, network);
        Ok(AccountBranches {
            network,
            external: branch(EXTERNAL_BRANCH_INDEX, EXTERNAL_BRANCH_PATH)?,
            internal: branch(INTERNAL_BRANCH_INDEX, INTERNAL_BRANCH_PATH)?,
        })
    }
}

fn key_error(e: bip32::Error) -> Error {
    Error::KeyDerivation(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP-32 test vector 1
    fn vector_seed() -> Seed {
        Seed::from_hex("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    fn branches(accounts: NetworkAccounts) -> AccountBranches {
        match accounts {
            NetworkAccounts::Branches(b) => b,
            NetworkAccounts::Seed(_) => panic!("expected branches"),
        }
    }

    fn derive_vector(network: Network) -> AccountBranches {
        branches(AccountDeriver::derive(&vector_seed(), &network).unwrap())
    }

    #[test]
    fn test_internal_branch_matches_bip32_vector() {
        let accounts = derive_vector(Network::bitcoin());
        assert_eq!(accounts.internal.path(), INTERNAL_BRANCH_PATH);
        assert_eq!(
            accounts.internal.xprv().as_str(),
            concat!(
                "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9",
                "BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs"
            )
        );
        assert_eq!(
            accounts.internal.xpub(),
            concat!(
                "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikH",
                "jJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
            )
        );
    }

    #[test]
    fn test_branches_sit_below_root_account() {
        let accounts = derive_vector(Network::bitcoin());
        let external = accounts.external.path().strip_prefix(ROOT_ACCOUNT_PATH);
        let internal = accounts.internal.path().strip_prefix(ROOT_ACCOUNT_PATH);
        assert_eq!(external, Some("/0"));
        assert_eq!(internal, Some("/1"));
    }

    #[test]
    fn test_branches_differ() {
        let accounts = derive_vector(Network::bitcoin());
        assert_ne!(accounts.external, accounts.internal);
        assert_ne!(accounts.external.public_key_bytes(), accounts.internal.public_key_bytes());
    }

    #[test]
    fn test_network_prefixes() {
        let testnet = derive_vector(Network::testnet());
        assert!(testnet.external.xprv().starts_with("tprv"));
        assert!(testnet.external.xpub().starts_with("tpub"));

        let litecoin = derive_vector(Network::litecoin());
        assert!(litecoin.external.xprv().starts_with("Ltpv"));
        assert!(litecoin.external.xpub().starts_with("Ltub"));
    }

    #[test]
    fn test_account_model_passes_seed_through() {
        match AccountDeriver::derive(&vector_seed(), &Network::ethereum()).unwrap() {
            NetworkAccounts::Seed(seed) => assert_eq!(seed, vector_seed()),
            NetworkAccounts::Branches(_) => panic!("ethereum must not derive branches"),
        }
    }

    #[test]
    fn test_reuse_only_for_same_network() {
        let current = derive_vector(Network::bitcoin());
        let other_seed = Seed::from_bytes(&[5u8; 64]).unwrap();

        let bitcoin = Network::bitcoin();
        let reused = branches(
            AccountDeriver::derive_or_reuse(&other_seed, &bitcoin, Some(&current)).unwrap(),
        );
        assert_eq!(reused, current);

        let testnet = Network::testnet();
        let fresh = branches(
            AccountDeriver::derive_or_reuse(&vector_seed(), &testnet, Some(&current)).unwrap(),
        );
        assert_eq!(fresh.network, NetworkName::Testnet);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_vector(Network::bitcoin());
        let b = derive_vector(Network::bitcoin());
        assert_eq!(a, b);
    }
}
