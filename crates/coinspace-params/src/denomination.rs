//! Display denominations per network

use crate::{network::NetworkName, Error, Result};
use serde::Serialize;

/// A unit a wallet balance can be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Denomination {
    /// Ticker-style symbol
    pub symbol: &'static str,
    /// Number of smallest units in one of this denomination, as a power of ten
    pub decimals: u8,
}

/// Denominations available for one network
#[derive(Debug, Clone, Copy)]
pub struct DenominationSet {
    /// Default denomination assigned to new sessions
    pub default: Denomination,
    /// All selectable denominations (default first)
    pub available: &'static [Denomination],
}

const BTC: &[Denomination] = &[
    Denomination { symbol: "BTC", decimals: 8 },
    Denomination { symbol: "mBTC", decimals: 5 },
    Denomination { symbol: "μBTC", decimals: 2 },
];

const BCH: &[Denomination] = &[
    Denomination { symbol: "BCH", decimals: 8 },
    Denomination { symbol: "mBCH", decimals: 5 },
    Denomination { symbol: "μBCH", decimals: 2 },
];

const LTC: &[Denomination] = &[
    Denomination { symbol: "LTC", decimals: 8 },
    Denomination { symbol: "mLTC", decimals: 5 },
    Denomination { symbol: "μLTC", decimals: 2 },
];

const ETH: &[Denomination] = &[
    Denomination { symbol: "ETH", decimals: 18 },
    Denomination { symbol: "Gwei", decimals: 9 },
];

impl DenominationSet {
    /// Get denominations by network name
    pub fn for_network(name: NetworkName) -> Self {
        let available = match name {
            NetworkName::Bitcoin | NetworkName::Testnet => BTC,
            NetworkName::BitcoinCash => BCH,
            NetworkName::Litecoin => LTC,
            NetworkName::Ethereum => ETH,
        };
        Self {
            default: available[0],
            available,
        }
    }

    /// Look up a denomination by symbol
    pub fn find(&self, network: NetworkName, symbol: &str) -> Result<Denomination> {
        self.available
            .iter()
            .copied()
            .find(|d| d.symbol == symbol)
            .ok_or_else(|| Error::UnknownDenomination {
                network,
                denomination: symbol.to_string(),
            })
    }
}
