//! Dynamic fee estimates
//!
//! Hierarchical networks price transactions from a remote fee schedule. The
//! schedule is cached in a single process-wide slot for [`FEE_CACHE_TTL`].
//! Account-model networks never query it.

use crate::Result;
use async_trait::async_trait;
use coinspace_params::NetworkName;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

/// Lifetime of a cached fee schedule
pub const FEE_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Named fee levels mapped to a rate in the network's smallest unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeSchedule(BTreeMap<String, u64>);

impl FeeSchedule {
    /// Build from `(level, rate)` pairs
    pub fn from_levels<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self(levels.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Rate for `level`
    pub fn get(&self, level: &str) -> Option<u64> {
        self.0.get(level).copied()
    }

    /// Iterate levels in name order
    pub fn levels(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// No levels present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of a dynamic fee lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicFees {
    /// The network prices transactions itself; nothing to fetch
    NotRequired,
    /// Current schedule
    Available(FeeSchedule),
    /// The fee service could not be reached; callers fall back to defaults
    Unavailable,
}

impl DynamicFees {
    /// Schedule, if one is available
    pub fn schedule(&self) -> Option<&FeeSchedule> {
        match self {
            DynamicFees::Available(fees) => Some(fees),
            DynamicFees::NotRequired | DynamicFees::Unavailable => None,
        }
    }
}

/// Remote fee estimate source
#[async_trait]
pub trait FeeService: Send + Sync {
    /// Fetch the current schedule for `network`
    async fn fetch_fees(&self, network: NetworkName) -> Result<FeeSchedule>;
}

#[derive(Debug, Clone)]
struct FeeCacheEntry {
    network: NetworkName,
    fees: FeeSchedule,
    expires_at: Instant,
}

/// Single-slot, network-scoped fee cache
#[derive(Debug)]
pub struct FeeCache {
    slot: Mutex<Option<FeeCacheEntry>>,
    ttl: Duration,
}

impl Default for FeeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FeeCache {
    /// Cache with the standard TTL
    pub fn new() -> Self {
        Self::with_ttl(FEE_CACHE_TTL)
    }

    /// Cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Live entry for `network`
    pub fn get(&self, network: NetworkName) -> Option<FeeSchedule> {
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|entry| entry.network == network && Instant::now() < entry.expires_at)
            .map(|entry| entry.fees.clone())
    }

    /// Store `fees` for `network`, replacing whatever the slot held
    pub fn put(&self, network: NetworkName, fees: FeeSchedule) {
        *self.slot.lock() = Some(FeeCacheEntry {
            network,
            fees,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Drop the cached entry
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Cached schedule for `network`, fetching through `service` on a miss.
    ///
    /// Transport failures are logged and reported as
    /// [`DynamicFees::Unavailable`]; nothing is cached for them.
    pub async fn get_or_fetch(
        &self,
        network: NetworkName,
        service: &dyn FeeService,
    ) -> DynamicFees {
        if !network.family().uses_dynamic_fees() {
            return DynamicFees::NotRequired;
        }

        if let Some(fees) = self.get(network) {
            tracing::debug!("Fee cache hit for {}", network);
            return DynamicFees::Available(fees);
        }

        match service.fetch_fees(network).await {
            Ok(fees) => {
                tracing::debug!("Fetched {} fee levels for {}", fees.levels().count(), network);
                self.put(network, fees.clone());
                DynamicFees::Available(fees)
            }
            Err(e) => {
                tracing::warn!("Fee query for {} failed: {}", network, e);
                DynamicFees::Unavailable
            }
        }
    }
}
