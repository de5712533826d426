//! HTTP transaction history

use crate::ApiClient;
use async_trait::async_trait;
use coinspace_core::{HistoryProvider, NetworkWallet, RawTransaction, Result};

/// History of hierarchical wallets from `GET {site}/history`, queried by the
/// extended public keys of both branches.
///
/// Account-model wallets keep their history inside the network backend, so
/// this provider reports none for them.
pub struct HttpHistoryProvider {
    client: ApiClient,
}

impl HttpHistoryProvider {
    /// Provider over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HistoryProvider for HttpHistoryProvider {
    async fn transaction_history(&self, wallet: &NetworkWallet) -> Result<Vec<RawTransaction>> {
        let Some(accounts) = wallet.accounts() else {
            tracing::debug!("No remote history for {}", wallet.network_name());
            return Ok(Vec::new());
        };

        let external = accounts.external.xpub();
        let internal = accounts.internal.xpub();
        let query = [
            ("network", wallet.network_name().as_str()),
            ("xpub", external.as_str()),
            ("xpub", internal.as_str()),
        ];
        let history: Vec<RawTransaction> = self.client.get("history", &query).await?;
        tracing::debug!("Fetched {} transactions", history.len());
        Ok(history)
    }
}
