//! HTTP fee service

use crate::ApiClient;
use async_trait::async_trait;
use coinspace_core::{FeeSchedule, FeeService, Result};
use coinspace_params::NetworkName;

/// Fee schedules from `GET {site}/fees?network=<name>`
pub struct HttpFeeService {
    client: ApiClient,
}

impl HttpFeeService {
    /// Service over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeeService for HttpFeeService {
    async fn fetch_fees(&self, network: NetworkName) -> Result<FeeSchedule> {
        let fees = self.client.get("fees", &[("network", network.as_str())]).await?;
        Ok(fees)
    }
}
