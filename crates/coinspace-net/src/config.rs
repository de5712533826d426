//! HTTP client configuration

use crate::{Error, Result};
use reqwest::Url;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every Coin Space service client
#[derive(Debug, Clone)]
pub struct HttpConfig {
    site_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl HttpConfig {
    /// Config rooted at `site_url`; a trailing slash is added when missing so
    /// endpoints resolve below the root rather than beside it
    pub fn new(site_url: &str) -> Result<Self> {
        let mut root = site_url.trim().to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        let site_url =
            Url::parse(&root).map_err(|e| Error::InvalidUrl(format!("{}: {}", site_url, e)))?;
        if !matches!(site_url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "unsupported scheme {}",
                site_url.scheme()
            )));
        }

        Ok(Self {
            site_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("coinspace-wallet/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Service root
    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Absolute URL of `path` below the service root
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.site_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", path, e)))
    }
}
