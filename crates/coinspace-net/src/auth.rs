//! HTTP auth gateway

use crate::ApiClient;
use async_trait::async_trait;
use coinspace_core::{AuthGateway, AuthToken, Identity, Pin, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct Credentials<'a> {
    wallet_id: &'a str,
    pin: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct ExistResponse {
    exists: bool,
}

#[derive(Serialize)]
struct AccountRequest<'a> {
    wallet_id: &'a str,
}

#[derive(Serialize)]
struct UsernameRequest<'a> {
    wallet_id: &'a str,
    username: &'a str,
}

/// Auth gateway backed by the site API
pub struct HttpAuthGateway {
    client: ApiClient,
}

impl HttpAuthGateway {
    /// Gateway over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn post_credentials(&self, path: &str, id: &Identity, pin: &Pin) -> Result<AuthToken> {
        let body = Credentials {
            wallet_id: id.as_str(),
            pin: pin.expose(),
        };
        let response: TokenResponse = self.client.send_json(Method::POST, path, &body).await?;
        Ok(AuthToken::new(response.token))
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn exists(&self, id: &Identity) -> Result<bool> {
        let query = [("wallet_id", id.as_str())];
        let response: ExistResponse = self.client.get("exist", &query).await?;
        Ok(response.exists)
    }

    async fn register(&self, id: &Identity, pin: &Pin) -> Result<AuthToken> {
        tracing::info!("Registering wallet {}", id);
        self.post_credentials("register", id, pin).await
    }

    async fn login(&self, id: &Identity, pin: &Pin) -> Result<AuthToken> {
        tracing::info!("Logging in wallet {}", id);
        self.post_credentials("login", id, pin).await
    }

    async fn remove(&self, id: &Identity) -> Result<()> {
        let body = AccountRequest { wallet_id: id.as_str() };
        self.client.send_json_unit(Method::DELETE, "account", &body).await?;
        tracing::info!("Removed wallet {}", id);
        Ok(())
    }

    async fn set_username(&self, id: &Identity, username: &str) -> Result<()> {
        let body = UsernameRequest {
            wallet_id: id.as_str(),
            username,
        };
        self.client.send_json_unit(Method::PUT, "username", &body).await?;
        Ok(())
    }
}
