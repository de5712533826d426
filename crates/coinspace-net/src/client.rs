//! JSON-over-HTTP client for the Coin Space site API

use crate::{Error, HttpConfig, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

/// Thin wrapper over `reqwest` that speaks the site API's conventions
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: HttpConfig,
    client: reqwest::Client,
}

impl ApiClient {
    /// Build a client for `config`
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Connection(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Client configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// GET `path` with query parameters
    pub async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<R> {
        let request = self.request(Method::GET, path)?.query(query);
        decode(&self.execute(request).await?)
    }

    /// Send `body` as JSON with `method`
    pub async fn send_json<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let request = self.request(method, path)?.json(body);
        decode(&self.execute(request).await?)
    }

    /// Send `body` as JSON with `method` where only the status matters.
    ///
    /// Any success status is accepted, including `204 No Content` and an
    /// empty `200`; the response body is not decoded.
    pub async fn send_json_unit<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<()> {
        let request = self.request(method, path)?.json(body);
        self.execute(request).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        tracing::debug!("{} {}", method, url.path());
        Ok(self.client.request(method, url))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Connection(format!("HTTP error: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Connection(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }
        Ok(body.to_vec())
    }
}

fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    serde_json::from_slice(body).map_err(|e| Error::Decode(format!("JSON decode error: {}", e)))
}

/// Map an unsuccessful response onto [`Error`].
///
/// Client errors carrying an `{"error": ...}` body are rejections by the
/// service; `user_deleted` gets its own variant. Anything else is a transport
/// failure.
pub(crate) fn error_from_response(status: StatusCode, body: &[u8]) -> Error {
    let message = serde_json::from_slice::<ErrorBody>(body).ok().map(|b| b.error);
    match message {
        Some(msg) if msg == coinspace_core::USER_DELETED => Error::UserDeleted,
        Some(msg) if status.is_client_error() => Error::Rejected(msg),
        _ if status.is_client_error() && status != StatusCode::NOT_FOUND => Error::Rejected(
            status
                .canonical_reason()
                .unwrap_or("request rejected")
                .to_string(),
        ),
        _ => Error::Http {
            status: status.as_u16(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_config() {
        let config = HttpConfig::new("http://localhost:8080/api").unwrap();
        let client = ApiClient::new(config).unwrap();
        assert_eq!(client.config().site_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(client.config().timeout, crate::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_decode_requires_json() {
        let value: serde_json::Value = decode(br#"{"ok":true}"#).unwrap();
        assert_eq!(value["ok"], true);
        assert!(matches!(decode::<serde_json::Value>(b""), Err(Error::Decode(_))));
    }

    #[test]
    fn test_user_deleted_body() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, br#"{"error":"user_deleted"}"#);
        assert!(matches!(err, Error::UserDeleted));
    }

    #[test]
    fn test_rejection_body() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, br#"{"message":"Invalid PIN"}"#);
        assert!(matches!(err, Error::Rejected(msg) if msg == "Invalid PIN"));
    }

    #[test]
    fn test_client_error_without_body() {
        let err = error_from_response(StatusCode::FORBIDDEN, b"");
        assert!(matches!(err, Error::Rejected(msg) if msg == "Forbidden"));
    }

    #[test]
    fn test_server_error_is_http() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, b"<html>");
        assert!(matches!(err, Error::Http { status: 502 }));
        let err = error_from_response(StatusCode::NOT_FOUND, b"");
        assert!(matches!(err, Error::Http { status: 404 }));
    }
}
