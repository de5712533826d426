//! Auth gateway contract
//!
//! The remote service validates PINs and issues the short-lived token that
//! keys the seed vault.

use crate::keys::{AuthToken, Identity, Pin};
use crate::Result;
use async_trait::async_trait;

/// Wire message the gateway uses for a removed identity
pub const USER_DELETED: &str = "user_deleted";

/// Remote authentication service
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Whether `id` is already registered
    async fn exists(&self, id: &Identity) -> Result<bool>;

    /// Register `id` with `pin`; returns a fresh token
    async fn register(&self, id: &Identity, pin: &Pin) -> Result<AuthToken>;

    /// Validate `pin` for `id`.
    ///
    /// Fails with [`crate::Error::UserDeleted`] when the identity was removed,
    /// and with [`crate::Error::Auth`] when the PIN is rejected.
    async fn login(&self, id: &Identity, pin: &Pin) -> Result<AuthToken>;

    /// Remove the account for `id`
    async fn remove(&self, id: &Identity) -> Result<()>;

    /// Attach a display name to `id`
    async fn set_username(&self, id: &Identity, username: &str) -> Result<()>;
}
