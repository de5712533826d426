//! Wire the production collaborators from a [`WalletConfig`]

use crate::config::WalletConfig;
use crate::manager::{Collaborators, WalletManager};
use coinspace_core::{Error, GenerationWorker, Result};
use coinspace_net::{ApiClient, HttpAuthGateway, HttpConfig, HttpFeeService, HttpHistoryProvider};
use coinspace_storage::{Database, SqliteCredentialStore, SqliteKeyValueStore};
use std::sync::Arc;
use std::time::Duration;

/// Collaborators backed by SQLite, the site API and the generation worker
pub fn production_collaborators(config: &WalletConfig) -> Result<Collaborators> {
    std::fs::create_dir_all(&config.data_dir).map_err(|e| {
        Error::Storage(format!(
            "Failed to create data directory {}: {}",
            config.data_dir.display(),
            e
        ))
    })?;

    let db_path = config.database_path();
    tracing::info!("Opening wallet database at {}", db_path.display());
    let db = Arc::new(Database::open(&db_path)?);

    let http = HttpConfig::new(&config.site_url)?
        .with_timeout(Duration::from_secs(config.request_timeout_secs));
    let client = ApiClient::new(http)?;
    tracing::info!("Using site API at {}", client.config().site_url());

    Ok(Collaborators {
        auth: Arc::new(HttpAuthGateway::new(client.clone())),
        generator: Arc::new(GenerationWorker::spawn()?),
        credentials: Arc::new(SqliteCredentialStore::new(Arc::clone(&db))),
        local_store: Arc::new(SqliteKeyValueStore::new(db)),
        fees: Arc::new(HttpFeeService::new(client.clone())),
        history: Arc::new(HttpHistoryProvider::new(client)),
    })
}

/// Manager over the production collaborators
pub fn build_manager(config: &WalletConfig) -> Result<WalletManager> {
    Ok(WalletManager::new(production_collaborators(config)?))
}
