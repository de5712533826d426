//! Wallet session manager
//!
//! Owns the in-memory seed, identity and token, drives the create, set-pin
//! and open flows against the auth gateway and the seed vault, and dispatches
//! the wallet session for the selected network.

use crate::completion::Completion;
use crate::events::{EventBus, WalletEvent, OPENING_SYNCHRONIZING};
use coinspace_core::{
    generate_entropy, normalize, AuthGateway, AuthToken, CanonicalTransaction, DynamicFees, Error,
    FeeCache, FeeService, GenerationRequest, HistoryProvider, Identity, Mnemonic, NetworkWallet,
    Pin, RawTransaction, Result, Seed, SeedGenerator, SeedVault, WalletSession,
};
use coinspace_params::NetworkName;
use coinspace_storage::{CredentialStore, KeyValueStore, PinCache};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Dispatcher lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherPhase {
    /// No wallet session was built for the current seed
    Uninitialized,
    /// A wallet session is being built
    Initializing,
    /// A wallet session is live
    Ready,
}

/// Result of [`WalletManager::create_wallet`]
#[derive(Debug, Clone)]
pub struct CreatedWallet {
    /// Mnemonic for the new seed; not persisted
    pub mnemonic: Mnemonic,
    /// Whether the identity is already registered with the auth gateway
    pub user_exists: bool,
}

/// External services the manager depends on
#[derive(Clone)]
pub struct Collaborators {
    /// Remote PIN validation
    pub auth: Arc<dyn AuthGateway>,
    /// Off-thread seed derivation
    pub generator: Arc<dyn SeedGenerator>,
    /// Encrypted seed persistence
    pub credentials: Arc<dyn CredentialStore>,
    /// Local key/value storage for quick unlock
    pub local_store: Arc<dyn KeyValueStore>,
    /// Remote fee estimates
    pub fees: Arc<dyn FeeService>,
    /// Transaction history for an initialized wallet
    pub history: Arc<dyn HistoryProvider>,
}

enum SessionState {
    Closed,
    Open {
        seed: Seed,
        identity: Identity,
        token: Option<AuthToken>,
    },
}

struct State {
    session: SessionState,
    phase: DispatcherPhase,
    wallet: Option<WalletSession>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            session: SessionState::Closed,
            phase: DispatcherPhase::Uninitialized,
            wallet: None,
        }
    }
}

/// Client-side wallet session manager
pub struct WalletManager {
    auth: Arc<dyn AuthGateway>,
    generator: Arc<dyn SeedGenerator>,
    credentials: Arc<dyn CredentialStore>,
    fees: Arc<dyn FeeService>,
    history: Arc<dyn HistoryProvider>,
    pin_cache: PinCache,
    fee_cache: FeeCache,
    events: EventBus,
    state: RwLock<State>,
}

fn parse_network(name: &str) -> Result<NetworkName> {
    Ok(name.parse::<NetworkName>()?)
}

impl WalletManager {
    /// Create a manager with a closed session
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            auth: collaborators.auth,
            generator: collaborators.generator,
            credentials: collaborators.credentials,
            fees: collaborators.fees,
            history: collaborators.history,
            pin_cache: PinCache::new(collaborators.local_store),
            fee_cache: FeeCache::new(),
            events: EventBus::new(),
            state: RwLock::new(State::default()),
        }
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    /// Current dispatcher phase
    pub fn phase(&self) -> DispatcherPhase {
        self.state.read().phase
    }

    // ------------------------------------------------------------------
    // Create / set PIN / open
    // ------------------------------------------------------------------

    /// Generate a new seed, or recover one from `passphrase`, and check
    /// whether its identity is already registered.
    ///
    /// Nothing is persisted until [`WalletManager::set_pin`].
    pub async fn create_wallet(&self, passphrase: Option<&str>) -> Result<CreatedWallet> {
        let request = match passphrase {
            Some(phrase) => GenerationRequest::passphrase(phrase),
            None => GenerationRequest::Entropy(generate_entropy()),
        };
        self.events.opening(request.progress_message());

        let generated = self.generator.generate(request).await?;
        let identity = generated.seed.identity();
        self.assign(generated.seed.clone(), identity.clone(), None);
        self.events.emit(WalletEvent::Init {
            seed: generated.seed,
            identity: identity.clone(),
        });

        let user_exists = self.auth.exists(&identity).await?;
        tracing::info!("Prepared wallet {} (registered: {})", identity, user_exists);

        Ok(CreatedWallet {
            mnemonic: generated.mnemonic,
            user_exists,
        })
    }

    /// Register the open identity with `pin`, persist the encrypted seed and
    /// initialize a session for `network`.
    ///
    /// On any failure before initialization nothing is persisted, and the
    /// error goes to every callback in `completion` as well as the caller.
    pub async fn set_pin(&self, pin: &str, network: &str, completion: Completion) -> Result<()> {
        match self.register_and_store(pin, network).await {
            Ok(network) => self.initialize_network(network, completion).await,
            Err(e) => {
                tracing::warn!("Set PIN failed: {}", e);
                Err(completion.fail(e))
            }
        }
    }

    async fn register_and_store(&self, pin: &str, network: &str) -> Result<NetworkName> {
        let network = parse_network(network)?;
        let (seed, identity) = self.open_seed()?;
        let pin = Pin::new(pin);

        let token = self.auth.register(&identity, &pin).await?;
        self.events.emit(WalletEvent::Auth {
            token: token.clone(),
            pin: pin.clone(),
        });
        self.cache_pin(&pin);

        let record = SeedVault::seal_record(&seed, &token)?;
        self.credentials.save_encrypted_seed(&record)?;
        self.set_token(token);
        tracing::info!("Stored encrypted seed for {}", identity);

        self.events.opening(OPENING_SYNCHRONIZING);
        Ok(network)
    }

    /// Unlock the stored seed with `pin` and initialize a session for
    /// `network`.
    ///
    /// A `user_deleted` login failure removes the stored credentials before
    /// the error is reported.
    pub async fn open_wallet_with_pin(
        &self,
        pin: &str,
        network: &str,
        completion: Completion,
    ) -> Result<()> {
        match self.unlock_stored(pin, network).await {
            Ok(network) => self.initialize_network(network, completion).await,
            Err(e) => {
                tracing::warn!("Open with PIN failed: {}", e);
                Err(completion.fail(e))
            }
        }
    }

    async fn unlock_stored(&self, pin: &str, network: &str) -> Result<NetworkName> {
        let network = parse_network(network)?;
        let record = self.credentials.get_credentials()?.ok_or(Error::NoCredentials)?;
        let pin = Pin::new(pin);

        let token = match self.auth.login(&record.id, &pin).await {
            Ok(token) => token,
            Err(Error::UserDeleted) => {
                tracing::warn!(
                    "Identity {} was removed remotely, deleting local credentials",
                    record.id
                );
                if let Err(e) = self.credentials.delete_credentials() {
                    tracing::error!("Failed to delete credentials: {}", e);
                }
                return Err(Error::UserDeleted);
            }
            Err(e) => return Err(e),
        };

        let seed = SeedVault::reveal(&record.seed, &token)?;
        self.cache_pin(&pin);

        let identity = seed.identity();
        if identity != record.id {
            tracing::warn!("Stored identity {} does not match the decrypted seed", record.id);
        }
        self.assign(seed.clone(), identity.clone(), Some(token.clone()));

        self.events.emit(WalletEvent::Init { seed, identity });
        self.events.emit(WalletEvent::Auth { token, pin });
        self.events.opening(OPENING_SYNCHRONIZING);
        Ok(network)
    }

    // ------------------------------------------------------------------
    // Session dispatch
    // ------------------------------------------------------------------

    /// Build the wallet session for `network` from the open seed.
    ///
    /// Unknown names fail with [`Error::Configuration`] before any state
    /// changes.
    pub async fn initialize(&self, network: &str, completion: Completion) -> Result<()> {
        match parse_network(network) {
            Ok(network) => self.initialize_network(network, completion).await,
            Err(e) => Err(completion.fail(e)),
        }
    }

    /// Re-initialize the current network, replacing the live session
    pub async fn sync(&self, completion: Completion) -> Result<()> {
        let current = self.state.read().wallet.as_ref().map(|w| w.network_name());
        match current {
            Some(network) => self.initialize_network(network, completion).await,
            None => Err(completion.fail(Error::NoSession)),
        }
    }

    async fn initialize_network(
        &self,
        network: NetworkName,
        mut completion: Completion,
    ) -> Result<()> {
        let prepared = {
            let mut state = self.state.write();
            let seed = match &state.session {
                SessionState::Open { seed, .. } => Some(seed.clone()),
                SessionState::Closed => None,
            };
            seed.map(|seed| {
                let previous_phase = state.phase;
                state.phase = DispatcherPhase::Initializing;
                (seed, state.wallet.clone(), previous_phase)
            })
        };
        let Some((seed, previous, previous_phase)) = prepared else {
            return Err(completion.fail(Error::NoSession));
        };

        tracing::debug!("Initializing {} wallet", network);
        let session = match WalletSession::open(&seed, network, previous.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                self.state.write().phase = previous_phase;
                tracing::error!("Failed to initialize {} wallet: {}", network, e);
                return Err(completion.fail(e));
            }
        };

        {
            let mut state = self.state.write();
            state.wallet = Some(session.clone());
            state.phase = DispatcherPhase::Ready;
        }
        tracing::info!("Wallet ready on {}", network);
        completion.done(Ok(()));

        match self.load_history(&session.wallet).await {
            Ok(transactions) => {
                tracing::debug!("Synced {} transactions on {}", transactions.len(), network);
                completion.tx_done(Ok(transactions));
            }
            Err(e) => {
                tracing::warn!("History sync on {} failed: {}", network, e);
                completion.tx_done(Err(e));
            }
        }
        Ok(())
    }

    async fn load_history(&self, wallet: &NetworkWallet) -> Result<Vec<CanonicalTransaction>> {
        let network = wallet.network_name();
        let family = network.family();
        let raw = self.history.transaction_history(wallet).await?;

        Ok(raw
            .iter()
            .filter(|tx| {
                let matches = tx.family() == family;
                if !matches {
                    tracing::warn!("Skipping {:?} history record on {}", tx.family(), network);
                }
                matches
            })
            .filter_map(|tx| match normalize(tx, network) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    tracing::warn!("Skipping history record on {}: {}", network, e);
                    None
                }
            })
            .collect())
    }

    /// Normalize one raw record for the live session's network
    pub fn parse_history_tx(&self, raw: &RawTransaction) -> Result<CanonicalTransaction> {
        let network = self.current_network()?;
        if raw.family() != network.family() {
            return Err(Error::Other(format!(
                "{:?} transaction cannot be parsed on {}",
                raw.family(),
                network
            )));
        }
        normalize(raw, network)
    }

    /// Check a send request against the live wallet
    pub fn validate_send(&self, to: &str, amount: u64, spendable: Option<u64>) -> Result<()> {
        let state = self.state.read();
        let session = state.wallet.as_ref().ok_or(Error::NoSession)?;
        session.wallet.validate_send(to, amount, spendable)
    }

    /// Switch the live session's display denomination
    pub fn set_denomination(&self, symbol: &str) -> Result<()> {
        let mut state = self.state.write();
        let session = state.wallet.as_mut().ok_or(Error::NoSession)?;
        session.set_denomination(symbol)
    }

    /// Snapshot of the live wallet session
    pub fn get_wallet(&self) -> Option<WalletSession> {
        self.state.read().wallet.clone()
    }

    /// Identity of the open seed
    pub fn get_id(&self) -> Option<Identity> {
        match &self.state.read().session {
            SessionState::Open { identity, .. } => Some(identity.clone()),
            SessionState::Closed => None,
        }
    }

    /// Whether an auth token was issued for the open session
    pub fn has_token(&self) -> bool {
        matches!(
            &self.state.read().session,
            SessionState::Open { token: Some(_), .. }
        )
    }

    // ------------------------------------------------------------------
    // Account management
    // ------------------------------------------------------------------

    /// Whether encrypted credentials are stored on this device
    pub fn wallet_exists(&self) -> Result<bool> {
        Ok(self.credentials.get_credentials()?.is_some())
    }

    /// Remove the open identity from the auth gateway
    pub async fn remove_account(&self) -> Result<()> {
        let (_, identity) = self.open_seed()?;
        self.auth.remove(&identity).await?;
        tracing::info!("Removed account {}", identity);
        Ok(())
    }

    /// Attach a display name to the open identity
    pub async fn set_username(&self, username: &str) -> Result<()> {
        let (_, identity) = self.open_seed()?;
        self.auth.set_username(&identity, username).await
    }

    /// Delete stored credentials and close the session
    pub fn reset(&self) -> Result<()> {
        self.credentials.delete_credentials()?;
        self.close();
        tracing::info!("Wallet reset");
        Ok(())
    }

    /// Discard the in-memory seed, identity, token and wallet session
    pub fn close(&self) {
        *self.state.write() = State::default();
        self.fee_cache.clear();
    }

    // ------------------------------------------------------------------
    // Quick unlock
    // ------------------------------------------------------------------

    /// Allow the PIN to be cached locally
    pub fn set_available_touch_id(&self) {
        self.pin_cache.enable_quick_unlock();
    }

    /// Cached PIN, if quick unlock stored one
    pub fn get_pin(&self) -> Result<Option<Pin>> {
        Ok(self.pin_cache.load()?)
    }

    /// Cache `pin`; returns `false` while quick unlock is disabled
    pub fn set_local_pin(&self, pin: &str) -> Result<bool> {
        Ok(self.pin_cache.save(&Pin::new(pin))?)
    }

    /// Remove the cached PIN
    pub fn reset_pin(&self) -> Result<()> {
        Ok(self.pin_cache.clear()?)
    }

    fn cache_pin(&self, pin: &Pin) {
        if let Err(e) = self.pin_cache.save(pin) {
            tracing::warn!("Failed to cache PIN: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Fees
    // ------------------------------------------------------------------

    /// Fee levels for the live session's network, cached for ten minutes
    pub async fn get_dynamic_fees(&self) -> Result<DynamicFees> {
        let network = self.current_network()?;
        Ok(self.fee_cache.get_or_fetch(network, self.fees.as_ref()).await)
    }

    // ------------------------------------------------------------------
    // State helpers
    // ------------------------------------------------------------------

    fn assign(&self, seed: Seed, identity: Identity, token: Option<AuthToken>) {
        let mut state = self.state.write();
        state.session = SessionState::Open { seed, identity, token };
        state.wallet = None;
        state.phase = DispatcherPhase::Uninitialized;
    }

    fn set_token(&self, new_token: AuthToken) {
        if let SessionState::Open { token, .. } = &mut self.state.write().session {
            *token = Some(new_token);
        }
    }

    fn open_seed(&self) -> Result<(Seed, Identity)> {
        match &self.state.read().session {
            SessionState::Open { seed, identity, .. } => Ok((seed.clone(), identity.clone())),
            SessionState::Closed => Err(Error::NoSession),
        }
    }

    fn current_network(&self) -> Result<NetworkName> {
        self.state
            .read()
            .wallet
            .as_ref()
            .map(|w| w.network_name())
            .ok_or(Error::NoSession)
    }
}
