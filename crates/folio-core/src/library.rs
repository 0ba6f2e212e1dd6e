use std::sync::{Arc, Mutex, RwLock};

use tracing::info;

use crate::access::{AccessGate, MembershipProvider, StaticMembership};
use crate::config::AppConfig;
use crate::error::Result;
use crate::index::IndexSnapshot;
use crate::models::RebuildStats;
use crate::store::LocalContentStore;

mod access_service;
mod admin_service;
mod browse_service;
mod index_service;
mod search_service;

/// The content index service: owns the store, the in-memory snapshot and the
/// access gate. Cheap to clone; clones share the same snapshot.
#[derive(Clone)]
pub struct Folio {
    store: LocalContentStore,
    snapshot: Arc<RwLock<IndexSnapshot>>,
    mutation_gate: Arc<Mutex<()>>,
    gate: AccessGate,
    config: AppConfig,
}

impl std::fmt::Debug for Folio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Folio")
            .field("root", &self.config.root)
            .finish_non_exhaustive()
    }
}

impl Folio {
    /// Builds the service with the membership provider the config calls for:
    /// the Bot API when a token is set, otherwise a provider that knows no
    /// members (locked folders open only to the operator).
    pub fn new(config: AppConfig) -> Result<Self> {
        let provider = default_provider(&config)?;
        Ok(Self::with_membership(config, provider))
    }

    #[must_use]
    pub fn with_membership(config: AppConfig, provider: Arc<dyn MembershipProvider>) -> Self {
        Self {
            store: LocalContentStore::new(config.root.clone()),
            snapshot: Arc::new(RwLock::new(IndexSnapshot::new())),
            mutation_gate: Arc::new(Mutex::new(())),
            gate: AccessGate::new(provider, config.operator_id),
            config,
        }
    }

    /// Creates the store root if needed and performs the startup build.
    pub fn initialize(&self) -> Result<RebuildStats> {
        self.store.initialize()?;
        self.rebuild(None)
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &LocalContentStore {
        &self.store
    }
}

#[cfg(feature = "telegram")]
fn default_provider(config: &AppConfig) -> Result<Arc<dyn MembershipProvider>> {
    use crate::access::TelegramMembership;

    match config.bot_token.as_deref() {
        Some(token) => Ok(Arc::new(TelegramMembership::new(
            &config.bot_api_base,
            token,
        )?)),
        None => Ok(offline_provider()),
    }
}

#[cfg(not(feature = "telegram"))]
fn default_provider(_config: &AppConfig) -> Result<Arc<dyn MembershipProvider>> {
    Ok(offline_provider())
}

fn offline_provider() -> Arc<dyn MembershipProvider> {
    info!(target: "folio::access", "no bot token configured; locked folders open to the operator only");
    Arc::new(StaticMembership::new())
}
