//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::RegistryConfig;
use crate::db::{ClientRepository, RepositoryError, seed};
use crate::services::{PostalCodeClient, PostalLookupError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("client repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("postal code client: {0}")]
    PostalLookup(#[from] PostalLookupError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The repository sits behind a
/// read-write lock: lookups share it, mutations (including their snapshot
/// write) hold it exclusively, so writes are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RegistryConfig,
    clients: RwLock<ClientRepository>,
    postal_codes: PostalCodeClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads (or seeds) the client data before returning, so the state is
    /// ready to serve once this resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed data cannot be written or the lookup
    /// client cannot be built.
    pub async fn new(config: RegistryConfig) -> Result<Self, StateError> {
        let repository = if config.storage.persist {
            ClientRepository::init(&config.storage.data_file).await?
        } else {
            tracing::info!("Persistence disabled, serving seed records from memory");
            ClientRepository::in_memory(seed::seed_clients()?)
        };
        let postal_codes = PostalCodeClient::new(&config.postal_lookup)?;

        tracing::info!(
            clients = repository.len(),
            data_file = ?repository.data_file(),
            "Client repository ready"
        );

        Ok(Self::from_parts(config, repository, postal_codes))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        config: RegistryConfig,
        repository: ClientRepository,
        postal_codes: PostalCodeClient,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                clients: RwLock::new(repository),
                postal_codes,
            }),
        }
    }

    /// Get a reference to the registry configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Get the client repository lock.
    #[must_use]
    pub fn clients(&self) -> &RwLock<ClientRepository> {
        &self.inner.clients
    }

    /// Get a reference to the postal code lookup client.
    #[must_use]
    pub fn postal_codes(&self) -> &PostalCodeClient {
        &self.inner.postal_codes
    }
}
