//! Client repository.
//!
//! Owns the ordered collection of client records. Mutations are staged on a
//! copy of the collection, written as the new snapshot, and only then swapped
//! in, so a failed write leaves the in-memory state untouched.

use std::path::{Path, PathBuf};

use client_registry_core::{ClientId, ClientPatch, ClientRecord, NewClient};

use super::{RepositoryError, seed, snapshot};

/// Repository for client records.
#[derive(Debug)]
pub struct ClientRepository {
    clients: Vec<ClientRecord>,
    data_file: Option<PathBuf>,
}

impl ClientRepository {
    /// Create a repository that never touches the filesystem.
    #[must_use]
    pub const fn in_memory(clients: Vec<ClientRecord>) -> Self {
        Self {
            clients,
            data_file: None,
        }
    }

    /// Load the repository from `data_file`, mirroring every later mutation
    /// to it.
    ///
    /// A missing, unreadable or corrupt file is replaced by the seed records,
    /// which are written out immediately.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the seed records cannot be written.
    pub async fn init(data_file: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let data_file = data_file.into();

        let clients = match snapshot::load(&data_file).await {
            Ok(clients) => {
                tracing::info!(
                    path = %data_file.display(),
                    clients = clients.len(),
                    "Client data loaded"
                );
                clients
            }
            Err(err) => {
                tracing::warn!(
                    path = %data_file.display(),
                    error = %err,
                    "Client data unavailable, starting from seed records"
                );
                let clients = seed::seed_clients()?;
                snapshot::write(&data_file, &clients).await?;
                clients
            }
        };

        Ok(Self {
            clients,
            data_file: Some(data_file),
        })
    }

    /// The file mutations are written to, if persistence is enabled.
    #[must_use]
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    /// All clients in insertion order.
    #[must_use]
    pub fn all(&self) -> &[ClientRecord] {
        &self.clients
    }

    /// Number of stored clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns `true` if no clients are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Get a client by id.
    #[must_use]
    pub fn get_by_id(&self, id: ClientId) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Append a new client with the next free id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if no id is left or the snapshot cannot be
    /// written.
    pub async fn create(&mut self, new: NewClient) -> Result<ClientRecord, RepositoryError> {
        let record = ClientRecord::from_new(self.next_id()?, new);

        let mut staged = self.clients.clone();
        staged.push(record.clone());
        self.commit(staged).await?;

        tracing::info!(client_id = %record.id, "Client created");
        Ok(record)
    }

    /// Merge `patch` into the client with `id`.
    ///
    /// Returns `Ok(None)` without writing anything if no client has `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the snapshot cannot be written.
    pub async fn update(
        &mut self,
        id: ClientId,
        patch: ClientPatch,
    ) -> Result<Option<ClientRecord>, RepositoryError> {
        let Some(position) = self.position(id) else {
            return Ok(None);
        };

        let mut staged = self.clients.clone();
        let Some(record) = staged.get_mut(position) else {
            return Ok(None);
        };
        record.merge(patch);
        let updated = record.clone();
        self.commit(staged).await?;

        tracing::info!(client_id = %id, "Client updated");
        Ok(Some(updated))
    }

    /// Remove the client with `id`.
    ///
    /// Returns `Ok(None)` without writing anything if no client has `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the snapshot cannot be written.
    pub async fn delete(&mut self, id: ClientId) -> Result<Option<ClientRecord>, RepositoryError> {
        let Some(position) = self.position(id) else {
            return Ok(None);
        };

        let mut staged = self.clients.clone();
        let removed = staged.remove(position);
        self.commit(staged).await?;

        tracing::info!(client_id = %id, "Client deleted");
        Ok(Some(removed))
    }

    /// `max(existing ids, 0) + 1`.
    fn next_id(&self) -> Result<ClientId, RepositoryError> {
        match self.clients.iter().map(|c| c.id).max() {
            None => Ok(ClientId::FIRST),
            Some(max) => max.next().ok_or(RepositoryError::IdsExhausted(max)),
        }
    }

    fn position(&self, id: ClientId) -> Option<usize> {
        self.clients.iter().position(|c| c.id == id)
    }

    /// Persist `staged` and make it the current collection.
    async fn commit(&mut self, staged: Vec<ClientRecord>) -> Result<(), RepositoryError> {
        if let Some(path) = &self.data_file {
            snapshot::write(path, &staged).await?;
        }
        self.clients = staged;
        Ok(())
    }
}
