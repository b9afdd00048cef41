//! Client record storage.
//!
//! The registry keeps its records in memory and, when persistence is enabled,
//! mirrors the whole collection to a pretty-printed JSON file after every
//! mutation.
//!
//! # Data file
//!
//! A JSON array of client records in insertion order:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "name": "Ana Beatriz Souza",
//!     "email": "ana.souza@example.com",
//!     "taxId": "529.982.247-25",
//!     "postalCode": "01001000"
//!   }
//! ]
//! ```
//!
//! The file is overwritten in place. A crash during a write can leave it
//! truncated; the next start then falls back to the seed records.

use std::path::PathBuf;

use client_registry_core::ClientId;
use thiserror::Error;

pub mod clients;
pub mod seed;
pub mod snapshot;

pub use clients::ClientRepository;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The data file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be encoded as JSON.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Every id up to `u32::MAX` is taken by the highest stored record.
    #[error("no client id left after {0}")]
    IdsExhausted(ClientId),

    /// Stored data is malformed or breaks the id invariants.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}
