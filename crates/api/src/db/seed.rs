//! Example records used when no usable data file exists.

use client_registry_core::ClientRecord;

use super::RepositoryError;

const SEED_JSON: &str = include_str!("seed.json");

/// The three example clients written on first start.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the embedded seed data does
/// not decode.
pub fn seed_clients() -> Result<Vec<ClientRecord>, RepositoryError> {
    serde_json::from_str(SEED_JSON)
        .map_err(|e| RepositoryError::DataCorruption(format!("embedded seed data: {e}")))
}
