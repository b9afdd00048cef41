//! Whole-file JSON snapshots of the client collection.

use std::collections::HashSet;
use std::path::Path;

use client_registry_core::ClientRecord;

use super::RepositoryError;

/// Read and decode a snapshot, checking the id invariants.
///
/// # Errors
///
/// Returns `RepositoryError::Read` if the file cannot be read and
/// `RepositoryError::DataCorruption` if it does not decode or holds zero or
/// duplicate ids.
pub async fn load(path: &Path) -> Result<Vec<ClientRecord>, RepositoryError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RepositoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let records: Vec<ClientRecord> = serde_json::from_slice(&bytes).map_err(|e| {
        RepositoryError::DataCorruption(format!("{} is not a client list: {e}", path.display()))
    })?;

    check_ids(&records)?;
    Ok(records)
}

/// Overwrite `path` with the pretty-printed collection.
///
/// Parent directories are created when missing.
///
/// # Errors
///
/// Returns `RepositoryError::Encode` if encoding fails and
/// `RepositoryError::Write` if the file or its directory cannot be written.
pub async fn write(path: &Path, records: &[ClientRecord]) -> Result<(), RepositoryError> {
    let bytes = encode(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| RepositoryError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| RepositoryError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), records = records.len(), "snapshot written");
    Ok(())
}

/// Encode the collection as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns `RepositoryError::Encode` if serialization fails.
pub fn encode(records: &[ClientRecord]) -> Result<Vec<u8>, RepositoryError> {
    let mut bytes = serde_json::to_vec_pretty(records).map_err(RepositoryError::Encode)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Ids must be positive and unique.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` naming the first offending id.
pub fn check_ids(records: &[ClientRecord]) -> Result<(), RepositoryError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.id.as_u32() == 0 {
            return Err(RepositoryError::DataCorruption(
                "client id 0 is not allowed".to_string(),
            ));
        }
        if !seen.insert(record.id) {
            return Err(RepositoryError::DataCorruption(format!(
                "duplicate client id {}",
                record.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::db::seed::seed_clients;

    #[tokio::test]
    async fn test_write_then_load_preserves_order_and_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("clients.json");
        let mut records = seed_clients().unwrap();
        records.reverse();

        write(&path, &records).await.unwrap();
        let loaded = load(&path).await.unwrap();

        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn test_written_file_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clients.json");

        write(&path, &seed_clients().unwrap()).await.unwrap();
        let text = tokio::fs::read_to_string(&path).await.unwrap();

        assert!(text.starts_with("[\n  {\n    \"id\": 1,"));
        assert!(text.ends_with("]\n"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clients.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let err = load(&path).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_check_ids_rejects_duplicates_and_zero() {
        let mut records = seed_clients().unwrap();
        assert!(check_ids(&records).is_ok());
        assert!(check_ids(&[]).is_ok());

        records[1].id = records[0].id;
        assert!(matches!(
            check_ids(&records),
            Err(RepositoryError::DataCorruption(msg)) if msg.contains("duplicate")
        ));

        records[1].id = client_registry_core::ClientId::new(0);
        assert!(check_ids(&records).is_err());
    }
}
