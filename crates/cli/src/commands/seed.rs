//! Reset the data file to the seed records.

use std::path::Path;

use tracing::info;

use client_registry_api::db::{seed, snapshot};

use super::CommandError;

/// Write the seed records to `data_file`.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is false, or the write
/// fails.
pub async fn write_seed(data_file: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !force && tokio::fs::try_exists(data_file).await? {
        return Err(CommandError::DataFileExists(data_file.to_path_buf()).into());
    }

    let records = seed::seed_clients()?;
    snapshot::write(data_file, &records).await?;

    info!(path = %data_file.display(), count = records.len(), "Seed records written");
    Ok(())
}
