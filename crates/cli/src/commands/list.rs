//! Print the stored records.

use std::path::Path;

use client_registry_api::db::snapshot;

/// Print every record in `data_file` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
#[allow(clippy::print_stdout)]
pub async fn print_all(data_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = snapshot::load(data_file).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    tracing::info!(count = records.len(), "Listed records");
    Ok(())
}
