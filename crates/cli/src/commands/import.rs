//! Replace the data file with records read from YAML.
//!
//! The file holds a list of create payloads using the same camelCase keys as
//! the HTTP API:
//!
//! ```yaml
//! - name: Ana Beatriz Souza
//!   email: ana.souza@example.com
//!   taxId: "529.982.247-25"
//!   postalCode: "01001000"
//! ```

use std::path::Path;

use serde_json::Value;
use tracing::{error, info};

use client_registry_api::db::snapshot;
use client_registry_core::{ClientId, ClientRecord, schema};

use super::CommandError;

/// Validate every entry in `yaml_file` and write them to `data_file` with ids
/// `1..=n`.
///
/// Nothing is written unless every entry passes.
///
/// # Errors
///
/// Returns an error if the YAML cannot be read or parsed, any entry fails
/// validation, or the write fails.
pub async fn from_yaml(data_file: &Path, yaml_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %yaml_file.display(), "Loading clients from file");

    let content = tokio::fs::read_to_string(yaml_file).await?;
    let records = parse_entries(&content)?;
    snapshot::write(data_file, &records).await?;

    info!(path = %data_file.display(), count = records.len(), "Import complete");
    Ok(())
}

/// Parse and validate the YAML list, assigning ids in order.
fn parse_entries(content: &str) -> Result<Vec<ClientRecord>, Box<dyn std::error::Error>> {
    let document: Value = serde_yaml::from_str(content)?;
    let Value::Array(entries) = document else {
        return Err(CommandError::NotAList.into());
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut failed = 0;

    for (index, entry) in entries.iter().enumerate() {
        match schema::validate_create(entry) {
            Ok(new) => {
                let id = ClientId::new(u32::try_from(records.len() + 1)?);
                records.push(ClientRecord::from_new(id, new));
            }
            Err(errors) => {
                failed += 1;
                error!("Entry {}: {errors}", index + 1);
            }
        }
    }

    if failed > 0 {
        return Err(CommandError::InvalidEntries(failed).into());
    }

    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const VALID: &str = r#"
- name: Ana Beatriz Souza
  email: ana.souza@example.com
  taxId: "529.982.247-25"
  postalCode: "01001000"
- name: Bruno Carvalho Lima
  email: bruno.lima@example.com
  taxId: "11144477735"
  postalCode: "20040020"
  city: Rio de Janeiro
"#;

    #[test]
    fn test_parse_entries_assigns_ids_in_order() {
        let records = parse_entries(VALID).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, ClientId::new(1));
        assert_eq!(records[1].id, ClientId::new(2));
        assert_eq!(records[1].city.as_deref(), Some("Rio de Janeiro"));
    }

    #[test]
    fn test_parse_entries_reports_every_failure() {
        let content = r#"
- name: Al
  email: nope
  taxId: "11111111111"
  postalCode: "0100"
- name: Ana Beatriz Souza
  email: ana.souza@example.com
  taxId: "529.982.247-25"
  postalCode: "01001000"
- name: Bruno
"#;
        let err = parse_entries(content).unwrap_err();
        assert_eq!(err.to_string(), "2 import entries failed validation");
    }

    #[test]
    fn test_parse_entries_requires_list() {
        let err = parse_entries("name: Ana\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "import file must hold a list of client payloads"
        );
    }

    #[tokio::test]
    async fn test_import_replaces_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("clients.yaml");
        let data = dir.path().join("clients.json");
        tokio::fs::write(&yaml, VALID).await.unwrap();
        tokio::fs::write(&data, "[]\n").await.unwrap();

        from_yaml(&data, &yaml).await.unwrap();

        let stored = snapshot::load(&data).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "Ana Beatriz Souza");
    }
}
