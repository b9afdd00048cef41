//! Ad-hoc CPF check.

use tracing::info;

use client_registry_core::TaxId;

use super::CommandError;

/// Check `value` against the CPF checksum rule.
///
/// # Errors
///
/// Returns `CommandError::InvalidCpf` when the value fails the rule.
pub fn cpf(value: &str) -> Result<(), CommandError> {
    match TaxId::parse(value) {
        Ok(tax_id) => {
            info!(cpf = %tax_id.formatted(), "CPF is valid");
            Ok(())
        }
        Err(e) => Err(CommandError::InvalidCpf {
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
