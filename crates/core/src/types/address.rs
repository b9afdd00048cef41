//! Address resolved from a postal code lookup.

use serde::{Deserialize, Serialize};

/// Street-level address returned by the postal code lookup service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// The postal code as reported by the lookup service.
    pub postal_code: String,
    /// Two-letter state abbreviation (UF).
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}
