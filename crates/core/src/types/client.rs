//! Client record and its create/update inputs.

use serde::{Deserialize, Serialize};

use super::{ClientId, Email, PostalCode, TaxId};

/// A stored client: person, address and identifiers.
///
/// Serialized with camelCase keys; absent optional fields are omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: ClientId,
    pub name: String,
    pub email: Email,
    pub tax_id: TaxId,
    pub postal_code: PostalCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Validated fields for a new client. The id is assigned on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub email: Email,
    pub tax_id: TaxId,
    pub postal_code: PostalCode,
    pub registry_id: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Validated partial update. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub tax_id: Option<TaxId>,
    pub postal_code: Option<PostalCode>,
    pub registry_id: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl ClientRecord {
    /// Build a record from validated input and an assigned id.
    #[must_use]
    pub fn from_new(id: ClientId, new: NewClient) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            tax_id: new.tax_id,
            postal_code: new.postal_code,
            registry_id: new.registry_id,
            street: new.street,
            neighborhood: new.neighborhood,
            city: new.city,
            state: new.state,
        }
    }

    /// Overwrite every field present in `patch`. The id never changes.
    pub fn merge(&mut self, patch: ClientPatch) {
        fn replace<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        fn replace_optional<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        replace(&mut self.name, patch.name);
        replace(&mut self.email, patch.email);
        replace(&mut self.tax_id, patch.tax_id);
        replace(&mut self.postal_code, patch.postal_code);
        replace_optional(&mut self.registry_id, patch.registry_id);
        replace_optional(&mut self.street, patch.street);
        replace_optional(&mut self.neighborhood, patch.neighborhood);
        replace_optional(&mut self.city, patch.city);
        replace_optional(&mut self.state, patch.state);
    }
}

impl ClientPatch {
    /// Returns `true` when the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.tax_id.is_none()
            && self.postal_code.is_none()
            && self.registry_id.is_none()
            && self.street.is_none()
            && self.neighborhood.is_none()
            && self.city.is_none()
            && self.state.is_none()
    }
}
