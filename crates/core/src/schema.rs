//! Field contracts for client payloads.
//!
//! A raw JSON payload is checked against a [`Contract`] before it reaches the
//! repository. Every field is checked independently and every failure is
//! collected into [`FieldErrors`], so callers can report all problems at once.
//!
//! # Example
//!
//! ```
//! use client_registry_core::schema::{validate_create, validate_update};
//! use serde_json::json;
//!
//! let errors = validate_create(&json!({
//!     "name": "Al",
//!     "email": "bad",
//!     "taxId": "000",
//!     "postalCode": "123"
//! }))
//! .unwrap_err();
//! assert_eq!(errors.len(), 4);
//!
//! let patch = validate_update(&json!({ "city": "Recife" })).unwrap();
//! assert_eq!(patch.city.as_deref(), Some("Recife"));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::types::{ClientPatch, Email, NewClient, PostalCode, TaxId};

/// Minimum number of characters in a client name (ignoring surrounding
/// whitespace).
pub const NAME_MIN_LENGTH: usize = 3;

/// Key used for errors that concern the payload as a whole.
pub const BODY_KEY: &str = "body";

/// Which presence rules apply to a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contract {
    /// Creating a record: `name`, `email`, `taxId` and `postalCode` are
    /// required.
    Create,
    /// Partially updating a record: every field is optional.
    Update,
}

impl Contract {
    /// Check `payload` against this contract and return the validated fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its messages.
    pub fn check(self, payload: &Value) -> Result<ClientPatch, FieldErrors> {
        let mut errors = FieldErrors::new();

        let Some(object) = payload.as_object() else {
            errors.push(BODY_KEY, "must be a JSON object");
            return Err(errors);
        };

        for key in object.keys() {
            if Field::from_key(key).is_none() {
                errors.push(key, "is not allowed");
            }
        }

        let mut patch = ClientPatch::default();
        for field in Field::ALL {
            match object.get(field.key()) {
                None if self == Self::Create && field.required_on_create() => {
                    errors.push(field.key(), "is required");
                }
                None => {}
                Some(Value::String(raw)) => {
                    if let Err(message) = field.apply(&mut patch, raw) {
                        errors.push(field.key(), message);
                    }
                }
                Some(_) => errors.push(field.key(), "must be a string"),
            }
        }

        errors.into_result(patch)
    }
}

/// Validate a create payload.
///
/// # Errors
///
/// Returns every failing field with its messages.
pub fn validate_create(payload: &Value) -> Result<NewClient, FieldErrors> {
    Contract::Create.check(payload).and_then(NewClient::try_from)
}

/// Validate a partial update payload.
///
/// # Errors
///
/// Returns every failing field with its messages.
pub fn validate_update(payload: &Value) -> Result<ClientPatch, FieldErrors> {
    Contract::Update.check(payload)
}

impl TryFrom<ClientPatch> for NewClient {
    type Error = FieldErrors;

    fn try_from(patch: ClientPatch) -> Result<Self, Self::Error> {
        match (patch.name, patch.email, patch.tax_id, patch.postal_code) {
            (Some(name), Some(email), Some(tax_id), Some(postal_code)) => Ok(Self {
                name,
                email,
                tax_id,
                postal_code,
                registry_id: patch.registry_id,
                street: patch.street,
                neighborhood: patch.neighborhood,
                city: patch.city,
                state: patch.state,
            }),
            (name, email, tax_id, postal_code) => {
                let mut errors = FieldErrors::new();
                let present = [
                    (Field::Name, name.is_some()),
                    (Field::Email, email.is_some()),
                    (Field::TaxId, tax_id.is_some()),
                    (Field::PostalCode, postal_code.is_some()),
                ];
                for (field, is_present) in present {
                    if !is_present {
                        errors.push(field.key(), "is required");
                    }
                }
                Err(errors)
            }
        }
    }
}

/// Field-level validation failures, keyed by JSON field name.
///
/// Serializes as `{"field": ["message", ...]}` with keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterate over failing fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Fields accepted in a client payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    TaxId,
    PostalCode,
    RegistryId,
    Street,
    Neighborhood,
    City,
    State,
}

impl Field {
    const ALL: [Self; 9] = [
        Self::Name,
        Self::Email,
        Self::TaxId,
        Self::PostalCode,
        Self::RegistryId,
        Self::Street,
        Self::Neighborhood,
        Self::City,
        Self::State,
    ];

    const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::TaxId => "taxId",
            Self::PostalCode => "postalCode",
            Self::RegistryId => "registryId",
            Self::Street => "street",
            Self::Neighborhood => "neighborhood",
            Self::City => "city",
            Self::State => "state",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    const fn required_on_create(self) -> bool {
        matches!(
            self,
            Self::Name | Self::Email | Self::TaxId | Self::PostalCode
        )
    }

    /// Validate `raw` for this field and store it in `patch`.
    fn apply(self, patch: &mut ClientPatch, raw: &str) -> Result<(), String> {
        match self {
            Self::Name => {
                if raw.trim().chars().count() < NAME_MIN_LENGTH {
                    return Err(format!(
                        "must be at least {NAME_MIN_LENGTH} characters long"
                    ));
                }
                patch.name = Some(raw.to_owned());
            }
            Self::Email => patch.email = Some(Email::parse(raw).map_err(|e| e.to_string())?),
            Self::TaxId => patch.tax_id = Some(TaxId::parse(raw).map_err(|e| e.to_string())?),
            Self::PostalCode => {
                patch.postal_code = Some(PostalCode::parse(raw).map_err(|e| e.to_string())?);
            }
            Self::RegistryId => patch.registry_id = Some(optional_text(raw)?),
            Self::Street => patch.street = Some(optional_text(raw)?),
            Self::Neighborhood => patch.neighborhood = Some(optional_text(raw)?),
            Self::City => patch.city = Some(optional_text(raw)?),
            Self::State => patch.state = Some(optional_text(raw)?),
        }
        Ok(())
    }
}

fn optional_text(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(raw.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_create() -> Value {
        json!({
            "name": "Ana Silva",
            "email": "ana@example.com",
            "taxId": "52998224725",
            "postalCode": "01001000"
        })
    }

    #[test]
    fn test_create_accepts_required_fields() {
        let new = validate_create(&valid_create()).unwrap();
        assert_eq!(new.name, "Ana Silva");
        assert_eq!(new.email.as_str(), "ana@example.com");
        assert_eq!(new.tax_id.as_str(), "52998224725");
        assert_eq!(new.postal_code.as_str(), "01001000");
        assert!(new.street.is_none());
    }

    #[test]
    fn test_create_accepts_optional_fields() {
        let mut payload = valid_create();
        payload["registryId"] = json!("12.345.678-9");
        payload["street"] = json!("Praça da Sé");
        payload["neighborhood"] = json!("Sé");
        payload["city"] = json!("São Paulo");
        payload["state"] = json!("SP");

        let new = validate_create(&payload).unwrap();
        assert_eq!(new.registry_id.as_deref(), Some("12.345.678-9"));
        assert_eq!(new.state.as_deref(), Some("SP"));
    }

    #[test]
    fn test_create_reports_every_invalid_field() {
        let errors = validate_create(&json!({
            "name": "Al",
            "email": "bad",
            "taxId": "000",
            "postalCode": "123"
        }))
        .unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get("name").unwrap(),
            ["must be at least 3 characters long"]
        );
        assert_eq!(
            errors.get("email").unwrap(),
            ["email must contain an @ symbol"]
        );
        assert_eq!(
            errors.get("taxId").unwrap(),
            ["CPF must have 11 digits (got 3)"]
        );
        assert_eq!(
            errors.get("postalCode").unwrap(),
            ["postal code must have exactly 8 digits (got 3)"]
        );
    }

    #[test]
    fn test_create_requires_core_fields() {
        let errors = validate_create(&json!({ "city": "Recife" })).unwrap_err();
        for key in ["name", "email", "taxId", "postalCode"] {
            assert_eq!(errors.get(key).unwrap(), ["is required"]);
        }
        assert!(errors.get("city").is_none());
    }

    #[test]
    fn test_rejects_id_and_unknown_keys() {
        let mut payload = valid_create();
        payload["id"] = json!(99);
        payload["nickname"] = json!("Aninha");

        let errors = validate_create(&payload).unwrap_err();
        assert_eq!(errors.get("id").unwrap(), ["is not allowed"]);
        assert_eq!(errors.get("nickname").unwrap(), ["is not allowed"]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_rejects_non_string_values() {
        let errors = validate_update(&json!({
            "name": 42,
            "city": null,
            "street": ["a"]
        }))
        .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), ["must be a string"]);
        assert_eq!(errors.get("city").unwrap(), ["must be a string"]);
        assert_eq!(errors.get("street").unwrap(), ["must be a string"]);
    }

    #[test]
    fn test_rejects_non_object_payload() {
        for payload in [json!([]), json!("text"), json!(null), json!(3)] {
            let errors = validate_create(&payload).unwrap_err();
            assert_eq!(errors.get(BODY_KEY).unwrap(), ["must be a JSON object"]);
        }
    }

    #[test]
    fn test_name_length_ignores_surrounding_whitespace() {
        let errors = validate_update(&json!({ "name": "  Al  " })).unwrap_err();
        assert!(errors.get("name").is_some());

        let patch = validate_update(&json!({ "name": "Zé Ló" })).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Zé Ló"));
    }

    #[test]
    fn test_optional_text_must_not_be_blank() {
        let errors = validate_update(&json!({ "street": "   " })).unwrap_err();
        assert_eq!(errors.get("street").unwrap(), ["must not be empty"]);
    }

    #[test]
    fn test_update_accepts_partial_and_empty_payloads() {
        let patch = validate_update(&json!({ "postalCode": "20040020" })).unwrap();
        assert_eq!(patch.postal_code.unwrap().as_str(), "20040020");
        assert!(patch.name.is_none());

        assert!(validate_update(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_update_validates_present_fields() {
        let errors = validate_update(&json!({ "taxId": "52998224724" })).unwrap_err();
        assert_eq!(
            errors.get("taxId").unwrap(),
            ["CPF check digits do not match"]
        );
    }

    #[test]
    fn test_new_client_from_incomplete_patch() {
        let errors = NewClient::try_from(ClientPatch {
            name: Some("Ana Silva".to_string()),
            ..ClientPatch::default()
        })
        .unwrap_err();
        assert!(errors.get("name").is_none());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_field_errors_serialize_and_display() {
        let mut errors = FieldErrors::new();
        errors.push("name", "too short");
        errors.push("email", "malformed");
        errors.push("email", "too long");

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({ "email": ["malformed", "too long"], "name": ["too short"] })
        );
        assert_eq!(
            errors.to_string(),
            "email: malformed; email: too long; name: too short"
        );
    }
}
