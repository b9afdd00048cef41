//! Clients for external services.
//!
//! # Services
//!
//! - `postal_code` - CEP lookup against a ViaCEP-compatible API

pub mod postal_code;

pub use postal_code::{PostalCodeClient, PostalLookupError};
