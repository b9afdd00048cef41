//! Core types for the client registry.
//!
//! This module provides type-safe wrappers for the identifiers carried by a
//! client record.

pub mod address;
pub mod client;
pub mod email;
pub mod id;
pub mod postal_code;
pub mod tax_id;

pub use address::Address;
pub use client::{ClientPatch, ClientRecord, NewClient};
pub use email::{Email, EmailError};
pub use id::{ClientId, ClientIdError};
pub use postal_code::{PostalCode, PostalCodeError};
pub use tax_id::{TaxId, TaxIdError};
