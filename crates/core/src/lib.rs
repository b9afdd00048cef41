//! Client Registry Core - Domain types and payload validation.
//!
//! This crate provides the types shared by the registry components:
//! - `api` - HTTP service exposing the client records
//! - `cli` - Command-line tools for maintaining the data file
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no file access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, CPFs and CEPs, plus the
//!   client record itself
//! - [`schema`] - Field contracts that turn raw JSON payloads into typed
//!   create/update inputs, accumulating every field error

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod schema;
pub mod types;

pub use schema::{Contract, FieldErrors};
pub use types::*;
