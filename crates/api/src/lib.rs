//! Client Registry API library.
//!
//! This crate provides the HTTP service as a library, allowing it to be
//! tested and embedded.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
