//! Inventory API library.
//!
//! REST API over `PostgreSQL` for stores, the product catalog and the stock
//! each store holds. The binary in `main.rs` only wires configuration,
//! logging and the listener; everything else lives here so it can be tested
//! and reused by the CLI.
//!
//! # Layers
//!
//! - [`validation`] - Query and body parsing into typed parameters
//! - [`routes`] - HTTP handlers and the application router
//! - [`services`] - Domain services mapping data errors to API errors
//! - [`db`] - Repositories with hand-written SQL

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
