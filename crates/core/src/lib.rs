//! Inventory Core - Shared types library.
//!
//! This crate provides common types used across all inventory components:
//! - `api` - REST API for stores, products and store stock
//! - `cli` - Command-line tools for migrations and seeding
//! - `integration-tests` - End-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//! Enabling the `postgres` feature adds `sqlx` encode/decode support.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, product categories, pagination and the response envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
