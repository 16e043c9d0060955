//! Core types for the inventory service.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod envelope;
pub mod id;
pub mod page;

pub use category::{ProductCategory, UnknownCategory};
pub use envelope::ApiResponse;
pub use id::*;
pub use page::{Page, PageRequest, SortDirection};
