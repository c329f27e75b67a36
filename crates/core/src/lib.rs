//! Supra Core - Shared types library.
//!
//! This crate provides common types used across all Supra components:
//! - `catalog` - Catalog cache, query engine, and cart reconciliation
//! - `cli` - Command-line tools for inspecting the catalog and cart
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and the locale
//!   machinery shared by search, sort, and display

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
