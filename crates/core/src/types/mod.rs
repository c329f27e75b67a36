//! Core types for Supra.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod locale;
pub mod price;

pub use id::*;
pub use locale::{Locale, LocaleParseError, LocalizedText};
pub use price::Price;
