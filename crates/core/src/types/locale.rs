//! Locales and localized text resolution.
//!
//! The storefront is trilingual (English, Estonian, Russian). Upstream
//! records carry localized fields either as a map of locale codes to
//! display strings or as a single plain string. [`LocalizedText`] models
//! both forms, and [`LocalizedText::resolve`] is the one fallback chain
//! (`locale → en → et → ru → first available`) shared by sorting, display,
//! and anything else that needs a human-readable string.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported storefront locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (the fallback for every other locale).
    #[default]
    En,
    /// Estonian.
    Et,
    /// Russian.
    Ru,
}

impl Locale {
    /// Fallback resolution order applied after the requested locale.
    pub const FALLBACK_CHAIN: [Self; 3] = [Self::En, Self::Et, Self::Ru];

    /// The locale code as used in upstream payloads and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Et => "et",
            Self::Ru => "ru",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown locale code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown locale: {0}")]
pub struct LocaleParseError(pub String);

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "et" => Ok(Self::Et),
            "ru" => Ok(Self::Ru),
            other => Err(LocaleParseError(other.to_string())),
        }
    }
}

/// A localized display string.
///
/// Upstream food items carry a `title` map (`{"en": "...", "et": "..."}`),
/// while descriptions are sometimes delivered as a bare string. Both forms
/// deserialize into this type; a bare string behaves like text available in
/// every locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    /// A single string, not locale-specific.
    Plain(String),
    /// A map from locale code to display string. Keyed by `String` so that
    /// unknown locale codes are kept rather than dropped.
    Map(BTreeMap<String, String>),
}

impl Default for LocalizedText {
    fn default() -> Self {
        Self::Map(BTreeMap::new())
    }
}

impl LocalizedText {
    /// Build a map-form text from `(locale, value)` pairs.
    #[must_use]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Locale, S)>,
        S: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(locale, value)| (locale.as_str().to_string(), value.into()))
                .collect(),
        )
    }

    /// Exact lookup for one locale, no fallback.
    ///
    /// Empty strings count as missing so that `{"ru": ""}` falls through
    /// the chain instead of rendering a blank label.
    #[must_use]
    pub fn get(&self, locale: Locale) -> Option<&str> {
        match self {
            Self::Plain(s) => (!s.is_empty()).then_some(s.as_str()),
            Self::Map(map) => map
                .get(locale.as_str())
                .map(String::as_str)
                .filter(|s| !s.is_empty()),
        }
    }

    /// Resolve a display string through the full fallback chain:
    /// requested locale, then `en → et → ru`, then whatever is available.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> Option<&str> {
        if let Some(text) = self.get(locale) {
            return Some(text);
        }
        for fallback in Locale::FALLBACK_CHAIN {
            if fallback == locale {
                continue;
            }
            if let Some(text) = self.get(fallback) {
                return Some(text);
            }
        }
        match self {
            Self::Plain(_) => None,
            Self::Map(map) => map.values().map(String::as_str).find(|s| !s.is_empty()),
        }
    }

    /// True if no locale has a non-empty value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolve(Locale::En).is_none()
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}

impl From<String> for LocalizedText {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}
