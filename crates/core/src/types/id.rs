//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Upstream identifiers
//! are opaque strings, so the wrappers hold a `String` rather than an integer.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_string()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use supra_core::define_id;
/// define_id!(ItemId);
/// define_id!(CategoryId);
///
/// let item_id = ItemId::new("662a1f");
/// let category_id = CategoryId::new("662a1f");
///
/// // These are different types, so this won't compile:
/// // let _: ItemId = category_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying `String`.
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

define_id!(ItemId);
define_id!(CategoryId);
define_id!(SubcategoryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = ItemId::new("662a1f9b");
        assert_eq!(id.to_string(), "662a1f9b");
        assert_eq!(id.as_str(), "662a1f9b");
    }

    #[test]
    fn test_id_equality() {
        assert_eq!(ItemId::new("a"), ItemId::from("a"));
        assert_ne!(ItemId::new("a"), ItemId::new("b"));
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: ItemId = serde_json::from_str("\"abc123\"").expect("valid json string");
        assert_eq!(id, ItemId::new("abc123"));
        let json = serde_json::to_string(&id).expect("serializable");
        assert_eq!(json, "\"abc123\"");
    }
}
