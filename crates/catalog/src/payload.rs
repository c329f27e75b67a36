//! Raw upstream catalog payload.
//!
//! The upstream endpoint returns one combined JSON document:
//!
//! ```json
//! {
//!   "success": true,
//!   "products": [ { "_id": "...", "title": {"en": "..."}, ... } ],
//!   "alkohols": [ { "_id": "...", "name": "...", "isAlcoholic": true, ... } ]
//! }
//! ```
//!
//! The payload is treated as the single source of truth for one fetch
//! generation and is never mutated. Every record field is optional or
//! defaulted so that partial upstream data deserializes instead of failing;
//! the extractors in [`crate::extract`] handle the gaps.

use serde::{Deserialize, Deserializer, Serialize};
use supra_core::{CategoryId, ItemId, LocalizedText, Price, SubcategoryId};

/// The combined catalog response from the upstream source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCatalogPayload {
    /// Server-side success flag; `false` means the fetch failed even on 200.
    #[serde(default)]
    pub success: bool,
    /// Food items.
    #[serde(default)]
    pub products: Vec<RawProduct>,
    /// Beverages.
    #[serde(default)]
    pub alkohols: Vec<RawBeverage>,
    /// Server-provided failure message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RawCatalogPayload {
    /// Total record count across both lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len() + self.alkohols.len()
    }

    /// True when both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.alkohols.is_empty()
    }
}

/// A raw food record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    /// Upstream id; records without one are dropped during extraction.
    #[serde(rename = "_id", default)]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "null_default")]
    pub title: LocalizedText,
    #[serde(default, deserialize_with = "null_default")]
    pub description: LocalizedText,
    #[serde(default)]
    pub price: Price,
    #[serde(default, deserialize_with = "string_or_list")]
    pub images: Vec<String>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: Option<RawCategoryRef>,
    #[serde(default)]
    pub subcategory: Option<RawSubcategoryRef>,
}

/// A raw beverage record. Flat `name` instead of a localized `title`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBeverage {
    #[serde(rename = "_id", default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default, deserialize_with = "string_or_list")]
    pub images: Vec<String>,
    #[serde(default)]
    pub slug: String,
    /// Bottle/serving volume, e.g. `"0.75L"`; numbers are accepted too.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub volume: Option<String>,
    /// Alcohol percentage.
    #[serde(default)]
    pub degree: Option<f64>,
    #[serde(default)]
    pub is_alcoholic: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub region: LocalizedText,
    #[serde(default, deserialize_with = "null_default")]
    pub color: LocalizedText,
    #[serde(default)]
    pub category: Option<RawCategoryRef>,
    #[serde(default)]
    pub subcategory: Option<RawSubcategoryRef>,
}

/// Category reference embedded in an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategoryRef {
    #[serde(rename = "_id", default)]
    pub id: Option<CategoryId>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: LocalizedText,
    #[serde(default)]
    pub slug: String,
}

/// Subcategory reference embedded in an item; also records its owning
/// category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubcategoryRef {
    #[serde(rename = "_id", default)]
    pub id: Option<SubcategoryId>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: LocalizedText,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub parent_category: Option<CategoryId>,
}

/// Treat JSON `null` as the field's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `"img.jpg"` or `["a.jpg", "b.jpg"]`.
fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Repr::One(s)) => vec![s],
        Some(Repr::Many(list)) => list,
    })
}

/// Accept a string or a bare number, normalized to a string.
fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Repr>::deserialize(deserializer)?.map(|repr| match repr {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use supra_core::Locale;

    #[test]
    fn test_deserialize_minimal_payload() {
        let payload: RawCatalogPayload =
            serde_json::from_str(r#"{"success": true}"#).expect("minimal payload");
        assert!(payload.success);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_deserialize_full_product() {
        let json = r#"{
            "_id": "p1",
            "title": {"en": "Khachapuri", "ru": "Хачапури"},
            "description": "Cheese bread",
            "price": 10,
            "images": "khachapuri.jpg",
            "slug": "khachapuri",
            "category": {"_id": "c1", "name": {"en": "Mains"}, "slug": "mains"},
            "subcategory": {"_id": "s1", "name": {"en": "Baked"}, "slug": "baked", "parentCategory": "c1"}
        }"#;
        let product: RawProduct = serde_json::from_str(json).expect("product record");
        assert_eq!(product.id, Some(ItemId::new("p1")));
        assert_eq!(product.title.get(Locale::Ru), Some("Хачапури"));
        assert_eq!(product.images, vec!["khachapuri.jpg".to_string()]);
        let sub = product.subcategory.expect("subcategory present");
        assert_eq!(sub.parent_category, Some(CategoryId::new("c1")));
    }

    #[test]
    fn test_deserialize_beverage_with_numeric_volume() {
        let json = r#"{
            "_id": "a1",
            "name": "Saperavi",
            "price": "20",
            "images": ["saperavi.jpg"],
            "slug": "saperavi",
            "volume": 0.75,
            "degree": 13.5,
            "isAlcoholic": true
        }"#;
        let beverage: RawBeverage = serde_json::from_str(json).expect("beverage record");
        assert_eq!(beverage.volume.as_deref(), Some("0.75"));
        assert!(beverage.is_alcoholic);
        assert_eq!(beverage.price.to_string(), "20.00");
    }

    #[test]
    fn test_null_localized_fields_default() {
        let json = r#"{"_id": "p1", "title": null, "description": null, "images": null}"#;
        let product: RawProduct = serde_json::from_str(json).expect("nulls tolerated");
        assert!(product.title.is_empty());
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let product: RawProduct = serde_json::from_str("{}").expect("empty record");
        assert_eq!(product.id, None);
        assert!(product.images.is_empty());
        assert!(product.category.is_none());
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        let json = r#"{
            "success": true,
            "products": [{"_id": "p1", "slug": "khinkali", "price": 8}],
            "alkohols": [{"_id": "a1", "name": "Saperavi", "price": 20, "isAlcoholic": true}]
        }"#;
        let payload: RawCatalogPayload = serde_json::from_str(json).expect("payload");
        let encoded = serde_json::to_string(&payload).expect("serializable");
        let decoded: RawCatalogPayload = serde_json::from_str(&encoded).expect("round trip");
        assert_eq!(decoded.len(), 2);
        assert!(decoded.alkohols.first().is_some_and(|b| b.is_alcoholic));
    }
}
