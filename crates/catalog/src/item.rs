//! Normalized catalog domain types.
//!
//! Upstream delivers two record shapes (food with a localized `title`,
//! beverages with a flat `name`). [`CatalogItem`] is the single tagged shape
//! the rest of the system works with: common commerce fields plus an
//! [`ItemDetails`] variant to pattern-match on instead of null-checking.

use serde::{Deserialize, Serialize};
use supra_core::{CategoryId, ItemId, Locale, LocalizedText, Price, SubcategoryId};

/// Category reference carried on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: LocalizedText,
    pub slug: String,
}

/// Subcategory reference carried on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryRef {
    pub id: SubcategoryId,
    pub name: LocalizedText,
    pub slug: String,
    /// The owning category's id, when the upstream record supplied one.
    pub parent_category: Option<CategoryId>,
}

/// Variant-specific item fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    /// A food item with localized title/description.
    Food {
        title: LocalizedText,
        description: LocalizedText,
    },
    /// A beverage with a flat display name.
    Beverage {
        name: String,
        volume: Option<String>,
        /// Alcohol percentage.
        degree: Option<f64>,
        alcoholic: bool,
        region: LocalizedText,
        color: LocalizedText,
    },
}

/// A normalized catalog item, food or beverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub slug: String,
    pub price: Price,
    pub images: Vec<String>,
    pub category: Option<CategoryRef>,
    pub subcategory: Option<SubcategoryRef>,
    /// Flattened from `category` for fast filtering.
    pub category_id: Option<CategoryId>,
    /// Flattened from `subcategory` for fast filtering.
    pub subcategory_id: Option<SubcategoryId>,
    pub details: ItemDetails,
}

impl CatalogItem {
    /// True for beverages.
    #[must_use]
    pub const fn is_drink(&self) -> bool {
        matches!(self.details, ItemDetails::Beverage { .. })
    }

    /// True for beverages flagged as alcoholic.
    #[must_use]
    pub const fn is_alcoholic(&self) -> bool {
        matches!(
            self.details,
            ItemDetails::Beverage {
                alcoholic: true,
                ..
            }
        )
    }

    /// Display name resolved through the full locale fallback chain.
    ///
    /// Beverage names are not localized and are returned as-is.
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> Option<&str> {
        match &self.details {
            ItemDetails::Food { title, .. } => title.resolve(locale),
            ItemDetails::Beverage { name, .. } => (!name.is_empty()).then_some(name.as_str()),
        }
    }

    /// The name text that search and sort operate on.
    ///
    /// Food titles fall back from the requested locale to English only; a
    /// title available solely in some third locale does not take part in
    /// matching under an unrelated locale.
    #[must_use]
    pub fn match_name(&self, locale: Locale) -> Option<&str> {
        match &self.details {
            ItemDetails::Food { title, .. } => title.get(locale).or_else(|| title.get(Locale::En)),
            ItemDetails::Beverage { name, .. } => (!name.is_empty()).then_some(name.as_str()),
        }
    }
}

/// A deduplicated category projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: LocalizedText,
    pub slug: String,
}

/// A deduplicated subcategory projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: LocalizedText,
    pub slug: String,
    pub parent_category: Option<CategoryId>,
}
