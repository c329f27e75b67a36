//! Pure query functions over catalog item collections.
//!
//! Every function here takes items by reference and never mutates its
//! input; [`crate::store::CatalogStore`] binds them to the current cached
//! snapshot. Composition order for a full listing query is fixed:
//! filter → search → sort → paginate.

use serde::{Deserialize, Serialize};
use supra_core::{Locale, SubcategoryId};

use crate::error::CatalogError;
use crate::item::CatalogItem;

/// Sort key for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Sort by the locale-resolved display name.
    Name,
    /// Sort by price.
    Price,
}

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order. Ties keep their original relative order.
    Desc,
}

/// Pagination metadata for a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: usize,
    pub total_pages: u32,
}

/// One page of a listing plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<'a, T: Clone> Paginated<&'a T> {
    /// Clone the page out of a borrowed listing.
    #[must_use]
    pub fn cloned(self) -> Paginated<T> {
        Paginated {
            items: self.items.into_iter().cloned().collect(),
            pagination: self.pagination,
        }
    }
}

/// Keep items belonging to the given subcategory.
///
/// `None` is strict: it yields an empty result, never "everything".
#[must_use]
pub fn filter_by_subcategory<'a>(
    items: impl IntoIterator<Item = &'a CatalogItem>,
    subcategory: Option<&SubcategoryId>,
) -> Vec<&'a CatalogItem> {
    let Some(subcategory) = subcategory else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter(|item| item.subcategory_id.as_ref() == Some(subcategory))
        .collect()
}

/// Case-insensitive substring search over item names.
///
/// Beverages match on `name`; food items match on the title resolved
/// `locale → en`. Search scope is the name only, never the description.
/// An empty term is the identity, not an empty result.
#[must_use]
pub fn search_items<'a>(
    items: impl IntoIterator<Item = &'a CatalogItem>,
    term: &str,
    locale: Locale,
) -> Vec<&'a CatalogItem> {
    if term.is_empty() {
        return items.into_iter().collect();
    }
    let needle = term.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            item.match_name(locale)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Stable sort by name or price.
///
/// Prices compare numerically (missing or unparsable values were already
/// coerced to zero at the boundary). Names compare case-insensitively on
/// the same locale-resolved string that search matches against; items with
/// no resolvable name sort first, like an empty string.
#[must_use]
pub fn sort_items<'a>(
    items: impl IntoIterator<Item = &'a CatalogItem>,
    field: SortField,
    direction: SortDirection,
    locale: Locale,
) -> Vec<&'a CatalogItem> {
    let mut sorted: Vec<&CatalogItem> = items.into_iter().collect();
    match field {
        SortField::Price => sorted.sort_by(|a, b| {
            let ordering = a.price.cmp(&b.price);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }),
        SortField::Name => {
            let key = |item: &CatalogItem| {
                item.match_name(locale)
                    .map(str::to_lowercase)
                    .unwrap_or_default()
            };
            sorted.sort_by(|a, b| {
                let ordering = key(a).cmp(&key(b));
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
    }
    sorted
}

/// Slice one page out of a listing.
///
/// `page` is clamped to `[1, total_pages]` (`1` when there are no pages at
/// all); `total_pages` is `ceil(total_items / per_page)`.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidArgument`] when `per_page` is zero.
pub fn paginate_items<T: Clone>(
    items: &[T],
    page: u32,
    per_page: u32,
) -> Result<Paginated<T>, CatalogError> {
    if per_page == 0 {
        return Err(CatalogError::InvalidArgument(
            "per_page must be positive".to_string(),
        ));
    }

    let total_items = items.len();
    let total_pages = u32::try_from(total_items.div_ceil(per_page as usize)).unwrap_or(u32::MAX);
    let current_page = page.clamp(1, total_pages.max(1));

    let start = (current_page as usize - 1).saturating_mul(per_page as usize);
    let page_items = items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();

    Ok(Paginated {
        items: page_items,
        pagination: Pagination {
            current_page,
            per_page,
            total_items,
            total_pages,
        },
    })
}
