//! Entity extractors: raw payload to normalized collections.
//!
//! Pure and deterministic, no I/O. Records missing an id are dropped;
//! every other gap becomes a `None`/default on the normalized item. The
//! store recomputes all of these together whenever a new payload lands, so
//! readers never see a payload without matching derived collections.

use std::collections::HashMap;

use supra_core::{CategoryId, SubcategoryId};

use crate::item::{CatalogItem, Category, CategoryRef, ItemDetails, Subcategory, SubcategoryRef};
use crate::payload::{RawBeverage, RawCatalogPayload, RawCategoryRef, RawProduct, RawSubcategoryRef};

/// Normalize every food record.
#[must_use]
pub fn products(payload: &RawCatalogPayload) -> Vec<CatalogItem> {
    payload.products.iter().filter_map(product_item).collect()
}

/// Normalize every beverage record.
#[must_use]
pub fn beverages(payload: &RawCatalogPayload) -> Vec<CatalogItem> {
    payload.alkohols.iter().filter_map(beverage_item).collect()
}

/// The unified collection, products first then beverages.
///
/// The order is the display default before any explicit sort.
#[must_use]
pub fn all_items(payload: &RawCatalogPayload) -> Vec<CatalogItem> {
    let mut items = products(payload);
    items.extend(beverages(payload));
    items
}

/// Deduplicated categories, scanned from the embedded refs of both lists.
///
/// Duplicate ids keep their first-seen position with last-write-wins
/// values, matching single-threaded insertion into a keyed map.
#[must_use]
pub fn categories(payload: &RawCatalogPayload) -> Vec<Category> {
    let refs = payload
        .products
        .iter()
        .filter_map(|p| p.category.as_ref())
        .chain(payload.alkohols.iter().filter_map(|b| b.category.as_ref()));

    let mut index: HashMap<CategoryId, usize> = HashMap::new();
    let mut out: Vec<Category> = Vec::new();
    for raw in refs {
        let Some(id) = raw.id.clone() else { continue };
        let category = Category {
            id: id.clone(),
            name: raw.name.clone(),
            slug: raw.slug.clone(),
        };
        if let Some(&position) = index.get(&id) {
            if let Some(slot) = out.get_mut(position) {
                *slot = category;
            }
        } else {
            index.insert(id, out.len());
            out.push(category);
        }
    }
    out
}

/// Deduplicated subcategories, scanned from the embedded refs of both lists.
///
/// `parent_category` comes from whichever item most recently supplied it.
#[must_use]
pub fn subcategories(payload: &RawCatalogPayload) -> Vec<Subcategory> {
    let refs = payload
        .products
        .iter()
        .filter_map(|p| p.subcategory.as_ref())
        .chain(
            payload
                .alkohols
                .iter()
                .filter_map(|b| b.subcategory.as_ref()),
        );

    let mut index: HashMap<SubcategoryId, usize> = HashMap::new();
    let mut out: Vec<Subcategory> = Vec::new();
    for raw in refs {
        let Some(id) = raw.id.clone() else { continue };
        let subcategory = Subcategory {
            id: id.clone(),
            name: raw.name.clone(),
            slug: raw.slug.clone(),
            parent_category: raw.parent_category.clone(),
        };
        if let Some(&position) = index.get(&id) {
            if let Some(slot) = out.get_mut(position) {
                *slot = subcategory;
            }
        } else {
            index.insert(id, out.len());
            out.push(subcategory);
        }
    }
    out
}

// =============================================================================
// Per-record conversion
// =============================================================================

fn category_ref(raw: &RawCategoryRef) -> Option<CategoryRef> {
    Some(CategoryRef {
        id: raw.id.clone()?,
        name: raw.name.clone(),
        slug: raw.slug.clone(),
    })
}

fn subcategory_ref(raw: &RawSubcategoryRef) -> Option<SubcategoryRef> {
    Some(SubcategoryRef {
        id: raw.id.clone()?,
        name: raw.name.clone(),
        slug: raw.slug.clone(),
        parent_category: raw.parent_category.clone(),
    })
}

fn product_item(raw: &RawProduct) -> Option<CatalogItem> {
    let id = raw.id.clone()?;
    let category = raw.category.as_ref().and_then(category_ref);
    let subcategory = raw.subcategory.as_ref().and_then(subcategory_ref);
    Some(CatalogItem {
        id,
        slug: raw.slug.clone(),
        price: raw.price,
        images: raw.images.clone(),
        category_id: category.as_ref().map(|c| c.id.clone()),
        subcategory_id: subcategory.as_ref().map(|s| s.id.clone()),
        category,
        subcategory,
        details: ItemDetails::Food {
            title: raw.title.clone(),
            description: raw.description.clone(),
        },
    })
}

fn beverage_item(raw: &RawBeverage) -> Option<CatalogItem> {
    let id = raw.id.clone()?;
    let category = raw.category.as_ref().and_then(category_ref);
    let subcategory = raw.subcategory.as_ref().and_then(subcategory_ref);
    Some(CatalogItem {
        id,
        slug: raw.slug.clone(),
        price: raw.price,
        images: raw.images.clone(),
        category_id: category.as_ref().map(|c| c.id.clone()),
        subcategory_id: subcategory.as_ref().map(|s| s.id.clone()),
        category,
        subcategory,
        details: ItemDetails::Beverage {
            name: raw.name.clone(),
            volume: raw.volume.clone(),
            degree: raw.degree,
            alcoholic: raw.is_alcoholic,
            region: raw.region.clone(),
            color: raw.color.clone(),
        },
    })
}
