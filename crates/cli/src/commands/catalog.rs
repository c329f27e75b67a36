//! Catalog commands: fetch, categories, menu, item.

use supra_catalog::{
    CatalogConfig, CatalogError, CatalogQuery, CatalogStore, SortDirection, SortField,
};
use supra_core::{Locale, SubcategoryId};
use thiserror::Error;
use tracing::debug;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("unknown sort key: {0} (expected name or price)")]
    UnknownSortKey(String),
    #[error("item not found: {0}")]
    ItemNotFound(String),
}

fn parse_sort(sort: Option<&str>) -> Result<Option<SortField>, CommandError> {
    match sort {
        None => Ok(None),
        Some("name") => Ok(Some(SortField::Name)),
        Some("price") => Ok(Some(SortField::Price)),
        Some(other) => Err(CommandError::UnknownSortKey(other.to_string())),
    }
}

/// Fetch the catalog and print a summary.
pub async fn fetch(config: &CatalogConfig, force: bool) -> Result<(), CommandError> {
    debug!(url = %config.catalog_url, "opening catalog store");
    let store = CatalogStore::open(config);
    let payload = if force {
        store.refresh().await?
    } else {
        store.refresh_if_stale(config.max_age).await?
    };
    println!(
        "catalog: {} products, {} beverages (fetched {})",
        payload.products.len(),
        payload.alkohols.len(),
        store
            .last_fetch()
            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339()),
    );
    Ok(())
}

/// Print all categories with their subcategories.
pub async fn categories(config: &CatalogConfig) -> Result<(), CommandError> {
    let store = CatalogStore::open(config);
    store.initialize().await?;

    for category in store.categories() {
        let name = category.name.resolve(Locale::En).unwrap_or("(unnamed)");
        println!("{} [{}]", name, category.id);
        for sub in store.subcategories_of(&category.id) {
            let sub_name = sub.name.resolve(Locale::En).unwrap_or("(unnamed)");
            println!("  {} [{}]", sub_name, sub.id);
        }
    }
    Ok(())
}

/// Query one subcategory and print the page.
#[allow(clippy::too_many_arguments)]
pub async fn menu(
    config: &CatalogConfig,
    subcategory: &str,
    search: Option<&str>,
    sort: Option<&str>,
    desc: bool,
    page: u32,
    per_page: u32,
    locale: Locale,
) -> Result<(), CommandError> {
    let store = CatalogStore::open(config);
    store.initialize().await?;

    let query = CatalogQuery {
        search_term: search.unwrap_or_default().to_string(),
        sort_field: parse_sort(sort)?,
        sort_direction: if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
        page,
        per_page,
        locale,
    };
    let listing = store.items_by_subcategory(Some(&SubcategoryId::new(subcategory)), &query)?;

    for item in &listing.items {
        println!(
            "{:<40} {:>8}  {}",
            item.display_name(locale).unwrap_or("(unnamed)"),
            item.price.to_string(),
            item.slug,
        );
    }
    println!(
        "page {}/{} ({} items)",
        listing.pagination.current_page,
        listing.pagination.total_pages,
        listing.pagination.total_items,
    );
    Ok(())
}

/// Look an item up by slug and print it.
pub async fn item(config: &CatalogConfig, slug: &str, locale: Locale) -> Result<(), CommandError> {
    let store = CatalogStore::open(config);
    store.initialize().await?;

    let item = store
        .item_by_slug(slug)
        .ok_or_else(|| CommandError::ItemNotFound(slug.to_string()))?;
    println!(
        "{} [{}] {}",
        item.display_name(locale).unwrap_or("(unnamed)"),
        item.id,
        item.price,
    );
    if item.is_drink() {
        println!("  beverage{}", if item.is_alcoholic() { " (alcoholic)" } else { "" });
    }
    if let Some(sub) = &item.subcategory {
        println!(
            "  subcategory: {} [{}]",
            sub.name.resolve(locale).unwrap_or("(unnamed)"),
            sub.id,
        );
    }
    Ok(())
}
