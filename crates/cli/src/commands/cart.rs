//! Cart commands: show, add, remove, clear, checkout.

use supra_catalog::{AddOutcome, Cart, CatalogConfig, CatalogStore};
use supra_core::{ItemId, Locale};

use super::catalog::CommandError;

fn open_cart(config: &CatalogConfig) -> Cart {
    Cart::open(CatalogStore::open(config).snapshots())
}

/// Print the cart lines and totals.
pub fn show(config: &CatalogConfig) -> Result<(), CommandError> {
    let cart = open_cart(config);
    if cart.lines().is_empty() {
        println!("cart is empty");
        return Ok(());
    }
    for line in cart.lines() {
        println!(
            "{:<40} x{:<3} {:>8}  (was {})",
            line.item.display_name(Locale::En).unwrap_or("(unnamed)"),
            line.quantity,
            line.price.to_string(),
            line.original_price.unwrap_or(line.price),
        );
    }
    println!(
        "{} items, subtotal {}",
        cart.total_quantity(),
        cart.subtotal()
    );
    Ok(())
}

/// Add an item to the cart by slug.
pub async fn add(
    config: &CatalogConfig,
    slug: &str,
    qty: u32,
    confirm_age: bool,
) -> Result<(), CommandError> {
    let store = CatalogStore::open(config);
    store.initialize().await?;
    let item = store
        .item_by_slug(slug)
        .ok_or_else(|| CommandError::ItemNotFound(slug.to_string()))?;

    let mut cart = Cart::open(store.snapshots());
    for _ in 1..qty {
        cart.increase_pending(&item.id);
    }

    match cart.add(&item) {
        AddOutcome::Added => {}
        AddOutcome::AgeGateRequired => {
            if confirm_age {
                cart.confirm_age();
            } else {
                cart.decline_age();
                println!(
                    "{} is alcoholic; re-run with --confirm-age to confirm you are of legal drinking age",
                    slug
                );
                return Ok(());
            }
        }
    }

    let line = cart
        .lines()
        .iter()
        .find(|line| line.item.id == item.id)
        .ok_or_else(|| CommandError::ItemNotFound(slug.to_string()))?;
    println!(
        "added {} x{} at {} each",
        slug, line.quantity, line.price
    );
    Ok(())
}

/// Remove a line by item id.
pub fn remove(config: &CatalogConfig, id: &str) -> Result<(), CommandError> {
    let mut cart = open_cart(config);
    cart.remove_line(&ItemId::new(id));
    println!("removed {id}");
    Ok(())
}

/// Empty the cart and delete its snapshot.
pub fn clear(config: &CatalogConfig) -> Result<(), CommandError> {
    let mut cart = open_cart(config);
    cart.clear();
    println!("cart cleared");
    Ok(())
}

/// Print the checkout submission payload as JSON.
pub fn checkout(config: &CatalogConfig, locale: Locale) -> Result<(), CommandError> {
    let cart = open_cart(config);
    let lines = cart.checkout_lines(locale);
    let json = serde_json::to_string_pretty(&lines)
        .map_err(supra_catalog::CatalogError::from)?;
    println!("{json}");
    println!("subtotal: {}", cart.subtotal());
    Ok(())
}
