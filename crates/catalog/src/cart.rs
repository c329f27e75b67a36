//! Cart reconciliation: lines, discounting, and the age gate.
//!
//! The cart is independent from the catalog cache. Items enter it with a
//! fixed storewide discount applied once, at first add; merging more of
//! the same item sums quantities but never re-prices the line. Persisted
//! carts written before the discount schema existed are migrated on load,
//! so every line the rest of the system sees satisfies
//! `price = round2(original_price * (1 - DISCOUNT_RATE))`.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use supra_core::{ItemId, Locale, Price};
use tracing::{debug, info};

use crate::item::CatalogItem;
use crate::persist::SnapshotStore;

/// Storewide discount applied when an item enters the cart.
pub const DISCOUNT_RATE: Decimal = dec!(0.03);

/// Apply the storewide discount to a catalog price.
///
/// Rounds to two decimals, half away from zero. Non-positive prices are
/// returned unchanged: there is nothing to discount.
#[must_use]
pub fn apply_discount(price: Price) -> Price {
    if !price.is_positive() {
        return price;
    }
    let discounted = (price.amount() * (Decimal::ONE - DISCOUNT_RATE))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Price::new(discounted)
}

/// A cart line: one catalog item with quantity and its frozen pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CatalogItem,
    /// Always at least 1; removal is an explicit operation.
    pub quantity: u32,
    /// Catalog price at the time of first add. Absent only in snapshots
    /// written before the discount schema; filled by [`migrate_lines`].
    #[serde(default)]
    pub original_price: Option<Price>,
    /// Post-discount unit price.
    pub price: Price,
}

impl CartLine {
    /// Line total: discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(self.price.amount() * Decimal::from(self.quantity))
    }
}

/// Migrate lines persisted before the discount schema.
///
/// A line without `original_price` stored its pre-discount price; the
/// migration records it and replaces `price` with the discounted value.
/// Already-migrated lines are untouched, so the pass is idempotent.
/// Returns the number of lines rewritten.
pub fn migrate_lines(lines: &mut [CartLine]) -> usize {
    let mut migrated = 0;
    for line in lines.iter_mut().filter(|l| l.original_price.is_none()) {
        line.original_price = Some(line.price);
        line.price = apply_discount(line.price);
        migrated += 1;
    }
    migrated
}

/// Outcome of [`Cart::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The item is in the cart.
    Added,
    /// The item is alcoholic and is parked until [`Cart::confirm_age`].
    AgeGateRequired,
}

/// A cart line projected for checkout submission.
///
/// `price` is the discounted unit price; the pre-discount price is never
/// submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutLine {
    pub product_id: ItemId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub images: Vec<String>,
}

/// The shopping cart.
///
/// Owns its lines, the per-item pending quantity selection (the amount a
/// user dials before committing an add), and the age-gate parking slot.
/// Every mutation re-persists the line list; storage failures degrade to
/// in-memory operation inside [`SnapshotStore`].
#[derive(Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    pending_quantities: HashMap<ItemId, u32>,
    pending_age_gate: Option<CatalogItem>,
    snapshots: SnapshotStore,
}

impl Cart {
    /// Open the cart, rehydrating and migrating any persisted snapshot.
    #[must_use]
    pub fn open(snapshots: SnapshotStore) -> Self {
        let mut lines = snapshots.load_cart().unwrap_or_default();
        let migrated = migrate_lines(&mut lines);
        if migrated > 0 {
            info!(migrated, "migrated cart lines to discount schema");
            snapshots.save_cart(&lines);
        }
        Self {
            lines,
            pending_quantities: HashMap::new(),
            pending_age_gate: None,
            snapshots,
        }
    }

    /// Current cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Add an item to the cart.
    ///
    /// Alcoholic beverages are parked behind the age gate instead of being
    /// added immediately; everything else lands in the cart right away
    /// with the quantity dialed in the pending selection (default 1).
    pub fn add(&mut self, item: &CatalogItem) -> AddOutcome {
        if item.is_alcoholic() {
            debug!(id = %item.id, "age gate required");
            self.pending_age_gate = Some(item.clone());
            return AddOutcome::AgeGateRequired;
        }
        self.insert(item);
        AddOutcome::Added
    }

    /// The item currently parked behind the age gate, if any.
    #[must_use]
    pub fn pending_age_item(&self) -> Option<&CatalogItem> {
        self.pending_age_gate.as_ref()
    }

    /// Complete a parked add after the age gate was confirmed.
    ///
    /// Returns `true` when a parked item was actually added.
    pub fn confirm_age(&mut self) -> bool {
        match self.pending_age_gate.take() {
            Some(item) => {
                self.insert(&item);
                true
            }
            None => false,
        }
    }

    /// Discard the parked item without adding it.
    pub fn decline_age(&mut self) {
        self.pending_age_gate = None;
    }

    /// Quantity currently dialed for an item (before committing an add).
    #[must_use]
    pub fn pending_quantity(&self, id: &ItemId) -> u32 {
        self.pending_quantities.get(id).copied().unwrap_or(1)
    }

    /// Dial the pending quantity up.
    pub fn increase_pending(&mut self, id: &ItemId) {
        let quantity = self.pending_quantity(id).saturating_add(1);
        self.pending_quantities.insert(id.clone(), quantity);
    }

    /// Dial the pending quantity down, flooring at 1.
    pub fn decrease_pending(&mut self, id: &ItemId) {
        let quantity = self.pending_quantity(id).saturating_sub(1).max(1);
        self.pending_quantities.insert(id.clone(), quantity);
    }

    /// Remove a line by item id. Removing an absent id is a no-op.
    pub fn remove_line(&mut self, id: &ItemId) {
        let before = self.lines.len();
        self.lines.retain(|line| line.item.id != *id);
        if self.lines.len() != before {
            self.snapshots.save_cart(&self.lines);
        }
    }

    /// Empty the cart, the pending selections, and the durable snapshot.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.pending_quantities.clear();
        self.pending_age_gate = None;
        self.snapshots.clear_cart();
    }

    /// Total item count across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Discounted subtotal across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::new(
            self.lines
                .iter()
                .map(|line| line.line_total().amount())
                .sum(),
        )
    }

    /// Project the cart for checkout submission.
    ///
    /// Names resolve through the full display fallback chain for `locale`.
    #[must_use]
    pub fn checkout_lines(&self, locale: Locale) -> Vec<CheckoutLine> {
        self.lines
            .iter()
            .map(|line| CheckoutLine {
                product_id: line.item.id.clone(),
                name: line
                    .item
                    .display_name(locale)
                    .unwrap_or_default()
                    .to_string(),
                price: line.price,
                quantity: line.quantity,
                images: line.item.images.clone(),
            })
            .collect()
    }

    /// Insert or merge a line, then persist.
    ///
    /// Merging sums quantities and keeps the prices frozen at first add;
    /// the discount is a property of the catalog price at that moment, not
    /// something recomputed per merge.
    fn insert(&mut self, item: &CatalogItem) {
        let quantity = self.pending_quantity(&item.id);
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                quantity,
                original_price: Some(item.price),
                price: apply_discount(item.price),
                item: item.clone(),
            });
        }
        self.snapshots.save_cart(&self.lines);
    }
}
