//! Shopping cart state and its persisted store.
//!
//! [`CartState`] is a plain reducer: every mutation adjusts the running totals
//! incrementally, so `total_quantity` and `total_amount` always equal the sums
//! over the items. [`CartStore`] wraps it and writes a full snapshot to storage
//! after every operation.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use sabriaz_core::{Money, Product, ProductId};
use serde::{Deserialize, Serialize};

use crate::storage::{CART_KEY, Storage, load_json, save_json};

/// A product the shopper intends to buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
    /// Always at least 1 while the item is in the cart.
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
}

impl CartItem {
    /// A single unit of a product.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity: 1,
            image: None,
            discount_percent: None,
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

impl From<&Product> for CartItem {
    /// The cart charges the list price; discounts are display-only.
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            image: product.thumbnail().map(str::to_string),
            discount_percent: product.discount_percent,
        }
    }
}

/// Items in insertion order plus running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    items: Vec<CartItem>,
    total_quantity: u32,
    total_amount: Money,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of item quantities.
    #[must_use]
    pub const fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    /// Sum of line totals.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Whether the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gains one unit at the price it was first
    /// added with; otherwise it is appended with quantity 1.
    pub fn add_item(&mut self, item: impl Into<CartItem>) {
        let incoming = item.into();
        let unit_price = if let Some(existing) = self.get_mut(&incoming.id) {
            existing.quantity += 1;
            existing.unit_price
        } else {
            let unit_price = incoming.unit_price;
            self.items.push(CartItem {
                quantity: 1,
                ..incoming
            });
            unit_price
        };
        self.total_quantity += 1;
        self.total_amount += unit_price;
    }

    /// Delete an item entirely. Returns whether it was present.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let Some(pos) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        let removed = self.items.remove(pos);
        self.total_quantity -= removed.quantity;
        self.total_amount -= removed.line_total();
        true
    }

    /// Add one unit of an item already in the cart. Returns whether it was present.
    pub fn increase_quantity(&mut self, id: &ProductId) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.quantity += 1;
        let unit_price = item.unit_price;
        self.total_quantity += 1;
        self.total_amount += unit_price;
        true
    }

    /// Remove one unit, never going below 1.
    ///
    /// Returns whether the quantity changed: `false` both for an absent id and
    /// for an item already at quantity 1.
    pub fn decrease_quantity(&mut self, id: &ProductId) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        if item.quantity <= 1 {
            return false;
        }
        item.quantity -= 1;
        let unit_price = item.unit_price;
        self.total_quantity -= 1;
        self.total_amount -= unit_price;
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_quantity = 0;
        self.total_amount = Money::ZERO;
    }

    /// Whether the stored totals match the items and every item is well formed.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        let well_formed = self
            .items
            .iter()
            .all(|item| item.quantity >= 1 && seen.insert(&item.id));

        let quantity: u64 = self.items.iter().map(|item| u64::from(item.quantity)).sum();
        let amount: Money = self.items.iter().map(CartItem::line_total).sum();

        well_formed && quantity == u64::from(self.total_quantity) && amount == self.total_amount
    }
}

/// The cart plus its persistence.
///
/// Every operation, including no-ops, is followed by a full snapshot write.
/// A failed write is logged and the in-memory state kept as is.
pub struct CartStore {
    state: CartState,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").field("state", &self.state).finish_non_exhaustive()
    }
}

impl CartStore {
    /// Rehydrate the cart from storage.
    ///
    /// Absent, undecodable or inconsistent snapshots fall back to an empty cart.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let state = match load_json::<CartState>(storage.as_ref(), CART_KEY) {
            Some(state) if state.is_consistent() => state,
            Some(_) => {
                tracing::warn!(key = CART_KEY, "Discarding cart snapshot with inconsistent totals");
                CartState::default()
            }
            None => CartState::default(),
        };
        Self { state, storage }
    }

    /// Current cart contents.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// See [`CartState::add_item`].
    pub fn add_item(&mut self, item: impl Into<CartItem>) {
        self.apply(|cart| cart.add_item(item));
    }

    /// See [`CartState::remove_item`].
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        self.apply(|cart| cart.remove_item(id))
    }

    /// See [`CartState::increase_quantity`].
    pub fn increase_quantity(&mut self, id: &ProductId) -> bool {
        self.apply(|cart| cart.increase_quantity(id))
    }

    /// See [`CartState::decrease_quantity`].
    pub fn decrease_quantity(&mut self, id: &ProductId) -> bool {
        self.apply(|cart| cart.decrease_quantity(id))
    }

    /// See [`CartState::clear`].
    pub fn clear(&mut self) {
        self.apply(CartState::clear);
    }

    fn apply<R>(&mut self, op: impl FnOnce(&mut CartState) -> R) -> R {
        let result = op(&mut self.state);
        save_json(self.storage.as_ref(), CART_KEY, &self.state);
        result
    }
}
