//! Ids of orders placed without an account.
//!
//! Guests have no order history on the backend side, so the client remembers
//! which orders it placed and asks for them by id.

use std::sync::Arc;

use sabriaz_core::OrderId;

use crate::storage::{GUEST_ORDERS_KEY, Storage, load_json, save_json};

/// Persisted list of guest order ids, oldest first.
pub struct GuestOrders {
    ids: Vec<OrderId>,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for GuestOrders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestOrders").field("ids", &self.ids).finish_non_exhaustive()
    }
}

impl GuestOrders {
    /// Rehydrate from storage; corrupt or absent data yields an empty list.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let ids = load_json(storage.as_ref(), GUEST_ORDERS_KEY).unwrap_or_default();
        Self { ids, storage }
    }

    /// Remembered ids.
    #[must_use]
    pub fn ids(&self) -> &[OrderId] {
        &self.ids
    }

    /// Remember a newly placed order. Duplicates are ignored.
    pub fn record(&mut self, id: OrderId) {
        if self.ids.contains(&id) {
            return;
        }
        self.ids.push(id);
        save_json(self.storage.as_ref(), GUEST_ORDERS_KEY, &self.ids);
    }
}
