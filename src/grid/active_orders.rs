//! Local book of in-flight orders

use std::collections::BTreeMap;

use super::types::Order;

/// Tracks orders the strategy has placed and not yet seen complete
///
/// Keyed by exchange order ID; iteration order is ascending ID.
#[derive(Debug, Clone, Default)]
pub struct ActiveOrderBook {
    orders: BTreeMap<u64, Order>,
}

impl ActiveOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register newly created orders
    pub fn add(&mut self, orders: impl IntoIterator<Item = Order>) {
        for order in orders {
            self.orders.insert(order.id, order);
        }
    }

    /// Refresh the snapshot of a tracked order
    ///
    /// Orders this book never registered are ignored; returns whether the
    /// snapshot was applied.
    pub fn update(&mut self, order: Order) -> bool {
        match self.orders.get_mut(&order.id) {
            Some(tracked) => {
                *tracked = order;
                true
            }
            None => false,
        }
    }

    /// Remove an order, returning the tracked snapshot if any
    pub fn remove(&mut self, order: &Order) -> Option<Order> {
        self.orders.remove(&order.id)
    }

    /// Snapshot of all tracked orders
    pub fn orders(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }
}
