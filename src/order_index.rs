//! Order index (§4.4): `order_id -> (side, price)` for every resting order.
//!
//! A non-owning resolver: the level owns the `Order`, this just locates it.

use crate::types::{OrderId, Side};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct OrderIndex {
    map: HashMap<OrderId, (Side, Decimal)>,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: OrderId, side: Side, price: Decimal) {
        self.map.insert(id, (side, price));
    }

    pub fn get(&self, id: OrderId) -> Option<(Side, Decimal)> {
        self.map.get(&id).copied()
    }

    pub fn remove(&mut self, id: OrderId) -> Option<(Side, Decimal)> {
        self.map.remove(&id)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.map.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.map.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_roundtrip() {
        let mut idx = OrderIndex::new();
        idx.insert(OrderId(1), Side::Buy, Decimal::from(10));
        assert_eq!(idx.get(OrderId(1)), Some((Side::Buy, Decimal::from(10))));
        assert_eq!(idx.remove(OrderId(1)), Some((Side::Buy, Decimal::from(10))));
        assert_eq!(idx.get(OrderId(1)), None);
    }

    #[test]
    fn unknown_id_returns_none() {
        let idx = OrderIndex::new();
        assert_eq!(idx.get(OrderId(42)), None);
    }
}
