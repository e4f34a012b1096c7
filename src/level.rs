//! Price level (§4.2): a per-price, per-side FIFO queue of resting orders.
//!
//! Push-back on rest, front/pop-front on maker consumption, O(n) removal of an
//! arbitrary id on cancel/replace — levels are expected to stay short (tens of orders).

use crate::types::{Order, OrderId};
use rust_decimal::Decimal;
use std::collections::VecDeque;

#[derive(Debug)]
pub struct LevelQueue {
    orders: VecDeque<Order>,
}

impl LevelQueue {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// The maker currently at the front of the queue.
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Removes the front order once it has been fully filled.
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Removes the first (and only) occurrence of `id`. O(n in the level).
    pub fn remove_id(&mut self, id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == id)?;
        self.orders.remove(pos)
    }

    pub fn total_remaining(&self) -> Decimal {
        self.orders.iter().map(|o| o.remaining).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

impl Default for LevelQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderType, Side, TimeInForce};

    fn order(id: u64, qty: i64) -> Order {
        Order::new(
            OrderId(id),
            Side::Buy,
            Decimal::from(qty),
            Some(Decimal::from(10)),
            OrderType::Limit,
            TimeInForce::Gtc,
        )
        .unwrap()
    }

    #[test]
    fn fifo_order_preserved() {
        let mut level = LevelQueue::new();
        level.push_back(order(1, 10));
        level.push_back(order(2, 20));
        assert_eq!(level.front_mut().unwrap().id, OrderId(1));
        level.pop_front();
        assert_eq!(level.front_mut().unwrap().id, OrderId(2));
    }

    #[test]
    fn remove_arbitrary_id() {
        let mut level = LevelQueue::new();
        level.push_back(order(1, 10));
        level.push_back(order(2, 20));
        level.push_back(order(3, 30));
        let removed = level.remove_id(OrderId(2)).unwrap();
        assert_eq!(removed.qty, Decimal::from(20));
        let ids: Vec<_> = level.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![OrderId(1), OrderId(3)]);
    }

    #[test]
    fn remove_missing_id_returns_none() {
        let mut level = LevelQueue::new();
        level.push_back(order(1, 10));
        assert!(level.remove_id(OrderId(99)).is_none());
    }

    #[test]
    fn total_remaining_sums_all_orders() {
        let mut level = LevelQueue::new();
        level.push_back(order(1, 10));
        level.push_back(order(2, 20));
        assert_eq!(level.total_remaining(), Decimal::from(30));
    }
}
