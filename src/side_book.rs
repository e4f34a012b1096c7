//! Side book (§4.3): price → level map plus a best-price heap with lazy stale cleanup.
//!
//! Grounded directly on the reference implementation's `_best_bid_price`/`_best_ask_price`:
//! a heap of prices per side (max-heap for BUY, min-heap for SELL) that can carry entries
//! whose level has since emptied. The accessor pops stale entries off the top until it finds
//! one still backed by a non-empty level, or the heap drains.

use crate::level::LevelQueue;
use crate::types::{Order, Side};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug)]
enum PriceHeap {
    /// BUY: highest price first.
    Max(BinaryHeap<Decimal>),
    /// SELL: lowest price first.
    Min(BinaryHeap<Reverse<Decimal>>),
}

impl PriceHeap {
    fn push(&mut self, price: Decimal) {
        match self {
            PriceHeap::Max(h) => h.push(price),
            PriceHeap::Min(h) => h.push(Reverse(price)),
        }
    }

    fn peek(&self) -> Option<Decimal> {
        match self {
            PriceHeap::Max(h) => h.peek().copied(),
            PriceHeap::Min(h) => h.peek().map(|Reverse(p)| *p),
        }
    }

    fn pop(&mut self) {
        match self {
            PriceHeap::Max(h) => {
                h.pop();
            }
            PriceHeap::Min(h) => {
                h.pop();
            }
        }
    }
}

#[derive(Debug)]
pub struct SideBook {
    side: Side,
    levels: HashMap<Decimal, LevelQueue>,
    heap: PriceHeap,
}

impl SideBook {
    pub fn new(side: Side) -> Self {
        let heap = match side {
            Side::Buy => PriceHeap::Max(BinaryHeap::new()),
            Side::Sell => PriceHeap::Min(BinaryHeap::new()),
        };
        Self {
            side,
            levels: HashMap::new(),
            heap,
        }
    }

    /// Live best price, after lazily discarding any stale (empty/absent) heap entries.
    pub fn best_price(&mut self) -> Option<Decimal> {
        loop {
            let price = self.heap.peek()?;
            match self.levels.get(&price) {
                Some(level) if !level.is_empty() => return Some(price),
                _ => self.heap.pop(),
            }
        }
    }

    /// Inserts `order` at the back of its level, creating the level (and pushing the heap
    /// entry) if this is the first order at that price.
    pub fn rest(&mut self, order: Order) {
        let price = order.price.expect("resting order must be a LIMIT order");
        if !self.levels.contains_key(&price) {
            self.heap.push(price);
            self.levels.insert(price, LevelQueue::new());
        }
        self.levels.get_mut(&price).unwrap().push_back(order);
    }

    pub fn level_mut(&mut self, price: Decimal) -> Option<&mut LevelQueue> {
        self.levels.get_mut(&price)
    }

    /// Read-only peek, for invariant checks that don't need the lazy heap cleanup.
    pub fn level_ref(&self, price: Decimal) -> Option<&LevelQueue> {
        self.levels.get(&price)
    }

    /// Drops the price key once its level has emptied; the heap's stale entry is left for
    /// lazy cleanup on the next `best_price` query.
    pub fn drop_if_empty(&mut self, price: Decimal) {
        if matches!(self.levels.get(&price), Some(level) if level.is_empty()) {
            self.levels.remove(&price);
        }
    }

    /// Removes an order by id from the level at `price`. Drops the level if it empties.
    pub fn remove_from_level(&mut self, price: Decimal, id: crate::types::OrderId) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove_id(id);
        self.drop_if_empty(price);
        removed
    }

    pub fn depth_at(&self, price: Decimal) -> Decimal {
        self.levels
            .get(&price)
            .map(|l| l.total_remaining())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total_depth(&self) -> Decimal {
        self.levels.values().map(|l| l.total_remaining()).sum()
    }

    /// All live price levels, best to worst (descending for BUY, ascending for SELL).
    pub fn levels_best_to_worst(&self) -> Vec<(Decimal, Decimal)> {
        let mut out: Vec<(Decimal, Decimal)> = self
            .levels
            .iter()
            .filter(|(_, l)| !l.is_empty())
            .map(|(p, l)| (*p, l.total_remaining()))
            .collect();
        match self.side {
            Side::Buy => out.sort_by(|a, b| b.0.cmp(&a.0)),
            Side::Sell => out.sort_by(|a, b| a.0.cmp(&b.0)),
        }
        out
    }

    /// Sum of `remaining` across levels that respect `limit` (§4.5.3), walked in price
    /// priority order and stopping early once `need` is reached.
    pub fn executable_available(&self, limit: Option<Decimal>, need: Decimal) -> Decimal {
        let mut prices: Vec<Decimal> = self.levels.keys().copied().collect();
        match self.side {
            Side::Buy => prices.sort_by(|a, b| b.cmp(a)),
            Side::Sell => prices.sort(),
        }
        let mut total = Decimal::ZERO;
        for price in prices {
            let crosses = match (self.side, limit) {
                (Side::Buy, Some(limit)) => price >= limit,
                (Side::Sell, Some(limit)) => price <= limit,
                (_, None) => true,
            };
            if !crosses {
                break;
            }
            total += self.depth_at(price);
            if total >= need {
                return total;
            }
        }
        total
    }
}
