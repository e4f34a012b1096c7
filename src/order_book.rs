//! Matching engine façade (§4.5): the single entry point — `add`, `cancel`, `replace` —
//! plus the read-only views (§4.7).
//!
//! Coordinates the two [`SideBook`]s and the [`OrderIndex`], assigns the monotone
//! sequence counter, and runs the price-time matching walk (§4.5.1).

use crate::level::LevelQueue;
use crate::order_index::OrderIndex;
use crate::side_book::SideBook;
use crate::types::{Order, OrderId, OrderType, Side, TimeInForce, Trade};
use log::{debug, trace, warn};
use rust_decimal::Decimal;

/// Price-time priority order book for a single symbol.
///
/// `tick_size` quantizes every incoming price to the nearest point on the tick grid before
/// it is used as a map key (§6): this is the one place prices are rounded, so resting orders
/// and matching logic downstream never have to reason about off-grid prices.
#[derive(Debug)]
pub struct OrderBook {
    tick_size: Decimal,
    check_invariants: bool,
    bids: SideBook,
    asks: SideBook,
    index: OrderIndex,
    seq: u64,
}

impl OrderBook {
    pub fn new(tick_size: Decimal, check_invariants: bool) -> Self {
        Self {
            tick_size,
            check_invariants,
            bids: SideBook::new(Side::Buy),
            asks: SideBook::new(Side::Sell),
            index: OrderIndex::new(),
            seq: 0,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn round_to_tick(&self, price: Decimal) -> Decimal {
        if self.tick_size <= Decimal::ZERO {
            return price;
        }
        (price / self.tick_size).round() * self.tick_size
    }

    fn side_book_mut(&mut self, side: Side) -> &mut SideBook {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Submits a new order (§4.5 `add`). Assigns the sequence number, runs matching, rests
    /// any GTC residual, and discards any IOC/FOK residual. Returns trades in generation order.
    pub fn add(&mut self, mut order: Order) -> Vec<Trade> {
        order.ts = self.next_seq();
        if let Some(price) = order.price {
            order.price = Some(self.round_to_tick(price));
        }

        let trades = match order.order_type {
            OrderType::Market => {
                let trades = self.match_against_opposite(&mut order, None);
                order.remaining = Decimal::ZERO; // MARKET is IOC by construction
                trades
            }
            OrderType::Limit => {
                let limit = order.price;
                if matches!(order.tif, TimeInForce::Fok) {
                    let available = self.executable_available(order.side, limit, order.remaining);
                    if available < order.remaining {
                        debug!(
                            "FOK kill: order {:?} needs {} but only {} available",
                            order.id, order.remaining, available
                        );
                        order.remaining = Decimal::ZERO;
                        if self.check_invariants {
                            self.assert_invariants();
                        }
                        return Vec::new();
                    }
                }
                let trades = self.match_against_opposite(&mut order, limit);
                if order.is_active() {
                    match order.tif {
                        TimeInForce::Gtc => self.rest(order),
                        TimeInForce::Ioc | TimeInForce::Fok => {}
                    }
                }
                trades
            }
        };

        if self.check_invariants {
            self.assert_invariants();
        }
        trades
    }

    /// Cancels a resting order (§4.5 `cancel`). Returns the canceled quantity, 0 if unknown.
    pub fn cancel(&mut self, order_id: OrderId) -> Decimal {
        let Some((side, price)) = self.index.get(order_id) else {
            return Decimal::ZERO;
        };
        let book = self.side_book_mut(side);
        let Some(removed) = book.remove_from_level(price, order_id) else {
            warn!("cancel: index referenced a missing level for order {:?}", order_id);
            self.index.remove(order_id);
            return Decimal::ZERO;
        };
        self.index.remove(order_id);
        if self.check_invariants {
            self.assert_invariants();
        }
        removed.remaining
    }

    /// Replaces a resting order (§4.5 `replace`): extracts the old order, derives the
    /// successor's quantity/remaining, and re-`add`s it under the same id — forfeiting time
    /// priority even when the price is unchanged (§9: replace never edits in place).
    pub fn replace(
        &mut self,
        order_id: OrderId,
        new_price: Option<Decimal>,
        new_qty: Option<Decimal>,
        new_tif: Option<TimeInForce>,
    ) -> (bool, Vec<Trade>) {
        let Some((side, price)) = self.index.get(order_id) else {
            return (false, Vec::new());
        };
        let book = self.side_book_mut(side);
        let Some(old) = book.remove_from_level(price, order_id) else {
            self.index.remove(order_id);
            return (false, Vec::new());
        };
        self.index.remove(order_id);

        // Matches `replace` in the reference implementation: the old order is extracted
        // (and thus gone) before the new_qty<=0 rejection is checked, so an invalid-qty
        // replace still discards the original resting order. See DESIGN.md Open Questions.
        if let Some(qty) = new_qty {
            if qty <= Decimal::ZERO {
                return (false, Vec::new());
            }
        }

        let price = new_price.unwrap_or(old.price.expect("resting order always has a price"));
        let tif = new_tif.unwrap_or(old.tif);
        let qty = new_qty.unwrap_or(old.qty);
        let already_filled = old.qty - old.remaining;
        let remaining = match new_qty {
            Some(new_qty) if new_qty < already_filled => Decimal::ZERO,
            Some(new_qty) => new_qty - already_filled,
            None => old.remaining,
        };

        let mut successor = Order::new(order_id, side, qty, Some(price), OrderType::Limit, tif)
            .expect("derived replacement is always well-formed");
        successor.remaining = remaining;
        trace!(
            "replace: order {:?} {} -> price={} qty={} remaining={} (loses time priority)",
            order_id, if remaining > Decimal::ZERO { "still active" } else { "already filled" }, price, qty, remaining
        );
        let trades = self.add(successor);
        (true, trades)
    }

    fn rest(&mut self, order: Order) {
        let side = order.side;
        let price = order.price.expect("LIMIT order has a price");
        self.index.insert(order.id, side, price);
        self.side_book_mut(side).rest(order);
    }

    /// The price-time matching walk (§4.5.1): consumes makers off the opposite side until
    /// the taker is filled, the opposite side is empty, or the taker's limit is crossed.
    fn match_against_opposite(&mut self, taker: &mut Order, limit_price: Option<Decimal>) -> Vec<Trade> {
        let opposite_side = taker.side.opposite();
        let mut trades = Vec::new();

        while taker.is_active() {
            let opposite = self.side_book_mut(opposite_side);
            let Some(best) = opposite.best_price() else {
                break;
            };
            let crosses = match (taker.side, limit_price) {
                (Side::Buy, Some(limit)) => best <= limit,
                (Side::Sell, Some(limit)) => best >= limit,
                (_, None) => true,
            };
            if !crosses {
                break;
            }

            let Some(level) = opposite.level_mut(best) else {
                // Stale heap entry with no backing level; best_price() already pruned it,
                // but guard defensively against the edge case of a concurrent empty level.
                continue;
            };
            self.drain_level_against(taker, best, level, &mut trades);
            self.side_book_mut(opposite_side).drop_if_empty(best);
        }

        trades
    }

    fn drain_level_against(&mut self, taker: &mut Order, price: Decimal, level: &mut LevelQueue, trades: &mut Vec<Trade>) {
        while taker.is_active() && !level.is_empty() {
            let maker = level.front_mut().expect("checked non-empty");
            let take = taker.remaining.min(maker.remaining);
            if take <= Decimal::ZERO {
                break;
            }
            maker.remaining -= take;
            taker.remaining -= take;
            let ts = self.next_seq();
            trace!(
                "fill: maker={:?} taker={:?} price={} qty={} ts={}",
                maker.id, taker.id, price, take, ts
            );
            trades.push(Trade {
                maker_id: maker.id,
                taker_id: taker.id,
                price,
                qty: take,
                ts,
            });
            if maker.remaining <= Decimal::ZERO {
                let maker_id = maker.id;
                level.pop_front();
                self.index.remove(maker_id);
            }
        }
    }

    /// §4.5.3: sum of `remaining` at levels respecting `limit`, stopping early once `need`
    /// is reached. Used only to decide FOK.
    fn executable_available(&mut self, taker_side: Side, limit: Option<Decimal>, need: Decimal) -> Decimal {
        self.side_book_mut(taker_side.opposite()).executable_available(limit, need)
    }

    pub fn best_bid(&mut self) -> Option<Decimal> {
        self.bids.best_price()
    }

    pub fn best_ask(&mut self) -> Option<Decimal> {
        self.asks.best_price()
    }

    pub fn depth_at_price(&self, side: Side, price: Decimal) -> Decimal {
        match side {
            Side::Buy => self.bids.depth_at(price),
            Side::Sell => self.asks.depth_at(price),
        }
    }

    pub fn total_depth(&self, side: Side) -> Decimal {
        match side {
            Side::Buy => self.bids.total_depth(),
            Side::Sell => self.asks.total_depth(),
        }
    }

    /// Ordered `(price, depth)` pairs, best to worst.
    pub fn levels(&self, side: Side) -> Vec<(Decimal, Decimal)> {
        match side {
            Side::Buy => self.bids.levels_best_to_worst(),
            Side::Sell => self.asks.levels_best_to_worst(),
        }
    }

    /// `(best_bid, best_ask, bid_depth_at_bb, ask_depth_at_ba)`.
    pub fn snapshot_top(&mut self) -> (Option<Decimal>, Option<Decimal>, Decimal, Decimal) {
        let bb = self.best_bid();
        let ba = self.best_ask();
        let bid_depth = bb.map(|p| self.bids.depth_at(p)).unwrap_or(Decimal::ZERO);
        let ask_depth = ba.map(|p| self.asks.depth_at(p)).unwrap_or(Decimal::ZERO);
        (bb, ba, bid_depth, ask_depth)
    }

    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Ids of every currently-resting order, in no particular order. Intended for tooling
    /// (the simulator's random cancel/replace victim pick) rather than the matching path.
    pub fn resting_order_ids(&self) -> Vec<OrderId> {
        self.index.ids().collect()
    }

    /// On-demand invariant check (§4.6 / §8). Panics on violation — a bug, not a recoverable
    /// error (§7).
    pub fn assert_invariants(&mut self) {
        if let (Some(bb), Some(ba)) = (self.bids.best_price(), self.asks.best_price()) {
            assert!(bb < ba, "crossed book: best_bid={} best_ask={}", bb, ba);
        }

        let mut resting_ids = std::collections::HashSet::new();
        for side in [Side::Buy, Side::Sell] {
            let book = match side {
                Side::Buy => &self.bids,
                Side::Sell => &self.asks,
            };
            for (price, _) in self.levels(side) {
                let level = book.level_ref(price).expect("level listed by levels() must exist");
                let mut last_ts = None;
                for order in level.iter() {
                    assert!(order.remaining > Decimal::ZERO, "non-positive remaining resting on book");
                    if let Some(last) = last_ts {
                        assert!(order.ts > last, "FIFO violated at price {}", price);
                    }
                    last_ts = Some(order.ts);
                    assert_eq!(
                        self.index.get(order.id),
                        Some((side, price)),
                        "index missing or wrong entry for resting order {:?}",
                        order.id
                    );
                    resting_ids.insert(order.id);
                }
            }
        }

        assert_eq!(
            resting_ids.len(),
            self.index.len(),
            "order index and resting levels disagree on id set"
        );
    }
}
