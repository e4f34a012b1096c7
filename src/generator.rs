//! Synthetic market simulator: a drifting-mid random order stream replayed against a real
//! [`OrderBook`], recording trades, L1 snapshots, and per-event latency.
//!
//! Grounded on the reference simulator (`orderbook/sim.py`'s `Simulator`/`SimConfig`/
//! `SimArtifacts`): seeded initial levels around a mid price, a probability-weighted event
//! mix (limit / market / cancel / replace), and a snapshot taken every `snapshot_every`
//! events. The teacher's own [`crate::error`]-free `Generator` (a flat i.i.d. order stream)
//! is generalized here into a stateful simulator that also cancels and replaces, since §8's
//! invariants only mean something once a run exercises all five entry points.

use crate::order_book::OrderBook;
use crate::types::{Order, OrderId, OrderType, Side, TimeInForce, Trade};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Same seed + same config ⇒ the same event stream and the same resulting trades.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub seed: u64,
    pub n_events: u64,
    pub tick_size: Decimal,
    pub p_limit: f64,
    pub p_market: f64,
    pub p_cancel: f64,
    pub p_replace: f64,
    pub mid0: Decimal,
    pub sigma_ticks: f64,
    pub drift_per_1k: f64,
    pub size_mean: f64,
    pub size_min: u64,
    pub p_ioc: f64,
    pub p_fok: f64,
    pub snapshot_every: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 30,
            n_events: 50_000,
            tick_size: Decimal::new(1, 2),
            p_limit: 0.65,
            p_market: 0.20,
            p_cancel: 0.10,
            p_replace: 0.05,
            mid0: Decimal::from(100),
            sigma_ticks: 1.5,
            drift_per_1k: 0.0,
            size_mean: 100.0,
            size_min: 10,
            p_ioc: 0.05,
            p_fok: 0.02,
            snapshot_every: 250,
        }
    }
}

/// An L1 snapshot taken every `snapshot_every` events.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub event: u64,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub bid_depth: Decimal,
    pub ask_depth: Decimal,
}

/// Everything a run produced: trades, L1 snapshots, and per-event latencies in nanoseconds.
///
/// `cancel_count`/`replace_count` are always reported as 0, matching the original
/// simulator: it tracks neither independently of `order_count`, so this carries that
/// behavior forward rather than inventing counters it never had (see DESIGN.md).
#[derive(Clone, Debug)]
pub struct SimArtifacts {
    pub trades: Vec<Trade>,
    pub snapshots: Vec<Snapshot>,
    pub latencies_ns: Vec<u64>,
    pub order_count: u64,
    pub cancel_count: u64,
    pub replace_count: u64,
}

/// Drives one simulation run against a private [`OrderBook`].
pub struct Simulator {
    cfg: SimConfig,
    rng: StdRng,
    book: OrderBook,
    next_id: u64,
}

impl Simulator {
    pub fn new(cfg: SimConfig) -> Self {
        let book = OrderBook::new(cfg.tick_size, false);
        let rng = StdRng::seed_from_u64(cfg.seed);
        Self {
            cfg,
            rng,
            book,
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> OrderId {
        let id = OrderId(self.next_id);
        self.next_id += 1;
        id
    }

    fn gen_size(&mut self) -> Decimal {
        let log_mean = self.cfg.size_mean.ln();
        let z: f64 = self.rng.gen_range(-2.0..2.0);
        let lognormal = (log_mean + 0.5 * z).exp();
        let size = (lognormal as u64).max(self.cfg.size_min);
        Decimal::from(((size + 5) / 10) * 10)
    }

    fn gen_side(&mut self) -> Side {
        if self.rng.gen::<f64>() < 0.5 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    fn limit_price_near_mid(&mut self, mid: Decimal, side: Side) -> Decimal {
        let bias = if matches!(side, Side::Buy) { 1.0 } else { -1.0 };
        let z: f64 = self.rng.gen_range(-1.0..1.0) * self.cfg.sigma_ticks;
        let ticks = (bias + z).round() as i64;
        let px = mid + Decimal::from(ticks) * self.cfg.tick_size;
        px.max(self.cfg.tick_size)
    }

    fn pick_tif(&mut self) -> TimeInForce {
        let r: f64 = self.rng.gen();
        if r < self.cfg.p_fok {
            TimeInForce::Fok
        } else if r < self.cfg.p_fok + self.cfg.p_ioc {
            TimeInForce::Ioc
        } else {
            TimeInForce::Gtc
        }
    }

    fn seed_initial_levels(&mut self, mid: Decimal, base_qty: Decimal) {
        for d in 1..=3i64 {
            let bid_px = mid - Decimal::from(d) * self.cfg.tick_size;
            let ask_px = mid + Decimal::from(d) * self.cfg.tick_size;
            let bid_id = self.alloc_id();
            let ask_id = self.alloc_id();
            let bid = Order::new(bid_id, Side::Buy, base_qty, Some(bid_px), OrderType::Limit, TimeInForce::Gtc)
                .expect("seeded order is well-formed");
            let ask = Order::new(ask_id, Side::Sell, base_qty, Some(ask_px), OrderType::Limit, TimeInForce::Gtc)
                .expect("seeded order is well-formed");
            self.book.add(bid);
            self.book.add(ask);
        }
    }

    /// Runs the configured number of events, returning the accumulated artifacts.
    pub fn run(&mut self) -> SimArtifacts {
        info!(
            "simulator: starting run seed={} n_events={} tick_size={}",
            self.cfg.seed, self.cfg.n_events, self.cfg.tick_size
        );
        let mut trades = Vec::new();
        let mut snapshots = Vec::new();
        let mut latencies_ns = Vec::new();
        let mut mid = self.cfg.mid0;

        for _ in 0..10 {
            self.seed_initial_levels(mid, Decimal::from(200));
        }

        for i in 0..self.cfg.n_events {
            let r: f64 = self.rng.gen();
            mid += Decimal::from_f64_retain(self.cfg.drift_per_1k / 1000.0).unwrap_or(Decimal::ZERO) * self.cfg.tick_size;

            if r < self.cfg.p_limit {
                let side = self.gen_side();
                let price = self.limit_price_near_mid(mid, side);
                let tif = self.pick_tif();
                let qty = self.gen_size();
                let id = self.alloc_id();
                let order = Order::new(id, side, qty, Some(price), OrderType::Limit, tif)
                    .expect("generated order is well-formed");
                let t0 = std::time::Instant::now();
                let new_trades = self.book.add(order);
                latencies_ns.push(t0.elapsed().as_nanos() as u64);
                trades.extend(new_trades);
            } else if r < self.cfg.p_limit + self.cfg.p_market {
                let side = self.gen_side();
                let qty = self.gen_size();
                let id = self.alloc_id();
                let order = Order::new(id, side, qty, None, OrderType::Market, TimeInForce::Ioc)
                    .expect("generated order is well-formed");
                let t0 = std::time::Instant::now();
                let new_trades = self.book.add(order);
                latencies_ns.push(t0.elapsed().as_nanos() as u64);
                trades.extend(new_trades);
            } else if r < self.cfg.p_limit + self.cfg.p_market + self.cfg.p_cancel {
                if let Some(victim) = self.random_resting_id() {
                    let t0 = std::time::Instant::now();
                    self.book.cancel(victim);
                    latencies_ns.push(t0.elapsed().as_nanos() as u64);
                }
            } else if let Some(victim) = self.random_resting_id() {
                let delta_ticks = if self.rng.gen::<bool>() { 1 } else { -1 };
                let t0 = std::time::Instant::now();
                let (_ok, new_trades) = self.book.replace(
                    victim,
                    Some(self.cfg.tick_size * Decimal::from(delta_ticks)),
                    None,
                    None,
                );
                latencies_ns.push(t0.elapsed().as_nanos() as u64);
                trades.extend(new_trades);
            }

            if (i + 1) % self.cfg.snapshot_every == 0 {
                let (bb, ba, bd, ad) = self.book.snapshot_top();
                snapshots.push(Snapshot {
                    event: i + 1,
                    best_bid: bb,
                    best_ask: ba,
                    bid_depth: bd,
                    ask_depth: ad,
                });
            }
        }

        info!(
            "simulator: finished run, {} orders, {} trades, {} snapshots",
            self.next_id - 1,
            trades.len(),
            snapshots.len()
        );
        SimArtifacts {
            trades,
            snapshots,
            latencies_ns,
            order_count: self.next_id - 1,
            cancel_count: 0,
            replace_count: 0,
        }
    }

    fn random_resting_id(&mut self) -> Option<OrderId> {
        let ids = self.book.resting_order_ids();
        if ids.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..ids.len());
        Some(ids[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_same_seed_same_outcome() {
        let cfg = SimConfig {
            n_events: 500,
            ..Default::default()
        };
        let mut sim1 = Simulator::new(cfg.clone());
        let mut sim2 = Simulator::new(cfg);
        let art1 = sim1.run();
        let art2 = sim2.run();
        assert_eq!(art1.trades, art2.trades);
        assert_eq!(art1.order_count, art2.order_count);
    }

    #[test]
    fn different_seed_different_outcome() {
        let mut sim1 = Simulator::new(SimConfig {
            seed: 1,
            n_events: 500,
            ..Default::default()
        });
        let mut sim2 = Simulator::new(SimConfig {
            seed: 2,
            n_events: 500,
            ..Default::default()
        });
        let art1 = sim1.run();
        let art2 = sim2.run();
        assert_ne!(art1.trades, art2.trades);
    }

    #[test]
    fn run_produces_snapshots_at_configured_cadence() {
        let mut sim = Simulator::new(SimConfig {
            n_events: 1000,
            snapshot_every: 100,
            ..Default::default()
        });
        let art = sim.run();
        assert_eq!(art.snapshots.len(), 10);
    }
}
