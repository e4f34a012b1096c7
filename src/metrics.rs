//! L1 derived metrics and latency percentile summaries.
//!
//! Grounded on `orderbook/metrics.py`'s `SeriesMetrics`/`summarize_latency_ns`: spread,
//! mid, depths, and imbalance derived pointwise from a snapshot series, plus p50/p90/p99
//! latency percentiles. The Python version leans on `numpy.percentile`; here that's
//! `hdrhistogram`, the percentile-summary crate the wider example pack reaches for
//! (joaquinbejar-OrderBook-rs benches latency the same way).

use crate::generator::Snapshot;
use hdrhistogram::Histogram;
use rust_decimal::Decimal;

/// One point per input snapshot: spread/mid carry forward the prior value when a side of
/// the book is empty (matches the reference's forward-fill), depths and imbalance do not.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricsPoint {
    pub event: u64,
    pub spread: Option<Decimal>,
    pub mid: Option<Decimal>,
    pub bid_depth: Decimal,
    pub ask_depth: Decimal,
    /// `(bid_depth - ask_depth) / (bid_depth + ask_depth + 1e-9)`, unconditional (matches the
    /// reference's epsilon-guarded ratio: flat on both sides reports `0`, not a missing value).
    pub imbalance: Decimal,
}

/// Matches the reference's `+ 1e-9` denominator guard, so a flat book (both depths zero)
/// reports `0` instead of dividing by zero.
const IMBALANCE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Derives the L1 metrics series from a run's snapshots, forward-filling spread/mid
/// across snapshots where one side of the book was empty.
pub fn l1_metrics_from_snapshots(snapshots: &[Snapshot]) -> Vec<MetricsPoint> {
    let mut out = Vec::with_capacity(snapshots.len());
    let mut last_spread = None;
    let mut last_mid = None;

    for s in snapshots {
        let (spread, mid) = match (s.best_bid, s.best_ask) {
            (Some(bb), Some(ba)) => {
                let spread = ba - bb;
                let mid = (ba + bb) / Decimal::from(2);
                last_spread = Some(spread);
                last_mid = Some(mid);
                (Some(spread), Some(mid))
            }
            _ => (last_spread, last_mid),
        };
        let imbalance = (s.bid_depth - s.ask_depth) / (s.bid_depth + s.ask_depth + IMBALANCE_EPSILON);
        out.push(MetricsPoint {
            event: s.event,
            spread,
            mid,
            bid_depth: s.bid_depth,
            ask_depth: s.ask_depth,
            imbalance,
        });
    }
    out
}

/// p50/p90/p99 latency and throughput, summarized from a run's per-event latencies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencySummary {
    pub p50_ns: f64,
    pub p90_ns: f64,
    pub p99_ns: f64,
    pub ops_per_sec: f64,
}

/// Builds an hdr histogram over `latencies_ns` and reads off the standard percentiles.
/// Returns all-zero on an empty input, matching the reference's empty-array guard.
pub fn summarize_latency_ns(latencies_ns: &[u64]) -> LatencySummary {
    if latencies_ns.is_empty() {
        return LatencySummary {
            p50_ns: 0.0,
            p90_ns: 0.0,
            p99_ns: 0.0,
            ops_per_sec: 0.0,
        };
    }
    let mut hist = Histogram::<u64>::new(3).expect("fixed sigfigs is always valid");
    let mut sum = 0u64;
    for &ns in latencies_ns {
        hist.record(ns.max(1)).expect("latency exceeds histogram's auto-resized range");
        sum += ns;
    }
    let mean_ns = sum as f64 / latencies_ns.len() as f64;
    let ops_per_sec = if mean_ns > 0.0 { 1e9 / mean_ns } else { 0.0 };
    LatencySummary {
        p50_ns: hist.value_at_quantile(0.50) as f64,
        p90_ns: hist.value_at_quantile(0.90) as f64,
        p99_ns: hist.value_at_quantile(0.99) as f64,
        ops_per_sec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(event: u64, bb: Option<i64>, ba: Option<i64>, bd: i64, ad: i64) -> Snapshot {
        Snapshot {
            event,
            best_bid: bb.map(Decimal::from),
            best_ask: ba.map(Decimal::from),
            bid_depth: Decimal::from(bd),
            ask_depth: Decimal::from(ad),
        }
    }

    #[test]
    fn computes_spread_and_mid() {
        let points = l1_metrics_from_snapshots(&[snap(1, Some(9), Some(11), 100, 50)]);
        assert_eq!(points[0].spread, Some(Decimal::from(2)));
        assert_eq!(points[0].mid, Some(Decimal::from(10)));
    }

    #[test]
    fn imbalance_matches_expected_ratio() {
        let points = l1_metrics_from_snapshots(&[snap(1, Some(9), Some(11), 75, 25)]);
        // (75-25)/(100+1e-9) ~= 0.5, off by less than the epsilon guard.
        let diff = (points[0].imbalance - Decimal::new(5, 1)).abs();
        assert!(diff < Decimal::new(1, 8), "imbalance {} not close to 0.5", points[0].imbalance);
    }

    #[test]
    fn imbalance_is_zero_not_missing_when_book_is_flat() {
        let points = l1_metrics_from_snapshots(&[snap(1, None, None, 0, 0)]);
        assert_eq!(points[0].imbalance, Decimal::ZERO);
    }

    #[test]
    fn forward_fills_spread_and_mid_when_one_side_empty() {
        let points = l1_metrics_from_snapshots(&[snap(1, Some(9), Some(11), 10, 10), snap(2, None, Some(11), 0, 10)]);
        assert_eq!(points[1].spread, points[0].spread);
        assert_eq!(points[1].mid, points[0].mid);
    }

    #[test]
    fn empty_latencies_summarize_to_zero() {
        let summary = summarize_latency_ns(&[]);
        assert_eq!(summary.ops_per_sec, 0.0);
    }

    #[test]
    fn latency_percentiles_are_monotone() {
        let latencies: Vec<u64> = (1..=1000).collect();
        let summary = summarize_latency_ns(&latencies);
        assert!(summary.p50_ns <= summary.p90_ns);
        assert!(summary.p90_ns <= summary.p99_ns);
        assert!(summary.ops_per_sec > 0.0);
    }
}
