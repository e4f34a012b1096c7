//! CSV persistence for simulation artifacts: trades, snapshots, and latencies.
//!
//! One file per series, written under `out_dir`. Mirrors the teacher's
//! `FilePersistence` shape (a thin struct over a directory, `save`/`load` returning
//! `Result<_, String>`) but targets CSV rather than a single JSON blob, since the
//! artifacts here are tabular series rather than a single snapshot of engine state.

use crate::generator::SimArtifacts;
use crate::types::Trade;
use std::path::{Path, PathBuf};

/// Directory-based persistence for one simulation run's artifacts.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    out_dir: PathBuf,
}

/// Paths written by [`ArtifactStore::save`].
#[derive(Clone, Debug)]
pub struct SavedPaths {
    pub trades_csv: PathBuf,
    pub snapshots_csv: PathBuf,
    pub latencies_csv: PathBuf,
}

#[derive(serde::Serialize)]
struct TradeRow {
    maker_id: u64,
    taker_id: u64,
    price: rust_decimal::Decimal,
    qty: rust_decimal::Decimal,
    ts: u64,
}

#[derive(serde::Serialize)]
struct SnapshotRow {
    event: u64,
    best_bid: Option<rust_decimal::Decimal>,
    best_ask: Option<rust_decimal::Decimal>,
    bid_depth: rust_decimal::Decimal,
    ask_depth: rust_decimal::Decimal,
}

#[derive(serde::Serialize)]
struct LatencyRow {
    latency_ns: u64,
}

impl ArtifactStore {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    /// Writes `trades_<suffix>.csv`, `snapshots_<suffix>.csv`, and `latencies_<suffix>.csv`
    /// under the store's directory, creating it if needed. `suffix` is typically a
    /// timestamp, supplied by the caller (see §ambient stack: this module never reads the
    /// clock itself).
    pub fn save(&self, art: &SimArtifacts, suffix: &str) -> Result<SavedPaths, String> {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| e.to_string())?;

        let trades_csv = self.out_dir.join(format!("trades_{suffix}.csv"));
        let mut w = csv::Writer::from_path(&trades_csv).map_err(|e| e.to_string())?;
        for t in &art.trades {
            w.serialize(TradeRow {
                maker_id: t.maker_id.0,
                taker_id: t.taker_id.0,
                price: t.price,
                qty: t.qty,
                ts: t.ts,
            })
            .map_err(|e| e.to_string())?;
        }
        w.flush().map_err(|e| e.to_string())?;

        let snapshots_csv = self.out_dir.join(format!("snapshots_{suffix}.csv"));
        let mut w = csv::Writer::from_path(&snapshots_csv).map_err(|e| e.to_string())?;
        for s in &art.snapshots {
            w.serialize(SnapshotRow {
                event: s.event,
                best_bid: s.best_bid,
                best_ask: s.best_ask,
                bid_depth: s.bid_depth,
                ask_depth: s.ask_depth,
            })
            .map_err(|e| e.to_string())?;
        }
        w.flush().map_err(|e| e.to_string())?;

        let latencies_csv = self.out_dir.join(format!("latencies_{suffix}.csv"));
        let mut w = csv::Writer::from_path(&latencies_csv).map_err(|e| e.to_string())?;
        for ns in &art.latencies_ns {
            w.serialize(LatencyRow { latency_ns: *ns }).map_err(|e| e.to_string())?;
        }
        w.flush().map_err(|e| e.to_string())?;

        Ok(SavedPaths {
            trades_csv,
            snapshots_csv,
            latencies_csv,
        })
    }

    /// Loads a previously saved trades file back, e.g. for offline analysis.
    pub fn load_trades(path: impl AsRef<Path>) -> Result<Vec<Trade>, String> {
        let mut r = csv::Reader::from_path(path).map_err(|e| e.to_string())?;
        let mut out = Vec::new();
        for row in r.deserialize::<TradeRow>() {
            let row = row.map_err(|e| e.to_string())?;
            out.push(Trade {
                maker_id: crate::types::OrderId(row.maker_id),
                taker_id: crate::types::OrderId(row.taker_id),
                price: row.price,
                qty: row.qty,
                ts: row.ts,
            });
        }
        Ok(out)
    }
}
