//! Simulator CLI: `sim` runs a full simulation and writes CSVs + figures, `bench` is a
//! lighter throughput/latency-only run. Grounded on `orderbook/cli.py`; its `report`
//! subcommand (rewriting `docs/RESULTS.md` placeholders) is dropped — there is no
//! corresponding docs workflow here.

use clap::{Parser, Subcommand};
use matching_engine::generator::{SimConfig, Simulator};
use matching_engine::metrics::{l1_metrics_from_snapshots, summarize_latency_ns};
use matching_engine::persistence::ArtifactStore;
use matching_engine::viz::{plot_latency_hist, plot_timeseries_metrics};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "orderbook", about = "Order book simulator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation and save artifacts (CSVs + figures) to --report.
    Sim {
        #[arg(long, default_value_t = 30)]
        seed: u64,
        #[arg(long = "n-events", default_value_t = 200_000)]
        n_events: u64,
        #[arg(long, default_value = "0.01")]
        tick: String,
        #[arg(long = "p-limit", default_value_t = 0.65)]
        p_limit: f64,
        #[arg(long = "p-market", default_value_t = 0.20)]
        p_market: f64,
        #[arg(long = "p-cancel", default_value_t = 0.10)]
        p_cancel: f64,
        #[arg(long = "p-replace", default_value_t = 0.05)]
        p_replace: f64,
        #[arg(long, default_value = "100")]
        mid: String,
        #[arg(long = "sigma-ticks", default_value_t = 1.5)]
        sigma_ticks: f64,
        #[arg(long = "drift-per-1k", default_value_t = 0.0)]
        drift_per_1k: f64,
        #[arg(long = "size-mean", default_value_t = 100.0)]
        size_mean: f64,
        #[arg(long = "size-min", default_value_t = 10)]
        size_min: u64,
        #[arg(long = "p-ioc", default_value_t = 0.05)]
        p_ioc: f64,
        #[arg(long = "p-fok", default_value_t = 0.02)]
        p_fok: f64,
        #[arg(long = "snapshot-every", default_value_t = 250)]
        snapshot_every: u64,
        #[arg(long, default_value = "results")]
        report: String,
    },
    /// Run a throughput/latency-only microbenchmark.
    Bench {
        #[arg(long, default_value_t = 30)]
        seed: u64,
        #[arg(long = "n-events", default_value_t = 300_000)]
        n_events: u64,
        #[arg(long, default_value = "results")]
        report: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Sim {
            seed,
            n_events,
            tick,
            p_limit,
            p_market,
            p_cancel,
            p_replace,
            mid,
            sigma_ticks,
            drift_per_1k,
            size_mean,
            size_min,
            p_ioc,
            p_fok,
            snapshot_every,
            report,
        } => {
            let cfg = SimConfig {
                seed,
                n_events,
                tick_size: Decimal::from_str(&tick).expect("--tick must be a decimal"),
                p_limit,
                p_market,
                p_cancel,
                p_replace,
                mid0: Decimal::from_str(&mid).expect("--mid must be a decimal"),
                sigma_ticks,
                drift_per_1k,
                size_mean,
                size_min,
                p_ioc,
                p_fok,
                snapshot_every,
            };
            run_sim(cfg, &report);
        }
        Command::Bench { seed, n_events, report } => {
            let cfg = SimConfig {
                seed,
                n_events,
                snapshot_every: (n_events / 50).max(1),
                ..Default::default()
            };
            run_bench(cfg, &report);
        }
    }
}

fn run_sim(cfg: SimConfig, report: &str) {
    let mut sim = Simulator::new(cfg);
    let art = sim.run();
    let store = ArtifactStore::new(report);
    let suffix = timestamp_suffix();
    let paths = store.save(&art, &suffix).expect("failed to write artifact CSVs");

    let points = l1_metrics_from_snapshots(&art.snapshots);
    let plots = plot_timeseries_metrics(&points, report).expect("failed to render metric figures");
    let latency_png = plot_latency_hist(&art.latencies_ns, report).expect("failed to render latency histogram");
    let summary = summarize_latency_ns(&art.latencies_ns);

    println!(
        "{}",
        serde_json::json!({
            "saved": {
                "trades_csv": paths.trades_csv,
                "snapshots_csv": paths.snapshots_csv,
                "latencies_csv": paths.latencies_csv,
                "spread_png": plots.spread_png,
                "midprice_png": plots.midprice_png,
                "depths_png": plots.depths_png,
                "imbalance_png": plots.imbalance_png,
                "latency_hist_png": latency_png,
            },
            "latency_summary": {
                "p50_ns": summary.p50_ns,
                "p90_ns": summary.p90_ns,
                "p99_ns": summary.p99_ns,
                "ops_per_sec": summary.ops_per_sec,
            },
        })
    );
}

fn run_bench(cfg: SimConfig, report: &str) {
    let mut sim = Simulator::new(cfg);
    let art = sim.run();
    std::fs::create_dir_all(report).expect("failed to create --report directory");
    let latency_png = plot_latency_hist(&art.latencies_ns, report).expect("failed to render latency histogram");
    let summary = summarize_latency_ns(&art.latencies_ns);

    let csv_path = std::path::Path::new(report).join("benchmark_summary.csv");
    let mut w = csv::Writer::from_path(&csv_path).expect("failed to open benchmark_summary.csv");
    #[derive(serde::Serialize)]
    struct Row {
        p50_ns: f64,
        p90_ns: f64,
        p99_ns: f64,
        ops_per_sec: f64,
    }
    w.serialize(Row {
        p50_ns: summary.p50_ns,
        p90_ns: summary.p90_ns,
        p99_ns: summary.p99_ns,
        ops_per_sec: summary.ops_per_sec,
    })
    .expect("failed to serialize benchmark summary");
    w.flush().expect("failed to flush benchmark_summary.csv");

    println!(
        "{}",
        serde_json::json!({
            "benchmark": {
                "p50_ns": summary.p50_ns,
                "p90_ns": summary.p90_ns,
                "p99_ns": summary.p99_ns,
                "ops_per_sec": summary.ops_per_sec,
            },
            "latency_hist_png": latency_png,
            "csv": csv_path,
        })
    );
}

fn timestamp_suffix() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}
