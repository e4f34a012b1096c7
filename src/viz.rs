//! PNG plots of a run's metrics and latency distribution.
//!
//! Grounded on `orderbook/viz.py`'s `plot_timeseries_metrics`/`plot_latency_hist`: one
//! figure each for spread, midprice, L1 depths, and imbalance, plus a latency histogram in
//! microseconds. `gnuplot` is the plotting crate reached for here (the only one anywhere in
//! the example pack — `crypto-zero-apex-engine/apex-core` carries it as a dependency).

use crate::metrics::MetricsPoint;
use gnuplot::{AxesCommon, Caption, Figure};
use std::path::{Path, PathBuf};

/// Paths written by [`plot_timeseries_metrics`].
#[derive(Clone, Debug)]
pub struct MetricsPlots {
    pub spread_png: PathBuf,
    pub midprice_png: PathBuf,
    pub depths_png: PathBuf,
    pub imbalance_png: PathBuf,
}

fn figures_dir(out_dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let dir = out_dir.as_ref().join("figures");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Renders the four L1 time-series charts as PNGs under `out_dir/figures/`.
pub fn plot_timeseries_metrics(points: &[MetricsPoint], out_dir: impl AsRef<Path>) -> std::io::Result<MetricsPlots> {
    let figdir = figures_dir(out_dir)?;

    let events: Vec<f64> = points.iter().map(|p| p.event as f64).collect();
    let spread: Vec<f64> = points
        .iter()
        .map(|p| p.spread.and_then(|d| d.to_string().parse().ok()).unwrap_or(0.0))
        .collect();
    let mid: Vec<f64> = points
        .iter()
        .map(|p| p.mid.and_then(|d| d.to_string().parse().ok()).unwrap_or(0.0))
        .collect();
    let bid_depth: Vec<f64> = points.iter().map(|p| p.bid_depth.to_string().parse().unwrap_or(0.0)).collect();
    let ask_depth: Vec<f64> = points.iter().map(|p| p.ask_depth.to_string().parse().unwrap_or(0.0)).collect();
    let imbalance: Vec<f64> = points.iter().map(|p| p.imbalance.to_string().parse().unwrap_or(0.0)).collect();

    let spread_png = figdir.join("spread.png");
    let mut fg = Figure::new();
    fg.axes2d()
        .set_title("Spread (L1)", &[])
        .set_x_label("snapshot", &[])
        .set_y_label("price", &[])
        .lines(&events, &spread, &[Caption("spread")]);
    fg.set_terminal("pngcairo", spread_png.to_string_lossy().as_ref());
    fg.show().ok();

    let midprice_png = figdir.join("midprice.png");
    let mut fg = Figure::new();
    fg.axes2d()
        .set_title("Midprice", &[])
        .set_x_label("snapshot", &[])
        .set_y_label("price", &[])
        .lines(&events, &mid, &[Caption("mid")]);
    fg.set_terminal("pngcairo", midprice_png.to_string_lossy().as_ref());
    fg.show().ok();

    let depths_png = figdir.join("depths.png");
    let mut fg = Figure::new();
    fg.axes2d()
        .set_title("L1 Depths", &[])
        .set_x_label("snapshot", &[])
        .set_y_label("shares", &[])
        .lines(&events, &bid_depth, &[Caption("bid_depth")])
        .lines(&events, &ask_depth, &[Caption("ask_depth")]);
    fg.set_terminal("pngcairo", depths_png.to_string_lossy().as_ref());
    fg.show().ok();

    let imbalance_png = figdir.join("imbalance.png");
    let mut fg = Figure::new();
    fg.axes2d()
        .set_title("Order Book Imbalance", &[])
        .set_x_label("snapshot", &[])
        .set_y_label("imbalance", &[])
        .lines(&events, &imbalance, &[Caption("imbalance")]);
    fg.set_terminal("pngcairo", imbalance_png.to_string_lossy().as_ref());
    fg.show().ok();

    Ok(MetricsPlots {
        spread_png,
        midprice_png,
        depths_png,
        imbalance_png,
    })
}

const LATENCY_HIST_BINS: usize = 50;

/// Bins `us` into `LATENCY_HIST_BINS` equal-width buckets, returning `(bin_center, count)`.
fn histogram_bins(us: &[f64]) -> Vec<(f64, f64)> {
    let (min, max) = us.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if us.is_empty() || max <= min {
        return Vec::new();
    }
    let width = (max - min) / LATENCY_HIST_BINS as f64;
    let mut counts = vec![0f64; LATENCY_HIST_BINS];
    for &v in us {
        let bin = (((v - min) / width) as usize).min(LATENCY_HIST_BINS - 1);
        counts[bin] += 1.0;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + (i as f64 + 0.5) * width, count))
        .collect()
}

/// Renders a 50-bin histogram of per-event latency (in microseconds) under
/// `out_dir/figures/latency_hist.png`.
pub fn plot_latency_hist(latencies_ns: &[u64], out_dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let figdir = figures_dir(out_dir)?;
    let us: Vec<f64> = latencies_ns.iter().map(|&ns| ns as f64 / 1_000.0).collect();
    let bins = histogram_bins(&us);
    let centers: Vec<f64> = bins.iter().map(|(c, _)| *c).collect();
    let counts: Vec<f64> = bins.iter().map(|(_, n)| *n).collect();

    let path = figdir.join("latency_hist.png");
    let mut fg = Figure::new();
    fg.axes2d()
        .set_title("Operation Latency Histogram (\u{3bc}s)", &[])
        .set_x_label("latency (\u{3bc}s)", &[])
        .set_y_label("count", &[])
        .boxes(&centers, &counts, &[]);
    fg.set_terminal("pngcairo", path.to_string_lossy().as_ref());
    fg.show().ok();

    Ok(path)
}
