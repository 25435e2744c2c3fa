// File: crates/demo/src/main.rs
// Summary: Demo loads rig telemetry CSV (or synthesizes it), renders a combined chart and one
// chart per series to SVG, then simulates a hover and logs the synchronized tooltip.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chart_core::svg::to_svg;
use chart_core::{ChartStack, CombinedChart, Frame, ScaleMode, Size, Tooltip};
use chrono::Utc;
use clap::Parser;
use tracing::info;

mod data;

use data::DemoConfig;

/// Render rig telemetry charts
#[derive(Parser, Debug)]
#[command(name = "rigchart-demo")]
#[command(about = "Render combined and per-series telemetry charts with threshold highlighting")]
struct Args {
    /// CSV with columns id,series_owner_id,tag,timestamp,value,source_id; synthetic data when omitted
    input: Option<PathBuf>,

    /// TOML file with a [chart] section and [series."TAG"] overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "target/out")]
    out_dir: PathBuf,

    /// Scale mode of the combined chart (shared or banded); overrides the config
    #[arg(short, long)]
    mode: Option<ScaleMode>,

    /// Container width in pixels
    #[arg(long, default_value = "1200")]
    width: f32,

    /// Simulated pointer position as a fraction of the plot width
    #[arg(long, default_value = "0.5")]
    hover_at: f32,

    /// Also write PNGs through the Skia backend
    #[cfg(feature = "png")]
    #[arg(long, default_value = "false")]
    png: bool,
}

fn main() -> Result<()> {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    let mut series = match &args.input {
        Some(path) => data::load_csv(path).with_context(|| format!("failed to load CSV '{}'", path.display()))?,
        None => {
            info!("no input given, using synthetic rig data");
            data::synthetic(Utc::now())
        }
    };
    if series.is_empty() {
        anyhow::bail!("no series loaded; check the CSV headers");
    }
    cfg.apply(&mut series);

    let mut chart_cfg = cfg.chart.clone();
    if let Some(mode) = args.mode {
        chart_cfg.mode = mode;
    }
    let size = Size::new(args.width, chart_cfg.height);
    let series = data::into_shared(series);
    std::fs::create_dir_all(&args.out_dir).with_context(|| format!("creating {}", args.out_dir.display()))?;

    // Combined view.
    let mut combined = CombinedChart::new(series.clone(), chart_cfg.clone());
    combined.resize(size);
    let plot = combined.plot_rect();
    let px = plot.left + plot.width() * args.hover_at.clamp(0.0, 1.0);
    let state = combined.pointer_move(px);
    info!(px, visible = state.visible, timestamp = ?state.timestamp, "simulated hover");

    let frame = combined.frame();
    log_tooltip("combined", frame.tooltip.as_ref());
    write_outputs(&args, &frame, &format!("combined_{}", combined.config().mode))?;

    // Per-series views on one synchronized cursor.
    let mut stack = ChartStack::new(series.clone(), chart_cfg.with_mode(ScaleMode::Shared));
    stack.resize_all(size);
    stack.pointer_move(0, px);
    log_tooltip("stack", stack.tooltip().as_ref());
    for (s, frame) in series.iter().zip(stack.frames()) {
        write_outputs(&args, &frame, &format!("chart_{}", file_safe(&s.tag)))?;
    }

    info!(
        hits = combined.segment_cache().hits(),
        misses = combined.segment_cache().misses(),
        "segment cache"
    );
    Ok(())
}

fn log_tooltip(view: &str, tooltip: Option<&Tooltip>) {
    let Some(tooltip) = tooltip else {
        info!(view, "no tooltip");
        return;
    };
    for row in &tooltip.rows {
        info!(view, at = %tooltip.timestamp, label = %row.label, value = %row.value_text(), class = ?row.class, "tooltip row");
    }
}

fn write_outputs(args: &Args, frame: &Frame, stem: &str) -> Result<()> {
    let svg_path = args.out_dir.join(format!("{stem}.svg"));

    // With the Skia backend both files come out of the same renderer.
    #[cfg(feature = "png")]
    if args.png {
        let renderer = chart_render_skia::SkiaRenderer::new();
        let png_path = args.out_dir.join(format!("{stem}.png"));
        renderer.render_to_png(frame, &png_path)?;
        renderer.render_to_svg(frame, &svg_path)?;
        info!(png = %png_path.display(), svg = %svg_path.display(), "wrote skia outputs");
        return Ok(());
    }

    write_svg(frame, &svg_path)?;
    info!(path = %svg_path.display(), primitives = frame.primitives().count(), "wrote svg");
    Ok(())
}

fn write_svg(frame: &Frame, path: &Path) -> Result<()> {
    std::fs::write(path, to_svg(frame)).with_context(|| format!("writing {}", path.display()))
}

/// Tags become file names; keep them to a portable character set.
fn file_safe(tag: &str) -> String {
    tag.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' }).collect()
}
