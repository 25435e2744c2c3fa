// File: crates/chart-render-skia/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders deterministic combined and banded charts to PNG bytes (text off).
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares decoded pixels for exact match.
// - Else, logs a note and skips without failing to ease first run.

use std::path::PathBuf;
use std::sync::Arc;

use chart_core::{ChartConfig, CombinedChart, ScaleMode, Series};
use chart_render_skia::SkiaRenderer;
use chrono::DateTime;

fn rig() -> Vec<Arc<Series>> {
    let ts = |i: i64| DateTime::from_timestamp(1_700_000_000 + i * 60, 0).expect("valid timestamp");
    let pressure = [1200.0, 1500.0, 1900.0, 2100.0, 1700.0, 1300.0];
    let temperature = [61.0, 63.0, 66.5, 64.0, 58.0, 62.0];
    vec![
        Arc::new(Series::from_samples("PRESS-01", (0..6).map(|i| (ts(i), pressure[i as usize]))).with_upper_limit(1800.0)),
        Arc::new(
            Series::from_samples("TEMP-01", (0..6).map(|i| (ts(i), temperature[i as usize])))
                .with_lower_limit(60.0)
                .with_upper_limit(65.0),
        ),
    ]
}

fn render_bytes(mode: ScaleMode) -> Vec<u8> {
    let mut chart = CombinedChart::new(rig(), ChartConfig::default().with_mode(mode));
    SkiaRenderer::without_text().render_to_png_bytes(&chart.frame()).expect("render png")
}

fn check(name: &str, bytes: &[u8]) {
    let snap_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join(name);

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        // Compare decoded pixel buffers to avoid PNG encoder variance
        let got_img = image::load_from_memory(bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn golden_shared_chart() {
    check("shared_chart.png", &render_bytes(ScaleMode::Shared));
}

#[test]
fn golden_banded_chart() {
    check("banded_chart.png", &render_bytes(ScaleMode::Banded));
}
