use std::sync::Arc;

use chart_core::{ChartConfig, CombinedChart, ScaleMode, Series, Size};
use chrono::DateTime;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn gen_rig(n: usize) -> Vec<Arc<Series>> {
    let start = 1_700_000_000i64;
    let ts = |i: usize| DateTime::from_timestamp(start + i as i64 * 5, 0).unwrap_or_default();
    let pressure = (0..n).map(|i| (ts(i), 1500.0 + (i as f64 * 0.003).sin() * 400.0));
    let temperature = (0..n).map(|i| (ts(i), 60.0 + (i as f64 * 0.0007).cos() * 8.0));
    vec![
        Arc::new(Series::from_samples("PRESS-01", pressure).with_upper_limit(1800.0)),
        Arc::new(Series::from_samples("TEMP-01", temperature).with_lower_limit(54.0).with_upper_limit(66.0)),
    ]
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("combined_scene");
    for mode in [ScaleMode::Shared, ScaleMode::Banded] {
        let series = gen_rig(20_000);
        // A resize forces a full rebuild; the segment cache is cold on every batch.
        group.bench_function(format!("rebuild_{mode}"), |b| {
            b.iter_batched(
                || CombinedChart::new(series.clone(), ChartConfig::default().with_mode(mode)),
                |mut chart| {
                    chart.resize(Size::new(1280.0, 480.0));
                    black_box(chart.frame());
                },
                BatchSize::SmallInput,
            );
        });
    }

    let mut chart = CombinedChart::new(gen_rig(20_000), ChartConfig::default());
    chart.frame();
    group.bench_function("hover_overlay", |b| {
        let mut px = 64.0f32;
        b.iter(|| {
            px = if px > 780.0 { 64.0 } else { px + 3.0 };
            chart.pointer_move(px);
            black_box(chart.frame());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scene);
criterion_main!(benches);
