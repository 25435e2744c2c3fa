// File: crates/chart-core/tests/charts.rs
// Purpose: Scene assembly, memoization and the synchronized cursor across charts.

use std::sync::Arc;

use chart_core::scene::TextAnchor;
use chart_core::svg::to_svg;
use chart_core::{ChartConfig, ChartStack, CombinedChart, Frame, Primitive, ScaleMode, Series, Size, Theme};
use chrono::{DateTime, Utc};

const BASE: i64 = 1_700_000_000;
// Default 800px container minus 64px left and 16px right insets.
const PLOT_LEFT: f32 = 64.0;
const PLOT_MID: f32 = 424.0;
const PLOT_RIGHT: f32 = 784.0;

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(BASE + secs, 0).expect("valid timestamp")
}

fn minutes(tag: &str, start_secs: i64, values: &[f64]) -> Arc<Series> {
    Arc::new(Series::from_samples(tag, values.iter().enumerate().map(|(i, v)| (ts(start_secs + i as i64 * 60), *v))))
}

fn rig_series() -> Vec<Arc<Series>> {
    let pressure = [1200.0, 1250.0, 1400.0, 1700.0, 1900.0, 2100.0, 1950.0, 1600.0, 1400.0, 1300.0, 1250.0];
    let temperature = [61.0, 62.0, 62.5, 63.0, 64.0, 66.0, 65.0, 64.5, 63.0, 62.0, 61.5];
    let mut p = Series::clone(&minutes("PRESS-01", 0, &pressure));
    p.upper_limit = Some(1800.0);
    vec![Arc::new(p), minutes("TEMP-01", 0, &temperature)]
}

fn paths(frame: &Frame) -> Vec<&Primitive> {
    frame.primitives().filter(|p| matches!(p, Primitive::Path { .. })).collect()
}

fn circles(frame: &Frame) -> usize {
    frame.primitives().filter(|p| matches!(p, Primitive::Circle { .. })).count()
}

fn has_text(frame: &Frame, wanted: &str) -> bool {
    frame.primitives().any(|p| matches!(p, Primitive::Text { text, .. } if text == wanted))
}

#[test]
fn combined_chart_draws_alarm_and_normal_paths() {
    let mut chart = CombinedChart::new(rig_series(), ChartConfig::default());
    let frame = chart.frame();
    let alarm = Theme::dark().alarm;

    assert_eq!(frame.width(), 800.0);
    assert_eq!(frame.height(), 320.0);
    assert!(frame.overlay.is_empty() && frame.tooltip.is_none());

    let paths = paths(&frame);
    assert_eq!(paths.len(), 3, "pressure in/out of range plus temperature");
    let alarm_paths = paths
        .iter()
        .filter(|p| matches!(p, Primitive::Path { stroke, .. } if stroke.color == alarm))
        .count();
    assert_eq!(alarm_paths, 1);
    assert_eq!(circles(&frame), 22);
    assert!(has_text(&frame, "PRESS-01"), "legend entry");
}

#[test]
fn scene_is_reused_until_inputs_change() {
    let mut chart = CombinedChart::new(rig_series(), ChartConfig::default());
    let first = chart.frame();
    let again = chart.frame();
    assert!(Arc::ptr_eq(&first.scene, &again.scene));

    chart.pointer_move(PLOT_MID);
    let hovered = chart.frame();
    assert!(Arc::ptr_eq(&first.scene, &hovered.scene), "hover only touches the overlay");

    assert!(chart.resize(Size::new(1024.0, 320.0)));
    assert!(!chart.resize(Size::new(1024.0, 320.0)));
    let resized = chart.frame();
    assert!(!Arc::ptr_eq(&first.scene, &resized.scene));
    assert_eq!(resized.width(), 1024.0);
}

#[test]
fn segments_survive_a_mode_round_trip() {
    let mut chart = CombinedChart::new(rig_series(), ChartConfig::default());
    chart.frame();
    assert_eq!((chart.segment_cache().hits(), chart.segment_cache().misses()), (0, 2));

    chart.set_mode(ScaleMode::Banded);
    let banded = chart.frame();
    assert_eq!(chart.segment_cache().misses(), 4);
    assert!(has_text(&banded, "PRESS-01") && has_text(&banded, "TEMP-01"), "band titles");
    assert_eq!(chart.scales().values.len(), 2);

    chart.set_mode(ScaleMode::Shared);
    chart.frame();
    assert_eq!((chart.segment_cache().hits(), chart.segment_cache().misses()), (2, 4));
}

#[test]
fn hover_adds_crosshair_and_tooltip() {
    let mut chart = CombinedChart::new(rig_series(), ChartConfig::default());
    let state = chart.pointer_move(PLOT_MID);
    assert_eq!(state.active(), Some(ts(300)));
    assert_eq!(chart.hover(), state);

    let frame = chart.frame();
    let tooltip = frame.tooltip.as_ref().expect("tooltip while hovering");
    assert_eq!(tooltip.timestamp, ts(300));
    let values: Vec<_> = tooltip.rows.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![Some(2100.0), Some(66.0)]);

    let crosshair = frame.overlay.iter().any(|p| {
        matches!(p, Primitive::Line { from, to, .. } if (from.x - PLOT_MID).abs() < 0.01 && from.x == to.x)
    });
    assert!(crosshair, "vertical crosshair at the snapped sample");
    assert!(frame.overlay.iter().any(|p| matches!(p, Primitive::Rect { .. })));

    chart.pointer_move(PLOT_LEFT - 10.0);
    assert!(chart.frame().overlay.is_empty());

    chart.pointer_move(PLOT_MID);
    chart.pointer_leave();
    assert!(!chart.hover().visible);
    assert!(chart.frame().tooltip.is_none());
}

#[test]
fn empty_chart_still_renders_axes() {
    let mut chart = CombinedChart::new(Vec::new(), ChartConfig::default()).pin_now(ts(0));
    let frame = chart.frame();
    assert!(paths(&frame).is_empty());
    assert!(!frame.scene.is_empty());
    assert!(!chart.pointer_move(PLOT_MID).visible);
}

#[test]
fn display_names_and_hidden_x_axis() {
    let mut config = ChartConfig::default();
    config.display_names.insert("PRESS-01".into(), "Standpipe pressure".into());
    config.show_x_axis = false;
    let mut chart = CombinedChart::new(rig_series(), config);
    let frame = chart.frame();

    assert!(has_text(&frame, "Standpipe pressure"));
    assert!(!has_text(&frame, "PRESS-01"));
    let time_labels = frame
        .primitives()
        .filter(|p| matches!(p, Primitive::Text { anchor: TextAnchor::Middle, .. }))
        .count();
    assert_eq!(time_labels, 0);
}

#[test]
fn single_sample_draws_a_marker_only() {
    let series = minutes("PRESS-01", 0, &[1500.0]);
    let mut stack = ChartStack::new(vec![series], ChartConfig::default());
    let frame = stack.frames().pop().expect("one chart");
    assert!(paths(&frame).is_empty());
    assert_eq!(circles(&frame), 1);
}

#[test]
fn stack_shares_one_cursor() {
    let series = vec![
        minutes("PRESS-01", 0, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]),
        minutes("TEMP-01", 120, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]),
    ];
    let mut stack = ChartStack::new(series, ChartConfig::default());
    let mut observer = stack.subscribe();
    assert_eq!(stack.len(), 2);

    let state = stack.pointer_move(0, PLOT_MID);
    assert_eq!(state.active(), Some(ts(300)));
    assert!(observer.has_changed());
    assert_eq!(observer.take().active(), Some(ts(300)));

    let frames = stack.frames();
    assert!(frames.iter().all(|f| !f.overlay.is_empty()), "every chart marks the cursor");
    let tooltip = frames[0].tooltip.as_ref().expect("chart under the pointer carries the tooltip");
    assert_eq!(tooltip.timestamp, ts(300));
    let tags: Vec<_> = tooltip.rows.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, ["PRESS-01", "TEMP-01"]);
    let values: Vec<_> = tooltip.rows.iter().map(|r| r.value).collect();
    assert_eq!(values, [Some(6.0), Some(4.0)]);
    assert!(frames[1].tooltip.is_none(), "one tooltip per stack");
    assert_eq!(stack.tooltip().as_ref(), Some(tooltip));
    assert!(stack.charts().iter().all(|c| c.hover() == state));

    // Chart 1 spans 120..720 s, so its midpoint is 420 s.
    assert_eq!(stack.pointer_move(1, PLOT_MID).active(), Some(ts(420)));
    let frames = stack.frames();
    assert!(frames[0].tooltip.is_none());
    let tags: Vec<_> = frames[1].tooltip.iter().flat_map(|t| &t.rows).map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, ["PRESS-01", "TEMP-01"]);

    assert!(!stack.pointer_move(1, 10.0).visible);
    assert!(stack.frames().iter().all(|f| f.overlay.is_empty()));

    stack.pointer_move(1, PLOT_MID);
    stack.pointer_leave();
    assert!(stack.frames().iter().all(|f| f.tooltip.is_none()));
    assert!(!stack.pointer_move(7, PLOT_MID).visible);
}

#[test]
fn stack_tooltip_keeps_stale_series_as_placeholders() {
    let config = ChartConfig { tooltip_placeholders: true, ..ChartConfig::default() };
    let series = vec![minutes("PRESS-01", 0, &[1.0; 11]), minutes("FLOW-01", 0, &[5.0, 5.0])];
    let mut stack = ChartStack::new(series, config);

    assert_eq!(stack.pointer_move(0, PLOT_RIGHT).active(), Some(ts(600)));
    let tooltip = stack.tooltip().expect("hovering");
    assert_eq!(tooltip.rows.len(), 2);
    assert_eq!(tooltip.rows[0].value, Some(1.0));
    assert_eq!(tooltip.rows[1].value, None, "last flow sample is 540 s old");
    assert_eq!(tooltip.rows[1].value_text(), "\u{2014}");
    assert_eq!(stack.frames()[0].tooltip, Some(tooltip));

    stack.pointer_leave();
    assert!(stack.tooltip().is_none());
}

#[test]
fn uneven_samples_snap_to_the_sample_under_the_pointer() {
    let series = Arc::new(Series::from_samples("PRESS-01", [0, 10, 20, 30, 600].map(|s| (ts(s), s as f64))));
    let mut stack = ChartStack::new(vec![series], ChartConfig::default());

    // x(30 s) = 64 + 30 / 600 * 720
    assert_eq!(stack.pointer_move(0, 100.0).active(), Some(ts(30)));
    let frame = stack.frames().pop().expect("one chart");
    let crosshair_x = frame
        .overlay
        .iter()
        .find_map(|p| match p {
            Primitive::Line { from, .. } => Some(from.x),
            _ => None,
        })
        .expect("crosshair line");
    assert!((crosshair_x - 100.0).abs() < 1e-3, "crosshair at {crosshair_x}");

    // 300 s is nearer to the 30 s sample than to 600 s.
    assert_eq!(stack.pointer_move(0, PLOT_MID).active(), Some(ts(30)));
    assert_eq!(stack.pointer_move(0, 772.0).active(), Some(ts(600)));
}

#[test]
fn scene_follows_series_identity() {
    let mut chart = CombinedChart::new(rig_series(), ChartConfig::default());
    let first = chart.frame();

    let same = chart.series().to_vec();
    chart.set_series(same);
    assert!(Arc::ptr_eq(&first.scene, &chart.frame().scene));

    // Same length and limits as before, different values.
    let mut replaced = rig_series();
    replaced[1] = minutes("TEMP-01", 0, &[70.0; 11]);
    chart.set_series(replaced);
    let second = chart.frame();
    assert!(!Arc::ptr_eq(&first.scene, &second.scene));
    assert_ne!(first.scene.primitives, second.scene.primitives);
}

#[test]
fn stack_resize_reaches_every_chart() {
    let mut stack = ChartStack::new(rig_series(), ChartConfig::default().with_height(200.0));
    assert!(stack.charts().iter().all(|c| c.dimensions().size() == Size::new(800.0, 200.0)));
    stack.resize_all(Size::new(640.0, 200.0));
    assert!(stack.frames().iter().all(|f| f.width() == 640.0 && f.height() == 200.0));
}

#[test]
fn svg_output_contains_every_layer() {
    let mut config = ChartConfig::default();
    config.display_names.insert("TEMP-01".into(), "Mud <in> & out".into());
    let mut chart = CombinedChart::new(rig_series(), config);
    chart.pointer_move(PLOT_MID);
    let svg = to_svg(&chart.frame());

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"320\""));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("<path d=\"M"));
    assert!(svg.contains("stroke-dasharray=\"4,4\""), "dashed limit line");
    assert!(svg.contains("Mud &lt;in&gt; &amp; out"));
    assert!(svg.contains("<circle"));
}
