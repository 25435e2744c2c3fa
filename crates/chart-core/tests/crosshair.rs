// File: crates/chart-core/tests/crosshair.rs
// Purpose: Nearest-sample snapping, the hover store and tooltip staleness.

use std::collections::HashMap;
use std::sync::Arc;

use chart_core::crosshair::{
    build_tooltip, nearest_index, nearest_index_by_position, reference_series, Crosshair, SnapStrategy,
    TooltipOptions, PLACEHOLDER,
};
use chart_core::geometry::PlotRect;
use chart_core::scale::TimeScale;
use chart_core::{hover_channel, Classification, Domain, HoverState, Series};
use chrono::{DateTime, Utc};

const BASE: i64 = 1_700_000_000;

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(BASE + secs, 0).expect("valid timestamp")
}

fn ms(secs: i64) -> f64 {
    ts(secs).timestamp_millis() as f64
}

fn minutes(tag: &str, values: &[f64]) -> Series {
    Series::from_samples(tag, values.iter().enumerate().map(|(i, v)| (ts(i as i64 * 60), *v)))
}

#[test]
fn snaps_to_nearest_sample_in_time() {
    let s = minutes("PRESS-01", &[1.0, 2.0, 3.0]);
    assert_eq!(nearest_index(&s.data, ms(85)), Some(1));
    assert_eq!(nearest_index(&s.data, ms(95)), Some(2));
    assert_eq!(nearest_index(&s.data, ms(60)), Some(1));
    assert_eq!(nearest_index(&s.data, ms(-500)), Some(0));
    assert_eq!(nearest_index(&s.data, ms(9_000)), Some(2));
    assert_eq!(nearest_index(&[], ms(0)), None);
}

#[test]
fn equidistant_cursor_takes_the_earlier_sample() {
    let s = minutes("PRESS-01", &[1.0, 2.0, 3.0]);
    assert_eq!(nearest_index(&s.data, ms(90)), Some(1));
    assert_eq!(s.nearest(ms(30)).map(|p| p.timestamp), Some(ts(0)));
}

#[test]
fn index_snap_spreads_samples_across_the_plot() {
    let plot = PlotRect::from_ltrb(0.0, 0.0, 100.0, 50.0);
    assert_eq!(nearest_index_by_position(3, 0.0, &plot), Some(0));
    assert_eq!(nearest_index_by_position(3, 25.0, &plot), Some(0), "halfway goes to the earlier sample");
    assert_eq!(nearest_index_by_position(3, 26.0, &plot), Some(1));
    assert_eq!(nearest_index_by_position(3, 74.0, &plot), Some(1));
    assert_eq!(nearest_index_by_position(3, 100.0, &plot), Some(2));
    assert_eq!(nearest_index_by_position(1, 60.0, &plot), Some(0));
    assert_eq!(nearest_index_by_position(0, 60.0, &plot), None);
}

#[test]
fn crosshair_inverts_the_time_scale() {
    let s = minutes("PRESS-01", &[1.0, 2.0, 3.0]);
    let plot = PlotRect::from_ltrb(0.0, 0.0, 120.0, 50.0);
    let time = TimeScale::new(Domain::new(ms(0), ms(120)), plot.left, plot.right);
    let crosshair = Crosshair::new(plot, time, SnapStrategy::NearestTime);

    assert_eq!(crosshair.snap(85.0, &s), Some(ts(60)));
    assert_eq!(crosshair.snap(95.0, &s), Some(ts(120)));
    assert_eq!(crosshair.snap(90.0, &s), Some(ts(60)));
    assert_eq!(crosshair.snap(-1.0, &s), None);
    assert_eq!(crosshair.snap(121.0, &s), None);
}

#[test]
fn pointer_outside_the_plot_goes_idle() {
    let s = minutes("PRESS-01", &[1.0, 2.0, 3.0]);
    let plot = PlotRect::from_ltrb(10.0, 0.0, 130.0, 50.0);
    let time = TimeScale::new(Domain::new(ms(0), ms(120)), plot.left, plot.right);
    let crosshair = Crosshair::new(plot, time, SnapStrategy::NearestTime);
    let (writer, reader) = hover_channel();

    let state = crosshair.pointer_move(70.0, Some(&s), &writer);
    assert_eq!(state, HoverState::hovering(ts(60)));
    assert_eq!(reader.current().active(), Some(ts(60)));

    let state = crosshair.pointer_move(5.0, Some(&s), &writer);
    assert_eq!(state, HoverState::idle());
    assert!(!reader.current().visible);

    crosshair.pointer_move(70.0, Some(&s), &writer);
    crosshair.pointer_leave(&writer);
    assert_eq!(reader.current(), HoverState::idle());

    assert_eq!(crosshair.pointer_move(70.0, None, &writer), HoverState::idle());
}

#[test]
fn hover_store_notifies_only_on_change() {
    let (writer, mut reader) = hover_channel();
    let mut sibling = reader.clone();

    assert!(writer.publish(HoverState::hovering(ts(60))));
    assert!(!writer.publish(HoverState::hovering(ts(60))), "same state is not a change");
    assert!(reader.has_changed() && sibling.has_changed());

    assert_eq!(reader.take().active(), Some(ts(60)));
    assert!(!reader.has_changed());
    assert!(sibling.has_changed());
    assert_eq!(sibling.take(), reader.current());

    assert!(writer.clear());
    assert!(!writer.clear());
    assert_eq!(writer.subscribe().current(), HoverState::idle());
}

#[test]
fn reference_is_the_first_series_with_data() {
    let series = vec![Arc::new(Series::new("EMPTY")), Arc::new(minutes("TEMP-01", &[1.0]))];
    assert_eq!(reference_series(&series).map(|s| s.tag.as_str()), Some("TEMP-01"));
    assert!(reference_series(&series[..1]).is_none());
}

#[test]
fn stale_series_are_left_out_of_the_tooltip() {
    let fresh = minutes("PRESS-01", &[10.0, 20.0, 30.0]).with_upper_limit(25.0);
    let stale = Series::from_samples("TEMP-01", [(ts(-600), 55.0)]);
    let series = vec![Arc::new(fresh), Arc::new(stale)];

    let tip = build_tooltip(&series, ts(60), &TooltipOptions::default(), &HashMap::new());
    assert_eq!(tip.timestamp, ts(60));
    assert_eq!(tip.rows.len(), 1);
    assert_eq!(tip.rows[0].tag, "PRESS-01");
    assert_eq!(tip.rows[0].value, Some(20.0));
    assert_eq!(tip.rows[0].value_text(), "20.00");
    assert_eq!(tip.rows[0].class, Some(Classification::InRange));

    let tip = build_tooltip(&series, ts(120), &TooltipOptions::default(), &HashMap::new());
    assert_eq!(tip.rows[0].class, Some(Classification::OutOfRange));
}

#[test]
fn staleness_threshold_is_inclusive() {
    let series = vec![Arc::new(Series::from_samples("PRESS-01", [(ts(0), 1.0)]))];
    let opts = TooltipOptions::default();
    assert_eq!(build_tooltip(&series, ts(300), &opts, &HashMap::new()).rows.len(), 1);
    assert!(build_tooltip(&series, ts(301), &opts, &HashMap::new()).rows.is_empty());
}

#[test]
fn placeholders_keep_stale_rows() {
    let series = vec![
        Arc::new(minutes("PRESS-01", &[10.0, 20.0])),
        Arc::new(Series::from_samples("TEMP-01", [(ts(-3_600), 55.0)])),
        Arc::new(Series::new("FLOW-01")),
    ];
    let names = HashMap::from([("TEMP-01".to_string(), "Mud temperature".to_string())]);
    let opts = TooltipOptions { placeholders: true, ..TooltipOptions::default() };

    let tip = build_tooltip(&series, ts(0), &opts, &names);
    assert_eq!(tip.rows.len(), 3);
    assert_eq!(tip.rows[1].label, "Mud temperature");
    assert_eq!(tip.rows[1].value, None);
    assert_eq!(tip.rows[1].value_text(), PLACEHOLDER);
    assert_eq!(tip.rows[2].series_index, 2);
    assert_eq!(tip.rows[2].value_text(), PLACEHOLDER);
}
