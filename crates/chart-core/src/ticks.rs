// File: crates/chart-core/src/ticks.rs
// Summary: Evenly spaced axis ticks with HH:MM time labels and one-decimal value labels.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use crate::scale::{TimeScale, ValueScale};

/// Time tick count for a full-width plot.
pub const WIDE_TIME_TICKS: usize = 10;
/// Time tick count for narrow plots and per-series charts.
pub const NARROW_TIME_TICKS: usize = 5;
/// Plots narrower than this get the narrow tick count.
pub const NARROW_PLOT_PX: f32 = 600.0;
pub const MIN_VALUE_TICKS: usize = 6;
pub const MAX_VALUE_TICKS: usize = 8;

/// `steps` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps as f64 - 1.0);
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel position along the axis (x for time, y for values).
    pub position: f32,
    pub value: f64,
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickPlanner {
    pub time_count: usize,
    pub value_count: usize,
}

impl Default for TickPlanner {
    fn default() -> Self {
        Self { time_count: WIDE_TIME_TICKS, value_count: MIN_VALUE_TICKS }
    }
}

impl TickPlanner {
    pub fn new(time_count: usize, value_count: usize) -> Self {
        Self { time_count, value_count: value_count.clamp(MIN_VALUE_TICKS, MAX_VALUE_TICKS) }
    }

    /// Wide or narrow time tick count depending on the plot width.
    pub fn for_width(plot_width: f32) -> Self {
        let time_count = if plot_width < NARROW_PLOT_PX { NARROW_TIME_TICKS } else { WIDE_TIME_TICKS };
        Self { time_count, ..Self::default() }
    }

    /// Time ticks labeled in the viewer's local time zone.
    pub fn time_ticks(&self, scale: &TimeScale) -> Vec<Tick> {
        self.time_ticks_in(scale, &Local)
    }

    pub fn time_ticks_in<Tz>(&self, scale: &TimeScale, tz: &Tz) -> Vec<Tick>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        linspace(scale.domain.min, scale.domain.max, self.time_count)
            .into_iter()
            .map(|t| Tick { position: scale.to_px(t), value: t, label: format_time_label(t, tz) })
            .collect()
    }

    pub fn value_ticks(&self, scale: &ValueScale) -> Vec<Tick> {
        linspace(scale.domain.min, scale.domain.max, self.value_count)
            .into_iter()
            .map(|v| Tick { position: scale.to_px(v), value: v, label: format_value_label(v) })
            .collect()
    }
}

/// `HH:MM` of an epoch-ms instant in `tz`; `--:--` when the instant is not representable.
pub fn format_time_label<Tz>(t_ms: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !t_ms.is_finite() {
        return "--:--".to_string();
    }
    match DateTime::from_timestamp_millis(t_ms.round() as i64) {
        Some(utc) => utc.with_timezone(tz).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

pub fn format_value_label(v: f64) -> String {
    format!("{v:.1}")
}
