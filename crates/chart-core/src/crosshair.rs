// File: crates/chart-core/src/crosshair.rs
// Summary: Pointer-to-timestamp snapping, the shared hover store and tooltip assembly.
//
// One pointer handler writes the hover state; any number of sibling charts read it.
// The store is a `tokio::sync::watch` channel used synchronously: the publisher is
// not `Clone`, which keeps exactly one writer.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::trace;

use crate::geometry::PlotRect;
use crate::scale::TimeScale;
use crate::series::{Classification, DataPoint, Series};

/// Samples further than this from the cursor time are left out of the tooltip.
pub const STALENESS_THRESHOLD_MS: i64 = 5 * 60 * 1000;
/// Shown in place of a value for a series with no fresh sample.
pub const PLACEHOLDER: &str = "\u{2014}";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    pub visible: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

impl HoverState {
    pub const fn idle() -> Self {
        Self { visible: false, timestamp: None }
    }

    pub const fn hovering(timestamp: DateTime<Utc>) -> Self {
        Self { visible: true, timestamp: Some(timestamp) }
    }

    /// Snapped timestamp, only while visible.
    pub fn active(&self) -> Option<DateTime<Utc>> {
        if self.visible { self.timestamp } else { None }
    }
}

/// Create the hover store: one writer, clonable readers.
pub fn hover_channel() -> (HoverPublisher, HoverSubscriber) {
    let (tx, rx) = watch::channel(HoverState::idle());
    (HoverPublisher { tx }, HoverSubscriber { rx })
}

/// The single writer of the hover state.
#[derive(Debug)]
pub struct HoverPublisher {
    tx: watch::Sender<HoverState>,
}

impl HoverPublisher {
    /// Store `state`; readers are only notified when it differs from the current one.
    pub fn publish(&self, state: HoverState) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        })
    }

    pub fn clear(&self) -> bool {
        self.publish(HoverState::idle())
    }

    pub fn current(&self) -> HoverState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> HoverSubscriber {
        HoverSubscriber { rx: self.tx.subscribe() }
    }
}

/// A reader of the hover state.
#[derive(Clone, Debug)]
pub struct HoverSubscriber {
    rx: watch::Receiver<HoverState>,
}

impl HoverSubscriber {
    pub fn current(&self) -> HoverState {
        self.rx.borrow().clone()
    }

    /// Whether a new state was published since this reader last called `take`.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Read the state and mark it seen.
    pub fn take(&mut self) -> HoverState {
        self.rx.borrow_and_update().clone()
    }
}

/// Index of the sample nearest in time to `t_ms` by binary search over sorted data.
/// Equidistant neighbours resolve to the earlier sample.
pub fn nearest_index(data: &[DataPoint], t_ms: f64) -> Option<usize> {
    if data.is_empty() {
        return None;
    }
    let idx = data.partition_point(|p| (p.t_ms() as f64) < t_ms);
    if idx == 0 {
        return Some(0);
    }
    if idx >= data.len() {
        return Some(data.len() - 1);
    }
    let before = t_ms - data[idx - 1].t_ms() as f64;
    let after = data[idx].t_ms() as f64 - t_ms;
    Some(if after < before { idx } else { idx - 1 })
}

/// Index of the sample under `px` when samples are spread evenly across the plot.
/// Halfway positions resolve to the earlier sample.
pub fn nearest_index_by_position(len: usize, px: f32, plot: &PlotRect) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let frac = ((px - plot.left) / plot.width().max(1e-6)).clamp(0.0, 1.0) as f64;
    let pos = frac * (len - 1) as f64;
    let idx = (pos - 0.5).ceil().max(0.0) as usize;
    Some(idx.min(len - 1))
}

/// How a pointer position is turned into a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapStrategy {
    /// Invert the time scale and binary-search the reference timestamps.
    #[default]
    NearestTime,
    /// Map the pointer straight to a sample index. Only valid for plots that space
    /// samples evenly by index rather than by time.
    NearestIndex,
}

/// Pointer handler for one plot.
#[derive(Clone, Copy, Debug)]
pub struct Crosshair {
    pub plot: PlotRect,
    pub time: TimeScale,
    pub strategy: SnapStrategy,
}

impl Crosshair {
    pub fn new(plot: PlotRect, time: TimeScale, strategy: SnapStrategy) -> Self {
        Self { plot, time, strategy }
    }

    /// Timestamp of the reference sample under `px`, or `None` outside the plot.
    pub fn snap(&self, px: f32, reference: &Series) -> Option<DateTime<Utc>> {
        if !self.plot.contains_x(px) {
            return None;
        }
        let idx = match self.strategy {
            SnapStrategy::NearestTime => nearest_index(&reference.data, self.time.from_px(px)),
            SnapStrategy::NearestIndex => nearest_index_by_position(reference.len(), px, &self.plot),
        }?;
        Some(reference.data[idx].timestamp)
    }

    /// Handle a pointer move and publish the resulting state.
    pub fn pointer_move(&self, px: f32, reference: Option<&Series>, hover: &HoverPublisher) -> HoverState {
        let state = match reference.and_then(|s| self.snap(px, s)) {
            Some(ts) => HoverState::hovering(ts),
            None => HoverState::idle(),
        };
        if hover.publish(state.clone()) {
            trace!(px, visible = state.visible, "hover state changed");
        }
        state
    }

    pub fn pointer_leave(&self, hover: &HoverPublisher) {
        hover.clear();
    }
}

/// First series with at least one sample; snapping is done against it.
pub fn reference_series(series: &[Arc<Series>]) -> Option<&Series> {
    series.iter().map(|s| s.as_ref()).find(|s| !s.is_empty())
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipRow {
    pub series_index: usize,
    pub tag: String,
    pub label: String,
    /// `None` marks a placeholder row.
    pub value: Option<f64>,
    pub sample_time: Option<DateTime<Utc>>,
    pub class: Option<Classification>,
}

impl TooltipRow {
    pub fn value_text(&self) -> String {
        match self.value {
            Some(v) => format!("{v:.2}"),
            None => PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub timestamp: DateTime<Utc>,
    pub rows: Vec<TooltipRow>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TooltipOptions {
    pub staleness_ms: i64,
    /// Keep stale series as placeholder rows instead of dropping them.
    pub placeholders: bool,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self { staleness_ms: STALENESS_THRESHOLD_MS, placeholders: false }
    }
}

/// Nearest sample of every series to `timestamp`, filtered by staleness.
pub fn build_tooltip(
    series: &[Arc<Series>],
    timestamp: DateTime<Utc>,
    opts: &TooltipOptions,
    display_names: &HashMap<String, String>,
) -> Tooltip {
    let t_ms = timestamp.timestamp_millis();
    let rows = series
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let label = display_names.get(&s.tag).cloned().unwrap_or_else(|| s.tag.clone());
            let fresh = s.nearest(t_ms as f64).filter(|p| (p.t_ms() - t_ms).abs() <= opts.staleness_ms);
            match fresh {
                Some(p) => Some(TooltipRow {
                    series_index: i,
                    tag: s.tag.clone(),
                    label,
                    value: Some(p.value),
                    sample_time: Some(p.timestamp),
                    class: Some(s.limits().classify(p.value)),
                }),
                None if opts.placeholders => Some(TooltipRow {
                    series_index: i,
                    tag: s.tag.clone(),
                    label,
                    value: None,
                    sample_time: None,
                    class: None,
                }),
                None => None,
            }
        })
        .collect();
    Tooltip { timestamp, rows }
}
