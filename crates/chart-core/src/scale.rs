// File: crates/chart-core/src/scale.rs
// Summary: Time (X) and value (Y) domains and pixel scales; shared vs banded strategies.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::geometry::{PlotRect, Point};
use crate::series::{DataPoint, Series};
use crate::types::BAND_GAP_PX;

/// Fraction of the value range added on each side of a value domain.
pub const PADDING_FRACTION: f64 = 0.1;
/// Ranges narrower than this are treated as flat.
pub const MIN_RANGE: f64 = 1e-6;
/// Half-width substituted around a flat value range.
pub const FLAT_RANGE_PAD: f64 = 1.0;
/// Time window used when there is nothing to span.
pub const FALLBACK_WINDOW_MS: i64 = 60_000;

/// Logical `[min, max]` range of a time or value axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 { self.max - self.min }

    pub fn contains(&self, v: f64) -> bool { v >= self.min && v <= self.max }

    /// Raw min/max of the finite values; `None` when there are none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| {
                Some(match acc {
                    None => Self::new(v, v),
                    Some(d) => Self::new(d.min.min(v), d.max.max(v)),
                })
            })
    }

    /// Pad by 10% of the range on both sides; flat ranges get a fixed pad instead.
    pub fn padded(self) -> Self {
        let span = self.span();
        if span.abs() < MIN_RANGE {
            return Self::new(self.min - FLAT_RANGE_PAD, self.max + FLAT_RANGE_PAD);
        }
        let pad = span * PADDING_FRACTION;
        Self::new(self.min - pad, self.max + pad)
    }

    /// Padded value domain over every finite value of `series`; `[0, 1]` without data.
    pub fn of_values<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = &'a Series>,
    {
        Self::from_values(series.into_iter().flat_map(|s| s.finite_values()))
            .map(Self::padded)
            .unwrap_or(Self::new(0.0, 1.0))
    }

    /// Time domain in epoch ms spanning all series. Without data the domain is the
    /// minute before `now`; a single instant is widened to a minute centered on it.
    pub fn of_time<'a, I>(series: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Series>,
    {
        let range = series.into_iter().filter_map(Series::time_range).reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
        match range {
            None => {
                let end = now.timestamp_millis() as f64;
                Self::new(end - FALLBACK_WINDOW_MS as f64, end)
            }
            Some((lo, hi)) if lo == hi => {
                let half = (FALLBACK_WINDOW_MS / 2) as f64;
                Self::new(lo as f64 - half, hi as f64 + half)
            }
            Some((lo, hi)) => Self::new(lo as f64, hi as f64),
        }
    }
}

/// Horizontal scale mapping epoch ms onto `[left_px, right_px]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub domain: Domain,
    pub left_px: f32,
    pub right_px: f32,
}

impl TimeScale {
    pub fn new(domain: Domain, left_px: f32, right_px: f32) -> Self {
        Self { domain, left_px, right_px }
    }
    #[inline]
    pub fn to_px(&self, t_ms: f64) -> f32 {
        let span = self.domain.span().max(1e-12);
        self.left_px + ((t_ms - self.domain.min) / span) as f32 * (self.right_px - self.left_px)
    }
    #[inline]
    pub fn to_px_at(&self, ts: &DateTime<Utc>) -> f32 {
        self.to_px(ts.timestamp_millis() as f64)
    }
    /// Inverse of `to_px`, in epoch ms.
    #[inline]
    pub fn from_px(&self, px: f32) -> f64 {
        let width = (self.right_px - self.left_px).max(1e-6);
        self.domain.min + ((px - self.left_px) / width) as f64 * self.domain.span()
    }
}

/// Vertical scale mapping a value domain onto `[top_px, bottom_px]`, larger values higher up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub domain: Domain,
    pub top_px: f32,
    pub bottom_px: f32,
}

impl ValueScale {
    pub fn new(domain: Domain, top_px: f32, bottom_px: f32) -> Self {
        Self { domain, top_px, bottom_px }
    }
    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        let span = self.domain.span().max(1e-12);
        self.bottom_px - ((v - self.domain.min) / span) as f32 * (self.bottom_px - self.top_px)
    }
    #[inline]
    pub fn from_px(&self, py: f32) -> f64 {
        let height = (self.bottom_px - self.top_px).max(1e-6);
        self.domain.min + ((self.bottom_px - py) / height) as f64 * self.domain.span()
    }
}

/// The `x`/`y` pair used to place one series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleMapping {
    pub x: TimeScale,
    pub y: ValueScale,
}

impl ScaleMapping {
    #[inline]
    pub fn point(&self, p: &DataPoint) -> Point {
        Point::new(self.x.to_px(p.t_ms() as f64), self.y.to_px(p.value))
    }

    /// Bit pattern of every float the mapping closes over, for cache keys.
    pub(crate) fn key_bits(&self) -> [u64; 8] {
        [
            self.x.domain.min.to_bits(),
            self.x.domain.max.to_bits(),
            u64::from(self.x.left_px.to_bits()),
            u64::from(self.x.right_px.to_bits()),
            self.y.domain.min.to_bits(),
            self.y.domain.max.to_bits(),
            u64::from(self.y.top_px.to_bits()),
            u64::from(self.y.bottom_px.to_bits()),
        ]
    }
}

/// How series share the vertical axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// One value scale for every series.
    #[default]
    Shared,
    /// Each series gets its own band and local value scale.
    Banded,
}

impl ScaleMode {
    pub fn strategy(self, band_gap_px: f32) -> Box<dyn ScaleStrategy> {
        match self {
            ScaleMode::Shared => Box::new(SharedScale),
            ScaleMode::Banded => Box::new(BandedScale { gap_px: band_gap_px }),
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScaleMode::Shared => "shared",
            ScaleMode::Banded => "banded",
        })
    }
}

impl FromStr for ScaleMode {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(ScaleMode::Shared),
            "banded" => Ok(ScaleMode::Banded),
            _ => Err(ChartError::UnknownMode(s.to_string())),
        }
    }
}

/// Produces one value scale per series (at least one, so axes stay drawable).
pub trait ScaleStrategy {
    fn mode(&self) -> ScaleMode;
    fn value_scales(&self, series: &[Arc<Series>], plot: &PlotRect) -> Vec<ValueScale>;
}

pub struct SharedScale;

impl ScaleStrategy for SharedScale {
    fn mode(&self) -> ScaleMode { ScaleMode::Shared }

    fn value_scales(&self, series: &[Arc<Series>], plot: &PlotRect) -> Vec<ValueScale> {
        let domain = Domain::of_values(series.iter().map(|s| s.as_ref()));
        let scale = ValueScale::new(domain, plot.top, plot.bottom);
        vec![scale; series.len().max(1)]
    }
}

pub struct BandedScale {
    pub gap_px: f32,
}

impl Default for BandedScale {
    fn default() -> Self { Self { gap_px: BAND_GAP_PX } }
}

impl BandedScale {
    /// Pixel `(top, bottom)` of band `index` out of `count` equal bands.
    pub fn band(&self, plot: &PlotRect, index: usize, count: usize) -> (f32, f32) {
        let count = count.max(1);
        let gaps = self.gap_px * (count - 1) as f32;
        let band_h = ((plot.height() - gaps) / count as f32).max(1.0);
        let top = plot.top + index as f32 * (band_h + self.gap_px);
        (top, top + band_h)
    }
}

impl ScaleStrategy for BandedScale {
    fn mode(&self) -> ScaleMode { ScaleMode::Banded }

    fn value_scales(&self, series: &[Arc<Series>], plot: &PlotRect) -> Vec<ValueScale> {
        if series.is_empty() {
            return vec![ValueScale::new(Domain::new(0.0, 1.0), plot.top, plot.bottom)];
        }
        let n = series.len();
        series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let (top, bottom) = self.band(plot, i, n);
                ValueScale::new(Domain::of_values([s.as_ref()]), top, bottom)
            })
            .collect()
    }
}

/// Scales for one plot: a shared time scale plus one value scale per series.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSet {
    pub mode: ScaleMode,
    pub time: TimeScale,
    pub values: Vec<ValueScale>,
}

impl ScaleSet {
    pub fn mapping(&self, index: usize) -> Option<ScaleMapping> {
        self.values.get(index).map(|&y| ScaleMapping { x: self.time, y })
    }

    /// Value scales that get their own axis: one in shared mode, one per band otherwise.
    pub fn axis_scales(&self) -> &[ValueScale] {
        match self.mode {
            ScaleMode::Shared => &self.values[..self.values.len().min(1)],
            ScaleMode::Banded => &self.values,
        }
    }
}

/// Builds a `ScaleSet` from series and the plot rect.
pub struct ScaleBuilder<'a> {
    series: &'a [Arc<Series>],
    plot: PlotRect,
    mode: ScaleMode,
    band_gap_px: f32,
    now: Option<DateTime<Utc>>,
}

impl<'a> ScaleBuilder<'a> {
    pub fn new(series: &'a [Arc<Series>], plot: PlotRect) -> Self {
        Self { series, plot, mode: ScaleMode::Shared, band_gap_px: BAND_GAP_PX, now: None }
    }

    pub fn mode(mut self, mode: ScaleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn band_gap(mut self, gap_px: f32) -> Self {
        self.band_gap_px = gap_px.max(0.0);
        self
    }

    /// Fix "now" for the empty-data fallback window.
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn build(self) -> ScaleSet {
        let now = self.now.unwrap_or_else(Utc::now);
        let time_domain = Domain::of_time(self.series.iter().map(|s| s.as_ref()), now);
        let time = TimeScale::new(time_domain, self.plot.left, self.plot.right);
        let strategy = self.mode.strategy(self.band_gap_px);
        let values = strategy.value_scales(self.series, &self.plot);
        ScaleSet { mode: strategy.mode(), time, values }
    }
}
