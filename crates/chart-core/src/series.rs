// File: crates/chart-core/src/series.rs
// Summary: Telemetry data model: samples, tagged series and their alarm limits.
// Notes:
// - Series data must arrive sorted by ascending timestamp; nothing here re-sorts it.
// - The engine only reads series. Callers share them as `Arc<Series>` so that the
//   memo layers can key on identity instead of hashing every sample.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sensor sample as delivered by the data layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: i64,
    pub series_owner_id: i64,
    pub tag: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub source_id: Option<i64>,
}

impl DataPoint {
    pub fn new(tag: impl Into<String>, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { id: 0, series_owner_id: 0, tag: tag.into(), timestamp, value, source_id: None }
    }

    /// Timestamp as epoch milliseconds, the unit every scale works in.
    #[inline]
    pub fn t_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Whether a value (or a piece of line) sits inside the alarm limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    InRange,
    OutOfRange,
}

/// Optional upper/lower alarm limits of a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

impl Limits {
    pub const fn new(upper: Option<f64>, lower: Option<f64>) -> Self {
        Self { upper, lower }
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_none() && self.lower.is_none()
    }

    /// Out of range only when strictly above `upper` or strictly below `lower`;
    /// a value equal to a limit is in range.
    pub fn classify(&self, value: f64) -> Classification {
        let above = self.upper.is_some_and(|u| value > u);
        let below = self.lower.is_some_and(|l| value < l);
        if above || below { Classification::OutOfRange } else { Classification::InRange }
    }

    /// Defined limits in (upper, lower) order.
    pub fn iter(&self) -> impl Iterator<Item = f64> {
        self.upper.into_iter().chain(self.lower)
    }
}

/// One named, time-ordered stream of sensor values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub tag: String,
    pub data: Vec<DataPoint>,
    pub upper_limit: Option<f64>,
    pub lower_limit: Option<f64>,
    pub color: Option<String>,
}

impl Series {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    pub fn with_data(tag: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self { tag: tag.into(), data, ..Self::default() }
    }

    /// Build from `(timestamp, value)` pairs, stamping each sample with the tag.
    pub fn from_samples<I>(tag: impl Into<String>, samples: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let tag = tag.into();
        let data = samples
            .into_iter()
            .enumerate()
            .map(|(i, (ts, v))| DataPoint { id: i as i64, ..DataPoint::new(tag.clone(), ts, v) })
            .collect();
        Self { tag, data, ..Self::default() }
    }

    pub fn with_upper_limit(mut self, upper: f64) -> Self {
        self.upper_limit = Some(upper);
        self
    }

    pub fn with_lower_limit(mut self, lower: f64) -> Self {
        self.lower_limit = Some(lower);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn limits(&self) -> Limits {
        Limits::new(self.upper_limit, self.lower_limit)
    }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    pub fn len(&self) -> usize { self.data.len() }

    /// A line needs at least two samples.
    pub fn can_draw_line(&self) -> bool { self.data.len() >= 2 }

    /// Finite values of the series, in order.
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(|p| p.value).filter(|v| v.is_finite())
    }

    /// Earliest and latest timestamp in epoch ms.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        self.data.iter().fold(None, |acc, p| {
            let t = p.t_ms();
            Some(match acc {
                None => (t, t),
                Some((lo, hi)) => (lo.min(t), hi.max(t)),
            })
        })
    }

    /// Sample nearest in time to `t_ms`; earlier sample on ties.
    pub fn nearest(&self, t_ms: f64) -> Option<&DataPoint> {
        crate::crosshair::nearest_index(&self.data, t_ms).map(|i| &self.data[i])
    }
}
