// File: crates/demo/src/data.rs
// Summary: Telemetry input for the demo: CSV loading, per-tag overrides and synthetic rig data.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chart_core::{ChartConfig, DataPoint, Series};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};

/// One CSV row as exported by the telemetry store.
#[derive(Debug, Deserialize)]
struct Row {
    id: i64,
    series_owner_id: i64,
    tag: String,
    timestamp: DateTime<Utc>,
    value: f64,
    source_id: Option<i64>,
}

impl From<Row> for DataPoint {
    fn from(r: Row) -> Self {
        DataPoint {
            id: r.id,
            series_owner_id: r.series_owner_id,
            tag: r.tag,
            timestamp: r.timestamp,
            value: r.value,
            source_id: r.source_id,
        }
    }
}

/// Limits and color applied to one tag after loading.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeriesOverride {
    pub upper_limit: Option<f64>,
    pub lower_limit: Option<f64>,
    pub color: Option<String>,
}

/// Demo config file: the chart section plus `[series."TAG"]` overrides.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub chart: ChartConfig,
    pub series: HashMap<String, SeriesOverride>,
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&src).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn apply(&self, series: &mut [Series]) {
        for s in series.iter_mut() {
            let Some(o) = self.series.get(&s.tag) else { continue };
            if o.upper_limit.is_some() {
                s.upper_limit = o.upper_limit;
            }
            if o.lower_limit.is_some() {
                s.lower_limit = o.lower_limit;
            }
            if o.color.is_some() {
                s.color = o.color.clone();
            }
        }
        for tag in self.series.keys().filter(|t| !series.iter().any(|s| &s.tag == *t)) {
            warn!(%tag, "override for a tag with no data");
        }
    }
}

/// Load rows and group them into series ordered by tag, each sorted by timestamp.
pub fn load_csv(path: &Path) -> Result<Vec<Series>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut by_tag: BTreeMap<String, Vec<DataPoint>> = BTreeMap::new();
    let mut skipped = 0usize;
    for (line, rec) in rdr.deserialize::<Row>().enumerate() {
        match rec {
            Ok(row) => by_tag.entry(row.tag.clone()).or_default().push(row.into()),
            Err(e) => {
                skipped += 1;
                warn!(line = line + 2, error = %e, "skipping malformed row");
            }
        }
    }

    let series: Vec<Series> = by_tag
        .into_iter()
        .map(|(tag, mut data)| {
            data.sort_by_key(DataPoint::t_ms);
            Series::with_data(tag, data)
        })
        .collect();
    info!(path = %path.display(), series = series.len(), skipped, "loaded telemetry");
    Ok(series)
}

/// Two hours of 30 s samples for pressure, mud temperature and flow. Flow stops
/// reporting partway through so the tooltip shows stale handling.
pub fn synthetic(end: DateTime<Utc>) -> Vec<Series> {
    const STEP_SECS: i64 = 30;
    const SAMPLES: i64 = 240;
    let start = end - Duration::seconds(STEP_SECS * (SAMPLES - 1));
    let at = |i: i64| start + Duration::seconds(i * STEP_SECS);

    let pressure = (0..SAMPLES).map(|i| {
        let t = i as f64;
        (at(i), 1500.0 + (t * 0.07).sin() * 250.0 + (t * 0.013).cos() * 120.0)
    });
    let temperature = (0..SAMPLES).map(|i| {
        let t = i as f64;
        (at(i), 62.0 + t * 0.02 + (t * 0.05).sin() * 3.5)
    });
    let flow = (0..SAMPLES * 3 / 5).map(|i| {
        let t = i as f64;
        (at(i), 420.0 + (t * 0.11).sin() * 60.0)
    });

    vec![
        Series::from_samples("PRESS-01", pressure).with_upper_limit(1800.0).with_lower_limit(1250.0),
        Series::from_samples("TEMP-01", temperature).with_upper_limit(66.0),
        Series::from_samples("FLOW-01", flow).with_lower_limit(380.0),
    ]
}

pub fn into_shared(series: Vec<Series>) -> Vec<Arc<Series>> {
    series.into_iter().map(Arc::new).collect()
}
