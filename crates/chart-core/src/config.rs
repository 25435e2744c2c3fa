// File: crates/chart-core/src/config.rs
// Summary: Chart configuration with defaults, loadable from TOML.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::crosshair::{TooltipOptions, STALENESS_THRESHOLD_MS};
use crate::downsample::DEFAULT_MAX_MARKERS;
use crate::error::Result;
use crate::scale::ScaleMode;
use crate::theme::{self, Theme};
use crate::ticks::{MIN_VALUE_TICKS, WIDE_TIME_TICKS};
use crate::types::{Insets, BAND_GAP_PX, DEFAULT_HEIGHT};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Requested container height; width comes from the dimension observer.
    pub height: f32,
    pub mode: ScaleMode,
    pub insets: Insets,
    pub show_x_axis: bool,
    pub show_markers: bool,
    pub show_legend: bool,
    /// Tag -> label shown in legends, band titles and tooltips.
    pub display_names: HashMap<String, String>,
    pub time_ticks: usize,
    pub value_ticks: usize,
    pub max_markers: usize,
    pub staleness_secs: i64,
    /// Keep stale series in the tooltip as `—` rows.
    pub tooltip_placeholders: bool,
    pub band_gap_px: f32,
    pub theme: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            mode: ScaleMode::Shared,
            insets: Insets::default(),
            show_x_axis: true,
            show_markers: true,
            show_legend: true,
            display_names: HashMap::new(),
            time_ticks: WIDE_TIME_TICKS,
            value_ticks: MIN_VALUE_TICKS,
            max_markers: DEFAULT_MAX_MARKERS,
            staleness_secs: STALENESS_THRESHOLD_MS / 1000,
            tooltip_placeholders: false,
            band_gap_px: BAND_GAP_PX,
            theme: "dark".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_mode(mut self, mode: ScaleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn display_name<'a>(&'a self, tag: &'a str) -> &'a str {
        self.display_names.get(tag).map(String::as_str).unwrap_or(tag)
    }

    pub fn theme(&self) -> Theme {
        theme::find(&self.theme)
    }

    pub fn tooltip_options(&self) -> TooltipOptions {
        TooltipOptions {
            staleness_ms: self.staleness_secs.saturating_mul(1000),
            placeholders: self.tooltip_placeholders,
        }
    }
}
