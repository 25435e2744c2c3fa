// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; time-series charting engine for rig telemetry.
// Scales, threshold segmenting, ticks, crosshair sync and renderer-agnostic scenes.

pub mod cache;
pub mod chart;
pub mod config;
pub mod crosshair;
pub mod dimension;
pub mod downsample;
pub mod error;
pub mod geometry;
pub mod scale;
pub mod scene;
pub mod segment;
pub mod series;
pub mod svg;
pub mod theme;
pub mod ticks;
pub mod types;

pub use cache::{RenderKey, SegmentCache};
pub use chart::{Chart, ChartStack, CombinedChart};
pub use config::ChartConfig;
pub use crosshair::{hover_channel, HoverPublisher, HoverState, HoverSubscriber, Tooltip, TooltipRow};
pub use dimension::{DimensionObserver, ResizeHub, ResizeSource};
pub use error::{ChartError, Result};
pub use geometry::{PlotRect, Point};
pub use scale::{Domain, ScaleBuilder, ScaleMapping, ScaleMode, ScaleSet, TimeScale, ValueScale};
pub use scene::{Color, Frame, Primitive, Scene};
pub use segment::{SegmentedLine, ThresholdSegmenter};
pub use series::{Classification, DataPoint, Limits, Series};
pub use theme::Theme;
pub use ticks::TickPlanner;
pub use types::{Insets, Size};
