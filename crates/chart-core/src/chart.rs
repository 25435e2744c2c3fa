// File: crates/chart-core/src/chart.rs
// Summary: Chart composition. Wires scales, segments, ticks and the crosshair into frames:
// `CombinedChart` plots every series in one view, `Chart` plots one series, and
// `ChartStack` keeps a column of `Chart`s on one synchronized cursor.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tracing::debug;

use crate::cache::{RenderKey, SegmentCache};
use crate::config::ChartConfig;
use crate::crosshair::{
    build_tooltip, hover_channel, reference_series, Crosshair, HoverPublisher, HoverState, HoverSubscriber,
    SnapStrategy, Tooltip,
};
use crate::dimension::DimensionObserver;
use crate::geometry::{PlotRect, Point};
use crate::scale::{ScaleBuilder, ScaleMapping, ScaleMode, ScaleSet};
use crate::scene::{Color, Frame, Primitive, Scene, Stroke, TextAnchor};
use crate::segment::ThresholdSegmenter;
use crate::series::{Classification, Series};
use crate::theme::Theme;
use crate::ticks::{Tick, TickPlanner, NARROW_PLOT_PX, NARROW_TIME_TICKS};
use crate::types::Size;

const LABEL_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 12.0;
const TOOLTIP_LINE_PX: f32 = 16.0;
// Rough glyph advance for box sizing; the core has no text shaper.
const GLYPH_ADVANCE_PX: f32 = 6.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    /// All series in one plot, overlaid or banded.
    Combined,
    /// A single series with its own scale.
    Single,
}

/// Which tooltip box a frame's overlay carries.
#[derive(Clone, Copy)]
enum TooltipBox<'a> {
    /// Built from the plotter's own series.
    Own,
    /// Built by the owner of several plotters over all of their series.
    Shared(&'a Tooltip),
    /// Crosshair line and highlighted samples only.
    Hidden,
}

#[derive(Clone)]
struct Memo {
    key: RenderKey,
    /// Inputs the scene was built from. Holding them keeps their addresses out of reuse.
    series: Vec<Arc<Series>>,
    plot: PlotRect,
    scales: ScaleSet,
    scene: Arc<Scene>,
}

/// Shared plumbing of both chart kinds: inputs, memo, and scene assembly.
struct Plotter {
    series: Vec<Arc<Series>>,
    config: ChartConfig,
    theme: Theme,
    dims: DimensionObserver,
    segments: SegmentCache,
    memo: Option<Memo>,
    layout: Layout,
    now: Option<DateTime<Utc>>,
}

impl Plotter {
    fn new(series: Vec<Arc<Series>>, config: ChartConfig, layout: Layout) -> Self {
        Self {
            series,
            theme: config.theme(),
            dims: DimensionObserver::new(config.height),
            config,
            segments: SegmentCache::default(),
            memo: None,
            layout,
            now: None,
        }
    }

    fn mode(&self) -> ScaleMode {
        match self.layout {
            Layout::Combined => self.config.mode,
            Layout::Single => ScaleMode::Shared,
        }
    }

    fn tick_planner(&self, plot: &PlotRect) -> TickPlanner {
        let time_count = match self.layout {
            Layout::Single => NARROW_TIME_TICKS.min(self.config.time_ticks),
            Layout::Combined if plot.width() < NARROW_PLOT_PX => NARROW_TIME_TICKS.min(self.config.time_ticks),
            Layout::Combined => self.config.time_ticks,
        };
        TickPlanner::new(time_count, self.config.value_ticks)
    }

    fn invalidate(&mut self) {
        self.memo = None;
    }

    /// Current scales and scene, rebuilt only when the render key changes.
    fn ensure(&mut self) -> Memo {
        let size = self.dims.size();
        let mode = self.mode();
        let key = RenderKey::new(&self.series, size, mode);
        if let Some(memo) = self.memo.as_ref().filter(|m| m.key == key && same_series(&m.series, &self.series)) {
            return memo.clone();
        }

        debug!(series = self.series.len(), width = size.width, height = size.height, %mode, "rebuilding chart scene");
        let plot = PlotRect::from_size(size, &self.config.insets);
        let mut builder = ScaleBuilder::new(&self.series, plot).mode(mode).band_gap(self.config.band_gap_px);
        if let Some(now) = self.now {
            builder = builder.now(now);
        }
        let scales = builder.build();
        let scene = Arc::new(self.build_scene(size, &plot, &scales));
        let memo = Memo { key, series: self.series.clone(), plot, scales, scene };
        self.memo = Some(memo.clone());
        memo
    }

    fn build_scene(&mut self, size: Size, plot: &PlotRect, scales: &ScaleSet) -> Scene {
        let theme = self.theme;
        let mut scene = Scene::new(size.width, size.height, theme.background);

        let planner = self.tick_planner(plot);
        let time_ticks = planner.time_ticks(&scales.time);
        let value_ticks: Vec<Vec<Tick>> = scales.axis_scales().iter().map(|s| planner.value_ticks(s)).collect();

        draw_grid(&mut scene, plot, &time_ticks, &value_ticks, &theme);
        draw_axes(&mut scene, plot, &time_ticks, &value_ticks, &theme, self.config.show_x_axis);

        for (i, s) in self.series.iter().enumerate() {
            let Some(mapping) = scales.mapping(i) else { continue };
            let color = theme.series_color(s, i);
            let label = self.config.display_name(&s.tag);

            match (self.layout, scales.mode) {
                (Layout::Single, _) => {
                    scene.text(Point::new(plot.left, plot.top - 8.0), label, TITLE_SIZE, theme.axis_label, TextAnchor::Start);
                }
                (Layout::Combined, ScaleMode::Banded) => {
                    let at = Point::new(plot.left + 6.0, mapping.y.top_px + TITLE_SIZE);
                    scene.text(at, label, TITLE_SIZE, color, TextAnchor::Start);
                }
                (Layout::Combined, ScaleMode::Shared) => {}
            }

            draw_limit_lines(&mut scene, s, &mapping, plot, &theme);

            let line = self.segments.get_or_segment(s, &mapping);
            scene.path(line.in_range.commands.clone(), Stroke::solid(color, 1.5));
            scene.path(line.out_of_range.commands.clone(), Stroke::solid(theme.alarm, 2.0));

            if self.config.show_markers {
                let segmenter = ThresholdSegmenter::for_series(s);
                for m in segmenter.markers(s, &mapping, self.config.max_markers) {
                    scene.circle(m.center, 2.0, class_color(m.class, color, &theme));
                }
            }
        }

        if self.layout == Layout::Combined && scales.mode == ScaleMode::Shared && self.config.show_legend {
            draw_legend(&mut scene, plot, &self.series, &self.config, &theme);
        }
        scene
    }

    /// Crosshair line, highlighted samples and tooltip for the hover state.
    fn overlay(&self, memo: &Memo, hover: &HoverState, tooltip_box: TooltipBox<'_>) -> (Vec<Primitive>, Option<Tooltip>) {
        let Some(ts) = hover.active() else { return (Vec::new(), None) };
        let x = memo.scales.time.to_px_at(&ts);
        if !memo.plot.contains_x(x) {
            return (Vec::new(), None);
        }

        let theme = &self.theme;
        let own = build_tooltip(&self.series, ts, &self.config.tooltip_options(), &self.config.display_names);
        let mut layer = Scene::new(memo.scene.width, memo.scene.height, theme.background);
        layer.line(Point::new(x, memo.plot.top), Point::new(x, memo.plot.bottom), Stroke::solid(theme.crosshair, 1.0));

        for row in &own.rows {
            let (Some(value), Some(at)) = (row.value, row.sample_time) else { continue };
            let Some(mapping) = memo.scales.mapping(row.series_index) else { continue };
            let color = theme.series_color(&self.series[row.series_index], row.series_index);
            let class = row.class.unwrap_or(Classification::InRange);
            let center = Point::new(mapping.x.to_px_at(&at), mapping.y.to_px(value));
            layer.circle(center, 4.0, class_color(class, color, theme));
        }

        let tooltip = match tooltip_box {
            TooltipBox::Own => Some(own),
            TooltipBox::Shared(shared) => Some(shared.clone()),
            TooltipBox::Hidden => None,
        };
        if let Some(tooltip) = &tooltip {
            draw_tooltip_box(&mut layer, tooltip, x, &memo.plot, theme);
        }
        (layer.primitives, tooltip)
    }

    /// Both layouts draw x through the time scale, so the pointer snaps by time.
    fn crosshair(&mut self) -> Crosshair {
        let memo = self.ensure();
        Crosshair::new(memo.plot, memo.scales.time, SnapStrategy::NearestTime)
    }

    fn frame(&mut self, hover: &HoverState, tooltip_box: TooltipBox<'_>) -> Frame {
        let memo = self.ensure();
        let (overlay, tooltip) = self.overlay(&memo, hover, tooltip_box);
        Frame { scene: memo.scene, overlay, tooltip }
    }
}

fn same_series(held: &[Arc<Series>], current: &[Arc<Series>]) -> bool {
    held.len() == current.len() && held.iter().zip(current).all(|(a, b)| Arc::ptr_eq(a, b))
}

fn class_color(class: Classification, series_color: Color, theme: &Theme) -> Color {
    match class {
        Classification::InRange => series_color,
        Classification::OutOfRange => theme.alarm,
    }
}

fn draw_grid(scene: &mut Scene, plot: &PlotRect, time_ticks: &[Tick], value_ticks: &[Vec<Tick>], theme: &Theme) {
    let stroke = Stroke::solid(theme.grid, 1.0);
    for t in time_ticks {
        scene.line(Point::new(t.position, plot.top), Point::new(t.position, plot.bottom), stroke);
    }
    for t in value_ticks.iter().flatten() {
        scene.line(Point::new(plot.left, t.position), Point::new(plot.right, t.position), stroke);
    }
}

fn draw_axes(
    scene: &mut Scene,
    plot: &PlotRect,
    time_ticks: &[Tick],
    value_ticks: &[Vec<Tick>],
    theme: &Theme,
    show_x_axis: bool,
) {
    let axis = Stroke::solid(theme.axis_line, 1.5);
    let tick = Stroke::solid(theme.tick, 1.0);

    scene.line(Point::new(plot.left, plot.top), Point::new(plot.left, plot.bottom), axis);
    for t in value_ticks.iter().flatten() {
        scene.line(Point::new(plot.left - 4.0, t.position), Point::new(plot.left, t.position), tick);
        scene.text(Point::new(plot.left - 6.0, t.position + 4.0), t.label.as_str(), LABEL_SIZE, theme.axis_label, TextAnchor::End);
    }

    if show_x_axis {
        scene.line(Point::new(plot.left, plot.bottom), Point::new(plot.right, plot.bottom), axis);
        for t in time_ticks {
            scene.line(Point::new(t.position, plot.bottom), Point::new(t.position, plot.bottom + 4.0), tick);
            scene.text(Point::new(t.position, plot.bottom + 16.0), t.label.as_str(), LABEL_SIZE, theme.axis_label, TextAnchor::Middle);
        }
    }
}

/// Dashed reference lines at the series limits that fall inside its value domain.
fn draw_limit_lines(scene: &mut Scene, series: &Series, mapping: &ScaleMapping, plot: &PlotRect, theme: &Theme) {
    for limit in series.limits().iter() {
        if !mapping.y.domain.contains(limit) {
            continue;
        }
        let y = mapping.y.to_px(limit);
        scene.line(Point::new(plot.left, y), Point::new(plot.right, y), Stroke::dashed(theme.limit_line, 1.0, 4.0, 4.0));
    }
}

fn draw_legend(scene: &mut Scene, plot: &PlotRect, series: &[Arc<Series>], config: &ChartConfig, theme: &Theme) {
    let y = plot.top - 8.0;
    let mut x = plot.left;
    for (i, s) in series.iter().enumerate() {
        let color = theme.series_color(s, i);
        scene.line(Point::new(x, y - 4.0), Point::new(x + 14.0, y - 4.0), Stroke::solid(color, 3.0));
        let label = config.display_name(&s.tag);
        scene.text(Point::new(x + 18.0, y), label, LABEL_SIZE, theme.axis_label, TextAnchor::Start);
        x += 18.0 + label.chars().count() as f32 * GLYPH_ADVANCE_PX + 16.0;
    }
}

fn draw_tooltip_box(layer: &mut Scene, tooltip: &Tooltip, x: f32, plot: &PlotRect, theme: &Theme) {
    let mut lines = vec![tooltip.timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()];
    lines.extend(tooltip.rows.iter().map(|r| format!("{}: {}", r.label, r.value_text())));

    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f32;
    let width = longest * GLYPH_ADVANCE_PX + 16.0;
    let height = lines.len() as f32 * TOOLTIP_LINE_PX + 8.0;
    let left = if x + 12.0 + width > plot.right { x - 12.0 - width } else { x + 12.0 };
    let top = plot.top + 4.0;

    layer.rect(Point::new(left, top), width, height, theme.tooltip_background);
    for (i, line) in lines.into_iter().enumerate() {
        let at = Point::new(left + 8.0, top + TOOLTIP_LINE_PX * (i as f32 + 1.0));
        layer.text(at, line, LABEL_SIZE, theme.tooltip_text, TextAnchor::Start);
    }
}

/// All series in one plot, overlaid (shared mode) or stacked in bands (banded mode).
/// Owns the hover writer; sibling views follow it through `subscribe`.
pub struct CombinedChart {
    plot: Plotter,
    hover: HoverPublisher,
}

impl CombinedChart {
    pub fn new(series: Vec<Arc<Series>>, config: ChartConfig) -> Self {
        let (hover, _) = hover_channel();
        Self { plot: Plotter::new(series, config, Layout::Combined), hover }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.plot.theme = theme;
        self.plot.invalidate();
        self
    }

    /// Fix "now" for the empty-chart fallback window.
    pub fn pin_now(mut self, now: DateTime<Utc>) -> Self {
        self.plot.now = Some(now);
        self.plot.invalidate();
        self
    }

    pub fn series(&self) -> &[Arc<Series>] { &self.plot.series }
    pub fn config(&self) -> &ChartConfig { &self.plot.config }

    /// Replace the input snapshot. Unchanged `Arc`s keep their cached segments.
    pub fn set_series(&mut self, series: Vec<Arc<Series>>) {
        self.plot.series = series;
    }

    pub fn set_config(&mut self, config: ChartConfig) {
        self.plot.theme = config.theme();
        self.plot.config = config;
        self.plot.invalidate();
    }

    pub fn set_mode(&mut self, mode: ScaleMode) {
        self.plot.config.mode = mode;
    }

    pub fn dimensions(&self) -> &DimensionObserver { &self.plot.dims }

    pub fn resize(&mut self, size: Size) -> bool {
        self.plot.dims.set(size)
    }

    pub fn scales(&mut self) -> ScaleSet {
        self.plot.ensure().scales
    }

    pub fn plot_rect(&mut self) -> PlotRect {
        self.plot.ensure().plot
    }

    pub fn segment_cache(&self) -> &SegmentCache { &self.plot.segments }

    pub fn pointer_move(&mut self, px: f32) -> HoverState {
        let crosshair = self.plot.crosshair();
        crosshair.pointer_move(px, reference_series(&self.plot.series), &self.hover)
    }

    pub fn pointer_leave(&mut self) {
        self.hover.clear();
    }

    pub fn hover(&self) -> HoverState { self.hover.current() }

    pub fn subscribe(&self) -> HoverSubscriber { self.hover.subscribe() }

    pub fn frame(&mut self) -> Frame {
        let hover = self.hover.current();
        self.plot.frame(&hover, TooltipBox::Own)
    }
}

/// One series with its own scale. Reads the cursor from a shared hover store.
pub struct Chart {
    plot: Plotter,
    hover: HoverSubscriber,
}

impl Chart {
    pub fn new(series: Arc<Series>, config: ChartConfig, hover: HoverSubscriber) -> Self {
        Self { plot: Plotter::new(vec![series], config, Layout::Single), hover }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.plot.theme = theme;
        self.plot.invalidate();
        self
    }

    pub fn series(&self) -> &Arc<Series> { &self.plot.series[0] }

    pub fn set_series(&mut self, series: Arc<Series>) {
        self.plot.series = vec![series];
    }

    pub fn dimensions(&self) -> &DimensionObserver { &self.plot.dims }

    pub fn resize(&mut self, size: Size) -> bool {
        self.plot.dims.set(size)
    }

    pub fn scales(&mut self) -> ScaleSet {
        self.plot.ensure().scales
    }

    pub fn plot_rect(&mut self) -> PlotRect {
        self.plot.ensure().plot
    }

    /// Snap `px` against this chart's series and publish through `writer`.
    pub fn pointer_move(&mut self, px: f32, writer: &HoverPublisher) -> HoverState {
        let crosshair = self.plot.crosshair();
        crosshair.pointer_move(px, reference_series(&self.plot.series), writer)
    }

    pub fn hover(&self) -> HoverState { self.hover.current() }

    pub fn frame(&mut self) -> Frame {
        self.frame_with(TooltipBox::Own)
    }

    fn frame_with(&mut self, tooltip_box: TooltipBox<'_>) -> Frame {
        let hover = self.hover.take();
        self.plot.frame(&hover, tooltip_box)
    }
}

/// A column of single-series charts sharing one cursor. The pointer handler of the
/// stack is the only hover writer; every chart marks the same timestamp, and the chart
/// under the pointer carries one tooltip covering every series in the stack.
pub struct ChartStack {
    charts: Vec<Chart>,
    config: ChartConfig,
    hover: HoverPublisher,
    /// Chart the pointer is over while hovering.
    active: Option<usize>,
}

impl ChartStack {
    pub fn new(series: Vec<Arc<Series>>, config: ChartConfig) -> Self {
        let (hover, reader) = hover_channel();
        let charts = series.into_iter().map(|s| Chart::new(s, config.clone(), reader.clone())).collect();
        Self { charts, config, hover, active: None }
    }

    pub fn len(&self) -> usize { self.charts.len() }
    pub fn is_empty(&self) -> bool { self.charts.is_empty() }
    pub fn charts(&self) -> &[Chart] { &self.charts }
    pub fn chart_mut(&mut self, index: usize) -> Option<&mut Chart> { self.charts.get_mut(index) }

    pub fn resize_all(&mut self, size: Size) {
        for c in &mut self.charts {
            c.resize(size);
        }
    }

    /// Route a pointer move over chart `index`.
    pub fn pointer_move(&mut self, index: usize, px: f32) -> HoverState {
        let state = match self.charts.get_mut(index) {
            Some(chart) => chart.pointer_move(px, &self.hover),
            None => {
                self.hover.clear();
                HoverState::idle()
            }
        };
        self.active = state.visible.then_some(index);
        state
    }

    pub fn pointer_leave(&mut self) {
        self.active = None;
        self.hover.clear();
    }

    /// Values of every series in the stack at the cursor, filtered by staleness.
    pub fn tooltip(&self) -> Option<Tooltip> {
        let ts = self.hover.current().active()?;
        let series: Vec<Arc<Series>> = self.charts.iter().map(|c| Arc::clone(c.series())).collect();
        Some(build_tooltip(&series, ts, &self.config.tooltip_options(), &self.config.display_names))
    }

    pub fn hover(&self) -> HoverState { self.hover.current() }

    pub fn subscribe(&self) -> HoverSubscriber { self.hover.subscribe() }

    /// One frame per chart. Every chart draws the crosshair; only the chart under the
    /// pointer draws the tooltip box.
    pub fn frames(&mut self) -> Vec<Frame> {
        let tooltip = self.tooltip();
        let active = self.active;
        self.charts
            .iter_mut()
            .enumerate()
            .map(|(i, chart)| match &tooltip {
                Some(shared) if active == Some(i) => chart.frame_with(TooltipBox::Shared(shared)),
                _ => chart.frame_with(TooltipBox::Hidden),
            })
            .collect()
    }
}
