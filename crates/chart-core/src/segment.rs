// File: crates/chart-core/src/segment.rs
// Summary: Threshold segmenter. Splits a series polyline at limit crossings and groups
// the pieces into in-range and out-of-range paths.

use crate::downsample::evenly_spaced_indices;
use crate::geometry::Point;
use crate::scale::{ScaleMapping, ValueScale};
use crate::series::{Classification, Limits, Series};

/// A vertex of a split polyline: pixel position plus the logical value it stands for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
    pub value: f64,
}

impl PathPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Where a sample pair meets a limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    /// Position along the pair in `[0, 1]`, measured in value space.
    pub fraction: f64,
    pub point: PathPoint,
}

/// A straight piece of the line with a single classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubSegment {
    pub start: PathPoint,
    pub end: PathPoint,
    pub class: Classification,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

/// Draw commands for every sub-segment of one classification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathGroup {
    pub commands: Vec<PathCommand>,
    last: Option<Point>,
}

impl PathGroup {
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Append a piece, continuing the current run when it starts where the last one ended.
    fn push(&mut self, start: Point, end: Point) {
        if self.last != Some(start) {
            self.commands.push(PathCommand::MoveTo(start));
        }
        self.commands.push(PathCommand::LineTo(end));
        self.last = Some(end);
    }

    /// Number of separate runs (move commands).
    pub fn runs(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, PathCommand::MoveTo(_))).count()
    }
}

/// Result of segmenting one series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentedLine {
    pub sub_segments: Vec<SubSegment>,
    pub in_range: PathGroup,
    pub out_of_range: PathGroup,
}

impl SegmentedLine {
    pub fn is_empty(&self) -> bool { self.sub_segments.is_empty() }
}

/// A scatter dot at a sample, classified from the sample's own value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub index: usize,
    pub center: Point,
    pub value: f64,
    pub class: Classification,
}

/// Fraction along `v1 -> v2` where the line equals `limit`. Only a strict sign change
/// counts: touching the limit at either end is not a crossing.
#[inline]
pub fn crossing_fraction(v1: f64, v2: f64, limit: f64) -> Option<f64> {
    if (v1 - limit) * (v2 - limit) < 0.0 {
        Some((limit - v1) / (v2 - v1))
    } else {
        None
    }
}

/// Splits polylines at threshold crossings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThresholdSegmenter {
    limits: Limits,
}

impl ThresholdSegmenter {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn for_series(series: &Series) -> Self {
        Self::new(series.limits())
    }

    pub fn limits(&self) -> Limits { self.limits }

    /// Crossings between two vertices, ordered by pixel x (then by fraction).
    pub fn crossings(&self, a: PathPoint, b: PathPoint, y: &ValueScale) -> Vec<Crossing> {
        let mut out: Vec<Crossing> = self
            .limits
            .iter()
            .filter_map(|limit| {
                let t = crossing_fraction(a.value, b.value, limit)?;
                let x = a.x + (b.x - a.x) * t as f32;
                Some(Crossing { fraction: t, point: PathPoint { x, y: y.to_px(limit), value: limit } })
            })
            .collect();
        out.sort_by(|p, q| p.point.x.total_cmp(&q.point.x).then(p.fraction.total_cmp(&q.fraction)));
        out
    }

    /// Split one sample pair into classified sub-segments, appending to `out`.
    pub fn split_pair(&self, a: PathPoint, b: PathPoint, y: &ValueScale, out: &mut Vec<SubSegment>) {
        let mut prev = a;
        let crossings = self.crossings(a, b, y);
        for next in crossings.iter().map(|c| c.point).chain(std::iter::once(b)) {
            let mid = (prev.value + next.value) / 2.0;
            out.push(SubSegment { start: prev, end: next, class: self.limits.classify(mid) });
            prev = next;
        }
    }

    /// Segment a whole series. Fewer than two samples yields an empty line.
    pub fn segment(&self, series: &Series, mapping: &ScaleMapping) -> SegmentedLine {
        let mut line = SegmentedLine::default();
        if !series.can_draw_line() {
            return line;
        }

        let vertices = series.data.iter().map(|p| {
            let pt = mapping.point(p);
            PathPoint { x: pt.x, y: pt.y, value: p.value }
        });
        let mut prev: Option<PathPoint> = None;
        for v in vertices {
            if let Some(a) = prev {
                self.split_pair(a, v, &mapping.y, &mut line.sub_segments);
            }
            prev = Some(v);
        }

        for s in &line.sub_segments {
            let group = match s.class {
                Classification::InRange => &mut line.in_range,
                Classification::OutOfRange => &mut line.out_of_range,
            };
            group.push(s.start.point(), s.end.point());
        }
        line
    }

    /// Classified dots for at most `max_markers` evenly spaced samples.
    pub fn markers(&self, series: &Series, mapping: &ScaleMapping, max_markers: usize) -> Vec<Marker> {
        evenly_spaced_indices(series.len(), max_markers)
            .into_iter()
            .map(|index| {
                let p = &series.data[index];
                Marker { index, center: mapping.point(p), value: p.value, class: self.limits.classify(p.value) }
            })
            .collect()
    }
}
