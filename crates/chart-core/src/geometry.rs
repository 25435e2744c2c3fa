// File: crates/chart-core/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math.

use crate::types::{Insets, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Plot area in container pixels (container size minus insets).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotRect {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Plot rect for a container; never narrower or shorter than one pixel.
    pub fn from_size(size: Size, insets: &Insets) -> Self {
        let left = insets.left as f32;
        let top = insets.top as f32;
        let right = (size.width - insets.right as f32).max(left + 1.0);
        let bottom = (size.height - insets.bottom as f32).max(top + 1.0);
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }

    /// Inclusive horizontal hit test.
    pub fn contains_x(&self, px: f32) -> bool {
        px >= self.left && px <= self.right
    }

    pub fn contains(&self, p: Point) -> bool {
        self.contains_x(p.x) && p.y >= self.top && p.y <= self.bottom
    }
}
