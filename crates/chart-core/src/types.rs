// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (sizes, margins, band layout).

use serde::{Deserialize, Serialize};

/// Container width assumed until the first real measurement arrives.
pub const DEFAULT_WIDTH: f32 = 800.0;
/// Requested chart height when the caller does not give one.
pub const DEFAULT_HEIGHT: f32 = 320.0;
/// Vertical gap between bands in banded mode, in pixels.
pub const BAND_GAP_PX: f32 = 12.0;

/// Pixel size of a chart container.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A size is usable when both sides are finite and positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Screen margins around the plot area, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(64, 16, 24, 32)
    }
}
