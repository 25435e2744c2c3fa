// File: crates/chart-core/src/scene.rs
// Summary: Renderer-agnostic vector scene (paths, lines, circles, text, rects) and colors.

use std::sync::Arc;

use crate::crosshair::Tooltip;
use crate::error::{ChartError, Result};
use crate::geometry::Point;
use crate::segment::PathCommand;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let invalid = || ChartError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a })
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// `(on, off)` dash lengths in pixels; solid when `None`.
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub const fn solid(color: Color, width: f32) -> Self {
        Self { color, width, dash: None }
    }

    pub const fn dashed(color: Color, width: f32, on: f32, off: f32) -> Self {
        Self { color, width, dash: Some((on, off)) }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Path { commands: Vec<PathCommand>, stroke: Stroke },
    Line { from: Point, to: Point, stroke: Stroke },
    Circle { center: Point, radius: f32, fill: Color },
    /// `at` is the text baseline point.
    Text { at: Point, text: String, size: f32, color: Color, anchor: TextAnchor },
    Rect { origin: Point, width: f32, height: f32, fill: Color },
}

/// A frame's static content, rebuilt only when its inputs change.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f32, height: f32, background: Color) -> Self {
        Self { width, height, background, primitives: Vec::new() }
    }

    pub fn push(&mut self, p: Primitive) {
        self.primitives.push(p);
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.push(Primitive::Line { from, to, stroke });
    }

    pub fn path(&mut self, commands: Vec<PathCommand>, stroke: Stroke) {
        if !commands.is_empty() {
            self.push(Primitive::Path { commands, stroke });
        }
    }

    pub fn circle(&mut self, center: Point, radius: f32, fill: Color) {
        self.push(Primitive::Circle { center, radius, fill });
    }

    pub fn text(&mut self, at: Point, text: impl Into<String>, size: f32, color: Color, anchor: TextAnchor) {
        self.push(Primitive::Text { at, text: text.into(), size, color, anchor });
    }

    pub fn rect(&mut self, origin: Point, width: f32, height: f32, fill: Color) {
        self.push(Primitive::Rect { origin, width, height, fill });
    }

    pub fn len(&self) -> usize { self.primitives.len() }
    pub fn is_empty(&self) -> bool { self.primitives.is_empty() }
}

/// Everything a renderer needs for one frame: the memoized scene, the hover overlay
/// drawn on top of it, and the tooltip data behind that overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub scene: Arc<Scene>,
    pub overlay: Vec<Primitive>,
    pub tooltip: Option<Tooltip>,
}

impl Frame {
    pub fn width(&self) -> f32 { self.scene.width }
    pub fn height(&self) -> f32 { self.scene.height }

    /// Scene primitives followed by overlay primitives, in paint order.
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.scene.primitives.iter().chain(self.overlay.iter())
    }
}
