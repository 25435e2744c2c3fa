// File: crates/chart-core/src/theme.rs
// Summary: Light/Dark theming and the default series palette.

use tracing::warn;

use crate::scene::Color;
use crate::series::Series;

/// Series colors used when a series brings none, cycled by series index.
pub const PALETTE: [Color; 8] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x17, 0xbe, 0xcf),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0xbc, 0xbd, 0x22),
];

pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub grid: Color,
    pub axis_line: Color,
    pub axis_label: Color,
    pub tick: Color,
    pub crosshair: Color,
    /// Stroke and dots for out-of-range pieces.
    pub alarm: Color,
    pub limit_line: Color,
    pub tooltip_background: Color,
    pub tooltip_text: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color::from_argb(255, 18, 18, 20),
            grid: Color::from_argb(255, 40, 40, 45),
            axis_line: Color::from_argb(255, 180, 180, 190),
            axis_label: Color::from_argb(255, 235, 235, 245),
            tick: Color::from_argb(255, 150, 150, 160),
            crosshair: Color::from_argb(255, 255, 230, 70),
            alarm: Color::from_argb(255, 230, 60, 60),
            limit_line: Color::from_argb(200, 230, 120, 60),
            tooltip_background: Color::from_argb(230, 32, 32, 38),
            tooltip_text: Color::from_argb(255, 235, 235, 245),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color::from_argb(255, 250, 250, 252),
            grid: Color::from_argb(255, 230, 230, 235),
            axis_line: Color::from_argb(255, 60, 60, 70),
            axis_label: Color::from_argb(255, 20, 20, 30),
            tick: Color::from_argb(255, 100, 100, 110),
            crosshair: Color::from_argb(255, 30, 120, 240),
            alarm: Color::from_argb(255, 200, 40, 40),
            limit_line: Color::from_argb(200, 210, 110, 40),
            tooltip_background: Color::from_argb(235, 255, 255, 255),
            tooltip_text: Color::from_argb(255, 20, 20, 30),
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: Color::from_argb(255, 0x00, 0x00, 0x00),
            grid: Color::from_argb(255, 0x22, 0x22, 0x22),
            axis_line: Color::from_argb(255, 0xff, 0xff, 0xff),
            axis_label: Color::from_argb(255, 0xff, 0xff, 0xff),
            tick: Color::from_argb(255, 0xcc, 0xcc, 0xcc),
            crosshair: Color::from_argb(255, 0xff, 0xff, 0x00),
            alarm: Color::from_argb(255, 0xff, 0x00, 0x00),
            limit_line: Color::from_argb(255, 0xff, 0x80, 0x00),
            tooltip_background: Color::from_argb(240, 0x10, 0x10, 0x10),
            tooltip_text: Color::from_argb(255, 0xff, 0xff, 0xff),
        }
    }

    /// Stroke color of series `index`: its own color when it parses, else the palette.
    pub fn series_color(&self, series: &Series, index: usize) -> Color {
        match series.color.as_deref().map(Color::from_hex) {
            Some(Ok(c)) => c,
            Some(Err(e)) => {
                warn!(tag = %series.tag, error = %e, "falling back to palette color");
                palette_color(index)
            }
            None => palette_color(index),
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::dark() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light(), Theme::high_contrast_dark()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(Theme::dark)
}
