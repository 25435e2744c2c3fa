// File: crates/chart-render-skia/src/lib.rs
// Summary: Headless rendering of chart frames using Skia CPU raster surfaces.

use std::path::Path;

use anyhow::{anyhow, Result};
use chart_core::scene::{Color, Frame, Primitive, Stroke};
use chart_core::segment::PathCommand;
use skia_safe as skia;
use tracing::debug;

mod text;

pub use text::TextShaper;

/// Paints `Frame`s onto a raster surface.
pub struct SkiaRenderer {
    /// `None` skips text; glyph output differs across platforms.
    shaper: Option<TextShaper>,
}

impl Default for SkiaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self { shaper: Some(TextShaper::new()) }
    }

    /// Renderer that leaves out every text primitive.
    pub fn without_text() -> Self {
        Self { shaper: None }
    }

    fn surface_for(&self, frame: &Frame) -> Result<(skia::Surface, i32, i32)> {
        let w = frame.width().round().max(1.0) as i32;
        let h = frame.height().round().max(1.0) as i32;
        let mut surface = skia::surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| anyhow!("failed to create {w}x{h} raster surface"))?;
        self.paint(surface.canvas(), frame);
        Ok((surface, w, h))
    }

    /// Render to PNG bytes.
    pub fn render_to_png_bytes(&self, frame: &Frame) -> Result<Vec<u8>> {
        let (mut surface, w, h) = self.surface_for(frame)?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        debug!(width = w, height = h, bytes = data.as_bytes().len(), "encoded frame");
        Ok(data.as_bytes().to_vec())
    }

    /// Render to a PNG file, creating parent directories as needed.
    pub fn render_to_png(&self, frame: &Frame, output_png_path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes(frame)?;
        let path = output_png_path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Render to an SVG document through Skia's SVG canvas. Text is shaped here, so the
    /// output does not depend on fonts installed where it is viewed.
    pub fn render_to_svg_string(&self, frame: &Frame) -> Result<String> {
        let bounds = skia::Rect::from_wh(frame.width().max(1.0), frame.height().max(1.0));
        let canvas = skia::svg::Canvas::new(bounds, None);
        self.paint(&canvas, frame);
        let data = canvas.end();
        debug!(bytes = data.as_bytes().len(), "encoded frame as svg");
        Ok(String::from_utf8(data.as_bytes().to_vec())?)
    }

    /// Render to an SVG file, creating parent directories as needed.
    pub fn render_to_svg(&self, frame: &Frame, output_svg_path: impl AsRef<Path>) -> Result<()> {
        let svg = self.render_to_svg_string(frame)?;
        let path = output_svg_path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, svg)?;
        Ok(())
    }

    /// Render to an unpremultiplied RGBA8 buffer. Returns `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, frame: &Frame) -> Result<(Vec<u8>, u32, u32, usize)> {
        let (mut surface, w, h) = self.surface_for(frame)?;
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let row_bytes = w as usize * 4;
        let mut pixels = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            return Err(anyhow!("reading back {w}x{h} pixels failed"));
        }
        Ok((pixels, w as u32, h as u32, row_bytes))
    }

    fn paint(&self, canvas: &skia::Canvas, frame: &Frame) {
        canvas.clear(to_skia(frame.scene.background));
        for p in frame.primitives() {
            self.draw_primitive(canvas, p);
        }
    }

    fn draw_primitive(&self, canvas: &skia::Canvas, p: &Primitive) {
        match p {
            Primitive::Path { commands, stroke } => {
                canvas.draw_path(&to_path(commands), &stroke_paint(stroke));
            }
            Primitive::Line { from, to, stroke } => {
                canvas.draw_line((from.x, from.y), (to.x, to.y), &stroke_paint(stroke));
            }
            Primitive::Circle { center, radius, fill } => {
                canvas.draw_circle((center.x, center.y), *radius, &fill_paint(*fill));
            }
            Primitive::Rect { origin, width, height, fill } => {
                let rect = skia::Rect::from_xywh(origin.x, origin.y, *width, *height);
                canvas.draw_round_rect(rect, 3.0, 3.0, &fill_paint(*fill));
            }
            Primitive::Text { at, text, size, color, anchor } => {
                if let Some(shaper) = &self.shaper {
                    shaper.draw(canvas, text, at.x, at.y, *size, to_skia(*color), *anchor);
                }
            }
        }
    }
}

fn to_skia(c: Color) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn to_path(commands: &[PathCommand]) -> skia::Path {
    let mut path = skia::Path::new();
    for c in commands {
        match c {
            PathCommand::MoveTo(p) => {
                path.move_to((p.x, p.y));
            }
            PathCommand::LineTo(p) => {
                path.line_to((p.x, p.y));
            }
        }
    }
    path
}

fn stroke_paint(stroke: &Stroke) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(stroke.width);
    paint.set_color(to_skia(stroke.color));
    if let Some((on, off)) = stroke.dash {
        paint.set_path_effect(skia::PathEffect::dash(&[on, off], 0.0));
    }
    paint
}

fn fill_paint(color: Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(to_skia(color));
    paint
}
