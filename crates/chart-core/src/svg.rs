// File: crates/chart-core/src/svg.rs
// Summary: SVG output for frames (scene plus hover overlay).

use std::fmt::Write as _;

use crate::scene::{Color, Frame, Primitive, Stroke, TextAnchor};
use crate::segment::PathCommand;

/// Serialize a frame as a standalone SVG document.
pub fn to_svg(frame: &Frame) -> String {
    let (w, h) = (frame.width(), frame.height());
    let mut out = String::with_capacity(4096);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="{}"/>"#, frame.scene.background.to_hex());
    for p in frame.primitives() {
        write_primitive(&mut out, p);
    }
    out.push_str("</svg>\n");
    out
}

fn write_primitive(out: &mut String, p: &Primitive) {
    // Writing into a String cannot fail.
    let _ = match p {
        Primitive::Path { commands, stroke } => {
            let d = path_data(commands);
            writeln!(out, r#"<path d="{d}" fill="none"{}/>"#, stroke_attrs(stroke))
        }
        Primitive::Line { from, to, stroke } => writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            stroke_attrs(stroke)
        ),
        Primitive::Circle { center, radius, fill } => writeln!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{radius}"{}/>"#,
            center.x,
            center.y,
            fill_attrs(fill)
        ),
        Primitive::Text { at, text, size, color, anchor } => writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-size="{size}" font-family="sans-serif" text-anchor="{}"{}>{}</text>"#,
            at.x,
            at.y,
            anchor_name(*anchor),
            fill_attrs(color),
            escape(text)
        ),
        Primitive::Rect { origin, width, height, fill } => writeln!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{width:.2}" height="{height:.2}" rx="3"{}/>"#,
            origin.x,
            origin.y,
            fill_attrs(fill)
        ),
    };
}

fn path_data(commands: &[PathCommand]) -> String {
    let mut d = String::with_capacity(commands.len() * 16);
    for c in commands {
        let _ = match c {
            PathCommand::MoveTo(p) => write!(d, "M{:.2},{:.2} ", p.x, p.y),
            PathCommand::LineTo(p) => write!(d, "L{:.2},{:.2} ", p.x, p.y),
        };
    }
    d.trim_end().to_string()
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut s = format!(r#" stroke="{}" stroke-width="{}""#, stroke.color.to_hex(), stroke.width);
    if stroke.color.a < 255 {
        let _ = write!(s, r#" stroke-opacity="{:.3}""#, stroke.color.opacity());
    }
    if let Some((on, off)) = stroke.dash {
        let _ = write!(s, r#" stroke-dasharray="{on},{off}""#);
    }
    s
}

fn fill_attrs(color: &Color) -> String {
    if color.a < 255 {
        format!(r#" fill="{}" fill-opacity="{:.3}""#, color.to_hex(), color.opacity())
    } else {
        format!(r#" fill="{}""#, color.to_hex())
    }
}

fn anchor_name(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
