//! SVG serialization of a committed primitive list.
//!
//! The document is built from the same [`Outline`]s the render engine draws,
//! so it can be produced long after the raster surface is gone.

use std::fmt::Write;

use crate::geometry::{Outline, StrokeStyle};
use crate::{Color, Point, Primitive, SurfaceSize};

/// Font family written on text labels.
pub const TEXT_FONT_FAMILY: &str = "Arial";

/// Serialize primitives into an SVG document sized to `size`.
///
/// Returns `None` when `primitives` is empty: an empty sketch has no content
/// to hand to a download, clipboard or conversion request.
#[must_use]
pub fn serialize(
    primitives: &[Primitive],
    size: SurfaceSize,
    background: &Color,
    arrow_head_length: f32,
) -> Option<String> {
    if primitives.is_empty() {
        return None;
    }

    let (w, h) = (size.width, size.height);
    let mut svg = String::with_capacity(256 + primitives.len() * 128);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"{w}\" height=\"{h}\" fill=\"{}\"/>",
        escape_xml(background.as_str()),
    );

    for primitive in primitives {
        write_outline(&mut svg, &primitive.outline(arrow_head_length));
    }

    svg.push_str("</svg>");
    tracing::trace!("Serialized {} primitives to {} bytes of SVG", primitives.len(), svg.len());
    Some(svg)
}

/// Append exactly one SVG element for an outline.
fn write_outline(svg: &mut String, outline: &Outline<'_>) {
    match outline {
        Outline::Polyline { style, points } => {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            let mut d = format!("M {} {}", first.x, first.y);
            // A lone point needs a zero-length segment for the round cap to show.
            if rest.is_empty() {
                let _ = write!(d, " L {} {}", first.x, first.y);
            }
            for p in rest {
                let _ = write!(d, " L {} {}", p.x, p.y);
            }
            let _ = write!(svg, "<path d=\"{d}\"{} fill=\"none\"/>", stroke_attrs(style));
        }

        Outline::Segment { style, from, to } => {
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}/>",
                from.x,
                from.y,
                to.x,
                to.y,
                stroke_attrs(style),
            );
        }

        Outline::Rect { style, rect } => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{} fill=\"none\"/>",
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                stroke_attrs(style),
            );
        }

        Outline::Ellipse { style, ellipse } => {
            let _ = write!(
                svg,
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"{} fill=\"none\"/>",
                ellipse.cx,
                ellipse.cy,
                ellipse.rx,
                ellipse.ry,
                stroke_attrs(style),
            );
        }

        Outline::Arrow { style, arrow } => {
            let seg = |a: Point, b: Point| format!("M {} {} L {} {}", a.x, a.y, b.x, b.y);
            let _ = write!(
                svg,
                "<path d=\"{} {} {}\"{} fill=\"none\"/>",
                seg(arrow.tail, arrow.tip),
                seg(arrow.tip, arrow.head_left),
                seg(arrow.tip, arrow.head_right),
                stroke_attrs(style),
            );
        }

        Outline::Label { color, size, text, at } => {
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{size}\" font-family=\"{TEXT_FONT_FAMILY}\">{}</text>",
                at.x,
                at.y,
                escape_xml(color.as_str()),
                escape_xml(text),
            );
        }
    }
}

/// Paint attributes of every stroked element. Caps and joins are round to
/// match the raster backends.
fn stroke_attrs(style: &StrokeStyle) -> String {
    format!(
        " stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
        escape_xml(style.color.as_str()),
        style.width.get(),
    )
}

/// Escape the five reserved XML characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
