//! Drawable primitives - the building blocks of a sketch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// Font size of a text label per unit of stroke width.
pub const TEXT_SIZE_FACTOR: f32 = 8.0;

/// A position in drawing-surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Pixels from the left edge of the surface.
    pub x: f32,
    /// Pixels from the top edge of the surface.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A validated color string.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and a handful of CSS names. The
/// input spelling is kept so serialization reproduces what the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    raw: String,
    rgba: [u8; 4],
}

impl Color {
    /// Parse a color string.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] if the string is not a supported color.
    pub fn parse(input: &str) -> CanvasResult<Self> {
        let trimmed = input.trim();
        let rgba = parse_rgba(trimmed).ok_or_else(|| CanvasError::InvalidColor(input.to_string()))?;
        Ok(Self {
            raw: trimmed.to_string(),
            rgba,
        })
    }

    /// The color as it was entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The color as RGBA bytes.
    #[must_use]
    pub fn rgba(&self) -> [u8; 4] {
        self.rgba
    }

    /// Opaque black.
    #[must_use]
    pub fn black() -> Self {
        Self {
            raw: "#000000".to_string(),
            rgba: [0, 0, 0, 255],
        }
    }

    /// Opaque white.
    #[must_use]
    pub fn white() -> Self {
        Self {
            raw: "#ffffff".to_string(),
            rgba: [255, 255, 255, 255],
        }
    }
}

impl Default for Color {
    /// The default pen color of the sketch toolbar.
    fn default() -> Self {
        Self {
            raw: "#333333".to_string(),
            rgba: [0x33, 0x33, 0x33, 255],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.raw
    }
}

fn parse_rgba(input: &str) -> Option<[u8; 4]> {
    if let Some(hex) = input.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            3 => {
                let mut out = [255; 4];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)?;
                    #[allow(clippy::cast_possible_truncation)]
                    let v = v as u8;
                    *slot = v * 17;
                }
                Some(out)
            }
            6 | 8 => {
                let mut out = [255; 4];
                for (i, slot) in out.iter_mut().enumerate().take(hex.len() / 2) {
                    *slot = channel(&hex[i * 2..i * 2 + 2])?;
                }
                Some(out)
            }
            _ => None,
        };
    }

    match input.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0, 255]),
        "white" => Some([255, 255, 255, 255]),
        "red" => Some([255, 0, 0, 255]),
        "green" => Some([0, 128, 0, 255]),
        "blue" => Some([0, 0, 255, 255]),
        "gray" | "grey" => Some([128, 128, 128, 255]),
        _ => None,
    }
}

/// A positive, finite stroke width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct StrokeWidth(f32);

impl StrokeWidth {
    /// Thin preset (1px).
    pub const THIN: Self = Self(1.0);
    /// Normal preset (2px), the default.
    pub const NORMAL: Self = Self(2.0);
    /// Thick preset (4px).
    pub const THICK: Self = Self(4.0);
    /// Bold preset (8px).
    pub const BOLD: Self = Self(8.0);

    /// Create a stroke width.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidWidth`] unless `value` is positive and finite.
    pub fn new(value: f32) -> CanvasResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(CanvasError::InvalidWidth(value))
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Font size used by the text tool at this width.
    #[must_use]
    pub fn text_size(self) -> f32 {
        self.0 * TEXT_SIZE_FACTOR
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f32> for StrokeWidth {
    type Error = CanvasError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StrokeWidth> for f32 {
    fn from(width: StrokeWidth) -> Self {
        width.0
    }
}

/// The active drawing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand pen.
    #[default]
    Pen,
    /// Straight line.
    Line,
    /// Corner-to-corner rectangle outline.
    Rect,
    /// Ellipse inscribed in the dragged box.
    #[serde(alias = "circle")]
    Ellipse,
    /// Line with a two-stroke head at the release point.
    Arrow,
    /// Text label placed at the press point.
    Text,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Tool; 6] = [
        Tool::Pen,
        Tool::Line,
        Tool::Rect,
        Tool::Ellipse,
        Tool::Arrow,
        Tool::Text,
    ];

    /// Whether the tool drags a box from a start to an end point.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Tool::Line | Tool::Rect | Tool::Ellipse | Tool::Arrow)
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Line => "line",
            Tool::Rect => "rect",
            Tool::Ellipse => "ellipse",
            Tool::Arrow => "arrow",
            Tool::Text => "text",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pen" | "freehand" => Ok(Tool::Pen),
            "line" => Ok(Tool::Line),
            "rect" | "rectangle" => Ok(Tool::Rect),
            "ellipse" | "circle" => Ok(Tool::Ellipse),
            "arrow" => Ok(Tool::Arrow),
            "text" => Ok(Tool::Text),
            _ => Err(CanvasError::UnknownTool(s.to_string())),
        }
    }
}

/// One drawable shape unit.
///
/// Serialized with a `tool` tag using the toolbar names, so a committed list
/// round-trips through the same JSON shape the web client produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub enum Primitive {
    /// Freehand pen path.
    #[serde(rename = "pen")]
    Stroke {
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: StrokeWidth,
        /// Ordered points, never empty once committed.
        points: Vec<Point>,
    },

    /// Straight segment.
    Line {
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: StrokeWidth,
        /// Start X.
        x1: f32,
        /// Start Y.
        y1: f32,
        /// End X.
        x2: f32,
        /// End Y.
        y2: f32,
    },

    /// Rectangle spanning two corners.
    Rect {
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: StrokeWidth,
        /// First corner X.
        x1: f32,
        /// First corner Y.
        y1: f32,
        /// Opposite corner X.
        x2: f32,
        /// Opposite corner Y.
        y2: f32,
    },

    /// Ellipse inscribed in the box spanning two corners.
    #[serde(rename = "circle", alias = "ellipse")]
    Ellipse {
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: StrokeWidth,
        /// First corner X.
        x1: f32,
        /// First corner Y.
        y1: f32,
        /// Opposite corner X.
        x2: f32,
        /// Opposite corner Y.
        y2: f32,
    },

    /// Shaft from start to end plus two head strokes at the end.
    Arrow {
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: StrokeWidth,
        /// Tail X.
        x1: f32,
        /// Tail Y.
        y1: f32,
        /// Tip X.
        x2: f32,
        /// Tip Y.
        y2: f32,
    },

    /// Text label anchored at its baseline start.
    Text {
        /// Fill color.
        color: Color,
        /// Font size in pixels.
        size: f32,
        /// Label content.
        text: String,
        /// Baseline start X.
        x: f32,
        /// Baseline Y.
        y: f32,
    },
}

impl Primitive {
    /// Build the primitive a shape tool produces for a drag from `start` to `end`.
    ///
    /// Returns `None` for [`Tool::Pen`] and [`Tool::Text`], which are not drag shapes.
    #[must_use]
    pub fn from_drag(tool: Tool, color: Color, width: StrokeWidth, start: Point, end: Point) -> Option<Self> {
        let (x1, y1, x2, y2) = (start.x, start.y, end.x, end.y);
        let primitive = match tool {
            Tool::Line => Primitive::Line { color, width, x1, y1, x2, y2 },
            Tool::Rect => Primitive::Rect { color, width, x1, y1, x2, y2 },
            Tool::Ellipse => Primitive::Ellipse { color, width, x1, y1, x2, y2 },
            Tool::Arrow => Primitive::Arrow { color, width, x1, y1, x2, y2 },
            Tool::Pen | Tool::Text => return None,
        };
        Some(primitive)
    }

    /// The tool that produces this primitive.
    #[must_use]
    pub fn tool(&self) -> Tool {
        match self {
            Primitive::Stroke { .. } => Tool::Pen,
            Primitive::Line { .. } => Tool::Line,
            Primitive::Rect { .. } => Tool::Rect,
            Primitive::Ellipse { .. } => Tool::Ellipse,
            Primitive::Arrow { .. } => Tool::Arrow,
            Primitive::Text { .. } => Tool::Text,
        }
    }

    /// The color the primitive is drawn with.
    #[must_use]
    pub fn color(&self) -> &Color {
        match self {
            Primitive::Stroke { color, .. }
            | Primitive::Line { color, .. }
            | Primitive::Rect { color, .. }
            | Primitive::Ellipse { color, .. }
            | Primitive::Arrow { color, .. }
            | Primitive::Text { color, .. } => color,
        }
    }

    /// Stroke width, or `None` for text labels.
    #[must_use]
    pub fn width(&self) -> Option<StrokeWidth> {
        match self {
            Primitive::Stroke { width, .. }
            | Primitive::Line { width, .. }
            | Primitive::Rect { width, .. }
            | Primitive::Ellipse { width, .. }
            | Primitive::Arrow { width, .. } => Some(*width),
            Primitive::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_formats() {
        assert_eq!(Color::parse("#fff").expect("short hex").rgba(), [255, 255, 255, 255]);
        assert_eq!(Color::parse("#3498db").expect("hex").rgba(), [0x34, 0x98, 0xdb, 255]);
        assert_eq!(Color::parse("#00000080").expect("hex alpha").rgba(), [0, 0, 0, 0x80]);
        assert_eq!(Color::parse("Red").expect("named").rgba(), [255, 0, 0, 255]);
        assert_eq!(Color::parse("#3498db").expect("hex").as_str(), "#3498db");
    }

    #[test]
    fn test_color_rejects_garbage() {
        for bad in ["", "#", "#12", "#12345", "#gggggg", "chartreuse-ish", "#ééé"] {
            assert!(Color::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_stroke_width_validation() {
        assert!(StrokeWidth::new(0.0).is_err());
        assert!(StrokeWidth::new(-2.0).is_err());
        assert!(StrokeWidth::new(f32::NAN).is_err());
        assert!(StrokeWidth::new(f32::INFINITY).is_err());
        assert_eq!(StrokeWidth::new(4.0).expect("width"), StrokeWidth::THICK);
        assert!((StrokeWidth::NORMAL.text_size() - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tool_names() {
        assert_eq!("circle".parse::<Tool>().expect("tool"), Tool::Ellipse);
        assert_eq!("PEN".parse::<Tool>().expect("tool"), Tool::Pen);
        assert!("lasso".parse::<Tool>().is_err());
        for tool in Tool::ALL {
            assert_eq!(tool.name().parse::<Tool>().expect("roundtrip"), tool);
        }
        assert!(Tool::Arrow.is_shape());
        assert!(!Tool::Text.is_shape());
    }

    #[test]
    fn test_primitive_json_uses_toolbar_names() {
        let line = Primitive::from_drag(
            Tool::Ellipse,
            Color::default(),
            StrokeWidth::NORMAL,
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
        )
        .expect("shape tool");
        let json = serde_json::to_value(&line).expect("serialize");
        assert_eq!(json["tool"], "circle");
        assert_eq!(json["color"], "#333333");
        assert_eq!(json["width"], 2.0);

        let parsed: Primitive = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, line);
    }

    #[test]
    fn test_primitive_json_rejects_invalid_color() {
        let json = r##"{"tool":"line","color":"nope","width":2,"x1":0,"y1":0,"x2":1,"y2":1}"##;
        assert!(serde_json::from_str::<Primitive>(json).is_err());
    }

    #[test]
    fn test_from_drag_skips_pen_and_text() {
        let start = Point::new(0.0, 0.0);
        assert!(Primitive::from_drag(Tool::Pen, Color::default(), StrokeWidth::NORMAL, start, start).is_none());
        assert!(Primitive::from_drag(Tool::Text, Color::default(), StrokeWidth::NORMAL, start, start).is_none());
    }
}
