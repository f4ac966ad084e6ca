//! Derived geometry shared by the render engine and the SVG serializer.
//!
//! Both consumers go through [`Outline`] so that a raster redraw and a
//! rendering of the exported SVG agree on every corner, radius and angle.

use std::f32::consts::FRAC_PI_6;

use crate::{Color, Point, Primitive, StrokeWidth};

/// Length of each arrow head stroke in pixels.
pub const ARROW_HEAD_LENGTH: f32 = 15.0;

/// An axis-aligned box with non-negative size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, never negative.
    pub width: f32,
    /// Height, never negative.
    pub height: f32,
}

impl NormalizedRect {
    /// Normalize the box spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Whether the box has no area.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Center and radii of an ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseGeometry {
    /// Center X.
    pub cx: f32,
    /// Center Y.
    pub cy: f32,
    /// Horizontal radius.
    pub rx: f32,
    /// Vertical radius.
    pub ry: f32,
}

impl EllipseGeometry {
    /// The ellipse inscribed in the box spanning two corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let bounds = NormalizedRect::from_corners(a, b);
        let rx = bounds.width / 2.0;
        let ry = bounds.height / 2.0;
        Self {
            cx: bounds.x + rx,
            cy: bounds.y + ry,
            rx,
            ry,
        }
    }

    /// Whether either radius is zero.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.rx <= 0.0 || self.ry <= 0.0
    }
}

/// Shaft and head points of an arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    /// Tail of the shaft.
    pub tail: Point,
    /// Tip of the shaft, where both heads start.
    pub tip: Point,
    /// Free end of the head rotated by `-30°`.
    pub head_left: Point,
    /// Free end of the head rotated by `+30°`.
    pub head_right: Point,
}

impl ArrowGeometry {
    /// Compute head points for an arrow from `tail` to `tip`.
    ///
    /// A zero-length arrow has `atan2(0, 0) == 0`, so its heads point left.
    #[must_use]
    pub fn new(tail: Point, tip: Point, head_length: f32) -> Self {
        let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
        let head = |theta: f32| {
            Point::new(
                tip.x - head_length * theta.cos(),
                tip.y - head_length * theta.sin(),
            )
        };
        Self {
            tail,
            tip,
            head_left: head(angle - FRAC_PI_6),
            head_right: head(angle + FRAC_PI_6),
        }
    }
}

/// Paint parameters of an outlined shape.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width.
    pub width: StrokeWidth,
}

/// What a primitive looks like once its geometry is derived.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline<'a> {
    /// Connected points with round caps and joins.
    Polyline {
        /// Paint.
        style: StrokeStyle,
        /// Points in drawing order.
        points: &'a [Point],
    },
    /// Single straight segment.
    Segment {
        /// Paint.
        style: StrokeStyle,
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// Rectangle outline.
    Rect {
        /// Paint.
        style: StrokeStyle,
        /// Normalized bounds.
        rect: NormalizedRect,
    },
    /// Ellipse outline.
    Ellipse {
        /// Paint.
        style: StrokeStyle,
        /// Center and radii.
        ellipse: EllipseGeometry,
    },
    /// Arrow shaft plus two head strokes.
    Arrow {
        /// Paint.
        style: StrokeStyle,
        /// Shaft and head points.
        arrow: ArrowGeometry,
    },
    /// Filled text at a baseline position.
    Label {
        /// Fill color.
        color: Color,
        /// Font size in pixels.
        size: f32,
        /// Label content, unescaped.
        text: &'a str,
        /// Baseline start.
        at: Point,
    },
}

impl Primitive {
    /// Derive the outline used by every renderer of this primitive.
    #[must_use]
    pub fn outline(&self, arrow_head_length: f32) -> Outline<'_> {
        let style = |color: &Color, width: &StrokeWidth| StrokeStyle {
            color: color.clone(),
            width: *width,
        };
        match self {
            Primitive::Stroke { color, width, points } => Outline::Polyline {
                style: style(color, width),
                points,
            },
            Primitive::Line { color, width, x1, y1, x2, y2 } => Outline::Segment {
                style: style(color, width),
                from: Point::new(*x1, *y1),
                to: Point::new(*x2, *y2),
            },
            // Shapes without area are stroked as the segment they collapse to;
            // SVG renders nothing for a zero-sized rect or ellipse.
            Primitive::Rect { color, width, x1, y1, x2, y2 } => {
                let rect = NormalizedRect::from_corners(Point::new(*x1, *y1), Point::new(*x2, *y2));
                if rect.is_flat() {
                    Outline::Segment {
                        style: style(color, width),
                        from: Point::new(rect.x, rect.y),
                        to: Point::new(rect.x + rect.width, rect.y + rect.height),
                    }
                } else {
                    Outline::Rect {
                        style: style(color, width),
                        rect,
                    }
                }
            }
            Primitive::Ellipse { color, width, x1, y1, x2, y2 } => {
                let ellipse = EllipseGeometry::from_corners(Point::new(*x1, *y1), Point::new(*x2, *y2));
                if ellipse.is_flat() {
                    Outline::Segment {
                        style: style(color, width),
                        from: Point::new(ellipse.cx - ellipse.rx, ellipse.cy - ellipse.ry),
                        to: Point::new(ellipse.cx + ellipse.rx, ellipse.cy + ellipse.ry),
                    }
                } else {
                    Outline::Ellipse {
                        style: style(color, width),
                        ellipse,
                    }
                }
            }
            Primitive::Arrow { color, width, x1, y1, x2, y2 } => Outline::Arrow {
                style: style(color, width),
                arrow: ArrowGeometry::new(Point::new(*x1, *y1), Point::new(*x2, *y2), arrow_head_length),
            },
            Primitive::Text { color, size, text, x, y } => Outline::Label {
                color: color.clone(),
                size: *size,
                text,
                at: Point::new(*x, *y),
            },
        }
    }
}
