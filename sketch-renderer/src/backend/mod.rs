//! Rendering backend implementations.

#[cfg(feature = "wasm")]
pub mod canvas2d;
pub mod pixmap;

use sketch_core::geometry::{ArrowGeometry, EllipseGeometry, NormalizedRect, StrokeStyle};
use sketch_core::{Color, Point};

use crate::{BackendType, RenderResult};

/// Drawing operations a raster surface has to provide.
///
/// The [`Renderer`](crate::Renderer) derives all geometry; backends only
/// translate outlines into native calls.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the drawing surface. Content is not preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be reallocated.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Fill the whole surface with `background`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    fn clear(&mut self, background: &Color) -> RenderResult<()>;

    /// Stroke connected points with round caps and joins.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    fn stroke_polyline(&mut self, points: &[Point], style: &StrokeStyle) -> RenderResult<()>;

    /// Stroke one straight segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) -> RenderResult<()> {
        self.stroke_polyline(&[from, to], style)
    }

    /// Stroke a rectangle outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    fn stroke_rect(&mut self, rect: &NormalizedRect, style: &StrokeStyle) -> RenderResult<()>;

    /// Stroke an ellipse outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    fn stroke_ellipse(&mut self, ellipse: &EllipseGeometry, style: &StrokeStyle) -> RenderResult<()>;

    /// Stroke an arrow shaft and its two heads.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the call.
    fn stroke_arrow(&mut self, arrow: &ArrowGeometry, style: &StrokeStyle) -> RenderResult<()> {
        self.stroke_segment(arrow.tail, arrow.tip, style)?;
        self.stroke_segment(arrow.tip, arrow.head_left, style)?;
        self.stroke_segment(arrow.tip, arrow.head_right, style)
    }

    /// Fill `text` with its baseline starting at `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be laid out.
    fn fill_text(&mut self, text: &str, at: Point, size: f32, color: &Color) -> RenderResult<()>;
}
