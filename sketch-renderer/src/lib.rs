//! # Sketch Renderer
//!
//! Immediate-mode render engine for the sketch canvas. Every mutation is
//! repainted from scratch; freehand strokes additionally get a cheap
//! incremental segment while the pen is down.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         Renderer<B: RenderBackend>          │
//! ├──────────────────────┬──────────────────────┤
//! │ PixmapBackend        │ Canvas2dBackend      │
//! │ (tiny-skia + resvg)  │ (browser, `wasm`)    │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod export;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use backend::pixmap::PixmapBackend;
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportFormat, SketchExporter};

use sketch_core::geometry::StrokeStyle;
use sketch_core::{Color, Outline, Point, Primitive, RenderRequest, SketchSession, StrokeWidth};

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Enable anti-aliasing.
    pub anti_aliasing: bool,
    /// Font family for text labels. Defaults to the family exported SVG
    /// labels are written with.
    pub font_family: String,
    /// Load system fonts the first time a label is drawn.
    pub load_system_fonts: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            anti_aliasing: true,
            font_family: sketch_core::svg::TEXT_FONT_FAMILY.to_string(),
            load_system_fonts: true,
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// tiny-skia pixmap (CPU, headless).
    Pixmap,
    /// Browser 2D canvas context.
    Canvas2D,
}

/// Draws a [`SketchSession`] onto a backend.
#[derive(Debug)]
pub struct Renderer<B: RenderBackend> {
    backend: B,
    frame_count: u64,
}

impl Renderer<PixmapBackend> {
    /// Create a headless renderer sized to the session surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixmap cannot be allocated.
    pub fn headless(session: &SketchSession, config: &RendererConfig) -> RenderResult<Self> {
        let (width, height) = session.size().pixels();
        Ok(Self::new(PixmapBackend::new(width, height, config)?))
    }
}

impl<B: RenderBackend> Renderer<B> {
    /// Create a renderer over `backend`.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            frame_count: 0,
        }
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of full redraws performed so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Repaint the surface from scratch: background, then every committed
    /// primitive in insertion order, then the open freehand stroke if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn redraw(&mut self, session: &SketchSession) -> RenderResult<()> {
        tracing::trace!(
            "Full redraw #{}: {} primitives",
            self.frame_count,
            session.len()
        );
        self.backend.clear(session.background())?;
        let head = session.arrow_head_length();
        for primitive in session.primitives() {
            self.draw_primitive(primitive, head)?;
        }
        if let Some(open) = session.open_stroke() {
            self.draw_primitive(open, head)?;
        }
        self.frame_count += 1;
        Ok(())
    }

    /// Draw a single freehand segment on top of the current raster.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn draw_segment(&mut self, from: Point, to: Point, color: &Color, width: StrokeWidth) -> RenderResult<()> {
        let style = StrokeStyle {
            color: color.clone(),
            width,
        };
        self.backend.stroke_segment(from, to, &style)
    }

    /// Full redraw followed by a transient preview shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn draw_preview(&mut self, session: &SketchSession, preview: &Primitive) -> RenderResult<()> {
        self.redraw(session)?;
        self.draw_primitive(preview, session.arrow_head_length())
    }

    /// Perform whatever a session call asked for.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn apply(&mut self, session: &SketchSession, request: &RenderRequest) -> RenderResult<()> {
        match request {
            RenderRequest::None | RenderRequest::TextInput { .. } => Ok(()),
            RenderRequest::Segment {
                from,
                to,
                color,
                width,
            } => self.draw_segment(*from, *to, color, *width),
            RenderRequest::Preview { primitive } => self.draw_preview(session, primitive),
            RenderRequest::Full => self.redraw(session),
        }
    }

    /// Resize the surface to `width` x `height` pixels and repaint it.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be resized.
    pub fn resize(&mut self, session: &SketchSession, width: u32, height: u32) -> RenderResult<()> {
        if self.backend.size() != (width, height) {
            self.backend.resize(width, height)?;
        }
        self.redraw(session)
    }

    /// Resize the surface to the session size and repaint it.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be resized.
    pub fn sync_size(&mut self, session: &SketchSession) -> RenderResult<()> {
        let (width, height) = session.size().pixels();
        self.resize(session, width, height)
    }

    fn draw_primitive(&mut self, primitive: &Primitive, arrow_head_length: f32) -> RenderResult<()> {
        match primitive.outline(arrow_head_length) {
            Outline::Polyline { style, points } => self.backend.stroke_polyline(points, &style),
            Outline::Segment { style, from, to } => self.backend.stroke_segment(from, to, &style),
            Outline::Rect { style, rect } => self.backend.stroke_rect(&rect, &style),
            Outline::Ellipse { style, ellipse } => self.backend.stroke_ellipse(&ellipse, &style),
            Outline::Arrow { style, arrow } => self.backend.stroke_arrow(&arrow, &style),
            Outline::Label {
                color,
                size,
                text,
                at,
            } => self.backend.fill_text(text, at, size, &color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::{SessionConfig, SurfaceSize, Tool};

    fn headless(session: &SketchSession) -> Renderer<PixmapBackend> {
        let config = RendererConfig {
            load_system_fonts: false,
            ..RendererConfig::default()
        };
        Renderer::headless(session, &config).expect("renderer")
    }

    #[test]
    fn test_renderer_sized_to_session() {
        let session = SketchSession::new(SessionConfig::default().with_size(120.0, 80.0));
        let renderer = headless(&session);
        assert_eq!(renderer.backend().size(), (120, 80));
        assert_eq!(renderer.active_backend(), BackendType::Pixmap);
    }

    #[test]
    fn test_apply_full_counts_frames() {
        let mut session = SketchSession::new(SessionConfig::default().with_size(50.0, 50.0));
        let mut renderer = headless(&session);
        session.set_tool(Tool::Line);
        session.begin_gesture(Point::new(0.0, 0.0));
        let request = session.end_gesture(Point::new(50.0, 50.0));
        renderer.apply(&session, &request).expect("apply");
        assert_eq!(renderer.frame_count(), 1);

        renderer.apply(&session, &RenderRequest::None).expect("noop");
        assert_eq!(renderer.frame_count(), 1);
    }

    #[test]
    fn test_sync_size_follows_session() {
        let mut session = SketchSession::new(SessionConfig::default().with_size(50.0, 50.0));
        let mut renderer = headless(&session);
        session.resize(SurfaceSize::new(90.0, 30.0));
        renderer.sync_size(&session).expect("resize");
        assert_eq!(renderer.backend().size(), (90, 30));
    }

    #[test]
    fn test_resize_repaints() {
        let session = SketchSession::new(SessionConfig::default().with_size(50.0, 50.0));
        let mut renderer = headless(&session);
        renderer.resize(&session, 20, 10).expect("resize");
        assert_eq!(renderer.backend().size(), (20, 10));
        assert_eq!(renderer.frame_count(), 1);
    }
}
