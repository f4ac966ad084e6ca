//! Browser backend on a `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use sketch_core::geometry::{EllipseGeometry, NormalizedRect, StrokeStyle};
use sketch_core::{Color, Point};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::RenderBackend;
use crate::{BackendType, RenderError, RenderResult};

/// 2D canvas renderer for the browser.
pub struct Canvas2dBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    font_family: String,
}

impl Canvas2dBackend {
    /// Wrap a canvas element and its 2D context.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, font_family: impl Into<String>) -> Self {
        Self {
            canvas,
            ctx,
            font_family: font_family.into(),
        }
    }

    /// The wrapped canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn apply_style(&self, style: &StrokeStyle) {
        self.ctx.set_stroke_style_str(style.color.as_str());
        self.ctx.set_line_width(f64::from(style.width.get()));
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }
}

impl std::fmt::Debug for Canvas2dBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas2dBackend")
            .field("width", &self.canvas.width())
            .field("height", &self.canvas.height())
            .finish_non_exhaustive()
    }
}

impl RenderBackend for Canvas2dBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        tracing::debug!("Canvas2D resized to {}x{}", width, height);
        Ok(())
    }

    fn clear(&mut self, background: &Color) -> RenderResult<()> {
        let (width, height) = self.size();
        self.ctx.set_fill_style_str(background.as_str());
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &StrokeStyle) -> RenderResult<()> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.apply_style(style);
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(first.x), f64::from(first.y));
        if rest.is_empty() {
            self.ctx.line_to(f64::from(first.x), f64::from(first.y));
        }
        for p in rest {
            self.ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
        self.ctx.stroke();
        Ok(())
    }

    fn stroke_rect(&mut self, rect: &NormalizedRect, style: &StrokeStyle) -> RenderResult<()> {
        self.apply_style(style);
        self.ctx.stroke_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
        Ok(())
    }

    fn stroke_ellipse(&mut self, ellipse: &EllipseGeometry, style: &StrokeStyle) -> RenderResult<()> {
        self.apply_style(style);
        self.ctx.begin_path();
        self.ctx
            .ellipse(
                f64::from(ellipse.cx),
                f64::from(ellipse.cy),
                f64::from(ellipse.rx),
                f64::from(ellipse.ry),
                0.0,
                0.0,
                TAU,
            )
            .map_err(|e| RenderError::Backend(format!("{e:?}")))?;
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, size: f32, color: &Color) -> RenderResult<()> {
        self.ctx.set_fill_style_str(color.as_str());
        self.ctx
            .set_font(&format!("{size}px {}", self.font_family));
        self.ctx
            .fill_text(text, f64::from(at.x), f64::from(at.y))
            .map_err(|e| RenderError::Backend(format!("{e:?}")))
    }
}
