//! CPU raster backend on a tiny-skia pixmap.
//!
//! Shapes are stroked directly with tiny-skia. tiny-skia has no text
//! support, so labels go through a one-element SVG document rendered by
//! resvg on top of the existing pixels.

use sketch_core::geometry::{EllipseGeometry, NormalizedRect, StrokeStyle};
use sketch_core::svg::escape_xml;
use sketch_core::{Color, Point};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::RenderBackend;
use crate::{BackendType, RenderError, RenderResult, RendererConfig};

/// tiny-skia raster backend.
pub struct PixmapBackend {
    pixmap: Pixmap,
    anti_alias: bool,
    text: TextRasterizer,
}

impl PixmapBackend {
    /// Allocate a `width` x `height` surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if either dimension is zero or too large.
    pub fn new(width: u32, height: u32, config: &RendererConfig) -> RenderResult<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            anti_alias: config.anti_aliasing,
            text: TextRasterizer::new(config),
        })
    }

    /// The rendered pixels.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied RGBA bytes of the surface.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Encode the surface as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    fn paint(&self, color: &Color) -> Paint<'static> {
        let [r, g, b, a] = color.rgba();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = self.anti_alias;
        paint
    }

    fn stroke_built(&mut self, builder: PathBuilder, style: &StrokeStyle) {
        // Paths without any extent are dropped by tiny-skia; nothing to draw then.
        let Some(path) = builder.finish() else {
            return;
        };
        let paint = self.paint(&style.color);
        let stroke = Stroke {
            width: style.width.get(),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

impl std::fmt::Debug for PixmapBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapBackend")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("anti_alias", &self.anti_alias)
            .finish_non_exhaustive()
    }
}

impl RenderBackend for PixmapBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Pixmap
    }

    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.pixmap = allocate(width, height)?;
        tracing::debug!("Pixmap resized to {}x{}", width, height);
        Ok(())
    }

    fn clear(&mut self, background: &Color) -> RenderResult<()> {
        let [r, g, b, a] = background.rgba();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &StrokeStyle) -> RenderResult<()> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        if rest.is_empty() {
            pb.line_to(first.x, first.y);
        }
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        self.stroke_built(pb, style);
        Ok(())
    }

    fn stroke_rect(&mut self, rect: &NormalizedRect, style: &StrokeStyle) -> RenderResult<()> {
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;
        let mut pb = PathBuilder::new();
        pb.move_to(rect.x, rect.y);
        pb.line_to(right, rect.y);
        pb.line_to(right, bottom);
        pb.line_to(rect.x, bottom);
        pb.close();
        self.stroke_built(pb, style);
        Ok(())
    }

    fn stroke_ellipse(&mut self, ellipse: &EllipseGeometry, style: &StrokeStyle) -> RenderResult<()> {
        let bounds = Rect::from_xywh(
            ellipse.cx - ellipse.rx,
            ellipse.cy - ellipse.ry,
            ellipse.rx * 2.0,
            ellipse.ry * 2.0,
        );
        let Some(bounds) = bounds else {
            return Ok(());
        };
        let mut pb = PathBuilder::new();
        pb.push_oval(bounds);
        self.stroke_built(pb, style);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, size: f32, color: &Color) -> RenderResult<()> {
        self.text.render(&mut self.pixmap, text, at, size, color)
    }
}

fn allocate(width: u32, height: u32) -> RenderResult<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Surface(format!("cannot allocate {width}x{height} pixmap")))
}

/// Rasterizes text labels through usvg/resvg.
struct TextRasterizer {
    options: usvg::Options<'static>,
    font_family: String,
    load_system_fonts: bool,
    fonts_loaded: bool,
}

impl TextRasterizer {
    fn new(config: &RendererConfig) -> Self {
        Self {
            options: usvg::Options::default(),
            font_family: config.font_family.clone(),
            load_system_fonts: config.load_system_fonts,
            fonts_loaded: false,
        }
    }

    fn render(
        &mut self,
        pixmap: &mut Pixmap,
        text: &str,
        at: Point,
        size: f32,
        color: &Color,
    ) -> RenderResult<()> {
        if self.load_system_fonts && !self.fonts_loaded {
            self.options.fontdb_mut().load_system_fonts();
            self.fonts_loaded = true;
            tracing::debug!("Loaded {} font faces for text labels", self.options.fontdb.len());
        }

        let document = self.label_document(pixmap.width(), pixmap.height(), text, at, size, color);
        let tree = usvg::Tree::from_str(&document, &self.options)
            .map_err(|e| RenderError::Text(e.to_string()))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }

    /// One-element document holding the label, styled like the exported
    /// `<text>` element.
    fn label_document(&self, width: u32, height: u32, text: &str, at: Point, size: f32, color: &Color) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\"><text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{size}\" font-family=\"{}\">{}</text></svg>",
            at.x,
            at.y,
            escape_xml(color.as_str()),
            escape_xml(&self.font_family),
            escape_xml(text),
        )
    }
}
