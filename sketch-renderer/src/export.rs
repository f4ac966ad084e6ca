//! Sketch export to SVG or PNG.
//!
//! PNG output rasterizes the serialized SVG with resvg, so an exported image
//! matches what any SVG consumer of the sketch would draw.

use sketch_core::SketchSession;

use crate::error::{RenderError, RenderResult};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// SVG document (UTF-8 bytes).
    Svg,
    /// PNG image.
    Png,
}

impl std::str::FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(RenderError::Export(format!("unsupported format: {other}"))),
        }
    }
}

/// Configuration for sketch export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Scale factor for raster output (e.g. 2.0 for retina).
    pub scale: f32,
    /// Load system fonts so text labels are rasterized.
    pub load_system_fonts: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            load_system_fonts: true,
        }
    }
}

/// Exports a [`SketchSession`] to SVG or PNG bytes.
pub struct SketchExporter {
    config: ExportConfig,
    options: usvg::Options<'static>,
}

impl SketchExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let mut options = usvg::Options::default();
        if config.load_system_fonts {
            options.fontdb_mut().load_system_fonts();
        }
        Self { config, options }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export the session's committed primitives in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] for an empty sketch and
    /// [`RenderError::Export`] if rasterization or encoding fails.
    pub fn export(&self, session: &mut SketchSession, format: ExportFormat) -> RenderResult<Vec<u8>> {
        let svg = session.export_svg()?;
        match format {
            ExportFormat::Svg => Ok(svg.as_bytes().to_vec()),
            ExportFormat::Png => self.svg_to_png(svg),
        }
    }

    /// Rasterize an SVG document to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if parsing, rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn svg_to_png(&self, svg: &str) -> RenderResult<Vec<u8>> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let scale = self.config.scale;
        let px_w = (tree.size().width() * scale).ceil() as u32;
        let px_h = (tree.size().height() * scale).ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}

impl std::fmt::Debug for SketchExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchExporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
