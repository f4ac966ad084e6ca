//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::geometry::ARROW_HEAD_LENGTH;
use crate::{CanvasError, CanvasResult, Color, StrokeWidth, Tool};

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SurfaceSize {
    /// Create a surface size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a surface size, rejecting dimensions that cannot back a
    /// document or a raster surface.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] if either dimension is not a
    /// finite positive number.
    pub fn validated(width: f32, height: f32) -> CanvasResult<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self::new(width, height))
        } else {
            Err(CanvasError::InvalidSize { width, height })
        }
    }

    /// Size rounded to whole pixels, at least 1x1.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixels(self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Configuration a [`SketchSession`](crate::SketchSession) is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial surface size.
    pub size: SurfaceSize,
    /// Fill behind every primitive.
    pub background: Color,
    /// Initially selected tool.
    pub tool: Tool,
    /// Initially selected color.
    pub color: Color,
    /// Initially selected stroke width.
    pub stroke_width: StrokeWidth,
    /// Length of each arrow head stroke.
    pub arrow_head_length: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: SurfaceSize::default(),
            background: Color::white(),
            tool: Tool::Pen,
            color: Color::default(),
            stroke_width: StrokeWidth::NORMAL,
            arrow_head_length: ARROW_HEAD_LENGTH,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or holds an invalid
    /// color, width or surface size.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        SurfaceSize::validated(config.size.width, config.size.height)?;
        Ok(config)
    }

    /// Set the surface size.
    #[must_use]
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = SurfaceSize::new(width, height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SessionConfig::from_json(r##"{"color":"#ff0000","tool":"circle"}"##).expect("config");
        assert_eq!(config.color.as_str(), "#ff0000");
        assert_eq!(config.tool, Tool::Ellipse);
        assert_eq!(config.size, SurfaceSize::new(800.0, 600.0));
        assert!((config.arrow_head_length - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_width_rejected() {
        assert!(SessionConfig::from_json(r#"{"stroke_width":0}"#).is_err());
    }

    #[test]
    fn test_invalid_size_rejected() {
        let negative = SessionConfig::from_json(r#"{"size":{"width":-5,"height":100}}"#);
        assert!(matches!(negative, Err(CanvasError::InvalidSize { .. })));
        let zero = SessionConfig::from_json(r#"{"size":{"width":200,"height":0}}"#);
        assert!(matches!(zero, Err(CanvasError::InvalidSize { .. })));
        assert!(SurfaceSize::validated(f32::NAN, 10.0).is_err());
        assert!(SurfaceSize::validated(f32::INFINITY, 10.0).is_err());
        assert_eq!(SurfaceSize::validated(320.0, 240.0).expect("size"), SurfaceSize::new(320.0, 240.0));
    }

    #[test]
    fn test_pixels_never_zero() {
        assert_eq!(SurfaceSize::new(0.2, 99.6).pixels(), (1, 100));
    }
}
