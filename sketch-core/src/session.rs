//! Canvas session state - committed primitives, tool selection and the
//! gesture state machine.
//!
//! ```text
//!            begin (pen/shape)          end / leave
//!   Idle ─────────────────────▶ Drawing ───────────▶ Idle
//!     │
//!     │ begin (text)        provide_text / cancel_text
//!     └──────────▶ AwaitingTextInput ──────────────▶ Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::StrokeStyle;
use crate::{
    svg, CanvasError, CanvasResult, Color, Point, Primitive, SessionConfig, StrokeWidth,
    SurfaceSize, Tool,
};

/// Where the gesture state machine currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No gesture in progress.
    Idle,
    /// A pen or shape gesture is in progress.
    Drawing {
        /// Tool selected when the gesture started.
        tool: Tool,
        /// Press position.
        start: Point,
        /// Most recent position.
        last: Point,
        /// Paint captured when the gesture started.
        style: StrokeStyle,
    },
    /// The text tool was pressed and the host is collecting the label.
    AwaitingTextInput {
        /// Where the label will be placed.
        at: Point,
        /// Paint captured at the press; the label uses its color and size.
        style: StrokeStyle,
    },
}

/// What the render engine must do after a session call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderRequest {
    /// Nothing changed.
    None,
    /// Draw one freehand segment on top of the current raster.
    Segment {
        /// Previous stroke point.
        from: Point,
        /// New stroke point.
        to: Point,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: StrokeWidth,
    },
    /// Full redraw followed by a transient preview shape.
    Preview {
        /// Shape to draw on top; never committed.
        primitive: Primitive,
    },
    /// Full redraw of the committed list.
    Full,
    /// Ask the user for a text label to place at `at`.
    TextInput {
        /// Label position.
        at: Point,
    },
}

/// A sketch canvas session.
///
/// Owns every piece of mutable drawing state, so several independent
/// surfaces can coexist.
#[derive(Debug, Clone)]
pub struct SketchSession {
    committed: Vec<Primitive>,
    open_stroke: Option<Primitive>,
    state: SessionState,
    tool: Tool,
    color: Color,
    width: StrokeWidth,
    size: SurfaceSize,
    background: Color,
    arrow_head_length: f32,
    exported_svg: Option<String>,
    revision: u64,
}

impl SketchSession {
    /// Create an idle session with an empty committed list.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            committed: Vec::new(),
            open_stroke: None,
            state: SessionState::Idle,
            tool: config.tool,
            color: config.color,
            width: config.stroke_width,
            size: config.size,
            background: config.background,
            arrow_head_length: config.arrow_head_length,
            exported_svg: None,
            revision: 0,
        }
    }

    /// Current state of the gesture state machine.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Committed primitives in insertion (z-)order.
    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.committed
    }

    /// The freehand stroke being drawn, if any.
    #[must_use]
    pub fn open_stroke(&self) -> Option<&Primitive> {
        self.open_stroke.as_ref()
    }

    /// Number of committed primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Whether nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Incremented on every mutation of the committed list or surface size.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Selected tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Select the tool for the next gesture.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Selected color.
    #[must_use]
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Select the color for the next gesture.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Selected stroke width.
    #[must_use]
    pub fn width(&self) -> StrokeWidth {
        self.width
    }

    /// Select the stroke width for the next gesture.
    pub fn set_width(&mut self, width: StrokeWidth) {
        self.width = width;
    }

    /// Surface size the SVG document is sized to.
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Record a new surface size.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size != self.size {
            tracing::debug!("Sketch surface resized to {}x{}", size.width, size.height);
            self.size = size;
            self.touch();
        }
    }

    /// Background fill.
    #[must_use]
    pub fn background(&self) -> &Color {
        &self.background
    }

    /// Arrow head length used by renderers and the serializer.
    #[must_use]
    pub fn arrow_head_length(&self) -> f32 {
        self.arrow_head_length
    }

    /// Handle a press at `at` (surface-local).
    pub fn begin_gesture(&mut self, at: Point) -> RenderRequest {
        if self.state != SessionState::Idle {
            tracing::trace!("Ignoring press while {:?}", self.state);
            return RenderRequest::None;
        }

        let style = StrokeStyle {
            color: self.color.clone(),
            width: self.width,
        };
        match self.tool {
            Tool::Text => {
                self.state = SessionState::AwaitingTextInput { at, style };
                RenderRequest::TextInput { at }
            }
            tool => {
                if tool == Tool::Pen {
                    self.open_stroke = Some(Primitive::Stroke {
                        color: style.color.clone(),
                        width: style.width,
                        points: vec![at],
                    });
                }
                self.state = SessionState::Drawing {
                    tool,
                    start: at,
                    last: at,
                    style,
                };
                RenderRequest::None
            }
        }
    }

    /// Handle a pointer move to `to` (surface-local).
    pub fn move_gesture(&mut self, to: Point) -> RenderRequest {
        let SessionState::Drawing {
            tool,
            start,
            last,
            style,
        } = &mut self.state
        else {
            return RenderRequest::None;
        };

        let from = std::mem::replace(last, to);
        if *tool == Tool::Pen {
            if let Some(Primitive::Stroke { points, .. }) = &mut self.open_stroke {
                points.push(to);
            }
            return RenderRequest::Segment {
                from,
                to,
                color: style.color.clone(),
                width: style.width,
            };
        }

        match Primitive::from_drag(*tool, style.color.clone(), style.width, *start, to) {
            Some(primitive) => RenderRequest::Preview { primitive },
            None => RenderRequest::None,
        }
    }

    /// Handle a release (or pointer leave) at `at` (surface-local).
    pub fn end_gesture(&mut self, at: Point) -> RenderRequest {
        if !matches!(self.state, SessionState::Drawing { .. }) {
            if self.state == SessionState::Idle {
                tracing::trace!("Release without a matching press");
            }
            return RenderRequest::None;
        }
        let SessionState::Drawing {
            tool, start, style, ..
        } = std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return RenderRequest::None;
        };

        let committed = if tool == Tool::Pen {
            self.open_stroke
                .take()
                .filter(|stroke| matches!(stroke, Primitive::Stroke { points, .. } if !points.is_empty()))
        } else {
            Primitive::from_drag(tool, style.color, style.width, start, at)
        };

        match committed {
            Some(primitive) => {
                self.commit(primitive);
                RenderRequest::Full
            }
            None => RenderRequest::None,
        }
    }

    /// Answer a pending text request.
    ///
    /// The label takes the color and width selected when the text tool was
    /// pressed. Empty text counts as cancellation; whitespace is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PreconditionNotMet`] if no text was requested and
    /// [`CanvasError::Cancelled`] if `text` is empty.
    pub fn provide_text(&mut self, text: impl Into<String>) -> CanvasResult<RenderRequest> {
        if !matches!(self.state, SessionState::AwaitingTextInput { .. }) {
            return Err(CanvasError::precondition("no text input was requested"));
        }
        let SessionState::AwaitingTextInput { at, style } =
            std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return Err(CanvasError::precondition("no text input was requested"));
        };

        let text = text.into();
        if text.is_empty() {
            tracing::debug!("Text input at ({}, {}) left empty", at.x, at.y);
            return Err(CanvasError::Cancelled);
        }

        self.commit(Primitive::Text {
            color: style.color,
            size: style.width.text_size(),
            text,
            x: at.x,
            y: at.y,
        });
        Ok(RenderRequest::Full)
    }

    /// Dismiss a pending text request.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PreconditionNotMet`] if no text was requested.
    pub fn cancel_text(&mut self) -> CanvasResult<()> {
        if !matches!(self.state, SessionState::AwaitingTextInput { .. }) {
            return Err(CanvasError::precondition("no text input was requested"));
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Discard every committed primitive.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PreconditionNotMet`] unless the session is idle.
    pub fn clear(&mut self) -> CanvasResult<()> {
        if self.state != SessionState::Idle {
            return Err(CanvasError::precondition("cannot clear during a gesture"));
        }
        tracing::debug!("Clearing {} primitives", self.committed.len());
        self.committed = Vec::new();
        self.open_stroke = None;
        self.touch();
        Ok(())
    }

    /// Serialize the committed list to SVG, reusing the last export when
    /// nothing changed since.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::EmptyCanvas`] if nothing has been committed.
    pub fn export_svg(&mut self) -> CanvasResult<&str> {
        if self.exported_svg.is_none() {
            self.exported_svg = svg::serialize(
                &self.committed,
                self.size,
                &self.background,
                self.arrow_head_length,
            );
        }
        self.exported_svg.as_deref().ok_or(CanvasError::EmptyCanvas)
    }

    fn commit(&mut self, primitive: Primitive) {
        tracing::debug!("Committed {} primitive #{}", primitive.tool(), self.committed.len());
        self.committed.push(primitive);
        self.touch();
    }

    fn touch(&mut self) {
        self.exported_svg = None;
        self.revision += 1;
    }
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
