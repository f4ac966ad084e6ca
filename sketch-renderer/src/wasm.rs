//! WebAssembly bindings for the sketch canvas.
//!
//! The host page forwards raw mouse and touch coordinates (client space);
//! this module keeps the surface bounds current, routes events through the
//! [`InputTranslator`] and repaints through a [`Canvas2dBackend`].

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use sketch_core::{
    CanvasError, Color, InputEvent, InputTranslator, PointerEvent, PointerPhase, RenderRequest, SessionConfig,
    SessionState, SketchSession, StrokeWidth, SurfaceBounds, SurfaceSize, Tool, TouchEvent, TouchPhase,
};

use crate::backend::canvas2d::Canvas2dBackend;
use crate::{Renderer, RendererConfig};

/// Initialize the sketch WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Sketch canvas bound to an `HtmlCanvasElement`.
#[wasm_bindgen]
pub struct WasmSketchCanvas {
    session: SketchSession,
    translator: InputTranslator,
    renderer: Renderer<Canvas2dBackend>,
}

#[wasm_bindgen]
impl WasmSketchCanvas {
    /// Attach to the canvas element with the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is missing, is not a canvas, or has
    /// no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WasmSketchCanvas, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| JsValue::from_str("Failed to get 2D context"))?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))?;

        #[allow(clippy::cast_precision_loss)]
        let config = SessionConfig::default().with_size(canvas.width() as f32, canvas.height() as f32);
        let session = SketchSession::new(config);
        let font_family = RendererConfig::default().font_family;
        let mut renderer = Renderer::new(Canvas2dBackend::new(canvas, ctx, font_family));
        renderer.redraw(&session).map_err(js_err)?;

        let mut sketch = Self {
            session,
            translator: InputTranslator::new(SurfaceBounds::default()),
            renderer,
        };
        sketch.refresh_bounds();
        tracing::debug!("Sketch canvas attached to #{canvas_id}");
        Ok(sketch)
    }

    /// Mouse button pressed. Returns `true` when the host should prompt for
    /// label text.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, client_x: f32, client_y: f32, button: u8) -> Result<bool, JsValue> {
        self.refresh_bounds();
        let mut event = PointerEvent::new(PointerPhase::Down, client_x, client_y);
        event.button = button;
        self.dispatch(&InputEvent::Pointer(event))
    }

    /// Mouse moved.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) -> Result<bool, JsValue> {
        self.dispatch(&InputEvent::pointer(PointerPhase::Move, client_x, client_y))
    }

    /// Mouse button released.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, client_x: f32, client_y: f32) -> Result<bool, JsValue> {
        self.dispatch(&InputEvent::pointer(PointerPhase::Up, client_x, client_y))
    }

    /// Mouse left the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, client_x: f32, client_y: f32) -> Result<bool, JsValue> {
        self.dispatch(&InputEvent::pointer(PointerPhase::Leave, client_x, client_y))
    }

    /// First finger down.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, client_x: f32, client_y: f32) -> Result<bool, JsValue> {
        self.refresh_bounds();
        self.dispatch(&InputEvent::touch(TouchPhase::Start, client_x, client_y))
    }

    /// Finger moved.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, client_x: f32, client_y: f32) -> Result<bool, JsValue> {
        self.dispatch(&InputEvent::touch(TouchPhase::Move, client_x, client_y))
    }

    /// Finger lifted. Ends at the last known position.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self) -> Result<bool, JsValue> {
        self.dispatch(&InputEvent::Touch(TouchEvent::new(TouchPhase::End, Vec::new(), 0)))
    }

    /// Select a tool by name (`pen`, `line`, `rect`, `circle`, `arrow`, `text`).
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown tool name.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, name: &str) -> Result<(), JsValue> {
        let tool: Tool = name.parse().map_err(js_err)?;
        self.session.set_tool(tool);
        Ok(())
    }

    /// Set the stroke/text color.
    ///
    /// # Errors
    ///
    /// Returns an error if the color cannot be parsed.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, color: &str) -> Result<(), JsValue> {
        self.session.set_color(Color::parse(color).map_err(js_err)?);
        Ok(())
    }

    /// Set the stroke width.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive width.
    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, width: f32) -> Result<(), JsValue> {
        self.session.set_width(StrokeWidth::new(width).map_err(js_err)?);
        Ok(())
    }

    /// Whether a text placement is waiting for its label.
    #[wasm_bindgen(js_name = isAwaitingText)]
    #[must_use]
    pub fn is_awaiting_text(&self) -> bool {
        matches!(self.session.state(), SessionState::AwaitingTextInput { .. })
    }

    /// Supply the label for a pending text placement. Empty text cancels it.
    ///
    /// # Errors
    ///
    /// Returns an error if no text placement is pending or drawing fails.
    #[wasm_bindgen(js_name = provideText)]
    pub fn provide_text(&mut self, text: &str) -> Result<(), JsValue> {
        match self.session.provide_text(text) {
            Ok(request) => self.renderer.apply(&self.session, &request).map_err(js_err),
            Err(CanvasError::Cancelled) => Ok(()),
            Err(e) => Err(js_err(e)),
        }
    }

    /// Abandon a pending text placement.
    ///
    /// # Errors
    ///
    /// Returns an error if no text placement is pending.
    #[wasm_bindgen(js_name = cancelText)]
    pub fn cancel_text(&mut self) -> Result<(), JsValue> {
        self.session.cancel_text().map_err(js_err)
    }

    /// Remove every primitive and repaint the background.
    ///
    /// # Errors
    ///
    /// Returns an error if a gesture is in progress or drawing fails.
    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.session.clear().map_err(js_err)?;
        self.renderer.redraw(&self.session).map_err(js_err)
    }

    /// Serialize the committed primitives as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas is empty.
    #[wasm_bindgen(js_name = exportSvg)]
    pub fn export_svg(&mut self) -> Result<String, JsValue> {
        self.session.export_svg().map(str::to_owned).map_err(js_err)
    }

    /// Resize the drawing surface and repaint.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive or non-finite size, or if the
    /// surface cannot be resized.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.session
            .resize(SurfaceSize::validated(width, height).map_err(js_err)?);
        self.renderer.sync_size(&self.session).map_err(js_err)?;
        self.refresh_bounds();
        Ok(())
    }

    /// Number of committed primitives.
    #[wasm_bindgen(js_name = primitiveCount)]
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.session.len()
    }
}

impl WasmSketchCanvas {
    #[allow(clippy::cast_possible_truncation)]
    fn refresh_bounds(&mut self) {
        let rect = self.renderer.backend().canvas().get_bounding_client_rect();
        self.translator
            .set_bounds(SurfaceBounds::new(rect.left() as f32, rect.top() as f32));
    }

    fn dispatch(&mut self, event: &InputEvent) -> Result<bool, JsValue> {
        let request = self.translator.translate(&mut self.session, event);
        self.renderer.apply(&self.session, &request).map_err(js_err)?;
        Ok(matches!(request, RenderRequest::TextInput { .. }))
    }
}
