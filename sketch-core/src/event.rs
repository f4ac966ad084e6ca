//! Input events delivered to the sketch surface.
//!
//! Coordinates are in viewport space (the same space as DOM `clientX`/`clientY`);
//! the [`InputTranslator`](crate::input::InputTranslator) maps them onto the surface.

use serde::{Deserialize, Serialize};

/// Phase of a pointer (mouse/pen) event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// A pointer (mouse/pen) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this pointer event.
    pub phase: PointerPhase,
    /// X position in viewport coordinates.
    pub x: f32,
    /// Y position in viewport coordinates.
    pub y: f32,
    /// Mouse button (0 = primary, 1 = middle, 2 = secondary).
    #[serde(default)]
    pub button: u8,
}

impl PointerEvent {
    /// Create a primary-button pointer event.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            button: 0,
        }
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in viewport coordinates.
    pub x: f32,
    /// Y position in viewport coordinates.
    pub y: f32,
}

/// A touch event with zero or more active touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points. Empty on the final `End`.
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since the surface was mounted.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// All input events the sketch surface can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Pointer (mouse/pen) event.
    Pointer(PointerEvent),

    /// Raw touch event.
    Touch(TouchEvent),
}

impl InputEvent {
    /// Shorthand for a primary-button pointer event.
    #[must_use]
    pub fn pointer(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::Pointer(PointerEvent::new(phase, x, y))
    }

    /// Shorthand for a single-finger touch event.
    #[must_use]
    pub fn touch(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self::Touch(TouchEvent::new(phase, vec![TouchPoint { id: 0, x, y }], 0))
    }
}

/// Parse a gesture script: a JSON array of [`InputEvent`]s.
///
/// # Errors
///
/// Returns an error if the JSON does not describe a list of input events.
pub fn parse_script(json: &str) -> crate::CanvasResult<Vec<InputEvent>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_roundtrip_shape() {
        let json = r#"[
            {"type":"pointer","data":{"phase":"down","x":10,"y":20}},
            {"type":"touch","data":{"phase":"move","touches":[{"id":1,"x":3,"y":4}]}},
            {"type":"touch","data":{"phase":"end"}}
        ]"#;
        let events = parse_script(json).expect("script");
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], InputEvent::pointer(PointerPhase::Down, 10.0, 20.0));
        match &events[2] {
            InputEvent::Touch(t) => {
                assert_eq!(t.phase, TouchPhase::End);
                assert!(t.primary_touch().is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_multi_touch_detection() {
        let event = TouchEvent::new(
            TouchPhase::Start,
            vec![
                TouchPoint { id: 0, x: 1.0, y: 1.0 },
                TouchPoint { id: 1, x: 9.0, y: 9.0 },
            ],
            0,
        );
        assert!(event.is_multi_touch());
        assert_eq!(event.primary_touch().map(|t| t.id), Some(0));
    }

    #[test]
    fn test_parse_script_rejects_unknown_type() {
        assert!(parse_script(r#"[{"type":"voice","data":{}}]"#).is_err());
    }
}
