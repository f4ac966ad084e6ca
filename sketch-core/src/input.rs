//! Input-to-primitive translation.
//!
//! Normalizes pointer and touch events into the press/move/release gesture
//! model and maps viewport coordinates onto the drawing surface.

use serde::{Deserialize, Serialize};

use crate::event::{InputEvent, PointerEvent, PointerPhase, TouchEvent, TouchPhase};
use crate::{Point, RenderRequest, SketchSession};

/// Viewport position of the drawing surface's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    /// Viewport X of the surface's left edge.
    pub left: f32,
    /// Viewport Y of the surface's top edge.
    pub top: f32,
}

impl SurfaceBounds {
    /// Create bounds from the left/top of a bounding client rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Map a viewport position onto the surface.
    #[must_use]
    pub fn to_local(&self, x: f32, y: f32) -> Point {
        Point::new(x - self.left, y - self.top)
    }
}

/// Normalized gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Press(Point),
    Drag(Point),
    Release(Point),
}

/// Translates raw input events into session calls.
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    bounds: SurfaceBounds,
    last_local: Option<Point>,
}

impl InputTranslator {
    /// Create a translator for a surface at `bounds`.
    #[must_use]
    pub fn new(bounds: SurfaceBounds) -> Self {
        Self {
            bounds,
            last_local: None,
        }
    }

    /// Update the surface bounds (after layout or scroll changes).
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    /// Current surface bounds.
    #[must_use]
    pub fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    /// Feed one input event into `session`, returning what must be repainted.
    pub fn translate(&mut self, session: &mut SketchSession, event: &InputEvent) -> RenderRequest {
        let Some(step) = self.normalize(event) else {
            return RenderRequest::None;
        };
        tracing::trace!("Input {:?} for tool {}", step, session.tool());

        match step {
            Step::Press(at) => {
                self.last_local = Some(at);
                session.begin_gesture(at)
            }
            Step::Drag(to) => {
                self.last_local = Some(to);
                session.move_gesture(to)
            }
            Step::Release(at) => {
                self.last_local = None;
                session.end_gesture(at)
            }
        }
    }

    fn normalize(&self, event: &InputEvent) -> Option<Step> {
        match event {
            InputEvent::Pointer(pointer) => self.normalize_pointer(pointer),
            InputEvent::Touch(touch) => self.normalize_touch(touch),
        }
    }

    fn normalize_pointer(&self, event: &PointerEvent) -> Option<Step> {
        let at = self.bounds.to_local(event.x, event.y);
        match event.phase {
            PointerPhase::Down if event.button == 0 => Some(Step::Press(at)),
            PointerPhase::Down => None,
            PointerPhase::Move => Some(Step::Drag(at)),
            PointerPhase::Up | PointerPhase::Leave => Some(Step::Release(at)),
        }
    }

    fn normalize_touch(&self, event: &TouchEvent) -> Option<Step> {
        if event.is_multi_touch() {
            tracing::trace!("Ignoring {} extra touches", event.touches.len() - 1);
        }
        let primary = event
            .primary_touch()
            .map(|t| self.bounds.to_local(t.x, t.y));
        match event.phase {
            TouchPhase::Start => primary.map(Step::Press),
            TouchPhase::Move => primary.map(Step::Drag),
            TouchPhase::End | TouchPhase::Cancel => primary
                .or(self.last_local)
                .map(Step::Release),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TouchPoint;
    use crate::{Primitive, Tool};

    fn translator() -> InputTranslator {
        InputTranslator::new(SurfaceBounds::new(100.0, 50.0))
    }

    #[test]
    fn test_coordinates_are_surface_local() {
        let mut session = SketchSession::default();
        session.set_tool(Tool::Line);
        let mut input = translator();
        input.translate(&mut session, &InputEvent::pointer(PointerPhase::Down, 110.0, 60.0));
        input.translate(&mut session, &InputEvent::pointer(PointerPhase::Up, 210.0, 60.0));

        match &session.primitives()[0] {
            Primitive::Line { x1, y1, x2, y2, .. } => {
                assert_eq!((*x1, *y1, *x2, *y2), (10.0, 10.0, 110.0, 10.0));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_pointer_leave_ends_gesture() {
        let mut session = SketchSession::default();
        session.set_tool(Tool::Rect);
        let mut input = translator();
        input.translate(&mut session, &InputEvent::pointer(PointerPhase::Down, 100.0, 50.0));
        let request = input.translate(&mut session, &InputEvent::pointer(PointerPhase::Leave, 150.0, 80.0));
        assert_eq!(request, RenderRequest::Full);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_secondary_button_does_not_start() {
        let mut session = SketchSession::default();
        let mut input = translator();
        let mut event = PointerEvent::new(PointerPhase::Down, 120.0, 70.0);
        event.button = 2;
        input.translate(&mut session, &InputEvent::Pointer(event));
        assert_eq!(session.state(), &crate::SessionState::Idle);
    }

    #[test]
    fn test_touch_uses_first_point_and_last_position_on_end() {
        let mut session = SketchSession::default();
        session.set_tool(Tool::Arrow);
        let mut input = translator();

        let two_fingers = TouchEvent::new(
            TouchPhase::Start,
            vec![
                TouchPoint { id: 7, x: 100.0, y: 50.0 },
                TouchPoint { id: 8, x: 500.0, y: 500.0 },
            ],
            0,
        );
        input.translate(&mut session, &InputEvent::Touch(two_fingers));
        input.translate(&mut session, &InputEvent::touch(TouchPhase::Move, 140.0, 80.0));
        let end = TouchEvent::new(TouchPhase::End, Vec::new(), 20);
        input.translate(&mut session, &InputEvent::Touch(end));

        match &session.primitives()[0] {
            Primitive::Arrow { x1, y1, x2, y2, .. } => {
                assert_eq!((*x1, *y1, *x2, *y2), (0.0, 0.0, 40.0, 30.0));
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_touch_without_points_is_ignored() {
        let mut session = SketchSession::default();
        let mut input = translator();
        let start = TouchEvent::new(TouchPhase::Start, Vec::new(), 0);
        assert_eq!(input.translate(&mut session, &InputEvent::Touch(start)), RenderRequest::None);
        let end = TouchEvent::new(TouchPhase::End, Vec::new(), 0);
        assert_eq!(input.translate(&mut session, &InputEvent::Touch(end)), RenderRequest::None);
    }
}
