//! Gesture script replay for headless sessions.
//!
//! A script is a JSON array of input events in surface coordinates. Text
//! placements take their labels from a queue, in order; a placement with no
//! label left is cancelled.

use std::collections::VecDeque;

use sketch_core::event::parse_script;
use sketch_core::{
    CanvasError, CanvasResult, InputEvent, InputTranslator, RenderRequest, SketchSession,
    SurfaceBounds,
};

/// What a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events fed to the translator.
    pub events: usize,
    /// Primitives committed during the replay.
    pub committed: usize,
    /// Text placements that got no label.
    pub cancelled_labels: usize,
}

/// Feed `events` into `session` with the surface anchored at the origin.
pub fn replay(
    session: &mut SketchSession,
    events: &[InputEvent],
    labels: impl IntoIterator<Item = String>,
) -> ReplaySummary {
    let mut input = InputTranslator::new(SurfaceBounds::new(0.0, 0.0));
    let mut labels: VecDeque<String> = labels.into_iter().collect();
    let before = session.len();
    let mut summary = ReplaySummary::default();

    for event in events {
        summary.events += 1;
        if let RenderRequest::TextInput { at } = input.translate(session, event) {
            let answered = match labels.pop_front() {
                Some(label) => session.provide_text(label),
                None => Err(CanvasError::Cancelled),
            };
            if answered.is_err() {
                if session.cancel_text().is_ok() {
                    tracing::debug!("No label for text at ({}, {})", at.x, at.y);
                }
                summary.cancelled_labels += 1;
            }
        }
    }

    summary.committed = session.len().saturating_sub(before);
    tracing::debug!(
        "Replayed {} events, committed {} primitives",
        summary.events,
        summary.committed
    );
    summary
}

/// Parse `script` and replay it into `session`.
///
/// # Errors
///
/// Returns an error if the script is not a JSON list of input events.
pub fn replay_json(
    session: &mut SketchSession,
    script: &str,
    labels: impl IntoIterator<Item = String>,
) -> CanvasResult<ReplaySummary> {
    let events = parse_script(script)?;
    Ok(replay(session, &events, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::{PointerPhase, Primitive, Tool};

    fn click(x: f32, y: f32) -> Vec<InputEvent> {
        vec![
            InputEvent::pointer(PointerPhase::Down, x, y),
            InputEvent::pointer(PointerPhase::Up, x, y),
        ]
    }

    #[test]
    fn test_labels_are_consumed_in_order() {
        let mut session = SketchSession::default();
        session.set_tool(Tool::Text);
        let mut events = click(10.0, 10.0);
        events.extend(click(20.0, 20.0));

        let summary = replay(&mut session, &events, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(summary.committed, 2);
        assert_eq!(summary.cancelled_labels, 0);
        assert!(matches!(&session.primitives()[1], Primitive::Text { text, .. } if text == "second"));
    }

    #[test]
    fn test_missing_label_cancels_placement() {
        let mut session = SketchSession::default();
        session.set_tool(Tool::Text);
        let summary = replay(&mut session, &click(10.0, 10.0), Vec::new());
        assert_eq!(summary.committed, 0);
        assert_eq!(summary.cancelled_labels, 1);
        assert!(session.is_empty());
    }

    #[test]
    fn test_empty_label_counts_as_cancelled() {
        let mut session = SketchSession::default();
        session.set_tool(Tool::Text);
        let summary = replay(&mut session, &click(10.0, 10.0), vec![String::new()]);
        assert_eq!(summary.cancelled_labels, 1);
        // Session is usable again afterwards.
        session.set_tool(Tool::Line);
        session.begin_gesture(sketch_core::Point::new(0.0, 0.0));
        session.end_gesture(sketch_core::Point::new(5.0, 5.0));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_replay_json_rejects_garbage() {
        let mut session = SketchSession::default();
        assert!(replay_json(&mut session, "{not json", Vec::new()).is_err());
    }
}
