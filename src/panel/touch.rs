//! Touch resizing of panels
//!
//! A touch-start on a panel's resize handle acquires the single active
//! gesture; moves resize the panel along its axis, clamped to its definition
//! limits; touch-end commits and touch-cancel restores the size the panel had
//! when the gesture began. While a gesture is active every other touch-start,
//! on any panel, is ignored.

use serde::{Deserialize, Serialize};

use crate::config::{Axis, ClassNames};
use crate::dom::{Document, ElementId, EventKind, Handler};

use super::{helpers, PanelId, PanelRegistry};

/// A single touch contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    /// Coordinate along the resize axis
    pub fn coord(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Touch lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl TouchPhase {
    pub fn event_kind(self) -> EventKind {
        match self {
            TouchPhase::Start => EventKind::TouchStart,
            TouchPhase::Move => EventKind::TouchMove,
            TouchPhase::End => EventKind::TouchEnd,
            TouchPhase::Cancel => EventKind::TouchCancel,
        }
    }

    pub fn from_event_kind(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::TouchStart => Some(TouchPhase::Start),
            EventKind::TouchMove => Some(TouchPhase::Move),
            EventKind::TouchEnd => Some(TouchPhase::End),
            EventKind::TouchCancel => Some(TouchPhase::Cancel),
            EventKind::Click | EventKind::Scroll => None,
        }
    }
}

/// The in-flight resize interaction
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGesture {
    /// Owning panel
    pub panel: PanelId,
    pub touch_id: u32,
    pub start_coord: f32,
    pub start_size: f32,
    pub last_valid_size: f32,
}

/// Why a touch event did not affect any panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchIgnoredReason {
    GestureAlreadyActive,
    NoActiveGesture,
    TouchMismatch,
    PanelMismatch,
    UnknownPanel,
    PanelRemoved,
    NotResizable,
    NonFiniteCoordinate,
}

/// Result of feeding one touch event to the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchOutcome {
    Started,
    Resized { size: f32 },
    Committed { size: f32 },
    Cancelled { restored: f32 },
    Ignored(TouchIgnoredReason),
}

impl TouchOutcome {
    /// Whether the panel's presentation may have changed
    pub fn changed_layout(&self) -> bool {
        matches!(
            self,
            TouchOutcome::Resized { .. } | TouchOutcome::Cancelled { .. }
        )
    }
}

/// Attach touch listeners to a panel's resize handle, if it has one
pub fn bind_resize_handle(
    doc: &mut Document,
    anchor: ElementId,
    id: &PanelId,
    classes: &ClassNames,
) -> Option<ElementId> {
    let Some(handle) = helpers::resize_handle(doc, anchor, classes) else {
        tracing::debug!("Resizable panel '{}' has no resize handle", id);
        return None;
    };
    for phase in [
        TouchPhase::Start,
        TouchPhase::Move,
        TouchPhase::End,
        TouchPhase::Cancel,
    ] {
        doc.add_listener(handle, phase.event_kind(), Handler::ResizePanel(id.clone()));
    }
    Some(handle)
}

impl PanelRegistry {
    /// Route one touch event on `panel`'s resize handle
    pub fn handle_touch(
        &mut self,
        doc: &mut Document,
        panel: &PanelId,
        phase: TouchPhase,
        point: TouchPoint,
    ) -> TouchOutcome {
        match phase {
            TouchPhase::Start => self.touch_start(panel, point),
            TouchPhase::Move => self.touch_move(doc, panel, point),
            TouchPhase::End => self.touch_end(panel, point),
            TouchPhase::Cancel => self.touch_cancel(doc, panel, point),
        }
    }

    fn touch_start(&mut self, panel: &PanelId, point: TouchPoint) -> TouchOutcome {
        // First gesture wins, whichever panel the new touch lands on
        if let Some(active) = &self.active_gesture {
            tracing::debug!(
                "Touch {} on '{}' ignored: gesture {} active on '{}'",
                point.id,
                panel,
                active.touch_id,
                active.panel
            );
            return TouchOutcome::Ignored(TouchIgnoredReason::GestureAlreadyActive);
        }
        let Some(index) = self.index_of(panel) else {
            return TouchOutcome::Ignored(TouchIgnoredReason::UnknownPanel);
        };
        let runtime = &self.runtimes[index];
        if runtime.state.is_removed() {
            return TouchOutcome::Ignored(TouchIgnoredReason::PanelRemoved);
        }
        let Some(definition) = self.definition(panel) else {
            return TouchOutcome::Ignored(TouchIgnoredReason::UnknownPanel);
        };
        if !definition.resizable {
            return TouchOutcome::Ignored(TouchIgnoredReason::NotResizable);
        }
        if !point.is_finite() {
            return TouchOutcome::Ignored(TouchIgnoredReason::NonFiniteCoordinate);
        }

        let start_coord = point.coord(definition.axis);
        let start_size = runtime.size;
        self.active_gesture = Some(ActiveGesture {
            panel: panel.clone(),
            touch_id: point.id,
            start_coord,
            start_size,
            last_valid_size: start_size,
        });
        TouchOutcome::Started
    }

    /// Check that `point` continues the active gesture on `panel`
    fn owned_gesture(&self, panel: &PanelId, point: TouchPoint) -> Result<&ActiveGesture, TouchIgnoredReason> {
        let gesture = self
            .active_gesture
            .as_ref()
            .ok_or(TouchIgnoredReason::NoActiveGesture)?;
        if &gesture.panel != panel {
            return Err(TouchIgnoredReason::PanelMismatch);
        }
        if gesture.touch_id != point.id {
            return Err(TouchIgnoredReason::TouchMismatch);
        }
        Ok(gesture)
    }

    fn touch_move(&mut self, doc: &mut Document, panel: &PanelId, point: TouchPoint) -> TouchOutcome {
        let gesture = match self.owned_gesture(panel, point) {
            Ok(gesture) => gesture,
            Err(reason) => return TouchOutcome::Ignored(reason),
        };
        if !point.is_finite() {
            return TouchOutcome::Ignored(TouchIgnoredReason::NonFiniteCoordinate);
        }
        let Some(definition) = self.definition(panel) else {
            return TouchOutcome::Ignored(TouchIgnoredReason::UnknownPanel);
        };

        let (start_coord, start_size) = (gesture.start_coord, gesture.start_size);
        let size = definition.clamp_size(start_size + point.coord(definition.axis) - start_coord);

        let Some(index) = self.active_index(panel) else {
            return TouchOutcome::Ignored(TouchIgnoredReason::PanelRemoved);
        };
        let runtime = &mut self.runtimes[index];
        runtime.size = size;
        doc.set_length(runtime.anchor, size);
        if let Some(gesture) = self.active_gesture.as_mut() {
            gesture.last_valid_size = size;
        }
        TouchOutcome::Resized { size }
    }

    fn touch_end(&mut self, panel: &PanelId, point: TouchPoint) -> TouchOutcome {
        let size = match self.owned_gesture(panel, point) {
            Ok(gesture) => gesture.last_valid_size,
            Err(reason) => return TouchOutcome::Ignored(reason),
        };
        self.active_gesture = None;
        tracing::debug!("Resize of '{}' committed at {}", panel, size);
        TouchOutcome::Committed { size }
    }

    fn touch_cancel(&mut self, doc: &mut Document, panel: &PanelId, point: TouchPoint) -> TouchOutcome {
        if let Err(reason) = self.owned_gesture(panel, point) {
            return TouchOutcome::Ignored(reason);
        }
        match self.release_gesture_for(doc, panel) {
            Some(restored) => TouchOutcome::Cancelled { restored },
            None => TouchOutcome::Ignored(TouchIgnoredReason::NoActiveGesture),
        }
    }

    /// Drop `panel`'s gesture, restoring its pre-gesture size
    pub(super) fn release_gesture_for(&mut self, doc: &mut Document, panel: &PanelId) -> Option<f32> {
        if self.active_gesture.as_ref().map(|g| &g.panel) != Some(panel) {
            return None;
        }
        let gesture = self.active_gesture.take()?;
        if let Some(index) = self.index_of(panel) {
            let runtime = &mut self.runtimes[index];
            runtime.size = gesture.start_size;
            doc.set_length(runtime.anchor, gesture.start_size);
        }
        tracing::debug!("Resize of '{}' discarded", panel);
        Some(gesture.start_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelDefinition;

    fn setup() -> (Document, PanelRegistry) {
        let mut doc = Document::new();
        let root = doc.root();
        for id in ["A", "B"] {
            let panel = doc.append_with(root, "section", Some(id), &["panel"]);
            doc.append_with(panel, "div", None, &["panel-resize-handle"]);
        }
        let defs = vec![
            PanelDefinition::new("A")
                .resizable()
                .size_limits(100.0, Some(400.0))
                .initial_size(200.0),
            PanelDefinition::new("B").resizable().initial_size(200.0),
        ];
        let registry = PanelRegistry::new(&mut doc, defs, ClassNames::default());
        (doc, registry)
    }

    fn a() -> PanelId {
        PanelId::from("A")
    }

    #[test]
    fn test_handle_gets_listeners() {
        let (doc, registry) = setup();
        let handle = registry.get(&a()).unwrap().resize_handle.unwrap();
        assert_eq!(doc.listener_count(handle, EventKind::TouchStart), 1);
        assert_eq!(doc.listener_count(handle, EventKind::TouchCancel), 1);
    }

    #[test]
    fn test_move_resizes_with_clamping() {
        let (mut doc, mut registry) = setup();
        let p = |y| TouchPoint::new(1, 0.0, y);

        assert_eq!(registry.handle_touch(&mut doc, &a(), TouchPhase::Start, p(50.0)), TouchOutcome::Started);
        assert_eq!(
            registry.handle_touch(&mut doc, &a(), TouchPhase::Move, p(80.0)),
            TouchOutcome::Resized { size: 230.0 }
        );
        assert_eq!(
            registry.handle_touch(&mut doc, &a(), TouchPhase::Move, p(1000.0)),
            TouchOutcome::Resized { size: 400.0 }
        );
        assert_eq!(
            registry.handle_touch(&mut doc, &a(), TouchPhase::Move, p(-1000.0)),
            TouchOutcome::Resized { size: 100.0 }
        );
        assert_eq!(
            registry.handle_touch(&mut doc, &a(), TouchPhase::End, p(-1000.0)),
            TouchOutcome::Committed { size: 100.0 }
        );
        assert!(registry.active_gesture().is_none());
        let anchor = registry.get(&a()).unwrap().anchor;
        assert_eq!(doc.length(anchor), Some(100.0));
    }

    #[test]
    fn test_cancel_restores_start_size() {
        let (mut doc, mut registry) = setup();
        let p = |y| TouchPoint::new(3, 0.0, y);
        registry.handle_touch(&mut doc, &a(), TouchPhase::Start, p(0.0));
        registry.handle_touch(&mut doc, &a(), TouchPhase::Move, p(120.0));
        assert_eq!(registry.size(&a()), Some(320.0));

        assert_eq!(
            registry.handle_touch(&mut doc, &a(), TouchPhase::Cancel, p(120.0)),
            TouchOutcome::Cancelled { restored: 200.0 }
        );
        assert_eq!(registry.size(&a()), Some(200.0));
        assert!(registry.active_gesture().is_none());
    }

    #[test]
    fn test_non_finite_move_keeps_last_valid_size() {
        let (mut doc, mut registry) = setup();
        registry.handle_touch(&mut doc, &a(), TouchPhase::Start, TouchPoint::new(1, 0.0, 0.0));
        registry.handle_touch(&mut doc, &a(), TouchPhase::Move, TouchPoint::new(1, 0.0, 10.0));
        assert_eq!(
            registry.handle_touch(&mut doc, &a(), TouchPhase::Move, TouchPoint::new(1, 0.0, f32::NAN)),
            TouchOutcome::Ignored(TouchIgnoredReason::NonFiniteCoordinate)
        );
        assert_eq!(registry.size(&a()), Some(210.0));
    }

    #[test]
    fn test_horizontal_axis_uses_x() {
        let mut doc = Document::new();
        let root = doc.root();
        let panel = doc.append_with(root, "section", Some("side"), &["panel"]);
        doc.append_with(panel, "div", None, &["panel-resize-handle"]);
        let mut registry = PanelRegistry::new(
            &mut doc,
            vec![PanelDefinition::new("side").resizable().axis(Axis::Horizontal).initial_size(200.0)],
            ClassNames::default(),
        );
        let side = PanelId::from("side");
        registry.handle_touch(&mut doc, &side, TouchPhase::Start, TouchPoint::new(1, 10.0, 10.0));
        assert_eq!(
            registry.handle_touch(&mut doc, &side, TouchPhase::Move, TouchPoint::new(1, 40.0, 500.0)),
            TouchOutcome::Resized { size: 230.0 }
        );
    }

    #[test]
    fn test_non_resizable_panel_rejects_gesture() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_with(root, "section", Some("A"), &["panel"]);
        let mut registry = PanelRegistry::new(&mut doc, vec![PanelDefinition::new("A")], ClassNames::default());
        assert_eq!(
            registry.handle_touch(&mut doc, &a(), TouchPhase::Start, TouchPoint::new(1, 0.0, 0.0)),
            TouchOutcome::Ignored(TouchIgnoredReason::NotResizable)
        );
    }
}
