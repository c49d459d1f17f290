//! Custom scrollbar sync
//!
//! Mirrors a panel's content scroll offset into a visual track/thumb pair
//! and lets thumb drags scroll the content back. Geometry is always
//! recomputed from the content's current scroll metrics, never from the
//! thumb's previous position.

use crate::config::ClassNames;
use crate::dom::{Document, ElementId, EventKind, Handler, ScrollMetrics};

use super::{helpers, PanelId, PanelRegistry, TouchPhase, TouchPoint};

/// Shortest thumb drawn when content is much taller than its viewport
pub const MIN_THUMB_LENGTH: f32 = 16.0;

/// In-progress thumb drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbDrag {
    pub pointer_id: u32,
    pub start_coord: f32,
    pub start_offset: f32,
}

/// Elements making up one panel's scrollbar
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarBinding {
    /// Scrollable content region
    pub content: ElementId,
    pub track: ElementId,
    pub thumb: ElementId,
    pub drag: Option<ThumbDrag>,
}

/// Position and extent of the thumb inside its track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbGeometry {
    pub offset: f32,
    pub length: f32,
}

impl ThumbGeometry {
    pub fn compute(metrics: ScrollMetrics, track_length: f32) -> Self {
        let track = track_length.max(0.0);
        if !metrics.is_scrollable() {
            return Self {
                offset: 0.0,
                length: track,
            };
        }
        let length = (track * metrics.client_height / metrics.scroll_height)
            .clamp(MIN_THUMB_LENGTH.min(track), track);
        let ratio = (metrics.scroll_top / metrics.max_scroll()).clamp(0.0, 1.0);
        Self {
            offset: (track - length) * ratio,
            length,
        }
    }
}

/// Content scroll offset that puts the thumb at `thumb_offset`
pub fn scroll_offset_for_thumb(metrics: ScrollMetrics, track_length: f32, thumb_offset: f32) -> f32 {
    let geometry = ThumbGeometry::compute(metrics, track_length);
    let travel = track_length - geometry.length;
    if travel <= 0.0 {
        return 0.0;
    }
    thumb_offset.clamp(0.0, travel) / travel * metrics.max_scroll()
}

fn track_length(doc: &Document, binding: &ScrollbarBinding, metrics: ScrollMetrics) -> f32 {
    doc.length(binding.track).unwrap_or(metrics.client_height)
}

/// Find a panel's content region and scrollbar, and attach listeners
pub fn bind(
    doc: &mut Document,
    anchor: ElementId,
    id: &PanelId,
    classes: &ClassNames,
) -> Option<ScrollbarBinding> {
    let content = helpers::scrollable_region(doc, anchor, classes)?;
    let (track, thumb) = helpers::scrollbar_parts(doc, anchor, classes)?;

    doc.add_listener(content, EventKind::Scroll, Handler::SyncScrollbar(id.clone()));
    for phase in [
        TouchPhase::Start,
        TouchPhase::Move,
        TouchPhase::End,
        TouchPhase::Cancel,
    ] {
        doc.add_listener(thumb, phase.event_kind(), Handler::DragThumb(id.clone()));
    }

    Some(ScrollbarBinding {
        content,
        track,
        thumb,
        drag: None,
    })
}

/// Draw the thumb from the content's scroll metrics; returns the scroll offset
pub fn render(doc: &mut Document, binding: &ScrollbarBinding) -> f32 {
    let metrics = doc.scroll_metrics(binding.content).unwrap_or_default();
    let geometry = ThumbGeometry::compute(metrics, track_length(doc, binding, metrics));
    doc.set_offset(binding.thumb, geometry.offset);
    doc.set_length(binding.thumb, geometry.length);
    metrics.scroll_top
}

impl PanelRegistry {
    /// Content of `panel` scrolled; returns whether the cached offset moved
    pub fn sync_scrollbar(&mut self, doc: &mut Document, panel: &PanelId) -> bool {
        let Some(index) = self.active_index(panel) else {
            return false;
        };
        let runtime = &mut self.runtimes[index];
        let Some(binding) = runtime.scrollbar.as_ref() else {
            return false;
        };
        let offset = render(doc, binding);
        let changed = (offset - runtime.last_scroll_offset).abs() > f32::EPSILON;
        runtime.last_scroll_offset = offset;
        changed
    }

    /// Route one drag event on `panel`'s thumb; returns whether content scrolled
    pub fn handle_thumb_drag(
        &mut self,
        doc: &mut Document,
        panel: &PanelId,
        phase: TouchPhase,
        point: TouchPoint,
    ) -> bool {
        let Some(index) = self.active_index(panel) else {
            return false;
        };
        let runtime = &mut self.runtimes[index];
        let Some(binding) = runtime.scrollbar.as_mut() else {
            return false;
        };

        match phase {
            TouchPhase::Start => {
                if binding.drag.is_some() || !point.is_finite() {
                    return false;
                }
                binding.drag = Some(ThumbDrag {
                    pointer_id: point.id,
                    start_coord: point.y,
                    start_offset: doc.offset(binding.thumb).unwrap_or(0.0),
                });
                false
            }
            TouchPhase::Move => {
                let Some(drag) = binding.drag.filter(|d| d.pointer_id == point.id) else {
                    return false;
                };
                if !point.is_finite() {
                    return false;
                }
                let metrics = doc.scroll_metrics(binding.content).unwrap_or_default();
                let track = track_length(doc, binding, metrics);
                let thumb_offset = drag.start_offset + (point.y - drag.start_coord);
                let offset = scroll_offset_for_thumb(metrics, track, thumb_offset);

                // Writing an unchanged offset would only echo back as a scroll event
                if (offset - runtime.last_scroll_offset).abs() <= f32::EPSILON {
                    return false;
                }
                doc.set_scroll_top(binding.content, offset);
                runtime.last_scroll_offset = render(doc, binding);
                true
            }
            TouchPhase::End | TouchPhase::Cancel => {
                if binding.drag.is_some_and(|d| d.pointer_id == point.id) {
                    binding.drag = None;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelDefinition;

    #[test]
    fn test_geometry_proportional() {
        let metrics = ScrollMetrics::new(0.0, 1000.0, 250.0);
        let top = ThumbGeometry::compute(metrics, 200.0);
        assert_eq!(top, ThumbGeometry { offset: 0.0, length: 50.0 });

        let bottom = ThumbGeometry::compute(ScrollMetrics::new(750.0, 1000.0, 250.0), 200.0);
        assert_eq!(bottom, ThumbGeometry { offset: 150.0, length: 50.0 });

        let middle = ThumbGeometry::compute(ScrollMetrics::new(375.0, 1000.0, 250.0), 200.0);
        assert_eq!(middle.offset, 75.0);
    }

    #[test]
    fn test_geometry_when_content_fits() {
        let geometry = ThumbGeometry::compute(ScrollMetrics::new(0.0, 100.0, 300.0), 200.0);
        assert_eq!(geometry, ThumbGeometry { offset: 0.0, length: 200.0 });
    }

    #[test]
    fn test_geometry_minimum_thumb() {
        let geometry = ThumbGeometry::compute(ScrollMetrics::new(0.0, 100_000.0, 100.0), 200.0);
        assert_eq!(geometry.length, MIN_THUMB_LENGTH);
    }

    #[test]
    fn test_scroll_offset_for_thumb_inverts_geometry() {
        let metrics = ScrollMetrics::new(0.0, 1000.0, 250.0);
        assert_eq!(scroll_offset_for_thumb(metrics, 200.0, 75.0), 375.0);
        assert_eq!(scroll_offset_for_thumb(metrics, 200.0, 500.0), 750.0);
        assert_eq!(scroll_offset_for_thumb(metrics, 200.0, -10.0), 0.0);
    }

    fn setup() -> (Document, PanelRegistry, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let panel = doc.append_with(root, "section", Some("A"), &["panel"]);
        let body = doc.append_with(panel, "div", None, &["scrollable-panel"]);
        doc.set_scroll_metrics(body, ScrollMetrics::new(0.0, 1000.0, 250.0));
        let track = doc.append_with(panel, "div", None, &["panel-scrollbar"]);
        doc.set_length(track, 200.0);
        doc.append_with(track, "div", None, &["panel-scrollbar-thumb"]);
        let registry = PanelRegistry::new(&mut doc, vec![PanelDefinition::new("A")], ClassNames::default());
        (doc, registry, body)
    }

    #[test]
    fn test_sync_reads_dom_each_time() {
        let (mut doc, mut registry, body) = setup();
        let a = PanelId::from("A");
        let thumb = registry.get(&a).unwrap().scrollbar.as_ref().unwrap().thumb;
        assert_eq!(doc.length(thumb), Some(50.0));

        doc.set_scroll_top(body, 750.0);
        assert!(registry.sync_scrollbar(&mut doc, &a));
        assert_eq!(doc.offset(thumb), Some(150.0));
        assert_eq!(registry.get(&a).unwrap().last_scroll_offset, 750.0);

        // Same metrics again: nothing moved
        assert!(!registry.sync_scrollbar(&mut doc, &a));
    }

    #[test]
    fn test_thumb_drag_scrolls_content_once() {
        let (mut doc, mut registry, body) = setup();
        let a = PanelId::from("A");
        let p = |y| TouchPoint::new(7, 0.0, y);

        assert!(!registry.handle_thumb_drag(&mut doc, &a, TouchPhase::Start, p(10.0)));
        assert!(registry.handle_thumb_drag(&mut doc, &a, TouchPhase::Move, p(85.0)));
        assert_eq!(doc.scroll_metrics(body).unwrap().scroll_top, 375.0);
        assert_eq!(doc.pending_event_count(), 1);

        // The echoed scroll event finds the cache already up to date
        assert!(!registry.sync_scrollbar(&mut doc, &a));
        // Moving to the same place writes nothing
        assert!(!registry.handle_thumb_drag(&mut doc, &a, TouchPhase::Move, p(85.0)));
        assert_eq!(doc.pending_event_count(), 1);

        registry.handle_thumb_drag(&mut doc, &a, TouchPhase::End, p(85.0));
        assert!(registry.get(&a).unwrap().scrollbar.as_ref().unwrap().drag.is_none());
    }
}
