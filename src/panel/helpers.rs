//! DOM helpers for the panel class conventions
//!
//! Thin queries over [`Document`] that know where panel parts live: the
//! root anchor, its scrollable region, scrollbar track, resize handle and
//! close control.

use crate::config::ClassNames;
use crate::dom::{Document, ElementId};
use crate::panel::{PanelId, PanelState};

/// Root element of a panel (the element whose `id` attribute is the panel id)
pub fn find_anchor(doc: &Document, id: &PanelId) -> Option<ElementId> {
    doc.get_element_by_id(id.as_str())
}

/// Scrollable content region inside a panel root
pub fn scrollable_region(doc: &Document, anchor: ElementId, classes: &ClassNames) -> Option<ElementId> {
    doc.query_descendant(anchor, &classes.scrollable)
}

/// Scroll container a sticky bar fades against
///
/// Walks up to the nearest `panel` ancestor and takes its first scrollable
/// region. `None` when either is missing.
pub fn sticky_container(doc: &Document, bar: ElementId, classes: &ClassNames) -> Option<ElementId> {
    let panel = doc.closest(bar, &classes.panel)?;
    scrollable_region(doc, panel, classes)
}

/// Resize affordance inside a panel root
pub fn resize_handle(doc: &Document, anchor: ElementId, classes: &ClassNames) -> Option<ElementId> {
    doc.query_descendant(anchor, &classes.resize_handle)
}

/// Scrollbar track and thumb inside a panel root
pub fn scrollbar_parts(
    doc: &Document,
    anchor: ElementId,
    classes: &ClassNames,
) -> Option<(ElementId, ElementId)> {
    let track = doc.query_descendant(anchor, &classes.scrollbar_track)?;
    let thumb = doc.query_descendant(track, &classes.scrollbar_thumb)?;
    Some((track, thumb))
}

/// Existing child with `class`, or a freshly appended `tag` element carrying it
pub fn ensure_descendant(doc: &mut Document, anchor: ElementId, tag: &str, class: &str) -> ElementId {
    if let Some(existing) = doc.query_descendant(anchor, class) {
        return existing;
    }
    doc.append_with(anchor, tag, None, &[class])
}

/// Write a panel state onto its root element's classes
pub fn apply_state_classes(doc: &mut Document, anchor: ElementId, state: PanelState, classes: &ClassNames) {
    doc.set_class(anchor, &classes.collapsed, state == PanelState::Collapsed);
    doc.set_class(anchor, &classes.removed, state == PanelState::Removed);
}

/// Read a panel state back from its root element's classes
pub fn state_from_classes(doc: &Document, anchor: ElementId, classes: &ClassNames) -> PanelState {
    if doc.has_class(anchor, &classes.removed) {
        PanelState::Removed
    } else if doc.has_class(anchor, &classes.collapsed) {
        PanelState::Collapsed
    } else {
        PanelState::Expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_container_requires_panel_and_scrollable() {
        let classes = ClassNames::default();
        let mut doc = Document::new();
        let root = doc.root();

        let panel = doc.append_with(root, "section", Some("A"), &["panel"]);
        let bar = doc.append_with(panel, "header", None, &["sticky-bar"]);
        let body = doc.append_with(panel, "div", None, &["scrollable-panel"]);
        assert_eq!(sticky_container(&doc, bar, &classes), Some(body));

        let bare = doc.append_with(root, "section", None, &["panel"]);
        let orphan_bar = doc.append_with(bare, "header", None, &["sticky-bar"]);
        assert_eq!(sticky_container(&doc, orphan_bar, &classes), None);

        let loose_bar = doc.append_with(root, "header", None, &["sticky-bar"]);
        assert_eq!(sticky_container(&doc, loose_bar, &classes), None);
    }

    #[test]
    fn test_state_classes_round_trip() {
        let classes = ClassNames::default();
        let mut doc = Document::new();
        let root = doc.root();
        let anchor = doc.append_with(root, "section", Some("A"), &["panel"]);

        for state in [PanelState::Collapsed, PanelState::Expanded, PanelState::Removed] {
            apply_state_classes(&mut doc, anchor, state, &classes);
            assert_eq!(state_from_classes(&doc, anchor, &classes), state);
        }
    }

    #[test]
    fn test_ensure_descendant_reuses_existing() {
        let mut doc = Document::new();
        let root = doc.root();
        let anchor = doc.append_with(root, "section", Some("A"), &["panel"]);

        let created = ensure_descendant(&mut doc, anchor, "button", "panel-close");
        let again = ensure_descendant(&mut doc, anchor, "button", "panel-close");
        assert_eq!(created, again);
        assert_eq!(doc.get(anchor).unwrap().children.len(), 1);
    }
}
