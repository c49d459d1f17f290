//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use panel_deck::config::{PanelDefinition, PanelsConfig};
use panel_deck::dom::{Document, ElementId, ScrollMetrics};
use panel_deck::panel::PanelId;
use panel_deck::runtime::{bootstrap, Runtime};

/// Content height of every fixture panel body
pub const CONTENT_HEIGHT: f32 = 1000.0;

/// Visible height of every fixture panel body (and its scrollbar track)
pub const VIEWPORT_HEIGHT: f32 = 250.0;

/// Build a page with one fully-featured panel per id
///
/// Each panel `X` has a sticky header `X-header`, a scrollable body
/// `X-body`, a scrollbar track `X-track` with thumb `X-thumb`, and a resize
/// handle `X-handle`. A `toggle-X` button calls `togglePanel("X")`.
pub fn dashboard(ids: &[&str]) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    let nav = doc.append(root, "nav");
    for id in ids {
        let button = doc.append_with(nav, "button", Some(&format!("toggle-{}", id)), &[]);
        doc.add_listener(
            button,
            panel_deck::dom::EventKind::Click,
            panel_deck::dom::Handler::Invoke {
                entry: "togglePanel".to_string(),
                arg: id.to_string(),
            },
        );

        let panel = doc.append_with(root, "section", Some(id), &["panel"]);
        doc.append_with(panel, "header", Some(&format!("{}-header", id)), &["sticky-bar"]);
        let body = doc.append_with(panel, "div", Some(&format!("{}-body", id)), &["scrollable-panel"]);
        doc.set_scroll_metrics(body, ScrollMetrics::new(0.0, CONTENT_HEIGHT, VIEWPORT_HEIGHT));
        let track = doc.append_with(panel, "div", Some(&format!("{}-track", id)), &["panel-scrollbar"]);
        doc.set_length(track, VIEWPORT_HEIGHT);
        doc.append_with(track, "div", Some(&format!("{}-thumb", id)), &["panel-scrollbar-thumb"]);
        doc.append_with(panel, "div", Some(&format!("{}-handle", id)), &["panel-resize-handle"]);
    }
    doc
}

/// Panels A (expanded) and B (collapsed), both resizable, closable and
/// with sticky headers
pub fn two_panel_config() -> PanelsConfig {
    PanelsConfig::with_panels(vec![
        PanelDefinition::new("A")
            .expanded()
            .resizable()
            .closable()
            .sticky_header()
            .size_limits(100.0, Some(400.0))
            .initial_size(200.0),
        PanelDefinition::new("B")
            .resizable()
            .closable()
            .sticky_header()
            .initial_size(200.0),
    ])
}

/// Runtime over the two-panel page without the bootstrap sequence
pub fn initialized() -> Runtime {
    Runtime::new(dashboard(&["A", "B"]), two_panel_config())
}

/// Fully bootstrapped runtime over the two-panel page
pub fn booted() -> Runtime {
    bootstrap(dashboard(&["A", "B"]), two_panel_config())
}

/// Element with the given `id` attribute
pub fn el(rt: &Runtime, dom_id: &str) -> ElementId {
    rt.document()
        .get_element_by_id(dom_id)
        .unwrap_or_else(|| panic!("no element '{}'", dom_id))
}

pub fn pid(id: &str) -> PanelId {
    PanelId::from(id)
}
