//! Headless document tree
//!
//! A small stand-in for the page DOM: elements with CSS classes, inline
//! style, scroll metrics and event listeners. The panel layer reads and
//! writes presentation only through this type, so a browser host can mirror
//! it onto real nodes and tests can inspect it directly.
//!
//! Like the browser, changing an element's scroll offset queues a `scroll`
//! event; the runtime drains the queue after every dispatch.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::panel::{PanelId, TouchPoint};
use crate::sticky::StickyBindingId;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub usize);

/// Scroll metrics of a scrollable element, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    #[serde(default)]
    pub scroll_top: f32,
    #[serde(default)]
    pub scroll_height: f32,
    #[serde(default)]
    pub client_height: f32,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f32, scroll_height: f32, client_height: f32) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Largest valid `scroll_top`
    pub fn max_scroll(&self) -> f32 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Whether the content overflows its viewport
    pub fn is_scrollable(&self) -> bool {
        self.max_scroll() > 0.0
    }
}

/// Inline style properties the panel layer writes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    /// `opacity`; `None` means the stylesheet value (fully opaque)
    pub opacity: Option<f32>,
    /// Position along the element's axis (`top` for scrollbar thumbs)
    pub offset: Option<f32>,
    /// Extent along the element's axis (panel height, thumb height)
    pub length: Option<f32>,
}

/// A single node in the document
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    /// The `id` attribute
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub style: Style,
    pub scroll: ScrollMetrics,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            dom_id: None,
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
            style: Style::default(),
            scroll: ScrollMetrics::default(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// DOM event classes the panel layer listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    Scroll,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
}

impl EventKind {
    /// Scroll events do not bubble; everything else does
    pub fn bubbles(self) -> bool {
        !matches!(self, EventKind::Scroll)
    }
}

/// What a listener does when its event fires
///
/// Every variant that belongs to a panel carries the panel's id so that
/// closing the panel can tear down exactly its own listeners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handler {
    ClosePanel(PanelId),
    ResizePanel(PanelId),
    SyncScrollbar(PanelId),
    DragThumb(PanelId),
    FadeStickyBar(StickyBindingId),
    /// Inline trigger calling a named global entry point
    Invoke { entry: String, arg: String },
}

impl Handler {
    /// The panel this listener is bound to, if any
    pub fn panel(&self) -> Option<&PanelId> {
        match self {
            Handler::ClosePanel(id)
            | Handler::ResizePanel(id)
            | Handler::SyncScrollbar(id)
            | Handler::DragThumb(id) => Some(id),
            Handler::FadeStickyBar(_) | Handler::Invoke { .. } => None,
        }
    }
}

/// An event waiting to be delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomEvent {
    pub target: ElementId,
    pub kind: EventKind,
    pub point: Option<TouchPoint>,
}

/// The document tree plus its listener table and pending event queue
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    listeners: BTreeMap<ElementId, Vec<(EventKind, Handler)>>,
    pending_events: VecDeque<DomEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the `body` root
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            listeners: BTreeMap::new(),
            pending_events: VecDeque::new(),
        }
    }

    /// The root element
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Number of elements, attached or not
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when nothing besides the root has been created
    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    /// Create an element and append it under `parent`
    ///
    /// An unknown parent leaves the new element detached.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        let mut element = Element::new(tag);
        if let Some(parent_el) = self.elements.get_mut(parent.0) {
            parent_el.children.push(id);
            element.parent = Some(parent);
        }
        self.elements.push(element);
        id
    }

    /// Append an element with an `id` attribute and classes in one step
    pub fn append_with(
        &mut self,
        parent: ElementId,
        tag: &str,
        dom_id: Option<&str>,
        classes: &[&str],
    ) -> ElementId {
        let id = self.append(parent, tag);
        if let Some(el) = self.get_mut(id) {
            el.dom_id = dom_id.map(str::to_string);
            el.classes = classes.iter().map(|c| c.to_string()).collect();
        }
        id
    }

    /// Find an element by its `id` attribute
    pub fn get_element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|el| el.dom_id.as_deref() == Some(dom_id))
            .map(ElementId)
    }

    // === Classes ===

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.get_mut(id) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Add or remove `class` so that its presence equals `present`
    pub fn set_class(&mut self, id: ElementId, class: &str, present: bool) {
        if present {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Toggle `class`, returning whether it is now present
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        let present = !self.has_class(id, class);
        self.set_class(id, class, present);
        present
    }

    // === Traversal ===

    /// Descendants of `id` in document order, excluding `id` itself
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = match self.get(id) {
            Some(el) => el.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(el) = self.get(next) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// First descendant of `id` carrying `class`
    pub fn query_descendant(&self, id: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(id)
            .into_iter()
            .find(|&d| self.has_class(d, class))
    }

    /// Every attached element carrying `class`, in document order
    pub fn query_all(&self, class: &str) -> Vec<ElementId> {
        let root = self.root();
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Nearest inclusive ancestor carrying `class`
    pub fn closest(&self, id: ElementId, class: &str) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(el_id) = current {
            let el = self.get(el_id)?;
            if el.has_class(class) {
                return Some(el_id);
            }
            current = el.parent;
        }
        None
    }

    // === Style ===

    /// Effective opacity (1.0 unless overridden)
    pub fn opacity(&self, id: ElementId) -> f32 {
        self.get(id)
            .and_then(|el| el.style.opacity)
            .unwrap_or(1.0)
    }

    pub fn set_opacity(&mut self, id: ElementId, opacity: f32) {
        if let Some(el) = self.get_mut(id) {
            el.style.opacity = Some(opacity);
        }
    }

    pub fn length(&self, id: ElementId) -> Option<f32> {
        self.get(id).and_then(|el| el.style.length)
    }

    pub fn set_length(&mut self, id: ElementId, length: f32) {
        if let Some(el) = self.get_mut(id) {
            el.style.length = Some(length);
        }
    }

    pub fn offset(&self, id: ElementId) -> Option<f32> {
        self.get(id).and_then(|el| el.style.offset)
    }

    pub fn set_offset(&mut self, id: ElementId, offset: f32) {
        if let Some(el) = self.get_mut(id) {
            el.style.offset = Some(offset);
        }
    }

    // === Scrolling ===

    pub fn scroll_metrics(&self, id: ElementId) -> Option<ScrollMetrics> {
        self.get(id).map(|el| el.scroll)
    }

    /// Replace an element's scroll metrics (layout change); fires no event
    pub fn set_scroll_metrics(&mut self, id: ElementId, metrics: ScrollMetrics) {
        if let Some(el) = self.get_mut(id) {
            el.scroll = metrics;
        }
    }

    /// Scroll an element, clamped to its scroll range
    ///
    /// Queues a `scroll` event and returns true when the offset changed.
    pub fn set_scroll_top(&mut self, id: ElementId, scroll_top: f32) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        if !scroll_top.is_finite() {
            return false;
        }
        let clamped = scroll_top.clamp(0.0, el.scroll.max_scroll());
        if (clamped - el.scroll.scroll_top).abs() <= f32::EPSILON {
            return false;
        }
        el.scroll.scroll_top = clamped;
        self.pending_events.push_back(DomEvent {
            target: id,
            kind: EventKind::Scroll,
            point: None,
        });
        true
    }

    // === Events ===

    /// Queue an event for delivery by the runtime
    pub fn queue_event(&mut self, event: DomEvent) {
        self.pending_events.push_back(event);
    }

    /// Take the oldest pending event
    pub fn take_event(&mut self) -> Option<DomEvent> {
        self.pending_events.pop_front()
    }

    pub fn pending_event_count(&self) -> usize {
        self.pending_events.len()
    }

    // === Listeners ===

    /// Register a listener; returns false if the same one is already attached
    pub fn add_listener(&mut self, id: ElementId, kind: EventKind, handler: Handler) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let entries = self.listeners.entry(id).or_default();
        if entries.iter().any(|(k, h)| *k == kind && *h == handler) {
            return false;
        }
        entries.push((kind, handler));
        true
    }

    /// Remove every listener whose handler matches `pred`, returning the count
    pub fn remove_listeners_where(&mut self, mut pred: impl FnMut(&Handler) -> bool) -> usize {
        let mut removed = 0;
        for entries in self.listeners.values_mut() {
            let before = entries.len();
            entries.retain(|(_, h)| !pred(h));
            removed += before - entries.len();
        }
        self.listeners.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// Number of listeners on `id` for `kind`
    pub fn listener_count(&self, id: ElementId, kind: EventKind) -> usize {
        self.listeners
            .get(&id)
            .map_or(0, |entries| entries.iter().filter(|(k, _)| *k == kind).count())
    }

    /// Handlers an event on `target` reaches, innermost first
    pub fn handlers_for(&self, target: ElementId, kind: EventKind) -> Vec<Handler> {
        let mut out = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            if let Some(entries) = self.listeners.get(&id) {
                out.extend(
                    entries
                        .iter()
                        .filter(|(k, _)| *k == kind)
                        .map(|(_, h)| h.clone()),
                );
            }
            if !kind.bubbles() {
                break;
            }
            current = self.get(id).and_then(|el| el.parent);
        }
        out
    }

    // === Markup ===

    /// Build a document from a markup description
    pub fn from_markup(nodes: &[MarkupNode]) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        for node in nodes {
            doc.build_markup(root, node);
        }
        doc
    }

    fn build_markup(&mut self, parent: ElementId, node: &MarkupNode) -> ElementId {
        let id = self.append(parent, &node.tag);
        if let Some(el) = self.get_mut(id) {
            el.dom_id = node.id.clone();
            el.classes = node.classes.clone();
            el.style.length = node.length;
            if let Some(scroll) = node.scroll {
                el.scroll = scroll;
            }
        }
        if let Some(trigger) = &node.onclick {
            self.add_listener(
                id,
                EventKind::Click,
                Handler::Invoke {
                    entry: trigger.entry.clone(),
                    arg: trigger.arg.clone(),
                },
            );
        }
        for child in &node.children {
            self.build_markup(id, child);
        }
        id
    }
}

/// Inline `onclick` trigger calling a global entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineTrigger {
    pub entry: String,
    pub arg: String,
}

/// Serializable element description used to build documents from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupNode {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub scroll: Option<ScrollMetrics>,
    #[serde(default)]
    pub length: Option<f32>,
    #[serde(default)]
    pub onclick: Option<InlineTrigger>,
    #[serde(default)]
    pub children: Vec<MarkupNode>,
}

fn default_tag() -> String {
    "div".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let panel = doc.append_with(root, "section", Some("A"), &["panel"]);
        let header = doc.append_with(panel, "header", None, &["sticky-bar"]);
        let body = doc.append_with(panel, "div", None, &["scrollable-panel"]);
        (doc, panel, header, body)
    }

    #[test]
    fn test_is_empty_ignores_root() {
        let mut doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 1);
        let root = doc.root();
        doc.append(root, "div");
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_query_and_closest() {
        let (doc, panel, header, body) = sample();
        assert_eq!(doc.get_element_by_id("A"), Some(panel));
        assert_eq!(doc.closest(header, "panel"), Some(panel));
        assert_eq!(doc.closest(panel, "panel"), Some(panel));
        assert_eq!(doc.query_descendant(panel, "scrollable-panel"), Some(body));
        assert_eq!(doc.query_all("sticky-bar"), vec![header]);
        assert_eq!(doc.closest(doc.root(), "panel"), None);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append(root, "div");
        let a1 = doc.append(a, "div");
        let b = doc.append(root, "div");
        let a2 = doc.append(a, "div");
        assert_eq!(doc.descendants(root), vec![a, a1, a2, b]);
    }

    #[test]
    fn test_toggle_class() {
        let (mut doc, panel, _, _) = sample();
        assert!(doc.toggle_class(panel, "collapsed"));
        assert!(doc.has_class(panel, "collapsed"));
        assert!(!doc.toggle_class(panel, "collapsed"));
        assert!(!doc.has_class(panel, "collapsed"));
        // Adding twice keeps a single entry
        doc.add_class(panel, "x");
        doc.add_class(panel, "x");
        assert_eq!(doc.get(panel).unwrap().classes, vec!["panel", "x"]);
    }

    #[test]
    fn test_set_scroll_top_clamps_and_queues_event() {
        let (mut doc, _, _, body) = sample();
        doc.set_scroll_metrics(body, ScrollMetrics::new(0.0, 1000.0, 200.0));

        assert!(doc.set_scroll_top(body, 5000.0));
        assert_eq!(doc.scroll_metrics(body).unwrap().scroll_top, 800.0);
        assert_eq!(doc.pending_event_count(), 1);

        // Same offset: no change, no event
        assert!(!doc.set_scroll_top(body, 800.0));
        assert_eq!(doc.pending_event_count(), 1);

        let event = doc.take_event().unwrap();
        assert_eq!(event.kind, EventKind::Scroll);
        assert_eq!(event.target, body);
    }

    #[test]
    fn test_listeners_are_deduplicated() {
        let (mut doc, panel, _, _) = sample();
        let id = PanelId::from("A");
        assert!(doc.add_listener(panel, EventKind::Click, Handler::ClosePanel(id.clone())));
        assert!(!doc.add_listener(panel, EventKind::Click, Handler::ClosePanel(id.clone())));
        assert_eq!(doc.listener_count(panel, EventKind::Click), 1);

        let removed = doc.remove_listeners_where(|h| h.panel() == Some(&id));
        assert_eq!(removed, 1);
        assert_eq!(doc.listener_count(panel, EventKind::Click), 0);
    }

    #[test]
    fn test_click_bubbles_scroll_does_not() {
        let (mut doc, panel, header, _) = sample();
        let id = PanelId::from("A");
        doc.add_listener(panel, EventKind::Click, Handler::ClosePanel(id.clone()));
        doc.add_listener(panel, EventKind::Scroll, Handler::SyncScrollbar(id));

        assert_eq!(doc.handlers_for(header, EventKind::Click).len(), 1);
        assert!(doc.handlers_for(header, EventKind::Scroll).is_empty());
    }

    #[test]
    fn test_from_markup() {
        let yaml = r#"
- id: A
  classes: [panel]
  children:
    - classes: [sticky-bar]
    - classes: [scrollable-panel]
      scroll: { scroll_top: 0, scroll_height: 600, client_height: 200 }
- tag: button
  onclick: { entry: togglePanel, arg: A }
"#;
        let nodes: Vec<MarkupNode> = serde_yaml::from_str(yaml).unwrap();
        let doc = Document::from_markup(&nodes);

        let panel = doc.get_element_by_id("A").unwrap();
        let body = doc.query_descendant(panel, "scrollable-panel").unwrap();
        assert_eq!(doc.scroll_metrics(body).unwrap().scroll_height, 600.0);

        let button = doc
            .descendants(doc.root())
            .into_iter()
            .find(|&id| doc.get(id).unwrap().tag == "button")
            .unwrap();
        assert_eq!(
            doc.handlers_for(button, EventKind::Click),
            vec![Handler::Invoke {
                entry: "togglePanel".to_string(),
                arg: "A".to_string()
            }]
        );
    }
}
