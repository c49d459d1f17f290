//! Runtime module - drives the model from host events
//!
//! - `bootstrap` - startup sequence and the global entry-point surface
//! - `script` - replayable event scripts for the CLI
//! - `timers` - virtual-clock timer queue backing `Cmd::ScheduleTimer`
//!
//! The runtime owns the [`AppModel`], translates DOM events into messages
//! through the document's listener table, runs [`update`] and executes the
//! returned commands.

pub mod bootstrap;
pub mod script;
pub mod timers;

use serde::Serialize;

use crate::commands::Cmd;
use crate::config::PanelsConfig;
use crate::dom::{Document, DomEvent, ElementId, EventKind, Handler};
use crate::messages::{Msg, PanelMsg, ScrollMsg, StickyMsg, TouchMsg};
use crate::model::AppModel;
use crate::panel::{PanelId, PanelState, TouchPhase, TouchPoint};
use crate::update::update;

pub use bootstrap::{bootstrap, GlobalScope, TOGGLE_PANEL_ENTRY};
pub use script::{run_script, Script, ScriptEvent, ScriptStep};
pub use timers::TimerQueue;

/// Upper bound on events drained per dispatch; guards against handler loops
const MAX_EVENTS_PER_DISPATCH: usize = 1024;

/// Owns the model and executes commands against the timer queue
#[derive(Debug, Clone)]
pub struct Runtime {
    model: AppModel,
    timers: TimerQueue,
    globals: GlobalScope,
    redraw_count: u64,
}

impl Runtime {
    /// Runtime over `document` with no globals registered
    ///
    /// Use [`bootstrap`] for the full startup sequence.
    pub fn new(document: Document, config: PanelsConfig) -> Self {
        Self {
            model: AppModel::new(document, config),
            timers: TimerQueue::new(),
            globals: GlobalScope::new(),
            redraw_count: 0,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn document(&self) -> &Document {
        &self.model.document
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut GlobalScope {
        &mut self.globals
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Number of redraws requested so far
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    /// Run one message through update, execute its command and deliver any
    /// DOM events the update produced
    pub fn dispatch(&mut self, msg: impl Into<Msg>) {
        self.dispatch_one(msg.into());
        self.flush_events();
    }

    fn dispatch_one(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.execute(cmd);
        }
    }

    /// Execute a command's side effects
    pub fn execute(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {
                self.redraw_count += 1;
            }
            Cmd::ScheduleTimer { id, delay_ms, msg } => {
                tracing::trace!(?id, delay_ms, "schedule timer");
                self.timers.schedule(id, delay_ms, *msg);
            }
            Cmd::CancelTimer(id) => {
                if self.timers.cancel(id) {
                    tracing::trace!(?id, "cancel timer");
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
        }
    }

    /// Deliver queued DOM events to their listeners
    fn flush_events(&mut self) {
        let mut delivered = 0;
        while let Some(event) = self.model.document.take_event() {
            if delivered == MAX_EVENTS_PER_DISPATCH {
                let dropped = 1 + self.model.document.pending_event_count();
                while self.model.document.take_event().is_some() {}
                tracing::warn!(dropped, "Event cascade limit reached, dropping pending events");
                return;
            }
            delivered += 1;
            for msg in self.messages_for(event) {
                self.dispatch_one(msg);
            }
        }
    }

    /// Translate an event into the messages its listeners send
    fn messages_for(&self, event: DomEvent) -> Vec<Msg> {
        self.model
            .document
            .handlers_for(event.target, event.kind)
            .into_iter()
            .filter_map(|handler| self.route(handler, &event))
            .collect()
    }

    fn route(&self, handler: Handler, event: &DomEvent) -> Option<Msg> {
        let msg: Msg = match handler {
            Handler::ClosePanel(panel) => PanelMsg::Close(panel).into(),
            Handler::ResizePanel(panel) => TouchMsg::Resize {
                panel,
                phase: TouchPhase::from_event_kind(event.kind)?,
                point: event.point?,
            }
            .into(),
            Handler::DragThumb(panel) => TouchMsg::ThumbDrag {
                panel,
                phase: TouchPhase::from_event_kind(event.kind)?,
                point: event.point?,
            }
            .into(),
            Handler::SyncScrollbar(panel) => ScrollMsg::Scrolled(panel).into(),
            Handler::FadeStickyBar(binding) => StickyMsg::Scrolled(binding).into(),
            Handler::Invoke { entry, arg } => {
                let resolved = self.globals.resolve(&entry, &arg);
                if resolved.is_none() {
                    tracing::warn!(%entry, "Inline trigger calls an unregistered entry point");
                }
                resolved?
            }
        };
        Some(msg)
    }

    // === DOM entry points ===

    /// Click an element
    pub fn click(&mut self, target: ElementId) {
        self.model.document.queue_event(DomEvent {
            target,
            kind: EventKind::Click,
            point: None,
        });
        self.flush_events();
    }

    /// Scroll an element; returns false if the offset did not change
    pub fn scroll_to(&mut self, target: ElementId, scroll_top: f32) -> bool {
        let moved = self.model.document.set_scroll_top(target, scroll_top);
        self.flush_events();
        moved
    }

    /// Deliver a touch event to an element
    pub fn touch(&mut self, target: ElementId, phase: TouchPhase, point: TouchPoint) {
        self.model.document.queue_event(DomEvent {
            target,
            kind: phase.event_kind(),
            point: Some(point),
        });
        self.flush_events();
    }

    /// Call a global entry point by name, as an inline trigger would
    pub fn invoke(&mut self, entry: &str, arg: &str) -> bool {
        match self.globals.resolve(entry, arg) {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => {
                tracing::warn!(%entry, "Unknown entry point");
                false
            }
        }
    }

    /// Advance the virtual clock, firing every timer that falls due
    ///
    /// Timers scheduled while advancing fire too if they fall inside the window.
    pub fn advance(&mut self, ms: u64) {
        let target = self.timers.now_ms().saturating_add(ms);
        self.advance_to(target);
    }

    /// Advance the virtual clock to an absolute time
    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some((id, msg)) = self.timers.pop_due(target_ms) {
            tracing::trace!(?id, now_ms = self.timers.now_ms(), "timer fired");
            self.dispatch(msg);
        }
        self.timers.set_now(target_ms);
    }

    // === Panel operations ===

    pub fn toggle_panel(&mut self, id: &str) {
        self.dispatch(PanelMsg::Toggle(PanelId::from(id)));
    }

    pub fn expand_panel(&mut self, id: &str) {
        self.dispatch(PanelMsg::Expand(PanelId::from(id)));
    }

    pub fn collapse_panel(&mut self, id: &str) {
        self.dispatch(PanelMsg::Collapse(PanelId::from(id)));
    }

    pub fn collapse_all_panels(&mut self) {
        self.dispatch(PanelMsg::CollapseAll);
    }

    pub fn close_panel(&mut self, id: &str) {
        self.dispatch(PanelMsg::Close(PanelId::from(id)));
    }

    pub fn reopen_panel(&mut self, id: &str) {
        self.dispatch(PanelMsg::Reopen(PanelId::from(id)));
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let doc = &self.model.document;
        Snapshot {
            now_ms: self.now_ms(),
            redraws: self.redraw_count,
            panels: self
                .model
                .panels
                .runtimes()
                .iter()
                .map(|r| PanelView {
                    id: r.id.clone(),
                    state: r.state,
                    size: r.size,
                    scroll_offset: r.last_scroll_offset,
                })
                .collect(),
            active_gesture: self
                .model
                .panels
                .active_gesture()
                .map(|g| g.panel.clone()),
            sticky_bars: self
                .model
                .sticky
                .bindings()
                .iter()
                .map(|b| StickyView {
                    bar: doc.get(b.bar).and_then(|el| el.dom_id.clone()),
                    opacity: doc.opacity(b.bar),
                    restore_pending: b.pending_timer.is_some(),
                })
                .collect(),
        }
    }
}

/// Point-in-time state report, printed by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub now_ms: u64,
    pub redraws: u64,
    pub panels: Vec<PanelView>,
    pub active_gesture: Option<PanelId>,
    pub sticky_bars: Vec<StickyView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub id: PanelId,
    pub state: PanelState,
    pub size: f32,
    pub scroll_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StickyView {
    pub bar: Option<String>,
    pub opacity: f32,
    pub restore_pending: bool,
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "t={}ms redraws={}", self.now_ms, self.redraws)?;
        for panel in &self.panels {
            writeln!(
                f,
                "  {:<16} {:<10} size={}",
                panel.id.as_str(),
                panel.state.to_string(),
                panel.size
            )?;
        }
        if let Some(owner) = &self.active_gesture {
            writeln!(f, "  gesture: {}", owner)?;
        }
        for (i, bar) in self.sticky_bars.iter().enumerate() {
            let name = bar.bar.clone().unwrap_or_else(|| format!("#{}", i));
            writeln!(
                f,
                "  sticky {:<9} opacity={}{}",
                name,
                bar.opacity,
                if bar.restore_pending { " (restore pending)" } else { "" }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelDefinition;

    fn runtime() -> (Runtime, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let panel = doc.append_with(root, "section", Some("A"), &["panel"]);
        let bar = doc.append_with(panel, "header", None, &["sticky-bar"]);
        doc.append_with(panel, "div", None, &["scrollable-panel"]);
        let config = PanelsConfig::with_panels(vec![PanelDefinition::new("A").closable()]);
        (bootstrap(doc, config), bar)
    }

    #[test]
    fn test_close_button_click_closes_panel() {
        let (mut rt, _) = runtime();
        let close = rt.model().panels.get(&PanelId::from("A")).and_then(|r| r.close_control).unwrap();
        rt.click(close);
        assert_eq!(rt.model().panel_state("A"), Some(PanelState::Removed));
    }

    #[test]
    fn test_advance_fires_due_timers_only() {
        let (mut rt, bar) = runtime();
        let body = rt.document().query_all("scrollable-panel")[0];
        rt.model_mut()
            .document
            .set_scroll_metrics(body, crate::dom::ScrollMetrics::new(0.0, 800.0, 200.0));

        assert!(rt.scroll_to(body, 40.0));
        assert!(rt.document().opacity(bar) < 1.0);

        rt.advance(149);
        assert!(rt.document().opacity(bar) < 1.0);
        rt.advance(1);
        assert_eq!(rt.document().opacity(bar), 1.0);
        assert_eq!(rt.now_ms(), 150);
        assert!(rt.timers().is_empty());
    }

    #[test]
    fn test_invoke_unknown_entry() {
        let (mut rt, _) = runtime();
        assert!(!rt.invoke("nope", "A"));
        assert!(rt.invoke(TOGGLE_PANEL_ENTRY, "A"));
        assert_eq!(rt.model().panel_state("A"), Some(PanelState::Expanded));
    }
}
