//! Application bootstrap and the global entry-point surface
//!
//! Inline trigger markup calls panel operations by name (`togglePanel`)
//! without holding a reference to the runtime. Only this layer registers
//! those names; the panel core itself has no global state.

use std::collections::HashMap;

use crate::config::PanelsConfig;
use crate::dom::Document;
use crate::messages::{Msg, PanelMsg};
use crate::panel::PanelId;

use super::Runtime;

/// Name under which panel toggling is exposed to inline triggers
pub const TOGGLE_PANEL_ENTRY: &str = "togglePanel";

/// Builds the message a global entry point sends for a given argument
pub type EntryPoint = fn(&str) -> Msg;

/// Named entry points reachable from inline trigger markup
#[derive(Debug, Clone, Default)]
pub struct GlobalScope {
    entries: HashMap<String, EntryPoint>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an entry point
    pub fn register(&mut self, name: &str, entry: EntryPoint) {
        self.entries.insert(name.to_string(), entry);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Message for calling `name(arg)`, if `name` is registered
    pub fn resolve(&self, name: &str, arg: &str) -> Option<Msg> {
        self.entries.get(name).map(|entry| entry(arg))
    }
}

fn toggle_panel_entry(arg: &str) -> Msg {
    Msg::Panel(PanelMsg::Toggle(PanelId::from(arg)))
}

/// Start the panel layer for a page
///
/// Instantiates panels, binds sticky bars, exposes `togglePanel` to inline
/// triggers and collapses every panel as the initial baseline.
pub fn bootstrap(document: Document, config: PanelsConfig) -> Runtime {
    let mut runtime = Runtime::new(document, config);
    runtime.globals_mut().register(TOGGLE_PANEL_ENTRY, toggle_panel_entry);
    runtime.model_mut().init_sticky_bars();
    runtime.collapse_all_panels();
    tracing::info!(
        "Bootstrapped {} panels, {} sticky bars",
        runtime.model().panels.runtimes().len(),
        runtime.model().sticky.bindings().len()
    );
    runtime
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_entry() {
        let mut scope = GlobalScope::new();
        scope.register(TOGGLE_PANEL_ENTRY, toggle_panel_entry);
        assert!(scope.contains("togglePanel"));
        assert_eq!(
            scope.resolve("togglePanel", "A"),
            Some(Msg::Panel(PanelMsg::Toggle(PanelId::from("A"))))
        );
        assert_eq!(scope.resolve("collapseEverything", "A"), None);
    }
}
