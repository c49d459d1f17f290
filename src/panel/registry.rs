//! Panel runtimes and the state machine driving them
//!
//! States are `expanded`, `collapsed` and `removed`. Expanded and collapsed
//! switch freely; `removed` is terminal until [`PanelRegistry::reopen`]
//! rebuilds the runtime from its definition. Operations on unknown or removed
//! ids are ignored rather than reported, since trigger markup may fire after a
//! panel has already been dismissed.

use crate::config::{load_definitions, ClassNames, PanelDefinition};
use crate::dom::{Document, ElementId};

use super::{close_button, helpers, scrollbar, touch, ActiveGesture, PanelId, PanelState, ScrollbarBinding};

/// Live state of a single panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRuntime {
    pub id: PanelId,
    /// Root element; owned by the document
    pub anchor: ElementId,
    pub state: PanelState,
    /// Current size along the panel's resize axis
    pub size: f32,
    /// Content scroll offset last seen by the scrollbar sync
    pub last_scroll_offset: f32,
    pub scrollbar: Option<ScrollbarBinding>,
    pub close_control: Option<ElementId>,
    pub resize_handle: Option<ElementId>,
}

impl PanelRuntime {
    pub fn is_active(&self) -> bool {
        !self.state.is_removed()
    }
}

/// Owner of every panel runtime, in definition order
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    pub(super) definitions: Vec<PanelDefinition>,
    pub(super) runtimes: Vec<PanelRuntime>,
    /// At most one touch resize in flight across all panels
    pub(super) active_gesture: Option<ActiveGesture>,
    pub(super) classes: ClassNames,
}

impl PanelRegistry {
    /// Instantiate a runtime for every definition whose root element exists
    ///
    /// Definitions without a matching element are kept (so a later
    /// [`reopen`](Self::reopen) can pick them up) but get no runtime.
    pub fn new(doc: &mut Document, definitions: Vec<PanelDefinition>, classes: ClassNames) -> Self {
        let mut registry = Self {
            definitions: load_definitions(definitions),
            runtimes: Vec::new(),
            active_gesture: None,
            classes,
        };

        for index in 0..registry.definitions.len() {
            let definition = registry.definitions[index].clone();
            if let Some(runtime) = registry.instantiate(doc, &definition) {
                registry.runtimes.push(runtime);
            }
        }

        tracing::info!(
            "Initialized {} of {} panels",
            registry.runtimes.len(),
            registry.definitions.len()
        );
        registry
    }

    fn instantiate(&self, doc: &mut Document, definition: &PanelDefinition) -> Option<PanelRuntime> {
        let Some(anchor) = helpers::find_anchor(doc, &definition.id) else {
            tracing::warn!("No root element for panel '{}', skipping", definition.id);
            return None;
        };

        let state = PanelState::from(definition.default_state);
        helpers::apply_state_classes(doc, anchor, state, &self.classes);
        doc.set_length(anchor, definition.initial_size);

        let scrollbar = scrollbar::bind(doc, anchor, &definition.id, &self.classes);
        let last_scroll_offset = scrollbar
            .as_ref()
            .map_or(0.0, |binding| scrollbar::render(doc, binding));

        let close_control = definition
            .closable
            .then(|| close_button::bind(doc, anchor, &definition.id, &self.classes));

        let resize_handle = if definition.resizable {
            touch::bind_resize_handle(doc, anchor, &definition.id, &self.classes)
        } else {
            None
        };

        tracing::debug!("Panel '{}' instantiated as {}", definition.id, state);

        Some(PanelRuntime {
            id: definition.id.clone(),
            anchor,
            state,
            size: definition.initial_size,
            last_scroll_offset,
            scrollbar,
            close_control,
            resize_handle,
        })
    }

    // === Queries ===

    pub fn classes(&self) -> &ClassNames {
        &self.classes
    }

    pub fn definitions(&self) -> &[PanelDefinition] {
        &self.definitions
    }

    pub fn definition(&self, id: &PanelId) -> Option<&PanelDefinition> {
        self.definitions.iter().find(|d| &d.id == id)
    }

    /// All runtimes, removed ones included, in definition order
    pub fn runtimes(&self) -> &[PanelRuntime] {
        &self.runtimes
    }

    pub fn get(&self, id: &PanelId) -> Option<&PanelRuntime> {
        self.runtimes.iter().find(|r| &r.id == id)
    }

    pub fn state(&self, id: &PanelId) -> Option<PanelState> {
        self.get(id).map(|r| r.state)
    }

    pub fn size(&self, id: &PanelId) -> Option<f32> {
        self.get(id).map(|r| r.size)
    }

    pub fn active_gesture(&self) -> Option<&ActiveGesture> {
        self.active_gesture.as_ref()
    }

    pub(super) fn index_of(&self, id: &PanelId) -> Option<usize> {
        self.runtimes.iter().position(|r| &r.id == id)
    }

    /// Index of a runtime that accepts operations (exists and is not removed)
    pub(super) fn active_index(&self, id: &PanelId) -> Option<usize> {
        self.index_of(id).filter(|&i| self.runtimes[i].is_active())
    }

    // === Transitions ===

    fn set_state(&mut self, doc: &mut Document, index: usize, state: PanelState) {
        let runtime = &mut self.runtimes[index];
        runtime.state = state;
        helpers::apply_state_classes(doc, runtime.anchor, state, &self.classes);
    }

    /// Move an active panel into `target`; returns whether anything changed
    fn transition(&mut self, doc: &mut Document, id: &PanelId, target: PanelState) -> bool {
        let Some(index) = self.active_index(id) else {
            tracing::debug!("Ignoring {} for unknown or removed panel '{}'", target, id);
            return false;
        };
        if self.runtimes[index].state == target {
            return false;
        }
        self.set_state(doc, index, target);
        true
    }

    /// Expanded ↔ collapsed
    pub fn toggle(&mut self, doc: &mut Document, id: &PanelId) -> bool {
        let target = match self.state(id) {
            Some(PanelState::Expanded) => PanelState::Collapsed,
            Some(PanelState::Collapsed) => PanelState::Expanded,
            Some(PanelState::Removed) | None => {
                tracing::debug!("Ignoring toggle for unknown or removed panel '{}'", id);
                return false;
            }
        };
        self.transition(doc, id, target)
    }

    pub fn expand(&mut self, doc: &mut Document, id: &PanelId) -> bool {
        self.transition(doc, id, PanelState::Expanded)
    }

    pub fn collapse(&mut self, doc: &mut Document, id: &PanelId) -> bool {
        self.transition(doc, id, PanelState::Collapsed)
    }

    /// Collapse every expanded panel in definition order; returns how many changed
    pub fn collapse_all(&mut self, doc: &mut Document) -> usize {
        let mut changed = 0;
        for index in 0..self.runtimes.len() {
            if self.runtimes[index].state == PanelState::Expanded {
                self.set_state(doc, index, PanelState::Collapsed);
                changed += 1;
            }
        }
        changed
    }

    /// Remove a panel: release its gesture and tear down every listener it owns
    pub fn close(&mut self, doc: &mut Document, id: &PanelId) -> bool {
        let Some(index) = self.active_index(id) else {
            tracing::debug!("Ignoring close for unknown or removed panel '{}'", id);
            return false;
        };

        self.release_gesture_for(doc, id);

        let detached = doc.remove_listeners_where(|handler| handler.panel() == Some(id));
        let runtime = &mut self.runtimes[index];
        runtime.scrollbar = None;
        runtime.close_control = None;
        runtime.resize_handle = None;
        self.set_state(doc, index, PanelState::Removed);

        tracing::info!("Panel '{}' closed ({} listeners detached)", id, detached);
        true
    }

    /// Rebuild a removed (or never instantiated) panel from its definition
    pub fn reopen(&mut self, doc: &mut Document, id: &PanelId) -> bool {
        if self.active_index(id).is_some() {
            return false;
        }
        let Some(definition) = self.definition(id).cloned() else {
            tracing::debug!("Ignoring reopen for unknown panel '{}'", id);
            return false;
        };
        let Some(runtime) = self.instantiate(doc, &definition) else {
            return false;
        };

        match self.index_of(id) {
            Some(index) => self.runtimes[index] = runtime,
            None => {
                // Keep runtimes in definition order
                let order = |pid: &PanelId| self.definitions.iter().position(|d| &d.id == pid);
                let target = order(id);
                let insert_at = self
                    .runtimes
                    .iter()
                    .position(|r| order(&r.id) > target)
                    .unwrap_or(self.runtimes.len());
                self.runtimes.insert(insert_at, runtime);
            }
        }

        tracing::info!("Panel '{}' reopened", id);
        true
    }

    /// Check that runtime state and document presentation agree
    pub fn check_invariants(&self, doc: &Document) -> Result<(), String> {
        for runtime in &self.runtimes {
            let shown = helpers::state_from_classes(doc, runtime.anchor, &self.classes);
            if shown != runtime.state {
                return Err(format!(
                    "panel '{}' is {} but its classes say {}",
                    runtime.id, runtime.state, shown
                ));
            }
        }
        if let Some(gesture) = &self.active_gesture {
            if self.active_index(&gesture.panel).is_none() {
                return Err(format!(
                    "active gesture owned by inactive panel '{}'",
                    gesture.panel
                ));
            }
        }
        Ok(())
    }
}
