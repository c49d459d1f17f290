//! Application model - the complete panel-layer state
//!
//! Holds the document, the panel registry, the sticky bar bindings and the
//! config they were built from, following the Elm Architecture pattern.

use crate::commands::TimerId;
use crate::config::{ClassNames, PanelsConfig};
use crate::dom::Document;
use crate::panel::{PanelId, PanelRegistry, PanelState};
use crate::sticky::{FadeOptions, StickyFader};

/// The complete application model
#[derive(Debug, Clone)]
pub struct AppModel {
    /// Presentation tree; the authority for classes, styles and scroll metrics
    pub document: Document,
    pub panels: PanelRegistry,
    pub sticky: StickyFader,
    pub config: PanelsConfig,
    next_timer_id: u64,
}

impl AppModel {
    /// Instantiate every configured panel against `document`
    ///
    /// Sticky bars are not bound here; see [`AppModel::init_sticky_bars`].
    pub fn new(mut document: Document, mut config: PanelsConfig) -> Self {
        if let Err(e) = config.classes.validate() {
            tracing::warn!("Invalid class names ({}), using defaults", e);
            config.classes = ClassNames::default();
        }
        let panels = PanelRegistry::new(&mut document, config.definitions(), config.classes.clone());
        Self {
            document,
            panels,
            sticky: StickyFader::new(),
            config,
            next_timer_id: 0,
        }
    }

    /// Fade parameters from config
    pub fn fade_options(&self) -> FadeOptions {
        FadeOptions::new(
            self.config.sticky.fade_opacity,
            self.config.sticky.restore_timeout_ms,
        )
    }

    /// Bind every sticky bar in the document with the configured fade options
    ///
    /// Panels whose `has_sticky_header` flag disagrees with their markup are
    /// reported with a warning.
    pub fn init_sticky_bars(&mut self) -> usize {
        let options = self.fade_options();
        let bound = self
            .sticky
            .init_sticky_bars(&mut self.document, &self.config.classes, options);
        for (id, has_bar) in self.sticky_header_mismatches() {
            if has_bar {
                tracing::warn!("Panel '{}' has a sticky bar but is not declared with a sticky header", id);
            } else {
                tracing::warn!("Panel '{}' declares a sticky header but has no bound sticky bar", id);
            }
        }
        bound
    }

    /// Active panels whose `has_sticky_header` flag disagrees with the markup
    ///
    /// Each entry carries whether a bound sticky bar was found under the panel.
    pub fn sticky_header_mismatches(&self) -> Vec<(PanelId, bool)> {
        self.panels
            .runtimes()
            .iter()
            .filter(|runtime| runtime.is_active())
            .filter_map(|runtime| {
                let declared = self.panels.definition(&runtime.id)?.has_sticky_header;
                let inside = self.document.descendants(runtime.anchor);
                let has_bar = self
                    .sticky
                    .bindings()
                    .iter()
                    .any(|binding| inside.contains(&binding.bar));
                (declared != has_bar).then(|| (runtime.id.clone(), has_bar))
            })
            .collect()
    }

    /// Allocate a fresh timer id
    pub fn alloc_timer(&mut self) -> TimerId {
        self.next_timer_id += 1;
        TimerId(self.next_timer_id)
    }

    pub fn panel_state(&self, id: &str) -> Option<PanelState> {
        self.panels.state(&PanelId::from(id))
    }

    pub fn panel_size(&self, id: &str) -> Option<f32> {
        self.panels.size(&PanelId::from(id))
    }

    /// Check cross-component invariants
    pub fn check_invariants(&self) -> Result<(), String> {
        self.panels.check_invariants(&self.document)?;
        // A bar may be bound to several containers; any pending restore covers it
        for binding in self.sticky.bindings() {
            let opacity = self.document.opacity(binding.bar);
            if opacity < 1.0 && !self.sticky.restore_pending_for_bar(binding.bar) {
                return Err(format!(
                    "sticky bar {:?} is faded ({}) with no restore pending",
                    binding.bar, opacity
                ));
            }
        }
        Ok(())
    }
}
