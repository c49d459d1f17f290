//! Sticky bar fading
//!
//! While a scroll container is being scrolled, its sticky header bar fades
//! to a lower opacity; once scrolling has been quiet for the restore timeout
//! the bar returns to full opacity. This is a debounce: every scroll cancels
//! the pending restore and schedules a new one, so a burst restores exactly
//! once, timed from its last event.
//!
//! Bindings are found by class convention and are independent of panel
//! state.

use crate::commands::TimerId;
use crate::config::ClassNames;
use crate::dom::{Document, ElementId, EventKind, Handler};
use crate::panel::helpers;

/// Opacity of a sticky bar while its container scrolls
pub const DEFAULT_FADE_OPACITY: f32 = 0.4;

/// Quiet period before a faded bar is restored
pub const DEFAULT_RESTORE_TIMEOUT_MS: u64 = 150;

/// Handle to a sticky bar binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StickyBindingId(pub usize);

/// Per-call fade parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOptions {
    pub fade_opacity: f32,
    pub restore_timeout_ms: u64,
}

impl Default for FadeOptions {
    fn default() -> Self {
        Self {
            fade_opacity: DEFAULT_FADE_OPACITY,
            restore_timeout_ms: DEFAULT_RESTORE_TIMEOUT_MS,
        }
    }
}

impl FadeOptions {
    pub fn new(fade_opacity: f32, restore_timeout_ms: u64) -> Self {
        Self {
            fade_opacity,
            restore_timeout_ms,
        }
    }
}

/// One bar faded by one scroll container
#[derive(Debug, Clone, PartialEq)]
pub struct StickyBarBinding {
    pub id: StickyBindingId,
    pub bar: ElementId,
    pub container: ElementId,
    pub fade_opacity: f32,
    pub restore_timeout_ms: u64,
    /// Restore timer currently scheduled for this binding
    pub pending_timer: Option<TimerId>,
}

/// Owner of all sticky bar bindings
#[derive(Debug, Clone, Default)]
pub struct StickyFader {
    bindings: Vec<StickyBarBinding>,
}

impl StickyFader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> &[StickyBarBinding] {
        &self.bindings
    }

    pub fn get(&self, id: StickyBindingId) -> Option<&StickyBarBinding> {
        self.bindings.get(id.0)
    }

    /// Binding for a given bar, if one exists
    pub fn binding_for_bar(&self, bar: ElementId) -> Option<&StickyBarBinding> {
        self.bindings.iter().find(|b| b.bar == bar)
    }

    /// Fade `bar` whenever `container` scrolls
    ///
    /// Binding the same pair again returns the existing binding.
    pub fn fade_on_scroll(
        &mut self,
        doc: &mut Document,
        bar: ElementId,
        container: ElementId,
        options: FadeOptions,
    ) -> StickyBindingId {
        if let Some(existing) = self
            .bindings
            .iter()
            .find(|b| b.bar == bar && b.container == container)
        {
            return existing.id;
        }

        let id = StickyBindingId(self.bindings.len());
        self.bindings.push(StickyBarBinding {
            id,
            bar,
            container,
            fade_opacity: options.fade_opacity.clamp(0.0, 1.0),
            restore_timeout_ms: options.restore_timeout_ms,
            pending_timer: None,
        });
        doc.add_listener(container, EventKind::Scroll, Handler::FadeStickyBar(id));
        id
    }

    /// Bind every sticky bar that sits inside a panel with a scrollable region
    ///
    /// Bars without such a region are skipped. Returns the number of bars bound.
    pub fn init_sticky_bars(&mut self, doc: &mut Document, classes: &ClassNames, options: FadeOptions) -> usize {
        let mut bound = 0;
        for bar in doc.query_all(&classes.sticky_bar) {
            let Some(container) = helpers::sticky_container(doc, bar, classes) else {
                tracing::debug!("Sticky bar {:?} has no scrollable panel region, skipping", bar);
                continue;
            };
            if self.binding_for_bar(bar).is_some() {
                continue;
            }
            self.fade_on_scroll(doc, bar, container, options);
            bound += 1;
        }
        tracing::debug!("Bound {} sticky bars", bound);
        bound
    }

    /// Fade the bar for a scroll and record `timer` as its pending restore
    ///
    /// Returns the previously pending timer, which the caller must cancel.
    pub fn begin_fade(&mut self, doc: &mut Document, id: StickyBindingId, timer: TimerId) -> Option<TimerId> {
        let binding = self.bindings.get_mut(id.0)?;
        doc.set_opacity(binding.bar, binding.fade_opacity);
        binding.pending_timer.replace(timer)
    }

    /// Restore full opacity if `timer` is still the pending one
    pub fn restore(&mut self, doc: &mut Document, id: StickyBindingId, timer: TimerId) -> bool {
        let Some(binding) = self.bindings.get_mut(id.0) else {
            return false;
        };
        if binding.pending_timer != Some(timer) {
            tracing::debug!("Stale restore {:?} for sticky binding {:?}", timer, id);
            return false;
        }
        binding.pending_timer = None;
        let bar = binding.bar;
        // Another container sharing this bar is still scrolling
        if self.restore_pending_for_bar(bar) {
            return false;
        }
        doc.set_opacity(bar, 1.0);
        true
    }

    /// Whether any binding of `bar` has a restore timer pending
    pub fn restore_pending_for_bar(&self, bar: ElementId) -> bool {
        self.bindings
            .iter()
            .any(|b| b.bar == bar && b.pending_timer.is_some())
    }
}
