//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod panel;
mod scroll;
mod sticky;
mod touch;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::PanelSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use panel::update_panel;
pub use scroll::update_scroll;
pub use sticky::update_sticky;
pub use touch::update_touch;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Panel(m) => panel::update_panel(model, m),
        Msg::Touch(m) => touch::update_touch(model, m),
        Msg::Scroll(m) => scroll::update_scroll(model, m),
        Msg::Sticky(m) => sticky::update_sticky(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after panel state and logs diffs for debugging.
/// Scroll-driven messages are frequent and skip the per-message log line.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::StickyMsg;

    let is_noisy = matches!(&msg, Msg::Scroll(_) | Msg::Sticky(StickyMsg::Scrolled(_)));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = PanelSnapshot::from_model(model);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    let after = PanelSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "panel", %diff, "state changed");
    }

    if let Err(violation) = model.check_invariants() {
        panic!("Invariant violated after {}: {}", msg_name, violation);
    }

    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Panel::Toggle(PanelId("A"))`
/// - `Sticky::Restore { binding: StickyBindingId(0), timer: TimerId(3) }`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Panel(m) => format!("Panel::{:?}", m),
        Msg::Touch(m) => format!("Touch::{:?}", m),
        Msg::Scroll(m) => format!("Scroll::{:?}", m),
        Msg::Sticky(m) => format!("Sticky::{:?}", m),
    }
}
