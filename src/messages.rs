//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. DOM events reach
//! the update functions only after the runtime has translated them into one
//! of these.

use crate::commands::TimerId;
use crate::panel::{PanelId, TouchPhase, TouchPoint};
use crate::sticky::StickyBindingId;

/// Panel lifecycle messages
#[derive(Debug, Clone, PartialEq)]
pub enum PanelMsg {
    /// Expanded ↔ collapsed
    Toggle(PanelId),
    Expand(PanelId),
    Collapse(PanelId),
    /// Collapse every active panel (startup baseline)
    CollapseAll,
    /// Dismiss a panel (close button)
    Close(PanelId),
    /// Rebuild a dismissed panel from its definition
    Reopen(PanelId),
}

/// Touch messages for panel resize handles and scrollbar thumbs
#[derive(Debug, Clone, PartialEq)]
pub enum TouchMsg {
    Resize {
        panel: PanelId,
        phase: TouchPhase,
        point: TouchPoint,
    },
    ThumbDrag {
        panel: PanelId,
        phase: TouchPhase,
        point: TouchPoint,
    },
}

/// Panel content scroll messages
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollMsg {
    /// A panel's content region scrolled
    Scrolled(PanelId),
}

/// Sticky bar fade messages
#[derive(Debug, Clone, PartialEq)]
pub enum StickyMsg {
    /// The binding's scroll container scrolled
    Scrolled(StickyBindingId),
    /// Restore timer fired
    Restore {
        binding: StickyBindingId,
        timer: TimerId,
    },
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Panel(PanelMsg),
    Touch(TouchMsg),
    Scroll(ScrollMsg),
    Sticky(StickyMsg),
}

impl From<PanelMsg> for Msg {
    fn from(msg: PanelMsg) -> Self {
        Msg::Panel(msg)
    }
}

impl From<TouchMsg> for Msg {
    fn from(msg: TouchMsg) -> Self {
        Msg::Touch(msg)
    }
}

impl From<ScrollMsg> for Msg {
    fn from(msg: ScrollMsg) -> Self {
        Msg::Scroll(msg)
    }
}

impl From<StickyMsg> for Msg {
    fn from(msg: StickyMsg) -> Self {
        Msg::Sticky(msg)
    }
}
