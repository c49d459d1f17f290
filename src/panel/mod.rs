//! Panel system - lifecycle and interaction state for dashboard panels
//!
//! ## Architecture
//!
//! - `PanelId`: identity shared between config, markup (`id` attribute) and listeners
//! - `PanelState`: expanded, collapsed or removed
//! - `PanelRuntime`: live state of one panel, anchored to its root element
//! - `PanelRegistry`: owns every runtime in definition order plus the single
//!   active touch gesture
//!
//! Touch resizing, scrollbar sync and close buttons are bound to each panel's
//! subtree when the registry instantiates it, and torn down when it closes.

pub mod close_button;
pub mod helpers;
mod registry;
pub mod scrollbar;
pub mod touch;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DefaultState;

pub use registry::{PanelRegistry, PanelRuntime};
pub use scrollbar::{ScrollbarBinding, ThumbGeometry};
pub use touch::{ActiveGesture, TouchIgnoredReason, TouchOutcome, TouchPhase, TouchPoint};

/// Unique identifier of a panel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PanelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Presentation state of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Expanded,
    Collapsed,
    /// Closed; ignored by every operation until reopened
    Removed,
}

impl PanelState {
    pub fn is_removed(self) -> bool {
        self == PanelState::Removed
    }
}

impl From<DefaultState> for PanelState {
    fn from(state: DefaultState) -> Self {
        match state {
            DefaultState::Expanded => PanelState::Expanded,
            DefaultState::Collapsed => PanelState::Collapsed,
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelState::Expanded => "expanded",
            PanelState::Collapsed => "collapsed",
            PanelState::Removed => "removed",
        };
        f.write_str(name)
    }
}
