//! Close button binding
//!
//! Every closable panel gets a dismiss control whose click closes it. Markup
//! may provide the control; otherwise one is appended to the panel root.

use crate::config::ClassNames;
use crate::dom::{Document, ElementId, EventKind, Handler};

use super::{helpers, PanelId};

/// Find or create the close control for a panel and attach its click listener
///
/// Binding the same panel again reuses the control and adds no listener.
pub fn bind(doc: &mut Document, anchor: ElementId, id: &PanelId, classes: &ClassNames) -> ElementId {
    let control = helpers::ensure_descendant(doc, anchor, "button", &classes.close_button);
    if doc.add_listener(control, EventKind::Click, Handler::ClosePanel(id.clone())) {
        tracing::debug!("Close control bound for panel '{}'", id);
    }
    control
}
