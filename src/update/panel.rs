//! Panel lifecycle update handlers

use crate::commands::Cmd;
use crate::messages::PanelMsg;
use crate::model::AppModel;

/// Handle panel lifecycle messages
///
/// Unknown and removed ids fall through the registry as no-ops, so this
/// never fails; it only decides whether a redraw is needed.
pub fn update_panel(model: &mut AppModel, msg: PanelMsg) -> Option<Cmd> {
    let doc = &mut model.document;
    let panels = &mut model.panels;

    let changed = match &msg {
        PanelMsg::Toggle(id) => panels.toggle(doc, id),
        PanelMsg::Expand(id) => panels.expand(doc, id),
        PanelMsg::Collapse(id) => panels.collapse(doc, id),
        PanelMsg::CollapseAll => panels.collapse_all(doc) > 0,
        PanelMsg::Close(id) => panels.close(doc, id),
        PanelMsg::Reopen(id) => panels.reopen(doc, id),
    };

    if changed && matches!(msg, PanelMsg::Reopen(_)) {
        // The reopened subtree may contain sticky bars that were never bound
        model.init_sticky_bars();
    }

    Cmd::redraw_if(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PanelDefinition, PanelsConfig};
    use crate::dom::Document;
    use crate::panel::PanelState;

    fn model() -> AppModel {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_with(root, "section", Some("A"), &["panel"]);
        doc.append_with(root, "section", Some("B"), &["panel"]);
        AppModel::new(
            doc,
            PanelsConfig::with_panels(vec![
                PanelDefinition::new("A").expanded().closable(),
                PanelDefinition::new("B"),
            ]),
        )
    }

    #[test]
    fn test_toggle_requests_redraw() {
        let mut model = model();
        let cmd = update_panel(&mut model, PanelMsg::Toggle("A".into()));
        assert_eq!(cmd, Some(Cmd::Redraw));
        assert_eq!(model.panel_state("A"), Some(PanelState::Collapsed));
    }

    #[test]
    fn test_noop_returns_none() {
        let mut model = model();
        assert_eq!(update_panel(&mut model, PanelMsg::Toggle("zzz".into())), None);
        assert_eq!(update_panel(&mut model, PanelMsg::Collapse("B".into())), None);
        update_panel(&mut model, PanelMsg::CollapseAll);
        assert_eq!(update_panel(&mut model, PanelMsg::CollapseAll), None);
    }

    #[test]
    fn test_close_then_reopen() {
        let mut model = model();
        assert_eq!(update_panel(&mut model, PanelMsg::Close("A".into())), Some(Cmd::Redraw));
        assert_eq!(model.panel_state("A"), Some(PanelState::Removed));
        assert_eq!(update_panel(&mut model, PanelMsg::Reopen("A".into())), Some(Cmd::Redraw));
        assert_eq!(model.panel_state("A"), Some(PanelState::Expanded));
    }
}
