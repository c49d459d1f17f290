//! Scroll update handlers

use crate::commands::Cmd;
use crate::messages::ScrollMsg;
use crate::model::AppModel;

/// Handle panel content scroll messages
pub fn update_scroll(model: &mut AppModel, msg: ScrollMsg) -> Option<Cmd> {
    match msg {
        ScrollMsg::Scrolled(panel) => {
            let moved = model.panels.sync_scrollbar(&mut model.document, &panel);
            Cmd::redraw_if(moved)
        }
    }
}
