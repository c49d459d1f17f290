//! Touch update handlers
//!
//! Resize-handle gestures and scrollbar thumb drags.

use crate::commands::Cmd;
use crate::messages::TouchMsg;
use crate::model::AppModel;
use crate::panel::TouchOutcome;

/// Handle touch messages
pub fn update_touch(model: &mut AppModel, msg: TouchMsg) -> Option<Cmd> {
    match msg {
        TouchMsg::Resize {
            panel,
            phase,
            point,
        } => {
            let outcome = model
                .panels
                .handle_touch(&mut model.document, &panel, phase, point);
            if let TouchOutcome::Ignored(reason) = outcome {
                tracing::debug!("Touch {:?} on '{}' ignored: {:?}", phase, panel, reason);
            }
            Cmd::redraw_if(outcome.changed_layout())
        }

        TouchMsg::ThumbDrag {
            panel,
            phase,
            point,
        } => {
            let scrolled = model
                .panels
                .handle_thumb_drag(&mut model.document, &panel, phase, point);
            Cmd::redraw_if(scrolled)
        }
    }
}
