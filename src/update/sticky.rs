//! Sticky bar update handlers
//!
//! Each scroll fades the bar and replaces its restore timer; the timer's
//! message restores full opacity unless a newer scroll superseded it.

use crate::commands::Cmd;
use crate::messages::{Msg, StickyMsg};
use crate::model::AppModel;

/// Handle sticky bar messages
pub fn update_sticky(model: &mut AppModel, msg: StickyMsg) -> Option<Cmd> {
    match msg {
        StickyMsg::Scrolled(binding) => {
            let delay_ms = model.sticky.get(binding)?.restore_timeout_ms;
            let timer = model.alloc_timer();
            let previous = model.sticky.begin_fade(&mut model.document, binding, timer);

            let mut cmds = Vec::with_capacity(3);
            if let Some(previous) = previous {
                cmds.push(Cmd::CancelTimer(previous));
            }
            cmds.push(Cmd::ScheduleTimer {
                id: timer,
                delay_ms,
                msg: Box::new(Msg::Sticky(StickyMsg::Restore { binding, timer })),
            });
            cmds.push(Cmd::Redraw);
            Some(Cmd::batch(cmds))
        }

        StickyMsg::Restore { binding, timer } => {
            let restored = model.sticky.restore(&mut model.document, binding, timer);
            Cmd::redraw_if(restored)
        }
    }
}
