//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The runtime executes them; update functions never touch timers directly.

use crate::messages::Msg;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Presentation changed; the host should repaint
    Redraw,
    /// Deliver `msg` after `delay_ms` unless cancelled first
    ScheduleTimer {
        id: TimerId,
        delay_ms: u64,
        msg: Box<Msg>,
    },
    /// Cancel a scheduled timer (no-op if it already fired)
    CancelTimer(TimerId),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Redraw if `changed`, otherwise nothing
    pub fn redraw_if(changed: bool) -> Option<Cmd> {
        changed.then_some(Cmd::Redraw)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None | Cmd::CancelTimer(_) | Cmd::ScheduleTimer { .. } => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Flatten nested batches into a single list, dropping `None`
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::PanelMsg;

    #[test]
    fn test_needs_redraw() {
        assert!(!Cmd::None.needs_redraw());
        assert!(Cmd::Redraw.needs_redraw());
        assert!(!Cmd::CancelTimer(TimerId(1)).needs_redraw());
        assert!(Cmd::batch(vec![Cmd::CancelTimer(TimerId(1)), Cmd::Redraw]).needs_redraw());
    }

    #[test]
    fn test_flatten() {
        let cmd = Cmd::batch(vec![
            Cmd::None,
            Cmd::batch(vec![Cmd::Redraw, Cmd::CancelTimer(TimerId(3))]),
            Cmd::ScheduleTimer {
                id: TimerId(4),
                delay_ms: 10,
                msg: Box::new(Msg::Panel(PanelMsg::CollapseAll)),
            },
        ]);
        let flat = cmd.flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0], Cmd::Redraw);
        assert_eq!(flat[1], Cmd::CancelTimer(TimerId(3)));
    }

    #[test]
    fn test_redraw_if() {
        assert_eq!(Cmd::redraw_if(true), Some(Cmd::Redraw));
        assert_eq!(Cmd::redraw_if(false), None);
    }
}
