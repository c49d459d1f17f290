//! Replayable event scripts
//!
//! A script is a YAML list of timestamped events. Steps run in order; the
//! virtual clock advances to each step's `at_ms` first, so debounce timers
//! that fall due in between fire before the step is applied.
//!
//! ```yaml
//! steps:
//!   - at_ms: 0
//!     event: { type: scroll_to, element: feed-body, top: 120 }
//!   - at_ms: 50
//!     event: { type: toggle, panel: feed }
//! until_ms: 400
//! ```

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::dom::ElementId;
use crate::panel::{TouchPhase, TouchPoint};

use super::Runtime;

/// One host event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Toggle { panel: String },
    Expand { panel: String },
    Collapse { panel: String },
    CollapseAll,
    Close { panel: String },
    Reopen { panel: String },
    /// Click the element with this `id` attribute
    Click { element: String },
    ScrollTo { element: String, top: f32 },
    Touch {
        element: String,
        phase: TouchPhase,
        #[serde(default)]
        id: u32,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    /// Call a global entry point, e.g. `togglePanel`
    Invoke { entry: String, arg: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub at_ms: u64,
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
    /// Advance the clock to this time after the last step
    #[serde(default)]
    pub until_ms: Option<u64>,
}

impl Script {
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse event script")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("In script {}", path.display()))
    }
}

fn element(runtime: &Runtime, dom_id: &str) -> anyhow::Result<ElementId> {
    runtime
        .document()
        .get_element_by_id(dom_id)
        .with_context(|| format!("No element with id '{}'", dom_id))
}

fn apply(runtime: &mut Runtime, event: &ScriptEvent) -> anyhow::Result<()> {
    match event {
        ScriptEvent::Toggle { panel } => runtime.toggle_panel(panel),
        ScriptEvent::Expand { panel } => runtime.expand_panel(panel),
        ScriptEvent::Collapse { panel } => runtime.collapse_panel(panel),
        ScriptEvent::CollapseAll => runtime.collapse_all_panels(),
        ScriptEvent::Close { panel } => runtime.close_panel(panel),
        ScriptEvent::Reopen { panel } => runtime.reopen_panel(panel),
        ScriptEvent::Click { element: dom_id } => {
            let target = element(runtime, dom_id)?;
            runtime.click(target);
        }
        ScriptEvent::ScrollTo { element: dom_id, top } => {
            let target = element(runtime, dom_id)?;
            runtime.scroll_to(target, *top);
        }
        ScriptEvent::Touch {
            element: dom_id,
            phase,
            id,
            x,
            y,
        } => {
            let target = element(runtime, dom_id)?;
            runtime.touch(target, *phase, TouchPoint::new(*id, *x, *y));
        }
        ScriptEvent::Invoke { entry, arg } => {
            runtime.invoke(entry, arg);
        }
    }
    Ok(())
}

/// Replay `script` against `runtime`
///
/// Step times must not go backwards.
pub fn run_script(runtime: &mut Runtime, script: &Script) -> anyhow::Result<()> {
    for (index, step) in script.steps.iter().enumerate() {
        if step.at_ms < runtime.now_ms() {
            bail!(
                "Step {} at {}ms is earlier than the current time {}ms",
                index,
                step.at_ms,
                runtime.now_ms()
            );
        }
        runtime.advance_to(step.at_ms);
        tracing::debug!(step = index, at_ms = step.at_ms, event = ?step.event, "script step");
        apply(runtime, &step.event).with_context(|| format!("Script step {}", index))?;
    }
    if let Some(until_ms) = script.until_ms {
        runtime.advance_to(until_ms.max(runtime.now_ms()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = Script::from_yaml(
            r#"
steps:
  - at_ms: 0
    event: { type: collapse_all }
  - at_ms: 10
    event: { type: touch, element: h, phase: start, id: 1, y: 5 }
  - event: { type: invoke, entry: togglePanel, arg: A }
until_ms: 200
"#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[0].event, ScriptEvent::CollapseAll);
        assert_eq!(
            script.steps[1].event,
            ScriptEvent::Touch {
                element: "h".to_string(),
                phase: TouchPhase::Start,
                id: 1,
                x: 0.0,
                y: 5.0
            }
        );
        assert_eq!(script.steps[2].at_ms, 0);
        assert_eq!(script.until_ms, Some(200));
    }

    #[test]
    fn test_unknown_event_type_is_an_error() {
        assert!(Script::from_yaml("steps:\n  - event: { type: explode }\n").is_err());
    }
}
