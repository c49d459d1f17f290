//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging panel
//! state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=panel=debug,message=debug` - scoped filtering
//! - `RUST_LOG=panel_deck::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/panel-deck/logs/panel-deck.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::AppModel;
use crate::panel::{PanelId, PanelState};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`); the file layer always
/// records debug level.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "panel-deck.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of panel state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    pub panels: Vec<PanelInfo>,
    pub gesture_owner: Option<PanelId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelInfo {
    pub id: PanelId,
    pub state: PanelState,
    pub size: f32,
}

impl PanelSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        Self {
            panels: model
                .panels
                .runtimes()
                .iter()
                .map(|r| PanelInfo {
                    id: r.id.clone(),
                    state: r.state,
                    size: r.size,
                })
                .collect(),
            gesture_owner: model.panels.active_gesture().map(|g| g.panel.clone()),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &PanelSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        for after in &other.panels {
            match self.panels.iter().find(|p| p.id == after.id) {
                None => changes.push(format!("{}: new ({})", after.id, after.state)),
                Some(before) => {
                    if before.state != after.state {
                        changes.push(format!("{}: {} → {}", after.id, before.state, after.state));
                    }
                    if before.size != after.size {
                        changes.push(format!("{}: size {} → {}", after.id, before.size, after.size));
                    }
                }
            }
        }

        if self.gesture_owner != other.gesture_owner {
            let show = |owner: &Option<PanelId>| {
                owner
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |id| id.to_string())
            };
            changes.push(format!(
                "gesture: {} → {}",
                show(&self.gesture_owner),
                show(&other.gesture_owner)
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, state: PanelState, size: f32) -> PanelInfo {
        PanelInfo {
            id: PanelId::from(id),
            state,
            size,
        }
    }

    #[test]
    fn test_diff_reports_state_size_and_gesture() {
        let before = PanelSnapshot {
            panels: vec![info("A", PanelState::Expanded, 240.0)],
            gesture_owner: None,
        };
        let after = PanelSnapshot {
            panels: vec![info("A", PanelState::Collapsed, 260.0)],
            gesture_owner: Some(PanelId::from("A")),
        };
        let diff = before.diff(&after).unwrap();
        assert!(diff.contains("A: expanded → collapsed"));
        assert!(diff.contains("A: size 240 → 260"));
        assert!(diff.contains("gesture: none → A"));
    }

    #[test]
    fn test_diff_none_when_equal() {
        let snapshot = PanelSnapshot {
            panels: vec![info("A", PanelState::Expanded, 240.0)],
            gesture_owner: None,
        };
        assert_eq!(snapshot.diff(&snapshot.clone()), None);
    }
}
