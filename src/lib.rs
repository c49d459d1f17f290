//! Panel Deck - Elm-style panel management for multi-panel dashboards
//!
//! This crate provides the core types and logic for panel lifecycle
//! (toggle, collapse, close, reopen), touch resizing, scrollbar sync and
//! sticky-bar fading over a headless document tree, implementing the Elm
//! Architecture pattern.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod dom;
pub mod messages;
pub mod model;
pub mod panel;
pub mod runtime;
pub mod sticky;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::PanelsConfig;
pub use dom::Document;
pub use messages::Msg;
pub use model::AppModel;
pub use runtime::Runtime;
