//! Panel configuration
//!
//! Declares every panel's identity and behavior flags, the sticky-bar fade
//! defaults, and the CSS class conventions the panel layer relies on.
//! Stored in `~/.config/panel-deck/panels.yaml`.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::panel::PanelId;
use crate::sticky::{DEFAULT_FADE_OPACITY, DEFAULT_RESTORE_TIMEOUT_MS};

/// Smallest size a panel can be resized to unless configured otherwise
pub const DEFAULT_MIN_SIZE: f32 = 48.0;

/// Size a panel starts at before any resize
pub const DEFAULT_INITIAL_SIZE: f32 = 240.0;

/// Initial presentation state of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultState {
    Expanded,
    #[default]
    Collapsed,
}

/// Axis a panel is resized along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Height changes; touch `y` drives the resize
    #[default]
    Vertical,
    /// Width changes; touch `x` drives the resize
    Horizontal,
}

/// Declaration of a single panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDefinition {
    pub id: PanelId,
    #[serde(default)]
    pub resizable: bool,
    #[serde(default)]
    pub closable: bool,
    #[serde(default, alias = "hasStickyHeader")]
    pub has_sticky_header: bool,
    #[serde(default, alias = "defaultState")]
    pub default_state: DefaultState,
    #[serde(default = "default_min_size", alias = "minSize")]
    pub min_size: f32,
    /// Upper resize bound; unbounded when absent
    #[serde(default, alias = "maxSize")]
    pub max_size: Option<f32>,
    #[serde(default = "default_initial_size", alias = "initialSize")]
    pub initial_size: f32,
    #[serde(default)]
    pub axis: Axis,
}

fn default_min_size() -> f32 {
    DEFAULT_MIN_SIZE
}

fn default_initial_size() -> f32 {
    DEFAULT_INITIAL_SIZE
}

impl PanelDefinition {
    /// A definition with every flag at its default
    pub fn new(id: impl Into<PanelId>) -> Self {
        Self {
            id: id.into(),
            resizable: false,
            closable: false,
            has_sticky_header: false,
            default_state: DefaultState::Collapsed,
            min_size: DEFAULT_MIN_SIZE,
            max_size: None,
            initial_size: DEFAULT_INITIAL_SIZE,
            axis: Axis::Vertical,
        }
    }

    pub fn expanded(mut self) -> Self {
        self.default_state = DefaultState::Expanded;
        self
    }

    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    pub fn closable(mut self) -> Self {
        self.closable = true;
        self
    }

    pub fn sticky_header(mut self) -> Self {
        self.has_sticky_header = true;
        self
    }

    pub fn size_limits(mut self, min: f32, max: Option<f32>) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    pub fn initial_size(mut self, size: f32) -> Self {
        self.initial_size = size;
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Repair limits that would allow a zero, negative or inverted range
    pub fn normalized(mut self) -> Self {
        if !self.min_size.is_finite() || self.min_size <= 0.0 {
            self.min_size = DEFAULT_MIN_SIZE;
        }
        self.max_size = self
            .max_size
            .filter(|max| max.is_finite())
            .map(|max| max.max(self.min_size));
        if !self.initial_size.is_finite() {
            self.initial_size = DEFAULT_INITIAL_SIZE;
        }
        self.initial_size = self.clamp_size(self.initial_size);
        self
    }

    /// Clamp a candidate size into `[min_size, max_size]`
    pub fn clamp_size(&self, size: f32) -> f32 {
        let size = size.max(self.min_size);
        match self.max_size {
            Some(max) => size.min(max),
            None => size,
        }
    }
}

/// Collapse a definition list so that every id appears once
///
/// A later definition with an already-seen id replaces the earlier one but
/// keeps the earlier one's position in the order.
pub fn load_definitions(definitions: impl IntoIterator<Item = PanelDefinition>) -> Vec<PanelDefinition> {
    let mut out: Vec<PanelDefinition> = Vec::new();
    for definition in definitions {
        let definition = definition.normalized();
        if let Some(existing) = out.iter_mut().find(|d| d.id == definition.id) {
            tracing::debug!("Panel definition '{}' overridden by a later entry", definition.id);
            *existing = definition;
        } else {
            out.push(definition);
        }
    }
    out
}

/// Sticky-bar fade defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickyConfig {
    #[serde(default = "default_fade_opacity", alias = "fadeOpacity")]
    pub fade_opacity: f32,
    #[serde(default = "default_restore_timeout_ms", alias = "restoreTimeoutMs")]
    pub restore_timeout_ms: u64,
}

fn default_fade_opacity() -> f32 {
    DEFAULT_FADE_OPACITY
}

fn default_restore_timeout_ms() -> u64 {
    DEFAULT_RESTORE_TIMEOUT_MS
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            fade_opacity: DEFAULT_FADE_OPACITY,
            restore_timeout_ms: DEFAULT_RESTORE_TIMEOUT_MS,
        }
    }
}

/// CSS class conventions shared with the page markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Present on a panel root exactly while it is collapsed
    pub collapsed: String,
    /// Present on a panel root after it was closed
    pub removed: String,
    pub panel: String,
    pub scrollable: String,
    pub sticky_bar: String,
    pub scrollbar_track: String,
    pub scrollbar_thumb: String,
    pub close_button: String,
    pub resize_handle: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            collapsed: "collapsed".to_string(),
            removed: "removed".to_string(),
            panel: "panel".to_string(),
            scrollable: "scrollable-panel".to_string(),
            sticky_bar: "sticky-bar".to_string(),
            scrollbar_track: "panel-scrollbar".to_string(),
            scrollbar_thumb: "panel-scrollbar-thumb".to_string(),
            close_button: "panel-close".to_string(),
            resize_handle: "panel-resize-handle".to_string(),
        }
    }
}

impl ClassNames {
    /// State classes must be distinct or the state could not be read back
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.collapsed.is_empty() || self.removed.is_empty() {
            anyhow::bail!("classes.collapsed and classes.removed must not be empty");
        }
        if self.collapsed == self.removed {
            anyhow::bail!(
                "classes.collapsed and classes.removed are both '{}'",
                self.collapsed
            );
        }
        Ok(())
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelsConfig {
    #[serde(default)]
    pub panels: Vec<PanelDefinition>,
    #[serde(default)]
    pub sticky: StickyConfig,
    #[serde(default)]
    pub classes: ClassNames,
}

impl PanelsConfig {
    /// Config with the given panels and default everything else
    pub fn with_panels(panels: Vec<PanelDefinition>) -> Self {
        Self {
            panels,
            ..Self::default()
        }
    }

    /// Load config from the user config directory, or defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded panel config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load panel config: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Parse config from YAML text
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.classes.validate()?;
        config.sticky.fade_opacity = if config.sticky.fade_opacity.is_finite() {
            config.sticky.fade_opacity.clamp(0.0, 1.0)
        } else {
            DEFAULT_FADE_OPACITY
        };
        Ok(config)
    }

    /// Deduplicated, normalized panel definitions in declaration order
    pub fn definitions(&self) -> Vec<PanelDefinition> {
        load_definitions(self.panels.iter().cloned())
    }
}
