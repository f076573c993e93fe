use hoverkit_core::{InteractionSettings, SettingsError};
use hoverkit_ui3d::{DisplayMode, DisplayModeError, SelectorAction};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading a headless scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid interaction settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("item `{item}`: {source}")]
    DisplayMode {
        item: String,
        #[source]
        source: DisplayModeError,
    },
    #[error("duplicate item id `{0}`")]
    DuplicateItem(String),
    #[error("action at frame {frame} targets unknown item `{item}`")]
    UnknownItem { frame: u64, item: String },
    #[error("cursor {0} has no keyframes")]
    EmptyCursorPath(usize),
    #[error("frame_ms must be positive")]
    ZeroFrameInterval,
}

/// Item variant to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Selector,
    Sticky,
    Checkbox,
    Radio,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub id: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub center: [f32; 3],
    #[serde(default = "default_item_size")]
    pub size: [f32; 3],
    /// Radio group name.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub action: SelectorAction,
    #[serde(default)]
    pub text: String,
    /// Mesh display mode name; parsed after loading.
    #[serde(default = "default_display_mode")]
    pub display_mode: String,
}

fn default_item_size() -> [f32; 3] {
    [0.04, 0.04, 0.0]
}

fn default_display_mode() -> String {
    "standard".to_string()
}

impl ItemSpec {
    pub fn display_mode(&self) -> Result<DisplayMode, ScenarioError> {
        self.display_mode
            .parse()
            .map_err(|source| ScenarioError::DisplayMode {
                item: self.id.clone(),
                source,
            })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Keyframe {
    pub frame: u64,
    pub position: [f32; 3],
}

/// Cursor moving linearly between keyframes; holds still outside them.
#[derive(Debug, Clone, Deserialize)]
pub struct CursorPath {
    pub keyframes: Vec<Keyframe>,
}

impl CursorPath {
    pub fn position_at(&self, frame: u64) -> [f32; 3] {
        let Some(first) = self.keyframes.first() else {
            return [0.0; 3];
        };
        if frame <= first.frame {
            return first.position;
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if frame <= b.frame {
                let span = (b.frame - a.frame).max(1) as f32;
                let t = (frame - a.frame) as f32 / span;
                return std::array::from_fn(|i| a.position[i] + (b.position[i] - a.position[i]) * t);
            }
        }

        self.keyframes.last().map_or(first.position, |k| k.position)
    }
}

/// Scripted change applied at the start of a frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioAction {
    /// Register a display veto; `item = None` targets every item.
    Prevent {
        display: String,
        #[serde(default)]
        item: Option<String>,
    },
    /// Remove a display veto.
    Allow {
        display: String,
        #[serde(default)]
        item: Option<String>,
    },
    /// Change enable/visibility flags.
    SetFlags {
        item: String,
        #[serde(default)]
        enabled: Option<bool>,
        #[serde(default)]
        visible: Option<bool>,
    },
}

impl ScenarioAction {
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Prevent { item, .. } | Self::Allow { item, .. } => item.as_deref(),
            Self::SetFlags { item, .. } => Some(item),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledAction {
    pub frame: u64,
    #[serde(flatten)]
    pub action: ScenarioAction,
}

/// Headless scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_frames")]
    pub frames: u64,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub settings: InteractionSettings,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    #[serde(default)]
    pub cursors: Vec<CursorPath>,
    #[serde(default)]
    pub actions: Vec<ScheduledAction>,
}

fn default_frames() -> u64 {
    120
}

fn default_frame_ms() -> u64 {
    16
}

impl Scenario {
    pub fn from_toml(contents: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.settings.validate()?;

        if self.frame_ms == 0 {
            return Err(ScenarioError::ZeroFrameInterval);
        }

        let mut seen = std::collections::BTreeSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(ScenarioError::DuplicateItem(item.id.clone()));
            }
            item.display_mode()?;
        }

        for (index, cursor) in self.cursors.iter().enumerate() {
            if cursor.keyframes.is_empty() {
                return Err(ScenarioError::EmptyCursorPath(index));
            }
        }

        for scheduled in &self.actions {
            if let Some(item) = scheduled.action.target() {
                if !seen.contains(item) {
                    return Err(ScenarioError::UnknownItem {
                        frame: scheduled.frame,
                        item: item.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Load settings from an explicit path, falling back to defaults on errors.
pub fn load_settings_from_path(path: &Path) -> InteractionSettings {
    let settings = match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<InteractionSettings>(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                return InteractionSettings::default();
            }
        },
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                warn!("Interaction settings not found at {}. Using defaults", path.display());
            } else {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
            }
            return InteractionSettings::default();
        }
    };

    match settings.validate() {
        Ok(()) => settings,
        Err(err) => {
            warn!("Invalid settings in {}: {err}. Using defaults", path.display());
            InteractionSettings::default()
        }
    }
}
