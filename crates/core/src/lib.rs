#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod settings;
pub mod time;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use settings::{InteractionSettings, SettingsError};
pub use time::{Clock, ManualClock, SystemClock};

/// Host frame counter; one `update` per item per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// First frame in any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Nearest-cursor reading for one item, produced fresh each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// World-space distance from the cursor to the item.
    pub distance: f32,
    /// Normalized highlight progress in `[0, 1]`.
    pub progress: f32,
}

impl Highlight {
    /// Create a reading, clamping `progress` into `[0, 1]`.
    pub fn new(distance: f32, progress: f32) -> Self {
        Self {
            distance,
            progress: progress.clamp(0.0, 1.0),
        }
    }

    /// Whether the cursor is fully highlighting the item.
    pub fn is_full(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Position of `value` between `a` (0) and `b` (1), clamped to `[0, 1]`.
///
/// Returns 0 when `a == b`. `a` may be greater than `b`, which inverts the ramp.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}
