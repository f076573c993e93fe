//! Interaction tuning shared by every item's selection activity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by [`InteractionSettings::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    /// A setting that must be strictly positive was not.
    #[error("interaction setting `{name}` must be positive (got {value})")]
    NotPositive {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
    /// The highlight range is empty or inverted.
    #[error("highlight_distance_min ({min}) must be less than highlight_distance_max ({max})")]
    InvalidHighlightRange {
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },
}

/// Read-only interaction configuration, passed explicitly to each activity.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Cursor distance at or below which highlight progress is 1.
    pub highlight_distance_min: f32,
    /// Cursor distance at or beyond which highlight progress is 0.
    pub highlight_distance_max: f32,
    /// Distance at which a sticky selection is released.
    pub sticky_release_distance: f32,
    /// World scale divisor applied to all distance thresholds.
    pub scale_multiplier: f32,
    /// Dwell time required for a selection, in milliseconds.
    pub selection_duration_ms: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            highlight_distance_min: 0.03,
            highlight_distance_max: 0.07,
            sticky_release_distance: 0.05,
            scale_multiplier: 1.0,
            selection_duration_ms: 400.0,
        }
    }
}

impl InteractionSettings {
    /// Check that every value is positive and the highlight range is ordered.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positives = [
            ("highlight_distance_min", self.highlight_distance_min),
            ("highlight_distance_max", self.highlight_distance_max),
            ("sticky_release_distance", self.sticky_release_distance),
            ("scale_multiplier", self.scale_multiplier),
            ("selection_duration_ms", self.selection_duration_ms),
        ];
        for (name, value) in positives {
            // `!(value > 0.0)` also rejects NaN.
            if !(value > 0.0) {
                return Err(SettingsError::NotPositive { name, value });
            }
        }

        if self.highlight_distance_min >= self.highlight_distance_max {
            return Err(SettingsError::InvalidHighlightRange {
                min: self.highlight_distance_min,
                max: self.highlight_distance_max,
            });
        }

        Ok(())
    }

    /// Sticky-release threshold in world units.
    pub fn scaled_sticky_release_distance(&self) -> f32 {
        self.sticky_release_distance / self.scale_multiplier
    }

    /// Highlight range `(min, max)` in world units.
    pub fn scaled_highlight_range(&self) -> (f32, f32) {
        (
            self.highlight_distance_min / self.scale_multiplier,
            self.highlight_distance_max / self.scale_multiplier,
        )
    }
}
