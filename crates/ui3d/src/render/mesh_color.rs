//! Solid-color selection for opaque item meshes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// RGBA color.
pub type Color = [f32; 4];

/// Unknown display mode name in configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unhandled display mode: {0}")]
pub struct DisplayModeError(pub String);

/// How a mesh is being used, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Regular item background.
    Standard,
    /// Filled portion of a slider track.
    SliderFill,
}

impl FromStr for DisplayMode {
    type Err = DisplayModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "slider_fill" => Ok(Self::SliderFill),
            other => Err(DisplayModeError(other.to_string())),
        }
    }
}

/// Mesh that accepts color commits. Mesh building itself lives elsewhere.
pub trait MeshColorSink {
    /// Current display mode.
    fn display_mode(&self) -> DisplayMode;

    /// Whether the geometry was rebuilt this frame (colors must be re-sent).
    fn did_rebuild_mesh(&self) -> bool;

    /// Write `color` into every vertex.
    fn commit_colors(&mut self, color: Color);
}

/// Picks a mesh color per display mode and commits it only when needed.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshColorUpdater {
    /// Color for [`DisplayMode::Standard`].
    pub standard_color: Color,
    /// Color for [`DisplayMode::SliderFill`].
    pub slider_fill_color: Color,
    prev_color: Option<Color>,
}

impl Default for MeshColorUpdater {
    fn default() -> Self {
        Self {
            standard_color: [0.5, 0.5, 0.5, 1.0],   // Gray
            slider_fill_color: [1.0, 1.0, 1.0, 1.0], // White
            prev_color: None,
        }
    }
}

impl MeshColorUpdater {
    /// Color for `mode`.
    pub fn color_for(&self, mode: DisplayMode) -> Color {
        match mode {
            DisplayMode::Standard => self.standard_color,
            DisplayMode::SliderFill => self.slider_fill_color,
        }
    }

    /// Commit the current color if the mesh was rebuilt or the color changed.
    /// Returns whether a commit happened.
    pub fn tree_update(&mut self, mesh: &mut dyn MeshColorSink) -> bool {
        let color = self.color_for(mesh.display_mode());
        let changed = self.prev_color != Some(color);
        self.prev_color = Some(color);

        if !mesh.did_rebuild_mesh() && !changed {
            return false;
        }

        mesh.commit_colors(color);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeMesh {
        mode: Option<DisplayMode>,
        rebuilt: bool,
        commits: Vec<Color>,
    }

    impl MeshColorSink for FakeMesh {
        fn display_mode(&self) -> DisplayMode {
            self.mode.unwrap_or(DisplayMode::Standard)
        }

        fn did_rebuild_mesh(&self) -> bool {
            self.rebuilt
        }

        fn commit_colors(&mut self, color: Color) {
            self.commits.push(color);
        }
    }

    #[test]
    fn commits_only_on_change_or_rebuild() {
        let mut updater = MeshColorUpdater::default();
        let mut mesh = FakeMesh::default();

        assert!(updater.tree_update(&mut mesh));
        assert!(!updater.tree_update(&mut mesh));

        mesh.rebuilt = true;
        assert!(updater.tree_update(&mut mesh));

        mesh.rebuilt = false;
        mesh.mode = Some(DisplayMode::SliderFill);
        assert!(updater.tree_update(&mut mesh));
        assert!(!updater.tree_update(&mut mesh));

        assert_eq!(
            mesh.commits,
            vec![
                updater.standard_color,
                updater.standard_color,
                updater.slider_fill_color
            ]
        );
    }

    #[test]
    fn unknown_display_mode_is_rejected() {
        assert_eq!("slider_fill".parse::<DisplayMode>(), Ok(DisplayMode::SliderFill));
        assert_eq!(
            "hologram".parse::<DisplayMode>(),
            Err(DisplayModeError("hologram".into()))
        );
    }
}
