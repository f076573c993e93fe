//! Spatial interaction layer for 3D UI items
//!
//! This crate tracks cursor proximity to interactive items, turns proximity and
//! dwell time into continuous highlight/selection progress, and fires discrete
//! selections with hysteresis.
//!
//! # Features
//!
//! - **Selection Activity**: per-item state machine with timed dwell, latching,
//!   and sticky selections released by distance
//! - **Display Vetoes**: independent displays can suppress an item by name
//! - **Proximity Tracking**: point cursors against item bounds
//! - **Indicators**: progress propagation down a tree of visual nodes
//!
//! # Example
//!
//! ```rust,no_run
//! use hoverkit_core::{InteractionSettings, SystemClock};
//! use hoverkit_ui3d::{HoverManager, ItemBounds, Selector};
//! use glam::Vec3;
//! use std::sync::Arc;
//!
//! let mut manager = HoverManager::new(InteractionSettings::default(), Arc::new(SystemClock))
//!     .expect("default settings are valid");
//! let play = manager.add_item(
//!     Selector::new("play"),
//!     Some(ItemBounds::from_center_size(Vec3::ZERO, Vec3::splat(0.1))),
//! );
//!
//! // Once per frame:
//! let report = manager.update(&[Vec3::new(0.0, 0.0, 0.02)]);
//! if report.selected.contains(&play) {
//!     // start the game
//! }
//! ```

pub mod interaction;
pub mod items;
pub mod manager;
pub mod render;
pub mod state;

// Re-export commonly used types
pub use interaction::{resolve_nearest, ItemBounds, ProximityTracker};
pub use items::{
    Checkbox, HoverItem, ItemFlags, Radio, SelectableItem, SelectableState, SelectionEvent,
    SelectionEventKind, SelectionObservers, Selector, SelectorAction, Sticky, TextItem,
};
pub use manager::{FrameReport, HoverManager, ItemHandle, ItemReading};
pub use render::{
    Color, DisplayMode, DisplayModeError, Indicator, IndicatorOverrider, MeshColorSink,
    MeshColorUpdater,
};
pub use state::{PreventionRegistry, SelectionActivity};

/// Version of the UI3D crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log crate startup.
pub fn init() {
    tracing::info!("Initializing hoverkit-ui3d v{}", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        init();
        assert!(!VERSION.is_empty());
    }
}
