//! Visual feedback driven by selection activity output.

pub mod indicator;
pub mod mesh_color;

pub use indicator::{Indicator, IndicatorOverrider};
pub use mesh_color::{Color, DisplayMode, DisplayModeError, MeshColorSink, MeshColorUpdater};
