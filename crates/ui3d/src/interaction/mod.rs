//! Cursor proximity: per-item highlight readings and the nearest-item resolver.

pub mod proximity;

pub use proximity::{resolve_nearest, ItemBounds, ProximityTracker};
