//! Per-item interaction state.

pub mod prevention;
pub mod selection;

pub use prevention::PreventionRegistry;
pub use selection::SelectionActivity;
