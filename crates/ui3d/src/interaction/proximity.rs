//! Point-cursor proximity tracking against item bounds.

use glam::Vec3;
use hoverkit_core::{inverse_lerp, Highlight, InteractionSettings};

/// Axis-aligned box an item occupies in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    /// Minimum corner of the box
    pub min: Vec3,
    /// Maximum corner of the box
    pub max: Vec3,
}

impl ItemBounds {
    /// Create bounds from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create bounds from center position and size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Point on or inside the box closest to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Distance from `point` to the box surface; 0 when inside.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        point.distance(self.closest_point(point))
    }
}

/// Produces nearest-highlight readings from cursor world positions.
#[derive(Debug, Clone, Copy)]
pub struct ProximityTracker {
    near: f32,
    far: f32,
}

impl ProximityTracker {
    /// Build a tracker using the scaled highlight range from `settings`.
    pub fn new(settings: &InteractionSettings) -> Self {
        let (near, far) = settings.scaled_highlight_range();
        Self { near, far }
    }

    /// Highlight reading for a single cursor.
    pub fn highlight_for(&self, bounds: &ItemBounds, cursor: Vec3) -> Highlight {
        let distance = bounds.distance_to(cursor);
        Highlight::new(distance, inverse_lerp(self.far, self.near, distance))
    }

    /// Reading for the closest cursor, or `None` when there are no cursors.
    pub fn nearest_highlight(&self, bounds: &ItemBounds, cursors: &[Vec3]) -> Option<Highlight> {
        cursors
            .iter()
            .map(|&cursor| self.highlight_for(bounds, cursor))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Pick the item holding the nearest highlight.
///
/// The winner has the greatest progress; ties go to the smaller distance, then
/// to the lower key. Items without a reading never win; a reading at zero
/// progress still competes, so a sticky item held between the highlight range
/// and its release distance keeps its nearest status.
pub fn resolve_nearest<K, I>(readings: I) -> Option<K>
where
    K: Ord + Copy,
    I: IntoIterator<Item = (K, Option<Highlight>)>,
{
    let mut best: Option<(K, Highlight)> = None;

    for (key, reading) in readings {
        let Some(high) = reading else {
            continue;
        };

        let better = match &best {
            None => true,
            Some((best_key, best_high)) => {
                high.progress > best_high.progress
                    || (high.progress == best_high.progress
                        && (high.distance < best_high.distance
                            || (high.distance == best_high.distance && key < *best_key)))
            }
        };

        if better {
            best = Some((key, high));
        }
    }

    best.map(|(key, _)| key)
}
