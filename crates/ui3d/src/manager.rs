//! Hover Manager - Owns every tracked item and runs the per-frame tick

use crate::interaction::{resolve_nearest, ItemBounds, ProximityTracker};
use crate::items::{HoverItem, SelectionEvent};
use crate::render::{Indicator, IndicatorOverrider};
use crate::state::SelectionActivity;
use glam::Vec3;
use hoverkit_core::{Clock, FrameTick, Highlight, InteractionSettings, SettingsError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Handle to a tracked item for updates/removal
pub type ItemHandle = u64;

/// A managed item with its interaction state
struct ItemEntry {
    item: Box<dyn HoverItem>,
    activity: SelectionActivity,
    bounds: Option<ItemBounds>,
    /// Reading from an external tracker, consumed by the next update.
    pending_highlight: Option<Highlight>,
    indicator: Indicator,
    overrider: Option<IndicatorOverrider>,
}

/// Outcome of one [`HoverManager::update`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// Frame that was just processed.
    pub tick: FrameTick,
    /// Item holding the nearest highlight this frame.
    pub nearest: Option<ItemHandle>,
    /// Items whose selection fired this frame, in handle order.
    pub selected: Vec<ItemHandle>,
}

/// Snapshot of one item's interaction outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemReading {
    /// Visual highlight level.
    pub highlight: f32,
    /// Visual selection level.
    pub selection: f32,
    /// Highlight suppressed this frame.
    pub highlight_prevented: bool,
    /// Completed selection latched.
    pub selection_prevented: bool,
    /// Sticky selection held.
    pub sticky: bool,
}

/// Manages all hover items and drives their selection activities
pub struct HoverManager {
    settings: Arc<InteractionSettings>,
    clock: Arc<dyn Clock>,
    tracker: ProximityTracker,
    items: BTreeMap<ItemHandle, ItemEntry>,
    next_handle: u64,
    tick: FrameTick,
}

impl HoverManager {
    /// Create a manager after validating `settings`.
    pub fn new(
        settings: InteractionSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let tracker = ProximityTracker::new(&settings);

        Ok(Self {
            settings: Arc::new(settings),
            clock,
            tracker,
            items: BTreeMap::new(),
            next_handle: 1,
            tick: FrameTick::ZERO,
        })
    }

    /// Frames processed so far.
    pub fn tick(&self) -> FrameTick {
        self.tick
    }

    /// Add an item. Items without bounds only get highlight readings through
    /// [`HoverManager::set_nearest_highlight`], one frame at a time.
    pub fn add_item(
        &mut self,
        item: impl HoverItem + 'static,
        bounds: Option<ItemBounds>,
    ) -> ItemHandle {
        let handle = self.next_handle;
        self.next_handle += 1;

        self.items.insert(
            handle,
            ItemEntry {
                item: Box::new(item),
                activity: SelectionActivity::new(self.settings.clone(), self.clock.clone()),
                bounds,
                pending_highlight: None,
                indicator: Indicator::new(),
                overrider: None,
            },
        );

        handle
    }

    /// Remove an item
    pub fn remove_item(&mut self, handle: ItemHandle) -> Option<Box<dyn HoverItem>> {
        self.items.remove(&handle).map(|entry| entry.item)
    }

    /// Find an item's handle by its identifier.
    pub fn find(&self, id: &str) -> Option<ItemHandle> {
        self.items
            .iter()
            .find(|(_, entry)| entry.item.id() == id)
            .map(|(handle, _)| *handle)
    }

    /// Get the number of tracked items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Tracked item.
    pub fn item(&self, handle: ItemHandle) -> Option<&dyn HoverItem> {
        self.items.get(&handle).map(|entry| entry.item.as_ref())
    }

    /// Mutable tracked item.
    pub fn item_mut(&mut self, handle: ItemHandle) -> Option<&mut dyn HoverItem> {
        match self.items.get_mut(&handle) {
            Some(entry) => Some(entry.item.as_mut()),
            None => None,
        }
    }

    /// Selection activity for an item.
    pub fn activity(&self, handle: ItemHandle) -> Option<&SelectionActivity> {
        self.items.get(&handle).map(|entry| &entry.activity)
    }

    /// Root indicator for an item.
    pub fn indicator(&self, handle: ItemHandle) -> Option<&Indicator> {
        self.items.get(&handle).map(|entry| &entry.indicator)
    }

    /// Mutable root indicator, e.g. to attach child nodes.
    pub fn indicator_mut(&mut self, handle: ItemHandle) -> Option<&mut Indicator> {
        self.items.get_mut(&handle).map(|entry| &mut entry.indicator)
    }

    /// Move or resize an item.
    pub fn set_bounds(&mut self, handle: ItemHandle, bounds: Option<ItemBounds>) -> bool {
        match self.items.get_mut(&handle) {
            Some(entry) => {
                entry.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Supply this frame's reading from an external tracker for an item
    /// without bounds. The reading is used by the next [`HoverManager::update`]
    /// only; an item that gets no reading for a frame has none.
    pub fn set_nearest_highlight(
        &mut self,
        handle: ItemHandle,
        highlight: Option<Highlight>,
    ) -> bool {
        match self.items.get_mut(&handle) {
            Some(entry) => {
                entry.pending_highlight = highlight;
                true
            }
            None => false,
        }
    }

    /// Install or remove progress floors applied to an item's indicator after
    /// each update.
    pub fn set_indicator_overrider(
        &mut self,
        handle: ItemHandle,
        overrider: Option<IndicatorOverrider>,
    ) -> bool {
        match self.items.get_mut(&handle) {
            Some(entry) => {
                entry.overrider = overrider;
                true
            }
            None => false,
        }
    }

    /// Register or clear a display veto on one item.
    pub fn prevent_selection_via_display(
        &mut self,
        handle: ItemHandle,
        name: &str,
        prevent: bool,
    ) -> bool {
        match self.items.get_mut(&handle) {
            Some(entry) => {
                entry.activity.prevent_selection_via_display(name, prevent);
                true
            }
            None => false,
        }
    }

    /// Register or clear a display veto on every item.
    pub fn prevent_all_via_display(&mut self, name: &str, prevent: bool) {
        for entry in self.items.values_mut() {
            entry.activity.prevent_selection_via_display(name, prevent);
        }
    }

    /// Register a selection observer on a selectable item.
    pub fn subscribe(
        &mut self,
        handle: ItemHandle,
        observer: impl FnMut(&SelectionEvent) + 'static,
    ) -> bool {
        let Some(selectable) = self
            .items
            .get_mut(&handle)
            .and_then(|entry| entry.item.as_selectable_mut())
        else {
            return false;
        };
        selectable.subscribe(Box::new(observer));
        true
    }

    /// Current interaction outputs for an item.
    pub fn reading(&self, handle: ItemHandle) -> Option<ItemReading> {
        let entry = self.items.get(&handle)?;
        let item = entry.item.as_ref();
        Some(ItemReading {
            highlight: entry.activity.max_highlight_progress(item),
            selection: entry.activity.selection_progress(item),
            highlight_prevented: entry.activity.is_highlight_prevented(),
            selection_prevented: entry.activity.is_selection_prevented(),
            sticky: item
                .as_selectable()
                .is_some_and(|selectable| selectable.is_sticky_selected()),
        })
    }

    /// Run one frame: read cursor proximity, resolve the nearest item, update
    /// every activity, settle radio groups, then refresh indicators.
    pub fn update(&mut self, cursors: &[Vec3]) -> FrameReport {
        for entry in self.items.values_mut() {
            let highlight = match &entry.bounds {
                Some(bounds) => self.tracker.nearest_highlight(bounds, cursors),
                None => entry.pending_highlight.take(),
            };
            entry.activity.set_nearest_highlight(highlight);
        }

        let nearest = resolve_nearest(self.items.iter().map(|(handle, entry)| {
            let eligible = !entry.activity.compute_highlight_prevented(entry.item.as_ref());
            let reading = entry.activity.nearest_highlight().filter(|_| eligible);
            (*handle, reading)
        }));

        let mut selected = Vec::new();
        for (handle, entry) in self.items.iter_mut() {
            entry.activity.set_is_nearest_highlight(nearest == Some(*handle));
            if entry.activity.update(entry.item.as_mut()) {
                selected.push(*handle);
            }
        }

        self.settle_radio_groups(&selected);

        for entry in self.items.values_mut() {
            let item = entry.item.as_ref();
            entry.indicator.set_progress(
                entry.activity.max_highlight_progress(item),
                entry.activity.selection_progress(item),
            );
            entry.indicator.tree_update();
            if let Some(overrider) = &entry.overrider {
                overrider.apply(&mut entry.indicator);
            }
        }

        let tick = self.tick;
        self.tick = self.tick.advance(1);
        if !selected.is_empty() {
            debug!(tick = tick.0, ?selected, "Items selected");
        }

        FrameReport {
            tick,
            nearest,
            selected,
        }
    }

    /// Clear every other member of a group whose radio just fired.
    fn settle_radio_groups(&mut self, selected: &[ItemHandle]) {
        let mut winners: BTreeMap<String, ItemHandle> = BTreeMap::new();
        for handle in selected {
            let group = self
                .items
                .get(handle)
                .and_then(|entry| entry.item.as_selectable())
                .and_then(|selectable| selectable.radio_group());
            if let Some(group) = group {
                winners.insert(group.to_string(), *handle);
            }
        }

        if winners.is_empty() {
            return;
        }

        let winning: BTreeSet<ItemHandle> = winners.values().copied().collect();
        for (handle, entry) in self.items.iter_mut() {
            if winning.contains(handle) {
                continue;
            }
            let Some(selectable) = entry.item.as_selectable_mut() else {
                continue;
            };
            let in_group = selectable
                .radio_group()
                .is_some_and(|group| winners.contains_key(group));
            if in_group {
                selectable.clear_radio_value();
            }
        }
    }
}
