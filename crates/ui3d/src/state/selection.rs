//! Selection activity: turns highlight readings and dwell time into
//! discrete selections with hysteresis.

use super::PreventionRegistry;
use crate::items::HoverItem;
use hoverkit_core::{inverse_lerp, Clock, Highlight, InteractionSettings};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Per-item selection state machine.
///
/// The host sets the nearest highlight reading and the nearest-item flag, then
/// calls [`SelectionActivity::update`] once per frame with the owning item.
pub struct SelectionActivity {
    settings: Arc<InteractionSettings>,
    clock: Arc<dyn Clock>,
    nearest_highlight: Option<Highlight>,
    is_nearest_highlight: bool,
    is_highlight_prevented: bool,
    is_selection_prevented: bool,
    prevention: PreventionRegistry,
    selection_start: Option<Instant>,
    distance_upon_selection: f32,
}

impl std::fmt::Debug for SelectionActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionActivity")
            .field("nearest_highlight", &self.nearest_highlight)
            .field("is_nearest_highlight", &self.is_nearest_highlight)
            .field("is_highlight_prevented", &self.is_highlight_prevented)
            .field("is_selection_prevented", &self.is_selection_prevented)
            .field("prevention", &self.prevention)
            .field("selection_start", &self.selection_start)
            .field("distance_upon_selection", &self.distance_upon_selection)
            .finish()
    }
}

impl SelectionActivity {
    /// Create an activity. A lone activity treats itself as nearest until a
    /// resolver says otherwise.
    pub fn new(settings: Arc<InteractionSettings>, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            clock,
            nearest_highlight: None,
            is_nearest_highlight: true,
            is_highlight_prevented: false,
            is_selection_prevented: false,
            prevention: PreventionRegistry::new(),
            selection_start: None,
            distance_upon_selection: 0.0,
        }
    }

    /// Store this frame's nearest-cursor reading.
    pub fn set_nearest_highlight(&mut self, highlight: Option<Highlight>) {
        self.nearest_highlight = highlight;
    }

    /// This frame's nearest-cursor reading.
    pub fn nearest_highlight(&self) -> Option<Highlight> {
        self.nearest_highlight
    }

    /// Mark whether this item holds the nearest highlight across all items.
    pub fn set_is_nearest_highlight(&mut self, is_nearest: bool) {
        self.is_nearest_highlight = is_nearest;
    }

    /// Whether this item holds the nearest highlight across all items.
    pub fn is_nearest_highlight(&self) -> bool {
        self.is_nearest_highlight
    }

    /// Whether highlighting was suppressed during the last update.
    pub fn is_highlight_prevented(&self) -> bool {
        self.is_highlight_prevented
    }

    /// Whether a completed selection is latched, blocking re-trigger.
    pub fn is_selection_prevented(&self) -> bool {
        self.is_selection_prevented
    }

    /// Whether a selection dwell is in progress.
    pub fn is_dwelling(&self) -> bool {
        self.selection_start.is_some()
    }

    /// Distance captured when the last selection fired.
    pub fn distance_upon_selection(&self) -> f32 {
        self.distance_upon_selection
    }

    /// Register or clear a display's veto on this item.
    pub fn prevent_selection_via_display(&mut self, name: &str, prevent: bool) {
        self.prevention.prevent(name, prevent);
    }

    /// Whether any display holds a veto.
    pub fn is_selection_prevented_via_display(&self) -> bool {
        self.prevention.is_any_prevented()
    }

    /// Whether the display `name` holds an active veto.
    pub fn is_selection_prevented_via_display_named(&self, name: &str) -> bool {
        self.prevention.is_prevented_by(name)
    }

    /// Highlight level for visuals, in `[0, 1]`.
    pub fn max_highlight_progress(&self, item: &dyn HoverItem) -> f32 {
        if self.is_highlight_prevented {
            return 0.0;
        }

        if item
            .as_selectable()
            .is_some_and(|selectable| selectable.is_sticky_selected())
        {
            return 1.0;
        }

        self.nearest_highlight.map_or(0.0, |high| high.progress)
    }

    /// Selection level for visuals, in `[0, 1]`.
    ///
    /// While dwelling this is the elapsed fraction of the selection duration.
    /// Otherwise, for a sticky-selected item, it falls from 1 at the selection
    /// distance to 0 at the sticky release distance.
    pub fn selection_progress(&self, item: &dyn HoverItem) -> f32 {
        let Some(start) = self.selection_start else {
            let is_sticky = item
                .as_selectable()
                .is_some_and(|selectable| selectable.is_sticky_selected());
            if !is_sticky {
                return 0.0;
            }

            let distance = self.nearest_highlight.map_or(f32::MAX, |high| high.distance);
            return inverse_lerp(
                self.settings.scaled_sticky_release_distance(),
                self.distance_upon_selection,
                distance,
            );
        };

        let elapsed = self.clock.now().saturating_duration_since(start);
        let ms = (elapsed.as_secs_f64() * 1000.0) as f32;
        (ms / self.settings.selection_duration_ms).min(1.0)
    }

    /// Run one frame. Returns true when a new selection fired this frame.
    pub fn update(&mut self, item: &mut dyn HoverItem) -> bool {
        self.update_is_highlight_prevented(item);
        self.update_selection_progress(item)
    }

    /// Whether `item` would be highlight-prevented if updated now.
    pub fn compute_highlight_prevented(&self, item: &dyn HoverItem) -> bool {
        !item.flags().is_interactive()
            || item.as_selectable().is_none()
            || self.is_selection_prevented_via_display()
    }

    fn update_is_highlight_prevented(&mut self, item: &mut dyn HoverItem) {
        self.is_highlight_prevented = self.compute_highlight_prevented(item);

        if !self.is_highlight_prevented {
            return;
        }

        self.selection_start = None;

        if let Some(selectable) = item.as_selectable_mut() {
            if selectable.is_sticky_selected() {
                debug!(item = selectable.id(), "Highlight prevented, releasing sticky selection");
            }
            selectable.deselect_sticky_selections();
        }
    }

    fn update_selection_progress(&mut self, item: &mut dyn HoverItem) -> bool {
        let select_progress = self.selection_progress(item);

        let Some(selectable) = item.as_selectable_mut() else {
            return false;
        };

        let can_select = !self.is_highlight_prevented
            && self.is_nearest_highlight
            && selectable.allow_selection();

        if select_progress <= 0.0 || !can_select {
            selectable.deselect_sticky_selections();
        }

        if !can_select {
            self.is_selection_prevented = false;
            self.selection_start = None;
            return false;
        }

        let nearest = match self.nearest_highlight {
            Some(high) if high.is_full() => high,
            _ => {
                self.is_selection_prevented = false;
                self.selection_start = None;
                return false;
            }
        };

        if self.is_selection_prevented {
            self.selection_start = None;
            return false;
        }

        if self.selection_start.is_none() {
            debug!(item = selectable.id(), "Selection dwell started");
            self.selection_start = Some(self.clock.now());
            return false;
        }

        if select_progress < 1.0 {
            return false;
        }

        self.selection_start = None;
        self.is_selection_prevented = true;
        self.distance_upon_selection = nearest.distance;
        debug!(
            item = selectable.id(),
            distance = nearest.distance,
            "Selection fired"
        );
        selectable.select();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{
        ItemFlags, Radio, SelectableItem, SelectionEventKind, Selector, Sticky, TextItem,
    };
    use hoverkit_core::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f32 = 1e-4;

    fn activity_with(settings: InteractionSettings) -> (SelectionActivity, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let activity = SelectionActivity::new(Arc::new(settings), clock.clone());
        (activity, clock)
    }

    fn dwell_settings() -> InteractionSettings {
        InteractionSettings {
            selection_duration_ms: 500.0,
            sticky_release_distance: 0.5,
            scale_multiplier: 1.0,
            ..Default::default()
        }
    }

    fn record(item: &mut dyn SelectableItem) -> Rc<RefCell<Vec<SelectionEventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        item.subscribe(Box::new(move |event| sink.borrow_mut().push(event.kind)));
        log
    }

    /// Dwell at full highlight until the selection fires.
    fn dwell_until_selected(
        activity: &mut SelectionActivity,
        clock: &ManualClock,
        item: &mut dyn HoverItem,
        distance: f32,
    ) {
        activity.set_nearest_highlight(Some(Highlight::new(distance, 1.0)));
        assert!(!activity.update(item));
        clock.advance_ms(500);
        assert!(activity.update(item));
    }

    #[test]
    fn dwell_ramps_linearly_then_fires_once() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut item = Selector::new("ok");
        let log = record(&mut item);
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));

        assert!(!activity.update(&mut item));
        assert!(activity.is_dwelling());
        assert_eq!(activity.selection_progress(&item), 0.0);

        clock.advance_ms(250);
        assert!(!activity.update(&mut item));
        assert!((activity.selection_progress(&item) - 0.5).abs() < EPS);

        clock.advance_ms(250);
        assert!(activity.update(&mut item));
        assert!(activity.is_selection_prevented());
        assert!(!activity.is_dwelling());
        assert_eq!(*log.borrow(), vec![SelectionEventKind::Selected]);

        // Latched: holding the cursor in place does not re-trigger.
        clock.advance_ms(1000);
        assert!(!activity.update(&mut item));
        assert!(!activity.is_dwelling());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn losing_nearest_resets_dwell() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut item = Selector::new("ok");
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));
        activity.update(&mut item);

        clock.advance_ms(100);
        activity.set_is_nearest_highlight(false);
        assert!(!activity.update(&mut item));
        assert!(!activity.is_dwelling());

        clock.advance_ms(100);
        activity.set_is_nearest_highlight(true);
        activity.update(&mut item);
        assert_eq!(activity.selection_progress(&item), 0.0);

        // Restarted at t=200, so t=600 is not yet complete.
        clock.advance_ms(400);
        assert!(!activity.update(&mut item));
        assert!((activity.selection_progress(&item) - 0.8).abs() < EPS);

        clock.advance_ms(100);
        assert!(activity.update(&mut item));
    }

    #[test]
    fn partial_highlight_releases_latch() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut item = Selector::new("ok");
        dwell_until_selected(&mut activity, &clock, &mut item, 0.0);
        assert!(activity.is_selection_prevented());

        activity.set_nearest_highlight(Some(Highlight::new(0.05, 0.5)));
        activity.update(&mut item);
        assert!(!activity.is_selection_prevented());

        // A fresh dwell can now run.
        dwell_until_selected(&mut activity, &clock, &mut item, 0.0);
    }

    #[test]
    fn sticky_progress_rises_as_cursor_returns() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut item = Sticky::new("grab");
        dwell_until_selected(&mut activity, &clock, &mut item, 0.1);
        assert!(item.is_sticky_selected());
        assert_eq!(activity.distance_upon_selection(), 0.1);

        let mut previous = -1.0;
        for distance in [0.6, 0.5, 0.4, 0.3, 0.2, 0.1, 0.05] {
            activity.set_nearest_highlight(Some(Highlight::new(distance, 1.0)));
            let progress = activity.selection_progress(&item);
            assert!(progress >= previous);
            assert!((0.0..=1.0).contains(&progress));
            previous = progress;
        }
        assert_eq!(previous, 1.0);

        activity.set_nearest_highlight(Some(Highlight::new(0.6, 1.0)));
        assert_eq!(activity.selection_progress(&item), 0.0);
        activity.set_nearest_highlight(Some(Highlight::new(0.3, 1.0)));
        assert!((activity.selection_progress(&item) - 0.5).abs() < EPS);

        activity.set_nearest_highlight(None);
        assert_eq!(activity.selection_progress(&item), 0.0);
    }

    #[test]
    fn sticky_holds_within_range_and_releases_beyond() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut item = Sticky::new("grab");
        let log = record(&mut item);
        dwell_until_selected(&mut activity, &clock, &mut item, 0.1);

        activity.set_nearest_highlight(Some(Highlight::new(0.3, 0.4)));
        activity.update(&mut item);
        assert!(item.is_sticky_selected());
        assert_eq!(activity.max_highlight_progress(&item), 1.0);

        activity.set_nearest_highlight(Some(Highlight::new(0.6, 0.0)));
        activity.update(&mut item);
        assert!(!item.is_sticky_selected());
        assert_eq!(
            *log.borrow(),
            vec![SelectionEventKind::Selected, SelectionEventKind::Deselected]
        );
    }

    #[test]
    fn display_veto_prevents_highlight_and_releases_sticky() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut item = Sticky::new("grab");
        let log = record(&mut item);
        dwell_until_selected(&mut activity, &clock, &mut item, 0.1);

        activity.prevent_selection_via_display("menuA", true);
        assert!(activity.is_selection_prevented_via_display());
        assert!(activity.is_selection_prevented_via_display_named("menuA"));

        activity.update(&mut item);
        assert!(activity.is_highlight_prevented());
        assert!(!item.is_sticky_selected());
        assert_eq!(activity.max_highlight_progress(&item), 0.0);
        assert!(!activity.is_dwelling());
        assert_eq!(log.borrow().last(), Some(&SelectionEventKind::Deselected));

        activity.prevent_selection_via_display("menuA", false);
        activity.update(&mut item);
        assert!(!activity.is_highlight_prevented());
    }

    #[test]
    fn disallowed_selection_at_completion_does_not_fire() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut item = Selector::new("ok");
        let log = record(&mut item);
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));
        activity.update(&mut item);

        clock.advance_ms(500);
        item.set_flags(ItemFlags::all() - ItemFlags::ENABLED);
        assert!(!activity.update(&mut item));
        assert!(!activity.is_selection_prevented());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn refused_selection_at_completion_keeps_highlight() {
        let (mut activity, clock) = activity_with(dwell_settings());
        let mut radio = Radio::new("low", "quality");
        let log = record(&mut radio);
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));
        activity.update(&mut radio);
        assert!(activity.is_dwelling());

        // Chosen elsewhere while the dwell runs; the radio now refuses selection.
        clock.advance_ms(500);
        radio.value = true;
        assert!(!activity.update(&mut radio));

        assert!(log.borrow().is_empty());
        assert!(!activity.is_selection_prevented());
        assert!(!activity.is_highlight_prevented());
        assert!(!activity.is_dwelling());
        assert_eq!(activity.max_highlight_progress(&radio), 1.0);
    }

    #[test]
    fn hidden_ancestry_prevents_highlight() {
        let (mut activity, _clock) = activity_with(dwell_settings());
        let mut item = Selector::new("ok");
        item.set_flags(ItemFlags::all() - ItemFlags::ANCESTRY_VISIBLE);
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));

        activity.update(&mut item);
        assert!(activity.is_highlight_prevented());
        assert_eq!(activity.max_highlight_progress(&item), 0.0);
        assert!(!activity.is_dwelling());
    }

    #[test]
    fn non_selectable_item_is_prevented_and_inert() {
        let (mut activity, _clock) = activity_with(dwell_settings());
        let mut item = TextItem::new("title", "Menu");
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));

        assert!(!activity.update(&mut item));
        assert!(activity.is_highlight_prevented());
        assert_eq!(activity.max_highlight_progress(&item), 0.0);
        assert_eq!(activity.selection_progress(&item), 0.0);
    }

    #[test]
    fn max_highlight_follows_reading() {
        let (mut activity, _clock) = activity_with(dwell_settings());
        let mut item = Selector::new("ok");
        activity.update(&mut item);
        assert_eq!(activity.max_highlight_progress(&item), 0.0);

        activity.set_nearest_highlight(Some(Highlight::new(0.04, 0.75)));
        activity.update(&mut item);
        assert_eq!(activity.max_highlight_progress(&item), 0.75);
        assert!(!activity.is_dwelling());
    }
}
