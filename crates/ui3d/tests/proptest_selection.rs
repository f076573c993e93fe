//! Property-based tests for the selection activity
//!
//! Validates:
//! - Highlight prevention zeroes highlight output and cancels any dwell
//! - Dwell progress never decreases while conditions hold, and stays in [0, 1]
//! - A continuous dwell fires at most once
//! - The display veto registry behaves like a set of names

use hoverkit_core::{Highlight, InteractionSettings, ManualClock};
use hoverkit_ui3d::{
    HoverItem, ItemFlags, PreventionRegistry, SelectableItem, SelectionActivity, Selector, Sticky,
};
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

fn activity(duration_ms: f32) -> (SelectionActivity, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let settings = InteractionSettings {
        selection_duration_ms: duration_ms,
        ..Default::default()
    };
    (SelectionActivity::new(Arc::new(settings), clock.clone()), clock)
}

proptest! {
    /// Property: a prevented item reports zero highlight and no dwell
    #[test]
    fn prevented_items_have_no_highlight_or_dwell(
        flag_bits in 0u8..16,
        vetoed in any::<bool>(),
        progress in 0.0f32..=1.0,
        sticky_first in any::<bool>(),
    ) {
        let (mut activity, clock) = activity(100.0);
        let mut item = Sticky::new("grab");

        if sticky_first {
            activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));
            activity.update(&mut item);
            clock.advance_ms(100);
            activity.update(&mut item);
            prop_assert!(item.is_sticky_selected());
        }

        item.set_flags(ItemFlags::from_bits_truncate(flag_bits));
        activity.prevent_selection_via_display("menu", vetoed);
        activity.set_nearest_highlight(Some(Highlight::new(0.01, progress)));
        activity.update(&mut item);

        if activity.is_highlight_prevented() {
            prop_assert_eq!(activity.max_highlight_progress(&item), 0.0);
            prop_assert!(!activity.is_dwelling());
            prop_assert!(!item.is_sticky_selected());
        } else {
            prop_assert!(ItemFlags::from_bits_truncate(flag_bits).is_interactive());
            prop_assert!(!vetoed);
        }
    }

    /// Property: dwell progress is non-decreasing and bounded until it fires
    #[test]
    fn dwell_progress_is_monotonic(
        duration in 50.0f32..1000.0,
        steps in prop::collection::vec(1u64..80, 1..60),
    ) {
        let (mut activity, clock) = activity(duration);
        let mut item = Selector::new("ok");
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));
        activity.update(&mut item);

        let mut previous = activity.selection_progress(&item);
        for step in steps {
            clock.advance_ms(step);
            let progress = activity.selection_progress(&item);
            prop_assert!((0.0..=1.0).contains(&progress));
            prop_assert!(progress >= previous);
            previous = progress;

            if activity.update(&mut item) {
                break;
            }
        }
    }

    /// Property: holding the cursor still fires exactly once per dwell window
    #[test]
    fn continuous_dwell_fires_at_most_once(
        frame_ms in 5u64..50,
        frames in 1usize..200,
    ) {
        let (mut activity, clock) = activity(200.0);
        let mut item = Selector::new("ok");
        let fired = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&fired);
        item.subscribe(Box::new(move |_| counter.set(counter.get() + 1)));
        activity.set_nearest_highlight(Some(Highlight::new(0.0, 1.0)));

        let mut returned = 0;
        for _ in 0..frames {
            if activity.update(&mut item) {
                returned += 1;
            }
            clock.advance_ms(frame_ms);
        }

        prop_assert!(fired.get() <= 1);
        prop_assert_eq!(fired.get(), returned);

        // Frame k sees k * frame_ms of dwell; the first k reaching 200 ms fires.
        let needed = 200u64.div_ceil(frame_ms) as usize;
        prop_assert_eq!(fired.get() == 1, frames > needed);
    }

    /// Property: the veto registry tracks exactly the names currently registered
    #[test]
    fn prevention_registry_matches_set_model(
        ops in prop::collection::vec((0usize..4, any::<bool>()), 0..40),
    ) {
        const NAMES: [&str; 4] = ["menuA", "menuB", "keyboard", "modal"];
        let mut registry = PreventionRegistry::new();
        let mut model: HashSet<&str> = HashSet::new();

        for (index, prevent) in ops {
            let name = NAMES[index];
            registry.prevent(name, prevent);
            if prevent {
                model.insert(name);
            } else {
                model.remove(name);
            }

            prop_assert_eq!(registry.is_any_prevented(), !model.is_empty());
            prop_assert_eq!(registry.len(), model.len());
            for name in NAMES {
                prop_assert_eq!(registry.is_prevented_by(name), model.contains(name));
            }
        }
    }
}
