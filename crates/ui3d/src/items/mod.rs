//! Hover item data: state flags, the selectable capability, and observers.

pub mod types;

pub use types::{Checkbox, Radio, Selector, SelectorAction, Sticky, TextItem};

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Enable/visibility state of an item and its ancestors in the item tree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// The item itself is enabled.
        const ENABLED = 1 << 0;
        /// The item itself is visible.
        const VISIBLE = 1 << 1;
        /// Every ancestor is enabled.
        const ANCESTRY_ENABLED = 1 << 2;
        /// Every ancestor is visible.
        const ANCESTRY_VISIBLE = 1 << 3;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::all()
    }
}

impl ItemFlags {
    /// True when the item and its whole ancestry are enabled and visible.
    pub fn is_interactive(self) -> bool {
        self.contains(Self::all())
    }
}

/// Base interface for every item the interaction layer tracks.
pub trait HoverItem {
    /// Stable identifier, used in notifications and logs.
    fn id(&self) -> &str;

    /// Current state flags (owned by the item tree).
    fn flags(&self) -> ItemFlags;

    /// Replace the state flags.
    fn set_flags(&mut self, flags: ItemFlags);

    /// Selectable capability, if this variant has one.
    fn as_selectable(&self) -> Option<&dyn SelectableItem> {
        None
    }

    /// Mutable selectable capability, if this variant has one.
    fn as_selectable_mut(&mut self) -> Option<&mut dyn SelectableItem> {
        None
    }

    /// Shorthand for `flags().contains(ENABLED)`.
    fn is_enabled(&self) -> bool {
        self.flags().contains(ItemFlags::ENABLED)
    }
}

/// Selection transition delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionEventKind {
    /// The item was selected.
    Selected,
    /// A sticky selection was released.
    Deselected,
}

/// Notification payload passed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionEvent {
    /// Identifier of the item that transitioned.
    pub item_id: String,
    /// Which transition happened.
    pub kind: SelectionEventKind,
}

type Observer = Box<dyn FnMut(&SelectionEvent)>;

/// Ordered observer list. Each transition invokes every observer once,
/// synchronously, in registration order.
#[derive(Default)]
pub struct SelectionObservers {
    observers: Vec<Observer>,
}

impl std::fmt::Debug for SelectionObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionObservers")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl SelectionObservers {
    /// Register an observer.
    pub fn subscribe(&mut self, observer: impl FnMut(&SelectionEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn notify(&mut self, event: &SelectionEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }
}

/// State shared by every selectable variant.
#[derive(Debug, Default)]
pub struct SelectableState {
    is_sticky_selected: bool,
    observers: SelectionObservers,
}

impl SelectableState {
    /// Whether a sticky selection is currently held.
    pub fn is_sticky_selected(&self) -> bool {
        self.is_sticky_selected
    }
}

/// Capability implemented by the item variants that can be selected.
///
/// Variants supply the state accessors; `select` and
/// `deselect_sticky_selections` are provided in terms of them. Override
/// `uses_sticky_selection`, `allow_selection` or `on_select` to change policy.
pub trait SelectableItem: HoverItem {
    /// Shared selectable state.
    fn selectable_state(&self) -> &SelectableState;

    /// Mutable shared selectable state.
    fn selectable_state_mut(&mut self) -> &mut SelectableState;

    /// Whether a selection stays latched after the dwell ends.
    fn uses_sticky_selection(&self) -> bool {
        false
    }

    /// Whether the item currently accepts selection. Defaults to `is_enabled`.
    fn allow_selection(&self) -> bool {
        self.is_enabled()
    }

    /// Variant-specific reaction to a selection, run before observers fire.
    fn on_select(&mut self) {}

    /// Radio group this item belongs to, if any.
    fn radio_group(&self) -> Option<&str> {
        None
    }

    /// Clear the chosen value when another member of the radio group fires.
    fn clear_radio_value(&mut self) {}

    /// Whether a sticky selection is currently held.
    fn is_sticky_selected(&self) -> bool {
        self.selectable_state().is_sticky_selected
    }

    /// Register a selection observer.
    fn subscribe(&mut self, observer: Box<dyn FnMut(&SelectionEvent)>) {
        self.selectable_state_mut().observers.subscribe(observer);
    }

    /// Select the item and notify observers.
    fn select(&mut self) {
        let sticky = self.uses_sticky_selection();
        self.selectable_state_mut().is_sticky_selected = sticky;
        self.on_select();

        let event = SelectionEvent {
            item_id: self.id().to_string(),
            kind: SelectionEventKind::Selected,
        };
        self.selectable_state_mut().observers.notify(&event);
    }

    /// Release a sticky selection. No-op (and no notification) when none is held.
    fn deselect_sticky_selections(&mut self) {
        if !self.is_sticky_selected() {
            return;
        }

        self.selectable_state_mut().is_sticky_selected = false;

        let event = SelectionEvent {
            item_id: self.id().to_string(),
            kind: SelectionEventKind::Deselected,
        };
        self.selectable_state_mut().observers.notify(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn default_flags_are_interactive() {
        assert!(ItemFlags::default().is_interactive());
        assert!(!(ItemFlags::all() - ItemFlags::ANCESTRY_VISIBLE).is_interactive());
    }

    #[test]
    fn observers_fire_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = SelectionObservers::default();
        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            observers.subscribe(move |_| log.borrow_mut().push(tag));
        }

        observers.notify(&SelectionEvent {
            item_id: "a".into(),
            kind: SelectionEventKind::Selected,
        });

        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }
}
