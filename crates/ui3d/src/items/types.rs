//! Concrete item variants.

use super::{HoverItem, ItemFlags, SelectableItem, SelectableState};
use serde::{Deserialize, Serialize};

/// What a selector does when it fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorAction {
    /// Plain button press.
    #[default]
    Default,
    /// Enter a nested layer.
    NavigateIn,
    /// Leave the current layer.
    NavigateOut,
}

macro_rules! impl_selectable_item {
    ($ty:ty) => {
        impl HoverItem for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn flags(&self) -> ItemFlags {
                self.flags
            }

            fn set_flags(&mut self, flags: ItemFlags) {
                self.flags = flags;
            }

            fn as_selectable(&self) -> Option<&dyn SelectableItem> {
                Some(self)
            }

            fn as_selectable_mut(&mut self) -> Option<&mut dyn SelectableItem> {
                Some(self)
            }
        }
    };
}

/// Default selectable item: fires once per dwell, never sticky.
#[derive(Debug, Default)]
pub struct Selector {
    id: String,
    flags: ItemFlags,
    selectable: SelectableState,
    /// Action reported by the host when this selector fires.
    pub action: SelectorAction,
}

impl Selector {
    /// Create an enabled, visible selector.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: set the selector action.
    pub fn with_action(mut self, action: SelectorAction) -> Self {
        self.action = action;
        self
    }
}

impl_selectable_item!(Selector);

impl SelectableItem for Selector {
    fn selectable_state(&self) -> &SelectableState {
        &self.selectable
    }

    fn selectable_state_mut(&mut self) -> &mut SelectableState {
        &mut self.selectable
    }
}

/// Item whose selection stays latched until the cursor pulls away.
#[derive(Debug, Default)]
pub struct Sticky {
    id: String,
    flags: ItemFlags,
    selectable: SelectableState,
}

impl Sticky {
    /// Create an enabled, visible sticky item.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl_selectable_item!(Sticky);

impl SelectableItem for Sticky {
    fn selectable_state(&self) -> &SelectableState {
        &self.selectable
    }

    fn selectable_state_mut(&mut self) -> &mut SelectableState {
        &mut self.selectable
    }

    fn uses_sticky_selection(&self) -> bool {
        true
    }
}

/// Boolean toggle; each selection flips `value`.
#[derive(Debug, Default)]
pub struct Checkbox {
    id: String,
    flags: ItemFlags,
    selectable: SelectableState,
    /// Current checked state.
    pub value: bool,
}

impl Checkbox {
    /// Create an unchecked checkbox.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl_selectable_item!(Checkbox);

impl SelectableItem for Checkbox {
    fn selectable_state(&self) -> &SelectableState {
        &self.selectable
    }

    fn selectable_state_mut(&mut self) -> &mut SelectableState {
        &mut self.selectable
    }

    fn on_select(&mut self) {
        self.value = !self.value;
    }
}

/// Radio option; selecting sets `value`, and the manager clears the rest of
/// the group.
#[derive(Debug, Default)]
pub struct Radio {
    id: String,
    flags: ItemFlags,
    selectable: SelectableState,
    /// Group name; empty means ungrouped.
    pub group: String,
    /// Whether this option is the chosen one.
    pub value: bool,
}

impl Radio {
    /// Create an unchosen radio option in `group`.
    pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            ..Default::default()
        }
    }
}

impl_selectable_item!(Radio);

impl SelectableItem for Radio {
    fn selectable_state(&self) -> &SelectableState {
        &self.selectable
    }

    fn selectable_state_mut(&mut self) -> &mut SelectableState {
        &mut self.selectable
    }

    // A chosen option can't be re-selected; only another group member clears it.
    fn allow_selection(&self) -> bool {
        self.is_enabled() && !self.value
    }

    fn on_select(&mut self) {
        self.value = true;
    }

    fn radio_group(&self) -> Option<&str> {
        (!self.group.is_empty()).then_some(self.group.as_str())
    }

    fn clear_radio_value(&mut self) {
        self.value = false;
    }
}

/// Display-only label. Not selectable, so it is always highlight-prevented.
#[derive(Debug, Default)]
pub struct TextItem {
    id: String,
    flags: ItemFlags,
    /// Label text.
    pub text: String,
}

impl TextItem {
    /// Create a text item.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }
}

impl HoverItem for TextItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn flags(&self) -> ItemFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: ItemFlags) {
        self.flags = flags;
    }
}
