//! Indicator nodes that carry highlight/selection progress down to visuals.

/// Progress values for one visual node, propagated to its children each frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indicator {
    /// Highlight fill in `[0, 1]`.
    pub highlight_progress: f32,
    /// Selection fill in `[0, 1]`; never exceeds `highlight_progress` after an update.
    pub selection_progress: f32,
    /// Child indicators that mirror this node.
    pub children: Vec<Indicator>,
    did_settings_change: bool,
    prev_highlight: f32,
    prev_selection: f32,
}

impl Indicator {
    /// Create a leaf indicator at zero progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: attach a child node.
    pub fn with_child(mut self, child: Indicator) -> Self {
        self.children.push(child);
        self
    }

    /// Set both progress values from an activity reading.
    pub fn set_progress(&mut self, highlight: f32, selection: f32) {
        self.highlight_progress = highlight;
        self.selection_progress = selection;
    }

    /// Whether either value differed from the previous update.
    pub fn did_settings_change(&self) -> bool {
        self.did_settings_change
    }

    /// Clamp, detect changes, then copy values into every descendant.
    pub fn tree_update(&mut self) {
        self.selection_progress = self.selection_progress.min(self.highlight_progress);

        self.did_settings_change = self.highlight_progress != self.prev_highlight
            || self.selection_progress != self.prev_selection;

        for child in &mut self.children {
            child.highlight_progress = self.highlight_progress;
            child.selection_progress = self.selection_progress;
            child.tree_update();
        }

        self.prev_highlight = self.highlight_progress;
        self.prev_selection = self.selection_progress;
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Indicator::node_count).sum::<usize>()
    }
}

/// Raises an indicator's values to configured floors, e.g. to keep a
/// "current page" item visibly highlighted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorOverrider {
    /// Highlight floor.
    pub min_highlight_progress: f32,
    /// Selection floor.
    pub min_selection_progress: f32,
}

impl IndicatorOverrider {
    /// Apply the floors to `indicator`.
    pub fn apply(&self, indicator: &mut Indicator) {
        indicator.highlight_progress =
            indicator.highlight_progress.max(self.min_highlight_progress);
        indicator.selection_progress =
            indicator.selection_progress.max(self.min_selection_progress);
    }
}
