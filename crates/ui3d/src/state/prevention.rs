//! Named vetoes that other displays place on an item's selection.

use std::collections::HashMap;

/// Registry of display names currently preventing selection.
///
/// Entries have no expiry; each one stays until the same name clears it.
#[derive(Debug, Default, Clone)]
pub struct PreventionRegistry {
    entries: HashMap<String, bool>,
}

impl PreventionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (`prevent = true`) or remove (`prevent = false`) a veto.
    pub fn prevent(&mut self, name: &str, prevent: bool) {
        if !prevent {
            self.entries.remove(name);
            return;
        }

        self.entries.insert(name.to_string(), true);
    }

    /// Whether any entry exists.
    ///
    /// Counts every stored name, not only the active ones. All entries are
    /// stored active today, so the two are equivalent.
    pub fn is_any_prevented(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Whether `name` holds an active veto.
    pub fn is_prevented_by(&self, name: &str) -> bool {
        self.entries.get(name).copied().unwrap_or(false)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
