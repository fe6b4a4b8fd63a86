//! Per-path forced inclusion overrides
//!
//! An override replaces the rule decision outright for its exact path.
//! Toggling a directory cascades the forced value to every descendant
//! known in the current entry snapshot; the cascade is a bulk write at
//! toggle time, not a prefix rule consulted at read time.

use std::collections::HashMap;

use crate::core::model::PreviewEntry;

/// Explicit per-path forced inclusion or exclusion
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    forced: HashMap<String, bool>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The forced value for a path, if one was set
    pub fn is_forced(&self, path: &str) -> Option<bool> {
        self.forced.get(path).copied()
    }

    /// Force a single path; a later write to the same path wins
    pub fn set_forced(&mut self, path: impl Into<String>, desired: bool) {
        self.forced.insert(path.into(), desired);
    }

    /// Force a path and every snapshot entry beneath it.
    ///
    /// The cascade covers exactly the paths that were descendants of
    /// `path` in the given snapshot; entries discovered by a later walk
    /// are not retroactively forced.
    pub fn set_forced_cascading(
        &mut self,
        path: &str,
        desired: bool,
        snapshot: &[PreviewEntry],
    ) {
        let prefix = format!("{}/", path);
        for entry in snapshot {
            if entry.path.starts_with(&prefix) {
                self.set_forced(entry.path.clone(), desired);
            }
        }
        self.set_forced(path, desired);
    }

    /// Drop all overrides (a fresh run starts empty)
    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.forced.clear();
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.forced.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.forced.is_empty()
    }
}
