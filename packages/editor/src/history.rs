//! # History Store
//!
//! A three-list command log over [`ComponentTree`] snapshots.
//!
//! ## Design
//!
//! - `past` runs oldest → nearest, `future` runs nearest → furthest
//! - Dispatching a mutation that changes nothing records nothing
//! - A new edit clears `future`
//! - `past` is trimmed to `max_levels` (0 = unlimited), dropping the oldest
//!
//! Snapshots share structure through `Arc`, so keeping a hundred of them is
//! cheap.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(ComponentTree::new());
//! history.dispatch(&Mutation::Add { component, parent_id: None, index: None });
//! history.undo();
//! history.redo();
//! ```

use crate::Mutation;
use pagebuilder_common::{ComponentTree, EditorFlags, OverlayMap};
use serde::{Deserialize, Serialize};

/// Default track count for grids without their own `columns`
pub const DEFAULT_GRID_COLS: u32 = 12;

/// Default number of undo levels
pub const DEFAULT_MAX_LEVELS: usize = 100;

fn default_grid_cols() -> u32 {
    DEFAULT_GRID_COLS
}

/// Persisted form of the history (also what `hydrate` accepts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub past: Vec<ComponentTree>,
    pub present: ComponentTree,
    pub future: Vec<ComponentTree>,

    /// Editor overlay, carried alongside the snapshots
    #[serde(default)]
    pub editor: OverlayMap,

    #[serde(default = "default_grid_cols")]
    pub grid_cols: u32,
}

impl HistoryRecord {
    /// A record with no past or future
    pub fn initial(present: ComponentTree) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: Vec::new(),
            editor: OverlayMap::new(),
            grid_cols: DEFAULT_GRID_COLS,
        }
    }
}

impl Default for HistoryRecord {
    fn default() -> Self {
        Self::initial(ComponentTree::new())
    }
}

/// Undo/redo store owning the present tree
#[derive(Debug, Clone)]
pub struct History {
    record: HistoryRecord,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Create a history with default max levels (100)
    pub fn new(present: ComponentTree) -> Self {
        Self::from_record(HistoryRecord::initial(present))
    }

    pub fn from_record(record: HistoryRecord) -> Self {
        Self {
            record,
            max_levels: DEFAULT_MAX_LEVELS,
        }
    }

    /// Set the undo limit (trims immediately)
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self.trim();
        self
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn present(&self) -> &ComponentTree {
        &self.record.present
    }

    pub fn record(&self) -> &HistoryRecord {
        &self.record
    }

    pub fn editor(&self) -> &OverlayMap {
        &self.record.editor
    }

    pub fn grid_cols(&self) -> u32 {
        self.record.grid_cols
    }

    pub fn set_grid_cols(&mut self, grid_cols: u32) {
        self.record.grid_cols = grid_cols;
    }

    /// Apply a mutation and record it for undo.
    ///
    /// Returns `false` (and leaves history untouched) when the mutation
    /// changes nothing.
    pub fn dispatch(&mut self, mutation: &Mutation) -> bool {
        let Some(next) = mutation.apply(&self.record.present) else {
            tracing::debug!("dispatch {}: no change", mutation.name());
            return false;
        };

        let previous = std::mem::replace(&mut self.record.present, next);
        self.record.past.push(previous);
        self.record.future.clear();
        self.trim();

        tracing::debug!(
            "dispatch {}: {} undo level(s)",
            mutation.name(),
            self.record.past.len()
        );
        true
    }

    /// Step back one snapshot
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.record.past.pop() else {
            return false;
        };

        let current = std::mem::replace(&mut self.record.present, previous);
        self.record.future.insert(0, current);
        tracing::debug!("undo: {} level(s) left", self.record.past.len());
        true
    }

    /// Step forward one snapshot
    pub fn redo(&mut self) -> bool {
        if self.record.future.is_empty() {
            return false;
        }

        let next = self.record.future.remove(0);
        let current = std::mem::replace(&mut self.record.present, next);
        self.record.past.push(current);
        tracing::debug!("redo: {} level(s) left", self.record.future.len());
        true
    }

    /// Replace the whole record
    pub fn hydrate(&mut self, record: HistoryRecord) {
        self.record = record;
        self.trim();
    }

    /// Drop past and future, keeping the present tree
    pub fn clear(&mut self) {
        self.record.past.clear();
        self.record.future.clear();
    }

    /// Merge `flags` into the overlay entry for `id`. Not an undo step.
    pub fn update_editor(&mut self, id: &str, flags: EditorFlags) {
        self.record.editor.patch(id, flags);
    }

    pub fn can_undo(&self) -> bool {
        !self.record.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.record.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.record.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.record.future.len()
    }

    fn trim(&mut self) {
        if self.max_levels > 0 && self.record.past.len() > self.max_levels {
            let excess = self.record.past.len() - self.max_levels;
            self.record.past.drain(..excess);
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(ComponentTree::new())
    }
}
