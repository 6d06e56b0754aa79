//! Per-panel drawing history (undo/redo) with dirty tracking
//!
//! Each drawing panel keeps a bounded stack of stroke snapshots. The top
//! of the undo stack is always the current state; dirtiness is decided
//! by comparing the current top against the last saved entry by identity,
//! so snapshots can be shared cheaply between stacks.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::drawing::Stroke;

/// Default number of history entries retained per panel
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One snapshot of a drawing's strokes
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    strokes: Arc<[Stroke]>,
    /// Epoch milliseconds when the snapshot was pushed
    pub at: u64,
}

impl HistoryEntry {
    fn new(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes: strokes.into(),
            at: epoch_millis(),
        }
    }

    /// The strokes captured by this snapshot
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Identity comparison: two entries are the same iff they share the
    /// same snapshot allocation
    fn same_snapshot(&self, other: &HistoryEntry) -> bool {
        Arc::ptr_eq(&self.strokes, &other.strokes)
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Bounded undo/redo history for one drawing panel
#[derive(Debug, Clone)]
pub struct DrawingHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_size: usize,
    saved_entry: Option<HistoryEntry>,
}

impl Default for DrawingHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingHistory {
    /// Create an empty history with the default size limit
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history with a specific size limit
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            saved_entry: None,
        }
    }

    /// Current strokes (top of the undo stack), if any state exists
    pub fn current(&self) -> Option<&[Stroke]> {
        self.undo_stack.last().map(|e| e.strokes())
    }

    /// Push a new snapshot, clearing the redo stack.
    ///
    /// Oldest entries are dropped from the front once the limit is hit.
    pub fn push(&mut self, strokes: Vec<Stroke>) {
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry::new(strokes));
        if self.undo_stack.len() > self.max_size {
            let overflow = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..overflow);
        }
    }

    /// Replace all state with a single snapshot marked as saved.
    ///
    /// Used when a drawing is loaded from disk: the loaded state is both
    /// current and clean.
    pub fn initialize(&mut self, strokes: Vec<Stroke>) {
        let entry = HistoryEntry::new(strokes);
        self.undo_stack = vec![entry.clone()];
        self.redo_stack.clear();
        self.saved_entry = Some(entry);
    }

    /// Step back one snapshot. Returns the new current strokes, or
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&[Stroke]> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let top = self.undo_stack.pop().expect("len checked above");
        self.redo_stack.push(top);
        self.current()
    }

    /// Step forward one snapshot. Returns the new current strokes, or
    /// `None` when the redo stack is empty.
    pub fn redo(&mut self) -> Option<&[Stroke]> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry);
        self.current()
    }

    /// Mark the current top as the saved state
    pub fn mark_saved(&mut self) {
        self.saved_entry = self.undo_stack.last().cloned();
    }

    /// Drop all history and the saved marker
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.saved_entry = None;
    }

    /// True when at least one snapshot precedes the current one
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// True when a redo snapshot is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Whether the current state differs from the last saved snapshot.
    ///
    /// With no saved snapshot, any state at all counts as dirty.
    pub fn is_dirty(&self) -> bool {
        match (&self.saved_entry, self.undo_stack.last()) {
            (Some(saved), Some(top)) => !saved.same_snapshot(top),
            (Some(_), None) => true,
            (None, _) => !self.undo_stack.is_empty(),
        }
    }

    /// Number of retained undo snapshots
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}
