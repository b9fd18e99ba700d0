//! Undo/redo history over whole-deck snapshots.
//!
//! Every recorded mutation pushes a deep copy of the slide list as it was
//! *before* the change. Undo swaps the current list for the newest snapshot
//! and parks the current one on the redo stack; redo does the reverse.
//! Recording a new mutation clears the redo stack (linear history).
//!
//! Drag and resize gestures use **snapshot batching**: the deck is captured
//! when the gesture begins and compared when it ends, so a whole gesture
//! undoes in a single step no matter how many pointer moves it took.

use deck_core::Slide;
use std::collections::VecDeque;

/// A full copy of the slide list.
pub type Snapshot = Vec<Slide>;

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Deck captured when the outermost batch opened.
    batch_snapshot: Option<Snapshot>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
        }
    }

    /// Rebuild from persisted stacks (oldest first). Over-long stacks keep
    /// their newest entries.
    pub fn from_entries(max_depth: usize, undo: Vec<Snapshot>, redo: Vec<Snapshot>) -> Self {
        let mut history = Self::new(max_depth);
        for snapshot in undo {
            history.push(snapshot);
        }
        let skip = redo.len().saturating_sub(max_depth);
        history.redo_stack = redo.into_iter().skip(skip).collect();
        history
    }

    /// Append a snapshot, evicting the oldest entry past capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Record the pre-mutation state of a new edit: push it and drop the
    /// redo branch. Ignored while a batch is open; the batch snapshot
    /// already covers the edit.
    pub fn record(&mut self, before: Snapshot) {
        if self.batch_depth > 0 {
            return;
        }
        self.push(before);
        self.clear_redo();
    }

    pub fn pop_undo(&mut self) -> Option<Snapshot> {
        self.undo_stack.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<Snapshot> {
        self.redo_stack.pop()
    }

    pub fn push_redo(&mut self, snapshot: Snapshot) {
        self.redo_stack.push(snapshot);
        if self.redo_stack.len() > self.max_depth {
            self.redo_stack.remove(0);
        }
    }

    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Step back: returns the snapshot to restore and parks `current` for
    /// redo. `None` (and no change) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.pop_undo()?;
        self.push_redo(current);
        Some(previous)
    }

    /// Step forward: returns the snapshot to restore and parks `current` for
    /// undo without touching the rest of the redo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.pop_redo()?;
        self.push(current);
        Some(next)
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo_stack.iter()
    }

    /// Redo entries, oldest first (the next redo is last).
    pub fn redo_entries(&self) -> impl Iterator<Item = &Snapshot> {
        self.redo_stack.iter()
    }

    // ─── Batching ────────────────────────────────────────────────────────

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Open a batch. The outermost call captures `slides` as the state to
    /// return to on undo.
    pub fn begin_batch(&mut self, slides: &[Slide]) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(slides.to_vec());
        }
        self.batch_depth += 1;
    }

    /// Close a batch. When the outermost batch closes and `slides` differs
    /// from the captured state, one undo entry is recorded. Returns whether
    /// an entry was recorded.
    pub fn end_batch(&mut self, slides: &[Slide]) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        match self.batch_snapshot.take() {
            Some(before) if before.as_slice() != slides => {
                self.record(before);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::LayoutKind;
    use pretty_assertions::assert_eq;

    fn deck(titles: &[&str]) -> Snapshot {
        titles
            .iter()
            .map(|t| {
                let mut s = Slide::new(LayoutKind::TitleContent);
                s.title = t.to_string();
                s
            })
            .collect()
    }

    fn titles(snapshot: &Snapshot) -> Vec<String> {
        snapshot.iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn undo_redo_swaps_states() {
        let mut history = History::new(50);
        let a = deck(&["a"]);
        let b = deck(&["b"]);

        history.record(a.clone());
        let restored = history.undo(b.clone()).unwrap();
        assert_eq!(titles(&restored), ["a"]);
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(titles(&again), ["b"]);
        assert_eq!(history.len(), 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut history = History::new(50);
        assert!(history.undo(deck(&["x"])).is_none());
        assert!(history.redo(deck(&["x"])).is_none());
        assert_eq!(history.len(), 0);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn record_clears_redo() {
        let mut history = History::new(50);
        history.record(deck(&["a"]));
        history.undo(deck(&["b"]));
        assert!(history.can_redo());
        history.record(deck(&["a"]));
        assert!(!history.can_redo());
    }

    #[test]
    fn max_depth_evicts_oldest() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.record(deck(&[&i.to_string()]));
        }
        assert_eq!(history.len(), 3);
        let oldest = history.undo_entries().next().unwrap();
        assert_eq!(titles(oldest), ["2"]);
    }

    #[test]
    fn batch_records_once() {
        let mut history = History::new(50);
        let start = deck(&["start"]);
        history.begin_batch(&start);
        history.record(deck(&["ignored"]));
        history.begin_batch(&deck(&["nested"]));
        assert!(!history.end_batch(&deck(&["mid"])));
        assert!(history.end_batch(&deck(&["end"])));

        assert_eq!(history.len(), 1);
        let restored = history.undo(deck(&["end"])).unwrap();
        assert_eq!(titles(&restored), ["start"]);
    }

    #[test]
    fn unchanged_batch_records_nothing() {
        let mut history = History::new(50);
        let same = deck(&["same"]);
        history.begin_batch(&same);
        assert!(!history.end_batch(&same));
        assert!(!history.can_undo());
        assert!(!history.end_batch(&same), "unbalanced end is ignored");
    }

    #[test]
    fn from_entries_keeps_newest() {
        let undo = (0..5).map(|i| deck(&[&i.to_string()])).collect();
        let history = History::from_entries(2, undo, vec![deck(&["r"])]);
        assert_eq!(history.len(), 2);
        assert_eq!(titles(history.undo_entries().next().unwrap()), ["3"]);
        assert_eq!(history.redo_len(), 1);
    }
}
