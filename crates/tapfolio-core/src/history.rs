//! Linear undo/redo history of canvas snapshots.

use crate::canvas::Snapshot;

/// Maximum number of snapshots to keep.
pub const MAX_HISTORY: usize = 50;

/// A bounded linear snapshot stack with a cursor.
///
/// Not a tree: recording after an undo discards the redo tail. The stack is
/// seeded with the session's starting snapshot so the first undo after one
/// gesture returns to the pristine canvas. The snapshot under the cursor is
/// always the one the live canvas was last synchronized to.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// Create a history seeded with the starting snapshot.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Commit a completed gesture: truncate the redo tail, append the
    /// snapshot, and evict the oldest entry past the cap.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
            log::debug!("history cap reached, evicted oldest snapshot");
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. `None` at the bottom of the stack.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one entry. `None` at the top of the stack.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored snapshots, including the seed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The snapshot the live canvas was last synchronized to.
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasState;
    use crate::element::{CanvasElement, ElementKind, SerializableColor};
    use kurbo::Rect;

    fn canvas_with(n: usize) -> (CanvasState, Vec<Snapshot>) {
        let mut canvas = CanvasState::new(Rect::new(0.0, 0.0, 400.0, 400.0), None);
        let mut snaps = vec![canvas.snapshot()];
        for _ in 0..n {
            canvas.add_element(ElementKind::Shape {
                fill: SerializableColor::black(),
            });
            snaps.push(canvas.snapshot());
        }
        (canvas, snaps)
    }

    #[test]
    fn test_seeded_with_empty_snapshot() {
        let (canvas, _) = canvas_with(0);
        let history = History::new(canvas.snapshot());
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_returns_previous_state() {
        let (_, snaps) = canvas_with(2);
        let mut history = History::new(snaps[0].clone());
        history.record(snaps[1].clone());
        history.record(snaps[2].clone());

        assert_eq!(history.undo(), Some(&snaps[1]));
        assert_eq!(history.undo(), Some(&snaps[0]));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_full_round_trip() {
        let (_, snaps) = canvas_with(4);
        let mut history = History::new(snaps[0].clone());
        for s in &snaps[1..] {
            history.record(s.clone());
        }

        for _ in 0..4 {
            assert!(history.undo().is_some());
        }
        assert_eq!(history.current(), &snaps[0]);

        for _ in 0..4 {
            assert!(history.redo().is_some());
        }
        assert_eq!(history.current(), &snaps[4]);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_record_truncates_redo_tail() {
        let (_, snaps) = canvas_with(3);
        let mut history = History::new(snaps[0].clone());
        history.record(snaps[1].clone());
        history.record(snaps[2].clone());

        history.undo();
        assert!(history.can_redo());

        history.record(snaps[3].clone());
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.current(), &snaps[3]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut canvas = CanvasState::new(Rect::new(0.0, 0.0, 4000.0, 4000.0), None);
        let mut history = History::new(canvas.snapshot());

        for _ in 0..(MAX_HISTORY + 10) {
            canvas.add_element(CanvasElement::text("x"));
            history.record(canvas.snapshot());
        }
        assert_eq!(history.len(), MAX_HISTORY);

        // The bottom of the stack is no longer the empty canvas.
        while history.undo().is_some() {}
        assert!(!history.current().is_empty());
    }
}
