//! Linear undo/redo over full snapshots of the object list.
//!
//! Every edit records the complete object array; undo and redo walk a
//! cursor over the log. The log is bounded: past the capacity the oldest
//! snapshots fall off the back.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::object::StageObject;

/// Default number of snapshots retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded snapshot log with a cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    /// Snapshots, oldest first.
    snapshots: VecDeque<Vec<StageObject>>,
    /// Number of snapshots up to and including the current one.
    cursor: usize,
    /// Maximum snapshots retained (oldest dropped when exceeded).
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty history with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history with a custom capacity.
    ///
    /// A capacity of zero is treated as one: the current snapshot is
    /// always retained.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a snapshot of the object list.
    ///
    /// Recording after an undo discards the redo branch. Recording a
    /// snapshot identical to the current one is a no-op.
    pub fn record(&mut self, objects: &[StageObject]) {
        if let Some(current) = self.current() {
            if current == objects {
                return;
            }
        }

        // Drop the redo branch.
        self.snapshots.truncate(self.cursor);

        self.snapshots.push_back(objects.to_vec());
        self.cursor += 1;

        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            self.cursor -= 1;
            tracing::debug!("History capacity reached, dropping oldest snapshot");
        }
    }

    /// The snapshot the cursor currently points at.
    #[must_use]
    pub fn current(&self) -> Option<&[StageObject]> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.snapshots.get(i))
            .map(Vec::as_slice)
    }

    /// Step back one snapshot and return the state to restore.
    pub fn undo(&mut self) -> Option<Vec<StageObject>> {
        if self.cursor > 1 {
            self.cursor -= 1;
            self.current().map(<[StageObject]>::to_vec)
        } else {
            None
        }
    }

    /// Step forward one snapshot and return the state to restore.
    pub fn redo(&mut self) -> Option<Vec<StageObject>> {
        if self.cursor < self.snapshots.len() {
            self.cursor += 1;
            self.current().map(<[StageObject]>::to_vec)
        } else {
            None
        }
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 1
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.snapshots.len()
    }

    /// Number of snapshots currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if no snapshot has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ObjectKind, ShapeType, StageObject};

    fn snapshot(n: usize) -> Vec<StageObject> {
        (0..n)
            .map(|_| {
                StageObject::new(ObjectKind::Shape {
                    shape: ShapeType::Circle,
                    fill: "#ffffff".to_string(),
                    stroke: "#000000".to_string(),
                    stroke_width: 1.0,
                    corner_radius: 0.0,
                })
            })
            .collect()
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new();
        let a = snapshot(0);
        let b = snapshot(1);
        let c = snapshot(2);
        history.record(&a);
        history.record(&b);
        history.record(&c);

        assert!(history.can_undo());
        assert!(!history.can_redo());

        let restored = history.undo().expect("undo to b");
        assert_eq!(restored.len(), 1);
        let restored = history.undo().expect("undo to a");
        assert_eq!(restored.len(), 0);
        assert!(history.undo().is_none());

        let restored = history.redo().expect("redo to b");
        assert_eq!(restored.len(), 1);
        assert!(history.can_redo());
    }

    #[test]
    fn test_record_truncates_redo_branch() {
        let mut history = History::new();
        history.record(&snapshot(0));
        history.record(&snapshot(1));
        history.record(&snapshot(2));

        history.undo().expect("undo");
        history.record(&snapshot(3));

        // The old tip (2 objects) is gone.
        assert!(!history.can_redo());
        assert_eq!(history.current().expect("current").len(), 3);
    }

    #[test]
    fn test_identical_snapshot_not_recorded() {
        let mut history = History::new();
        let a = snapshot(1);
        history.record(&a);
        history.record(&a);
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::with_capacity(3);
        for n in 0..5 {
            history.record(&snapshot(n));
        }
        assert_eq!(history.len(), 3);

        // Oldest surviving snapshot has 2 objects.
        history.undo().expect("undo");
        let oldest = history.undo().expect("undo to oldest");
        assert_eq!(oldest.len(), 2);
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record(&snapshot(1));
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
