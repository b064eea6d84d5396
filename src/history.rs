use std::collections::VecDeque;

use crate::surface::{Snapshot, Surface};

/// Default number of snapshots kept on each stack
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Manages the undo/redo snapshot stacks for a surface
#[derive(Debug)]
pub struct History {
    /// States to go back to, oldest at the front
    undo_stack: VecDeque<Snapshot>,
    /// States undone since the last commit, oldest at the front
    redo_stack: VecDeque<Snapshot>,
    /// `None` keeps every snapshot
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Some(DEFAULT_HISTORY_LIMIT))
    }
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            limit: limit.map(|limit| limit.max(1)),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Records the current surface as the state to return to.
    ///
    /// Call this right before mutating the surface. Any redo states are
    /// discarded since history is linear.
    pub fn commit(&mut self, surface: &Surface) {
        push_bounded(&mut self.undo_stack, surface.snapshot(), self.limit);
        self.redo_stack.clear();
        log::debug!(
            "History commit: {} undo / {} redo",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
    }

    /// Steps back one state. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        restore(&mut self.undo_stack, &mut self.redo_stack, self.limit, surface)
    }

    /// Steps forward one state. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self, surface: &mut Surface) -> bool {
        restore(&mut self.redo_stack, &mut self.undo_stack, self.limit, surface)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

/// Moves the newest snapshot of `from` onto the surface, saving the
/// current surface onto `to`.
fn restore(
    from: &mut VecDeque<Snapshot>,
    to: &mut VecDeque<Snapshot>,
    limit: Option<usize>,
    surface: &mut Surface,
) -> bool {
    let Some(snapshot) = from.pop_back() else {
        return false;
    };
    let current = surface.swap(snapshot);
    push_bounded(to, current, limit);
    true
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, limit: Option<usize>) {
    stack.push_back(snapshot);
    if let Some(limit) = limit {
        while stack.len() > limit {
            stack.pop_front();
        }
    }
}
