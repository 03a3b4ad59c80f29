//! Undo/redo history.
//!
//! History is a pair of stacks of [`UndoStep`]s. A step is the list of [`EditOp`]s produced by
//! one user action (a single insert or delete, or the delete + insert pair of a range
//! replacement) and is undone/redone as a unit.
//!
//! Replaying a step goes through [`TextBuffer::apply`], which never touches the history: undo
//! moves a step to the redo stack and redo moves it back, so neither can grow a stack on its
//! own.

use crate::buffer::{EditOp, TextBuffer};
use crate::error::DocumentError;

/// Default maximum number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Ops recorded for one user action, in the order they were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStep {
    ops: Vec<EditOp>,
}

impl UndoStep {
    /// Ops of this step, oldest first.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }
}

/// Undo and redo stacks.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    limit: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl EditHistory {
    /// Create an empty history keeping at most `limit` undo steps (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a single op as its own step. Clears the redo stack.
    pub fn record(&mut self, op: EditOp) {
        self.record_group(vec![op]);
    }

    /// Record several ops as one step. Clears the redo stack.
    ///
    /// No-op entries are dropped; an empty group records nothing and leaves redo intact.
    pub fn record_group(&mut self, ops: Vec<EditOp>) {
        let ops: Vec<EditOp> = ops.into_iter().filter(|op| !op.is_noop()).collect();
        if ops.is_empty() {
            return;
        }

        self.redo_stack.clear();
        if self.undo_stack.len() >= self.limit {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(UndoStep { ops });
    }

    /// Revert the newest step.
    ///
    /// Returns the inverse ops that were applied (in application order), or `None` when there
    /// is nothing to undo.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> Result<Option<Vec<EditOp>>, DocumentError> {
        let Some(step) = self.undo_stack.pop() else {
            return Ok(None);
        };

        let inverses: Vec<EditOp> = step.ops.iter().rev().map(EditOp::inverse).collect();
        if let Err(err) = apply_all(buffer, &inverses) {
            tracing::warn!(error = %err, "undo step no longer matches the buffer; dropped");
            return Err(err);
        }

        self.redo_stack.push(step);
        Ok(Some(inverses))
    }

    /// Re-apply the newest undone step.
    ///
    /// Returns the ops that were applied, or `None` when there is nothing to redo.
    pub fn redo(&mut self, buffer: &mut TextBuffer) -> Result<Option<Vec<EditOp>>, DocumentError> {
        let Some(step) = self.redo_stack.pop() else {
            return Ok(None);
        };

        if let Err(err) = apply_all(buffer, &step.ops) {
            tracing::warn!(error = %err, "redo step no longer matches the buffer; dropped");
            return Err(err);
        }

        let applied = step.ops.clone();
        self.undo_stack.push(step);
        Ok(Some(applied))
    }

    /// Clear both stacks.
    pub fn discard_all(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Returns `true` if there is a step to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there is a step to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum number of undo steps kept.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Apply `ops` in order; on failure, roll back what was applied so the buffer is unchanged.
fn apply_all(buffer: &mut TextBuffer, ops: &[EditOp]) -> Result<(), DocumentError> {
    for (applied, op) in ops.iter().enumerate() {
        if let Err(err) = buffer.apply(op) {
            for done in ops[..applied].iter().rev() {
                if let Err(rollback) = buffer.apply(&done.inverse()) {
                    tracing::warn!(error = %rollback, "rolling back a partial step failed");
                }
            }
            return Err(err);
        }
    }
    Ok(())
}
