//! Caret position tracking.
//!
//! A [`CaretPosition`] is never stored; it is derived from a raw character offset by
//! [`TextBuffer::position_of`](crate::TextBuffer::position_of). [`CaretTracker`] keeps that raw
//! offset consistent as change events arrive.

use crate::notify::{ChangeEvent, ChangeKind};
use std::fmt;

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaretPosition {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column in characters, starting at 1.
    pub column: usize,
}

impl CaretPosition {
    /// Create a position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for CaretPosition {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for CaretPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

/// Keeps a single caret offset valid across edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaretTracker {
    offset: usize,
}

impl CaretTracker {
    /// Current caret offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the caret, clamped to `len`.
    pub fn set(&mut self, offset: usize, len: usize) {
        self.offset = offset.min(len);
    }

    /// Shift the caret for a change.
    ///
    /// - insert at or before the caret: the caret moves past the inserted text
    /// - delete entirely before the caret: the caret moves back by the removed length
    /// - delete covering the caret: the caret collapses to the delete start
    /// - reset: the caret returns to 0
    pub fn track(&mut self, event: &ChangeEvent) {
        match event.kind {
            ChangeKind::Inserted { position, len } => {
                if position <= self.offset {
                    self.offset += len;
                }
            }
            ChangeKind::Deleted { position, len } => {
                let end = position + len;
                if self.offset >= end {
                    self.offset -= len;
                } else if self.offset > position {
                    self.offset = position;
                }
            }
            ChangeKind::Reset { .. } => self.offset = 0,
        }
    }
}
