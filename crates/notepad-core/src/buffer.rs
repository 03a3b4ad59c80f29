//! Text storage layer.
//!
//! [`TextBuffer`] owns the document characters in a [`Rope`] and exposes position-based reads
//! and mutations in **character offsets** (Unicode scalar values). Mutations are pure: they
//! return the [`EditOp`] that describes them and leave recording and notification to the
//! owning [`Document`](crate::Document).

use crate::error::DocumentError;
use crate::position::CaretPosition;
use ropey::Rope;
use std::ops::Range;

/// One atomic, reversible mutation of a [`TextBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// `text` was inserted at `position`.
    Insert {
        /// Character offset of the insertion.
        position: usize,
        /// Inserted text.
        text: String,
    },
    /// `removed` was deleted starting at `position`.
    Delete {
        /// Character offset where the removed text started.
        position: usize,
        /// Exact removed text.
        removed: String,
    },
}

impl EditOp {
    /// The operation that undoes this one.
    pub fn inverse(&self) -> EditOp {
        match self {
            EditOp::Insert { position, text } => EditOp::Delete {
                position: *position,
                removed: text.clone(),
            },
            EditOp::Delete { position, removed } => EditOp::Insert {
                position: *position,
                text: removed.clone(),
            },
        }
    }

    /// Character offset the operation applies at.
    pub fn position(&self) -> usize {
        match self {
            EditOp::Insert { position, .. } | EditOp::Delete { position, .. } => *position,
        }
    }

    /// Text carried by the operation (inserted or removed).
    pub fn text(&self) -> &str {
        match self {
            EditOp::Insert { text, .. } => text,
            EditOp::Delete { removed, .. } => removed,
        }
    }

    /// Length of the carried text in characters.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    /// Returns `true` if applying the operation would not change the buffer.
    pub fn is_noop(&self) -> bool {
        self.text().is_empty()
    }
}

/// The live character content of a document.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Length in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines (`'\n'` count + 1).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Full current content.
    pub fn snapshot(&self) -> String {
        self.rope.to_string()
    }

    /// Text inside `range`.
    pub fn slice(&self, range: Range<usize>) -> Result<String, DocumentError> {
        self.check_range(&range)?;
        Ok(self.rope.slice(range).to_string())
    }

    /// Insert `text` at `position`; all content at `>= position` shifts forward.
    pub fn insert(&mut self, position: usize, text: &str) -> Result<EditOp, DocumentError> {
        self.check_position(position)?;
        self.rope.insert(position, text);
        Ok(EditOp::Insert {
            position,
            text: text.to_string(),
        })
    }

    /// Remove the characters in `range`; the returned op carries them for inversion.
    pub fn delete(&mut self, range: Range<usize>) -> Result<EditOp, DocumentError> {
        self.check_range(&range)?;
        let removed = self.rope.slice(range.clone()).to_string();
        let position = range.start;
        self.rope.remove(range);
        Ok(EditOp::Delete { position, removed })
    }

    /// Apply a recorded operation verbatim.
    ///
    /// A `Delete` must match the current content at its position exactly, otherwise the
    /// history that produced it no longer describes this buffer.
    pub fn apply(&mut self, op: &EditOp) -> Result<(), DocumentError> {
        match op {
            EditOp::Insert { position, text } => {
                self.insert(*position, text)?;
            }
            EditOp::Delete { position, removed } => {
                let range = *position..*position + removed.chars().count();
                self.check_range(&range)?;
                if self.rope.slice(range.clone()) != removed.as_str() {
                    return Err(DocumentError::OutOfRange {
                        start: range.start,
                        end: range.end,
                        len: self.len_chars(),
                    });
                }
                self.rope.remove(range);
            }
        }
        Ok(())
    }

    /// Replace the entire content.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// 1-based line/column of a character offset.
    ///
    /// Lines are split on `'\n'` only; every other character, `'\r'` included, counts as one
    /// column.
    pub fn position_of(&self, offset: usize) -> Result<CaretPosition, DocumentError> {
        self.check_position(offset)?;
        let line = self.rope.char_to_line(offset);
        let column = offset - self.rope.line_to_char(line);
        Ok(CaretPosition::new(line + 1, column + 1))
    }

    /// Character offset of a 1-based line/column, clamped to the line's end.
    pub fn offset_of(&self, position: CaretPosition) -> Result<usize, DocumentError> {
        let line = position.line.saturating_sub(1);
        if line >= self.rope.len_lines() {
            let len = self.len_chars();
            return Err(DocumentError::OutOfRange {
                start: len,
                end: len,
                len,
            });
        }
        let line_start = self.rope.line_to_char(line);
        let line_end = if line + 1 < self.rope.len_lines() {
            // Exclude the '\n' that terminates the line.
            self.rope.line_to_char(line + 1) - 1
        } else {
            self.len_chars()
        };
        Ok((line_start + position.column.saturating_sub(1)).min(line_end))
    }

    fn check_position(&self, position: usize) -> Result<(), DocumentError> {
        let len = self.len_chars();
        if position > len {
            return Err(DocumentError::OutOfRange {
                start: position,
                end: position,
                len,
            });
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), DocumentError> {
        let len = self.len_chars();
        if range.start > range.end || range.end > len {
            return Err(DocumentError::OutOfRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_shifts_content() {
        let mut buffer = TextBuffer::from_text("Hello World");
        let op = buffer.insert(5, ",").unwrap();
        assert_eq!(buffer.snapshot(), "Hello, World");
        assert_eq!(
            op,
            EditOp::Insert {
                position: 5,
                text: ",".to_string(),
            }
        );
    }

    #[test]
    fn test_insert_at_end_and_out_of_range() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.insert(3, "d").unwrap();
        assert_eq!(buffer.snapshot(), "abcd");

        let err = buffer.insert(5, "x").unwrap_err();
        assert_eq!(
            err,
            DocumentError::OutOfRange {
                start: 5,
                end: 5,
                len: 4,
            }
        );
        assert_eq!(buffer.snapshot(), "abcd");
    }

    #[test]
    fn test_delete_carries_removed_text() {
        let mut buffer = TextBuffer::from_text("Hello, World");
        let op = buffer.delete(5..7).unwrap();
        assert_eq!(buffer.snapshot(), "HelloWorld");
        assert_eq!(
            op,
            EditOp::Delete {
                position: 5,
                removed: ", ".to_string(),
            }
        );
    }

    #[test]
    fn test_delete_rejects_bad_ranges() {
        let mut buffer = TextBuffer::from_text("abc");
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert!(matches!(
            buffer.delete(reversed),
            Err(DocumentError::OutOfRange { .. })
        ));
        assert!(matches!(
            buffer.delete(1..4),
            Err(DocumentError::OutOfRange { .. })
        ));
        assert_eq!(buffer.snapshot(), "abc");
    }

    #[test]
    fn test_inverse_round_trip() {
        let mut buffer = TextBuffer::from_text("你好");
        let op = buffer.insert(1, "们").unwrap();
        assert_eq!(buffer.snapshot(), "你们好");
        buffer.apply(&op.inverse()).unwrap();
        assert_eq!(buffer.snapshot(), "你好");
        assert_eq!(op.inverse().inverse(), op);
    }

    #[test]
    fn test_apply_delete_requires_matching_text() {
        let mut buffer = TextBuffer::from_text("abc");
        let stale = EditOp::Delete {
            position: 0,
            removed: "xy".to_string(),
        };
        assert!(buffer.apply(&stale).is_err());
        assert_eq!(buffer.snapshot(), "abc");
    }

    #[test]
    fn test_position_of_counts_newlines() {
        let buffer = TextBuffer::from_text("ab\ncd\n\nx");
        assert_eq!(buffer.position_of(0).unwrap(), CaretPosition::new(1, 1));
        assert_eq!(buffer.position_of(2).unwrap(), CaretPosition::new(1, 3));
        assert_eq!(buffer.position_of(3).unwrap(), CaretPosition::new(2, 1));
        assert_eq!(buffer.position_of(6).unwrap(), CaretPosition::new(3, 1));
        assert_eq!(buffer.position_of(8).unwrap(), CaretPosition::new(4, 2));
        assert!(buffer.position_of(9).is_err());
    }

    #[test]
    fn test_position_of_treats_carriage_return_as_column() {
        let buffer = TextBuffer::from_text("a\r\nb");
        assert_eq!(buffer.position_of(2).unwrap(), CaretPosition::new(1, 3));
        assert_eq!(buffer.position_of(3).unwrap(), CaretPosition::new(2, 1));
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_offset_of_clamps_to_line_end() {
        let buffer = TextBuffer::from_text("ab\ncdef");
        assert_eq!(buffer.offset_of(CaretPosition::new(1, 10)).unwrap(), 2);
        assert_eq!(buffer.offset_of(CaretPosition::new(2, 3)).unwrap(), 5);
        assert!(buffer.offset_of(CaretPosition::new(3, 1)).is_err());
    }
}
