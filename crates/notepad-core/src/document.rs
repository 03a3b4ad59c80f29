//! Document session.
//!
//! [`Document`] owns the buffer, its history, the observer list, the caret and the modified
//! flag. Every mutating call follows the same path:
//!
//! 1. mutate the [`TextBuffer`]
//! 2. record the resulting [`EditOp`]s as one history step
//! 3. bump the version, set the modified flag, shift the caret
//! 4. notify observers, synchronously and in subscription order
//!
//! Undo/redo replay through the history without re-recording and emit the same events.
//!
//! # Example
//!
//! ```rust
//! use notepad_core::Document;
//!
//! let mut doc = Document::new();
//! doc.insert(0, "hello").unwrap();
//! assert_eq!(doc.text(), "hello");
//! assert_eq!(doc.history().undo_depth(), 1);
//!
//! assert!(doc.undo().unwrap());
//! assert_eq!(doc.text(), "");
//! assert!(doc.redo().unwrap());
//! assert_eq!(doc.text(), "hello");
//! ```

use crate::buffer::{EditOp, TextBuffer};
use crate::error::DocumentError;
use crate::history::{DEFAULT_HISTORY_LIMIT, EditHistory};
use crate::notify::{
    ChangeEvent, ChangeKind, ChangeNotifier, ChangeObserver, ChangeOrigin, SubscriptionId,
};
use crate::position::{CaretPosition, CaretTracker};
use crate::search::{FindSession, ReplaceOutcome, SearchMatch, replace_all_counted, text_matches};
use crate::tagging::{LexicalTagger, TaggedSpan};
use std::cell::RefCell;
use std::ops::Range;
use std::rc::{Rc, Weak};

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Maximum number of undo steps kept.
    pub history_limit: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl DocumentOptions {
    /// Override the undo step limit.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

/// An editing session over one document.
#[derive(Debug)]
pub struct Document {
    buffer: TextBuffer,
    history: EditHistory,
    notifier: ChangeNotifier,
    caret: CaretTracker,
    modified: bool,
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty, unmodified document.
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    /// Create an empty document with custom options.
    pub fn with_options(options: DocumentOptions) -> Self {
        Self {
            buffer: TextBuffer::new(),
            history: EditHistory::new(options.history_limit),
            notifier: ChangeNotifier::new(),
            caret: CaretTracker::default(),
            modified: false,
            version: 0,
        }
    }

    /// Create an unmodified document holding `text`, as if it had just been loaded.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.buffer.set_text(text);
        doc
    }

    /// Read-only access to the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Read-only access to the history.
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Full current content.
    pub fn text(&self) -> String {
        self.buffer.snapshot()
    }

    /// Length in characters.
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Version number, incremented for every change event.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Insert `text` at `position` as one undoable step.
    ///
    /// Inserting empty text validates `position` but records and notifies nothing.
    pub fn insert(&mut self, position: usize, text: &str) -> Result<EditOp, DocumentError> {
        let op = self.buffer.insert(position, text)?;
        if !op.is_noop() {
            tracing::debug!(position, len = op.char_len(), "insert");
            self.history.record(op.clone());
            self.emit(&op, ChangeOrigin::Edit);
        }
        Ok(op)
    }

    /// Delete `range` as one undoable step.
    ///
    /// Deleting an empty range validates it but records and notifies nothing.
    pub fn delete(&mut self, range: Range<usize>) -> Result<EditOp, DocumentError> {
        let op = self.buffer.delete(range)?;
        if !op.is_noop() {
            tracing::debug!(position = op.position(), len = op.char_len(), "delete");
            self.history.record(op.clone());
            self.emit(&op, ChangeOrigin::Edit);
        }
        Ok(op)
    }

    /// Replace `range` with `text`; a single undo reverts both halves.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), DocumentError> {
        let delete = self.buffer.delete(range.clone())?;
        let insert = self.buffer.insert(range.start, text)?;
        let ops: Vec<EditOp> = [delete, insert]
            .into_iter()
            .filter(|op| !op.is_noop())
            .collect();
        if ops.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            start = range.start,
            end = range.end,
            len = text.chars().count(),
            "replace range"
        );
        self.history.record_group(ops.clone());
        for op in &ops {
            self.emit(op, ChangeOrigin::Edit);
        }
        Ok(())
    }

    /// Replace the whole content without recording an undo step. History is discarded.
    ///
    /// The modified flag is set; loaders call [`mark_saved`](Self::mark_saved) afterwards, or
    /// use [`load`](Self::load).
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.history.discard_all();
        self.modified = true;
        self.version += 1;

        let event = ChangeEvent {
            kind: ChangeKind::Reset {
                len: self.buffer.len_chars(),
            },
            origin: ChangeOrigin::Reset,
            version: self.version,
        };
        tracing::debug!(
            len = self.buffer.len_chars(),
            "content reset, history discarded"
        );
        self.caret.track(&event);
        self.notifier.notify(&event, &self.buffer);
    }

    /// Replace the content with freshly loaded text: no history, not modified.
    pub fn load(&mut self, text: &str) {
        self.set_text(text);
        self.mark_saved();
    }

    /// Start over with an empty, unmodified document.
    pub fn clear(&mut self) {
        self.load("");
    }

    /// Revert the newest history step. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, DocumentError> {
        let Some(applied) = self.history.undo(&mut self.buffer)? else {
            return Ok(false);
        };
        tracing::debug!(ops = applied.len(), "undo");
        for op in &applied {
            self.emit(op, ChangeOrigin::Undo);
        }
        Ok(true)
    }

    /// Re-apply the newest undone step. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, DocumentError> {
        let Some(applied) = self.history.redo(&mut self.buffer)? else {
            return Ok(false);
        };
        tracing::debug!(ops = applied.len(), "redo");
        for op in &applied {
            self.emit(op, ChangeOrigin::Redo);
        }
        Ok(true)
    }

    /// Returns `true` if there is a step to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns `true` if there is a step to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop all undo/redo history.
    pub fn discard_history(&mut self) {
        tracing::debug!("history discarded");
        self.history.discard_all();
    }

    /// Returns `true` if the content changed since the last load/save acknowledgement.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Acknowledge a successful load or save.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// 1-based line/column of `offset`.
    pub fn position_of(&self, offset: usize) -> Result<CaretPosition, DocumentError> {
        self.buffer.position_of(offset)
    }

    /// Caret offset.
    pub fn caret(&self) -> usize {
        self.caret.offset()
    }

    /// Move the caret.
    pub fn set_caret(&mut self, offset: usize) -> Result<(), DocumentError> {
        let len = self.buffer.len_chars();
        if offset > len {
            return Err(DocumentError::OutOfRange {
                start: offset,
                end: offset,
                len,
            });
        }
        self.caret.set(offset, len);
        Ok(())
    }

    /// 1-based line/column of the caret.
    pub fn caret_position(&self) -> CaretPosition {
        self.buffer
            .position_of(self.caret.offset())
            .unwrap_or_default()
    }

    /// Status text, e.g. `Ln 2, Col 5  (modified)`.
    pub fn status_line(&self) -> String {
        let position = self.caret_position();
        if self.modified {
            format!("{position}  (modified)")
        } else {
            position.to_string()
        }
    }

    /// Register an observer for change events.
    pub fn subscribe(&mut self, observer: impl ChangeObserver + 'static) -> SubscriptionId {
        self.notifier.subscribe(observer)
    }

    /// Remove an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Tag the current content now, then re-tag after every change.
    ///
    /// `on_tags` receives the full span list each time.
    pub fn enable_tagging<F>(&mut self, tagger: LexicalTagger, mut on_tags: F) -> SubscriptionId
    where
        F: FnMut(&[TaggedSpan]) + 'static,
    {
        on_tags(&tagger.tag_buffer(&self.buffer));
        self.subscribe(tagger.into_observer(on_tags))
    }

    /// Find the next match of the session's query after `selection`, wrapping around.
    pub fn find_next(
        &self,
        session: &mut FindSession,
        selection: Range<usize>,
    ) -> Result<Option<SearchMatch>, DocumentError> {
        if session.query.is_empty() {
            return Err(DocumentError::EmptyPattern);
        }
        Ok(session.find_next(&self.buffer.snapshot(), selection.end))
    }

    /// Replace the selection if it matches the query, otherwise find the next match.
    ///
    /// A selection whose text equals the query (under the session's case mode) is replaced as
    /// one undoable step and [`ReplaceOutcome::Replaced`] is returned. Otherwise nothing is
    /// modified and the next match is returned as [`ReplaceOutcome::Found`]; calling again
    /// with that match as the selection replaces it.
    pub fn replace_one(
        &mut self,
        session: &mut FindSession,
        selection: Range<usize>,
    ) -> Result<ReplaceOutcome, DocumentError> {
        if session.query.is_empty() {
            return Err(DocumentError::EmptyPattern);
        }

        let selected = self.buffer.slice(selection.clone())?;
        if !text_matches(&selected, &session.query, session.options) {
            return Ok(match self.find_next(session, selection)? {
                Some(hit) => ReplaceOutcome::Found(hit),
                None => ReplaceOutcome::NotFound,
            });
        }

        let replacement = session.replacement.clone();
        self.replace_range(selection.clone(), &replacement)?;
        let replaced = SearchMatch {
            start: selection.start,
            end: selection.start + replacement.chars().count(),
        };
        session.resume_from(replaced.end);
        Ok(ReplaceOutcome::Replaced(replaced))
    }

    /// Replace every occurrence of the session's query as one undoable step.
    ///
    /// Returns the number of replacements; the document is untouched when there are none.
    pub fn replace_all(&mut self, session: &FindSession) -> Result<usize, DocumentError> {
        if session.query.is_empty() {
            return Err(DocumentError::EmptyPattern);
        }

        let (replaced, count) = replace_all_counted(
            &self.buffer.snapshot(),
            &session.query,
            &session.replacement,
            session.options,
        );
        if count > 0 {
            self.replace_range(0..self.buffer.len_chars(), &replaced)?;
        }
        tracing::debug!(count, "replace all");
        Ok(count)
    }

    fn emit(&mut self, op: &EditOp, origin: ChangeOrigin) {
        self.version += 1;
        self.modified = true;

        let kind = match op {
            EditOp::Insert { position, .. } => ChangeKind::Inserted {
                position: *position,
                len: op.char_len(),
            },
            EditOp::Delete { position, .. } => ChangeKind::Deleted {
                position: *position,
                len: op.char_len(),
            },
        };
        let event = ChangeEvent {
            kind,
            origin,
            version: self.version,
        };
        self.caret.track(&event);
        self.notifier.notify(&event, &self.buffer);
    }
}

/// A shared handle to a [`Document`], for UI adapters that hand the session to several
/// callbacks.
///
/// Only one borrow may mutate at a time. An observer that captures a [`WeakDocument`] and tries
/// to edit during a change notification gets [`DocumentError::Reentrancy`] instead of
/// corrupting the history.
#[derive(Debug, Clone)]
pub struct SharedDocument(Rc<RefCell<Document>>);

/// A non-owning [`SharedDocument`] handle, safe to capture in observers.
#[derive(Debug, Clone)]
pub struct WeakDocument(Weak<RefCell<Document>>);

impl SharedDocument {
    /// Wrap a document.
    pub fn new(document: Document) -> Self {
        Self(Rc::new(RefCell::new(document)))
    }

    /// Create a weak handle.
    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument(Rc::downgrade(&self.0))
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> Result<R, DocumentError> {
        let doc = self.0.try_borrow().map_err(|_| {
            tracing::warn!("document read refused: a mutation is in flight");
            DocumentError::Reentrancy
        })?;
        Ok(f(&doc))
    }

    /// Run `f` with exclusive access.
    pub fn edit<R>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<R, DocumentError>,
    ) -> Result<R, DocumentError> {
        let mut doc = self.0.try_borrow_mut().map_err(|_| {
            tracing::warn!("re-entrant document mutation refused");
            DocumentError::Reentrancy
        })?;
        f(&mut doc)
    }
}

impl WeakDocument {
    /// Upgrade to a strong handle, if the document is still alive.
    pub fn upgrade(&self) -> Option<SharedDocument> {
        self.0.upgrade().map(SharedDocument)
    }
}
