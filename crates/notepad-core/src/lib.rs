#![warn(missing_docs)]
//! Notepad Core - a headless text document core
//!
//! # Overview
//!
//! `notepad-core` is the document half of a plain text editor. It has no window, menu or file
//! dialog. The host hands it text and user actions; the core keeps the content, the undo
//! history, the caret and the modified flag consistent and tells observers what changed.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document session (+ SharedDocument)        │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Find / Replace      │  Lexical Tagging     │  ← Derived views
//! ├──────────────────────┴──────────────────────┤
//! │  Change Notification                        │  ← Observers
//! ├─────────────────────────────────────────────┤
//! │  Edit History (undo / redo)                 │  ← Reversible ops
//! ├─────────────────────────────────────────────┤
//! │  Text Buffer (Rope-based)                   │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use notepad_core::{Document, FindSession, LexicalTagger, SearchOptions, TagCategory};
//! use notepad_core_lang::LanguageProfile;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut doc = Document::new();
//!
//! let spans = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&spans);
//! doc.enable_tagging(LexicalTagger::new(LanguageProfile::c()), move |tags| {
//!     *sink.borrow_mut() = tags.to_vec();
//! });
//!
//! doc.insert(0, "int x; // note").unwrap();
//! assert_eq!(spans.borrow()[0].category, TagCategory::Keyword);
//!
//! let session = FindSession::new("x", "y", SearchOptions::default());
//! assert_eq!(doc.replace_all(&session).unwrap(), 1);
//! assert_eq!(doc.text(), "int y; // note");
//!
//! doc.undo().unwrap();
//! assert_eq!(doc.text(), "int x; // note");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - character storage and reversible [`EditOp`]s
//! - [`history`] - undo/redo stacks
//! - [`notify`] - change events and observers
//! - [`position`] - line/column derivation and caret tracking
//! - [`tagging`] - keyword/comment/string span tagging
//! - [`search`] - find next with wraparound, replace all
//! - [`document`] - the session tying everything together
//!
//! # Concurrency
//!
//! Everything runs on the caller's thread. Notifications are synchronous and tagging rescans
//! the whole buffer on every change, so very large files make every edit proportionally slower.

pub mod buffer;
pub mod document;
mod error;
pub mod history;
pub mod notify;
pub mod position;
pub mod search;
pub mod tagging;

pub use buffer::{EditOp, TextBuffer};
pub use document::{Document, DocumentOptions, SharedDocument, WeakDocument};
pub use error::DocumentError;
pub use history::{DEFAULT_HISTORY_LIMIT, EditHistory, UndoStep};
pub use notify::{
    ChangeEvent, ChangeKind, ChangeNotifier, ChangeObserver, ChangeOrigin, SubscriptionId,
};
pub use position::{CaretPosition, CaretTracker};
pub use search::{FindSession, ReplaceOutcome, SearchMatch, SearchOptions};
pub use tagging::{LexicalTagger, TagCategory, TaggedSpan, TaggingObserver};
