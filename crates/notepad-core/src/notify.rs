//! Change notification.
//!
//! Every buffer mutation produces one [`ChangeEvent`] per applied [`EditOp`](crate::EditOp).
//! Events are delivered synchronously, in subscription order, before the mutating call
//! returns. Observers get read-only access to the buffer; they must not try to mutate the
//! document from inside a callback (see [`SharedDocument`](crate::SharedDocument), which
//! refuses such attempts with [`DocumentError::Reentrancy`](crate::DocumentError::Reentrancy)).

use crate::buffer::TextBuffer;
use std::ops::Range;

/// What happened to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// `len` characters were inserted at `position`.
    Inserted {
        /// Character offset of the insertion.
        position: usize,
        /// Inserted length in characters.
        len: usize,
    },
    /// `len` characters were removed starting at `position`.
    Deleted {
        /// Character offset where the removed text started.
        position: usize,
        /// Removed length in characters.
        len: usize,
    },
    /// The whole content was replaced; `len` is the new length.
    Reset {
        /// New buffer length in characters.
        len: usize,
    },
}

/// What caused a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A recorded user edit.
    Edit,
    /// Replaying an inverse operation from the undo stack.
    Undo,
    /// Replaying an operation from the redo stack.
    Redo,
    /// Content replaced wholesale (load, new document).
    Reset,
}

/// A single change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Change kind and extent.
    pub kind: ChangeKind,
    /// Change cause.
    pub origin: ChangeOrigin,
    /// Document version after the change.
    pub version: u64,
}

impl ChangeEvent {
    /// Affected range in post-change character offsets.
    ///
    /// Deletions produce an empty range at the deletion point.
    pub fn affected_region(&self) -> Range<usize> {
        match self.kind {
            ChangeKind::Inserted { position, len } => position..position + len,
            ChangeKind::Deleted { position, .. } => position..position,
            ChangeKind::Reset { len } => 0..len,
        }
    }
}

/// Receives change events.
pub trait ChangeObserver {
    /// Called after the buffer has been changed.
    fn on_change(&mut self, event: &ChangeEvent, buffer: &TextBuffer);
}

impl<F> ChangeObserver for F
where
    F: FnMut(&ChangeEvent, &TextBuffer),
{
    fn on_change(&mut self, event: &ChangeEvent, buffer: &TextBuffer) {
        self(event, buffer)
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered list of observers.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Vec<(SubscriptionId, Box<dyn ChangeObserver>)>,
    next_id: u64,
}

impl ChangeNotifier {
    /// Create a notifier without observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it is called after every observer registered before it.
    pub fn subscribe(&mut self, observer: impl ChangeObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub_id, _)| *sub_id != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `event` to every observer, in subscription order.
    pub fn notify(&mut self, event: &ChangeEvent, buffer: &TextBuffer) {
        for (_, observer) in &mut self.observers {
            observer.on_change(event, buffer);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn inserted(position: usize, len: usize) -> ChangeEvent {
        ChangeEvent {
            kind: ChangeKind::Inserted { position, len },
            origin: ChangeOrigin::Edit,
            version: 1,
        }
    }

    #[test]
    fn test_notify_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            notifier.subscribe(move |_: &ChangeEvent, _: &TextBuffer| {
                log.borrow_mut().push(name);
            });
        }

        notifier.notify(&inserted(0, 1), &TextBuffer::from_text("a"));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier = ChangeNotifier::new();
        let counter = Rc::clone(&count);
        let id = notifier.subscribe(move |_: &ChangeEvent, _: &TextBuffer| {
            *counter.borrow_mut() += 1;
        });

        let buffer = TextBuffer::new();
        notifier.notify(&inserted(0, 0), &buffer);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(&inserted(0, 0), &buffer);

        assert_eq!(*count.borrow(), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_observer_reads_buffer() {
        let seen = Rc::new(RefCell::new(String::new()));
        let mut notifier = ChangeNotifier::new();
        let sink = Rc::clone(&seen);
        notifier.subscribe(move |event: &ChangeEvent, buffer: &TextBuffer| {
            let text = buffer.slice(event.affected_region()).unwrap();
            sink.borrow_mut().push_str(&text);
        });

        notifier.notify(&inserted(2, 3), &TextBuffer::from_text("abXYZcd"));
        assert_eq!(*seen.borrow(), "XYZ");
    }

    #[test]
    fn test_affected_region() {
        let deleted = ChangeEvent {
            kind: ChangeKind::Deleted {
                position: 4,
                len: 2,
            },
            origin: ChangeOrigin::Undo,
            version: 2,
        };
        assert_eq!(deleted.affected_region(), 4..4);
        assert_eq!(inserted(1, 3).affected_region(), 1..4);
    }
}
