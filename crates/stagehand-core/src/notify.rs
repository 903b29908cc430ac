//! Observer fan-out for registry changes.
//!
//! Two channels: "list changed" (full snapshot, replace-all) and "selection
//! changed" (the new id, or `None`). Delivery is synchronous and in
//! subscription order. Observers are isolated: one panicking callback is
//! caught and logged, later observers still run, and the caller's state is
//! untouched.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::id::ObjectId;
use crate::registry::ListItem;

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// Identifies one subscription on either channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

/// Receives the full post-change list snapshot.
pub type ListObserver = Box<dyn FnMut(&[ListItem])>;

/// Receives the new selected id, or `None` when the selection cleared.
pub type SelectionObserver = Box<dyn FnMut(Option<ObjectId>)>;

struct ListEntry {
    id: ObserverId,
    callback: ListObserver,
}

impl fmt::Debug for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListEntry")
            .field("id", &self.id)
            .field("callback", &"<fn>")
            .finish()
    }
}

struct SelectionEntry {
    id: ObserverId,
    callback: SelectionObserver,
}

impl fmt::Debug for SelectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEntry")
            .field("id", &self.id)
            .field("callback", &"<fn>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Subscription-ordered fan-out for the two change events.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    list_observers: Vec<ListEntry>,
    selection_observers: Vec<SelectionEntry>,
    next_observer: u64,
}

impl ChangeNotifier {
    pub fn new() -> ChangeNotifier {
        ChangeNotifier::default()
    }

    /// Subscribe to list snapshots. The id works with [`ChangeNotifier::unsubscribe`].
    pub fn on_list_changed(&mut self, callback: ListObserver) -> ObserverId {
        let id = self.alloc_id();
        self.list_observers.push(ListEntry { id, callback });
        id
    }

    /// Subscribe to selection updates.
    pub fn on_selection_changed(&mut self, callback: SelectionObserver) -> ObserverId {
        let id = self.alloc_id();
        self.selection_observers.push(SelectionEntry { id, callback });
        id
    }

    /// Remove a subscription from whichever channel holds it. Returns
    /// whether anything was removed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.list_observers.len() + self.selection_observers.len();
        self.list_observers.retain(|entry| entry.id != id);
        self.selection_observers.retain(|entry| entry.id != id);
        self.list_observers.len() + self.selection_observers.len() != before
    }

    pub fn list_observer_count(&self) -> usize {
        self.list_observers.len()
    }

    pub fn selection_observer_count(&self) -> usize {
        self.selection_observers.len()
    }

    /// Deliver a list snapshot to every list observer, in subscription
    /// order, continuing past any that panic.
    pub fn notify_list_changed(&mut self, snapshot: &[ListItem]) {
        for entry in &mut self.list_observers {
            let outcome = catch_unwind(AssertUnwindSafe(|| (entry.callback)(snapshot)));
            if outcome.is_err() {
                log::warn!("list observer {:?} panicked; continuing delivery", entry.id);
            }
        }
    }

    /// Deliver a selection update to every selection observer.
    pub fn notify_selection_changed(&mut self, selected: Option<ObjectId>) {
        for entry in &mut self.selection_observers {
            let outcome = catch_unwind(AssertUnwindSafe(|| (entry.callback)(selected)));
            if outcome.is_err() {
                log::warn!(
                    "selection observer {:?} panicked; continuing delivery",
                    entry.id
                );
            }
        }
    }

    fn alloc_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn item(id: u32, name: &str) -> ListItem {
        ListItem {
            id: ObjectId(id),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn delivery_follows_subscription_order() {
        let mut notifier = ChangeNotifier::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            notifier.on_list_changed(Box::new(move |_| order.borrow_mut().push(tag)));
        }

        notifier.notify_list_changed(&[item(1, "A")]);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn list_observers_see_the_full_snapshot() {
        let mut notifier = ChangeNotifier::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        notifier.on_list_changed(Box::new(move |items| sink.borrow_mut().push(items.to_vec())));

        notifier.notify_list_changed(&[item(1, "A"), item(2, "B")]);
        notifier.notify_list_changed(&[]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], vec![item(1, "A"), item(2, "B")]);
        assert_eq!(seen[1], Vec::<ListItem>::new());
    }

    #[test]
    fn selection_observers_see_some_and_none() {
        let mut notifier = ChangeNotifier::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        notifier.on_selection_changed(Box::new(move |selected| sink.borrow_mut().push(selected)));

        notifier.notify_selection_changed(Some(ObjectId(2)));
        notifier.notify_selection_changed(None);
        assert_eq!(*seen.borrow(), vec![Some(ObjectId(2)), None]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut notifier = ChangeNotifier::new();
        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        let id = notifier.on_selection_changed(Box::new(move |_| *sink.borrow_mut() += 1));

        notifier.notify_selection_changed(None);
        assert!(notifier.unsubscribe(id));
        notifier.notify_selection_changed(None);

        assert_eq!(*count.borrow(), 1);
        assert!(!notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(ObserverId(999)));
    }

    #[test]
    fn observer_ids_are_unique_across_channels() {
        let mut notifier = ChangeNotifier::new();
        let a = notifier.on_list_changed(Box::new(|_| {}));
        let b = notifier.on_selection_changed(Box::new(|_| {}));
        let c = notifier.on_list_changed(Box::new(|_| {}));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(notifier.list_observer_count(), 2);
        assert_eq!(notifier.selection_observer_count(), 1);

        assert!(notifier.unsubscribe(b));
        assert_eq!(notifier.list_observer_count(), 2);
        assert_eq!(notifier.selection_observer_count(), 0);
    }

    #[test]
    fn panicking_observer_does_not_stop_later_observers() {
        // Silence the default hook's backtrace spam for the expected panic.
        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let mut notifier = ChangeNotifier::new();
        let reached = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&reached);
        notifier.on_list_changed(Box::new(move |_| sink.borrow_mut().push("before")));
        notifier.on_list_changed(Box::new(|_| panic!("observer bug")));
        let sink = Rc::clone(&reached);
        notifier.on_list_changed(Box::new(move |_| sink.borrow_mut().push("after")));

        notifier.notify_list_changed(&[item(1, "A")]);
        // A second round still reaches everyone, including the bad one.
        notifier.notify_list_changed(&[item(1, "A")]);

        std::panic::set_hook(previous_hook);

        assert_eq!(*reached.borrow(), vec!["before", "after", "before", "after"]);
        assert_eq!(notifier.list_observer_count(), 3);
    }

    #[test]
    fn debug_masks_callbacks() {
        let mut notifier = ChangeNotifier::new();
        notifier.on_list_changed(Box::new(|_| {}));
        let formatted = format!("{notifier:?}");
        assert!(formatted.contains("<fn>"));
    }
}
