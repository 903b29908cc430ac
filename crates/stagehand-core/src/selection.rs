//! Current-selection bookkeeping.

use crate::id::ObjectId;

/// Tracks the single currently selected object id.
///
/// Liveness is not this type's concern: the service reconciles the
/// selection against the store before every read or mutation, so a stored
/// id may briefly point at an object that already died.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: Option<ObjectId>,
}

impl SelectionTracker {
    pub fn new() -> SelectionTracker {
        SelectionTracker::default()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Select `id`. Returns false when it is already selected, so callers
    /// can skip redundant notifications.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if self.selected == Some(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Clear the selection. Returns whether there was one to clear.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unselected() {
        assert_eq!(SelectionTracker::new().selected(), None);
    }

    #[test]
    fn select_reports_change() {
        let mut tracker = SelectionTracker::new();
        assert!(tracker.select(ObjectId(1)));
        assert_eq!(tracker.selected(), Some(ObjectId(1)));
        assert!(tracker.select(ObjectId(2)));
        assert_eq!(tracker.selected(), Some(ObjectId(2)));
    }

    #[test]
    fn reselecting_same_id_is_a_no_op() {
        let mut tracker = SelectionTracker::new();
        tracker.select(ObjectId(4));
        assert!(!tracker.select(ObjectId(4)));
        assert_eq!(tracker.selected(), Some(ObjectId(4)));
    }

    #[test]
    fn clear_reports_whether_anything_was_selected() {
        let mut tracker = SelectionTracker::new();
        assert!(!tracker.clear());
        tracker.select(ObjectId(1));
        assert!(tracker.clear());
        assert_eq!(tracker.selected(), None);
        assert!(!tracker.clear());
    }
}
