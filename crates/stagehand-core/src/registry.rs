//! The record store: which objects are registered, in what order, under
//! which ids.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::SceneHost;
use crate::id::ObjectId;

// ---------------------------------------------------------------------------
// Snapshot rows
// ---------------------------------------------------------------------------

/// One row of the UI-facing list snapshot. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ObjectId,
    pub display_name: String,
}

impl ListItem {
    /// Build the row for a record, substituting an id-based label when the
    /// host reports no (or an empty) name.
    pub fn resolve<Hst: SceneHost>(host: &Hst, id: ObjectId, handle: Hst::Handle) -> ListItem {
        let display_name = host
            .display_name(handle)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Object {id}"));
        ListItem { id, display_name }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A registered object: its stable id plus the host handle it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord<H> {
    pub id: ObjectId,
    pub handle: H,
}

/// Insertion-ordered records with monotonic id allocation.
///
/// The store is a plain container: it never checks liveness on its own.
/// Whoever orchestrates an operation hands the host to [`ObjectStore::sweep`]
/// first if it needs the records current.
#[derive(Debug, Clone)]
pub struct ObjectStore<H> {
    records: Vec<ObjectRecord<H>>,
    next_id: u32,
}

impl<H: Copy + Eq + fmt::Debug> ObjectStore<H> {
    pub fn new() -> ObjectStore<H> {
        ObjectStore {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ObjectRecord<H>] {
        &self.records
    }

    /// Register `handle`, reusing the existing record when it is already
    /// present. Returns the id and whether a new record was appended.
    pub fn register(&mut self, handle: H) -> (ObjectId, bool) {
        if let Some(record) = self.records.iter().find(|r| r.handle == handle) {
            return (record.id, false);
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.records.push(ObjectRecord { id, handle });
        (id, true)
    }

    /// Remove the record for `handle`, returning its id if one existed.
    pub fn unregister(&mut self, handle: H) -> Option<ObjectId> {
        let index = self.records.iter().position(|r| r.handle == handle)?;
        Some(self.records.remove(index).id)
    }

    /// Remove the record with `id`, returning its handle if one existed.
    pub fn remove_by_id(&mut self, id: ObjectId) -> Option<H> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index).handle)
    }

    pub fn find_id(&self, handle: H) -> Option<ObjectId> {
        self.records.iter().find(|r| r.handle == handle).map(|r| r.id)
    }

    pub fn handle_of(&self, id: ObjectId) -> Option<H> {
        self.records.iter().find(|r| r.id == id).map(|r| r.handle)
    }

    /// Id at `index` in display order, if in range.
    pub fn id_at(&self, index: usize) -> Option<ObjectId> {
        self.records.get(index).map(|r| r.id)
    }

    pub fn first_id(&self) -> Option<ObjectId> {
        self.records.first().map(|r| r.id)
    }

    /// Drop every record whose handle the host reports dead. Returns how
    /// many were removed.
    pub fn sweep(&mut self, host: &impl SceneHost<Handle = H>) -> usize {
        let before = self.records.len();
        self.records.retain(|record| {
            let alive = host.is_alive(record.handle);
            if !alive {
                log::debug!("dropping dead record {} ({:?})", record.id, record.handle);
            }
            alive
        });
        before - self.records.len()
    }

    /// Snapshot of all records in display order.
    pub fn snapshot(&self, host: &impl SceneHost<Handle = H>) -> Vec<ListItem> {
        self.records
            .iter()
            .map(|record| ListItem::resolve(host, record.id, record.handle))
            .collect()
    }
}

impl<H: Copy + Eq + fmt::Debug> Default for ObjectStore<H> {
    fn default() -> ObjectStore<H> {
        ObjectStore::new()
    }
}
