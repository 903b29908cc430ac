//! The orchestrating service tying the store, the selection tracker, and
//! the notifier together behind one entry point.
//!
//! Every mutating or selecting call follows the same discipline: reconcile
//! first (sweep dead records, drop a stale selection), then act, then
//! notify. Observers therefore always see post-mutation state.

use std::fmt;

use crate::color::Rgba;
use crate::host::{SceneHost, SpawnRequest};
use crate::id::ObjectId;
use crate::notify::{ChangeNotifier, ListObserver, ObserverId, SelectionObserver};
use crate::registry::{ListItem, ObjectStore};
use crate::rng::SpawnRng;
use crate::selection::SelectionTracker;
use crate::settings::{ObjectDefaults, SpawnKind};

/// Registry, selection, and notification state for one scene session.
///
/// `H` is the host's handle type (an entity id, a slotmap key). The manager
/// never inspects handles itself; liveness, naming, and visual mutation all
/// go through the [`SceneHost`] passed into each call.
#[derive(Debug)]
pub struct ObjectManager<H> {
    store: ObjectStore<H>,
    selection: SelectionTracker,
    notifier: ChangeNotifier,
    defaults: ObjectDefaults,
    rng: SpawnRng,
}

impl<H: Copy + Eq + fmt::Debug> Default for ObjectManager<H> {
    fn default() -> ObjectManager<H> {
        ObjectManager::new(ObjectDefaults::default())
    }
}

impl<H: Copy + Eq + fmt::Debug> ObjectManager<H> {
    /// Manager with the given spawn defaults and a fixed spawn seed.
    pub fn new(defaults: ObjectDefaults) -> ObjectManager<H> {
        ObjectManager::with_seed(defaults, 0)
    }

    /// Manager with an explicit seed for the spawn-kind roll. Invalid
    /// defaults are replaced field by field before use.
    pub fn with_seed(defaults: ObjectDefaults, seed: u64) -> ObjectManager<H> {
        ObjectManager {
            store: ObjectStore::new(),
            selection: SelectionTracker::new(),
            notifier: ChangeNotifier::new(),
            defaults: defaults.sanitized(),
            rng: SpawnRng::new(seed),
        }
    }

    pub fn defaults(&self) -> ObjectDefaults {
        self.defaults
    }

    /// Number of records currently held, dead or not. Call
    /// [`ObjectManager::sweep_dead`] first for a live count.
    pub fn object_count(&self) -> usize {
        self.store.len()
    }

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selection.selected()
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Subscribe to full-list snapshots. Delivered synchronously, in
    /// subscription order, after every list mutation.
    pub fn on_list_changed(&mut self, callback: ListObserver) -> ObserverId {
        self.notifier.on_list_changed(callback)
    }

    /// Subscribe to selection updates (`Some(id)` or `None`).
    pub fn on_selection_changed(&mut self, callback: SelectionObserver) -> ObserverId {
        self.notifier.on_selection_changed(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register `handle`, returning its id. Registering a handle that
    /// already has a record returns the existing id; ids are never reused
    /// within a session. If the registry was empty beforehand the new
    /// object is auto-selected.
    pub fn register_object(&mut self, host: &impl SceneHost<Handle = H>, handle: H) -> ObjectId {
        self.reconcile(host);

        let was_empty = self.store.is_empty();
        let (id, inserted) = self.store.register(handle);
        if inserted {
            log::debug!("registered object {id} for handle {handle:?}");
        } else {
            log::debug!("handle {handle:?} already registered as object {id}");
        }

        self.broadcast_list_changed(host);

        if was_empty && self.selection.select(id) {
            log::debug!("auto-selected first object {id}");
            self.notifier.notify_selection_changed(Some(id));
        }
        id
    }

    /// Remove the record for `handle`, if any. Clears (and announces) the
    /// selection when the removed object held it.
    pub fn unregister_object(&mut self, host: &impl SceneHost<Handle = H>, handle: H) {
        // The identity removal runs before the sweep so a handle the host
        // already reports dead still gets its list notification here
        // instead of being dropped silently.
        let Some(id) = self.store.unregister(handle) else {
            log::debug!("unregister ignored; handle {handle:?} not registered");
            self.reconcile(host);
            return;
        };

        let cleared = self.selection.selected() == Some(id) && self.selection.clear();
        self.reconcile(host);
        log::debug!("unregistered object {id}");

        self.broadcast_list_changed(host);
        if cleared {
            self.notifier.notify_selection_changed(None);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Ordered snapshot of the live registry.
    pub fn object_list(&mut self, host: &impl SceneHost<Handle = H>) -> Vec<ListItem> {
        self.reconcile(host);
        self.store.snapshot(host)
    }

    /// Id and display name of the selected object, or `None` when nothing
    /// is selected or the selected handle has died. Read-only: a stale
    /// selection is reported as `None` here and cleared by the next
    /// mutating call.
    pub fn selected_info(&self, host: &impl SceneHost<Handle = H>) -> Option<ListItem> {
        let id = self.selection.selected()?;
        let handle = self.store.handle_of(id)?;
        host.is_alive(handle)
            .then(|| ListItem::resolve(host, id, handle))
    }

    /// Drop every record whose handle the host no longer reports alive,
    /// returning how many were dropped. List observers are not told; the
    /// next snapshot reflects it. A selection made stale this way is
    /// cleared and announced.
    pub fn sweep_dead(&mut self, host: &impl SceneHost<Handle = H>) -> usize {
        self.reconcile(host)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Select by id. False when the id is unknown or dead, or when it is
    /// already the selection (no redundant notification either way).
    pub fn select_by_id(&mut self, host: &impl SceneHost<Handle = H>, id: ObjectId) -> bool {
        self.reconcile(host);

        if self.store.handle_of(id).is_none() {
            log::warn!("select failed; no live object with id {id}");
            return false;
        }
        if !self.selection.select(id) {
            return false;
        }

        log::debug!("selected object {id}");
        self.notifier.notify_selection_changed(Some(id));
        true
    }

    /// Select by position in the current snapshot order. The index is
    /// resolved to an id once; the selection does not follow the slot.
    pub fn select_by_index(&mut self, host: &impl SceneHost<Handle = H>, index: usize) -> bool {
        self.reconcile(host);

        let Some(id) = self.store.id_at(index) else {
            log::warn!("select failed; index {index} is out of range");
            return false;
        };
        self.select_by_id(host, id)
    }

    /// Clear the selection. False if nothing was selected.
    pub fn clear_selection(&mut self, host: &impl SceneHost<Handle = H>) -> bool {
        self.reconcile(host);

        if !self.selection.clear() {
            return false;
        }
        log::debug!("cleared selection");
        self.notifier.notify_selection_changed(None);
        true
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Apply `color` to the selected object via the host. False when
    /// nothing is selected. Visual properties are not list/selection
    /// state, so no notification fires.
    pub fn set_selected_color(
        &mut self,
        host: &mut impl SceneHost<Handle = H>,
        color: Rgba,
    ) -> bool {
        self.reconcile(&*host);

        let Some(id) = self.selection.selected() else {
            log::warn!("set color ignored; nothing selected");
            return false;
        };
        let Some(handle) = self.store.handle_of(id) else {
            return false;
        };

        host.apply_color(handle, color);
        log::debug!("applied color {color:?} to object {id}");
        true
    }

    /// Apply a uniform scale to the selected object via the host, which
    /// clamps it to a positive minimum. False when nothing is selected.
    pub fn set_selected_scale(
        &mut self,
        host: &mut impl SceneHost<Handle = H>,
        scale: f32,
    ) -> bool {
        self.reconcile(&*host);

        let Some(id) = self.selection.selected() else {
            log::warn!("set scale ignored; nothing selected");
            return false;
        };
        let Some(handle) = self.store.handle_of(id) else {
            return false;
        };

        host.apply_scale(handle, scale);
        log::debug!("applied scale {scale} to object {id}");
        true
    }

    /// Destroy the selected object. The record is dropped and the
    /// selection released before the host sees the destroy request, so the
    /// host's own removal path finds nothing left to do. If objects
    /// remain, the first takes over the selection. False when nothing is
    /// selected.
    pub fn delete_selected(&mut self, host: &mut impl SceneHost<Handle = H>) -> bool {
        self.reconcile(&*host);

        let Some(id) = self.selection.selected() else {
            log::warn!("delete ignored; nothing selected");
            return false;
        };
        let Some(handle) = self.store.handle_of(id) else {
            return false;
        };

        self.selection.clear();
        let _ = self.store.remove_by_id(id);
        host.request_destroy(handle);
        log::debug!("deleted object {id}");

        if let Some(next) = self.store.first_id()
            && self.selection.select(next)
        {
            log::debug!("auto-selected object {next} after delete");
        }

        self.broadcast_list_changed(&*host);
        self.notifier.notify_selection_changed(self.selection.selected());
        true
    }

    // -----------------------------------------------------------------------
    // Spawning
    // -----------------------------------------------------------------------

    /// Ask the host to spawn a primitive, using the configured defaults
    /// for any field not given. `Random` is resolved here with the
    /// manager's own roll. The spawned object is not registered by this
    /// call; it arrives through the host's normal lifecycle path. False
    /// when the host declines.
    pub fn spawn_object(
        &mut self,
        host: &mut impl SceneHost<Handle = H>,
        kind: Option<SpawnKind>,
    ) -> bool {
        let kind = kind.unwrap_or(self.defaults.spawn_kind);
        let shape = kind.resolve(&mut self.rng);
        let request = SpawnRequest {
            shape,
            color: self.defaults.color,
            scale: self.defaults.scale,
        };

        match host.spawn_primitive(&request) {
            Some(handle) => {
                log::debug!("spawn request for {shape:?} accepted as {handle:?}");
                true
            }
            None => {
                log::warn!("host declined spawn request for {shape:?}");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn reconcile(&mut self, host: &impl SceneHost<Handle = H>) -> usize {
        let removed = self.store.sweep(host);
        if let Some(id) = self.selection.selected()
            && self.store.handle_of(id).is_none()
        {
            self.selection.clear();
            log::debug!("selection {id} went stale; clearing");
            self.notifier.notify_selection_changed(None);
        }
        removed
    }

    fn broadcast_list_changed(&mut self, host: &impl SceneHost<Handle = H>) {
        let snapshot = self.store.snapshot(host);
        self.notifier.notify_list_changed(&snapshot);
    }
}
