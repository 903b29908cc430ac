//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::color::Rgba;
use crate::host::{MIN_UNIFORM_SCALE, PrimitiveShape, SceneHost, SpawnRequest};
use crate::id::ObjectId;
use crate::notify::ObserverId;
use crate::registry::ListItem;
use crate::service::ObjectManager;

// ===========================================================================
// Mock scene host
// ===========================================================================

slotmap::new_key_type! {
    /// Generational handle for mock scene objects. A killed object's handle
    /// never resolves again, even if the slot is reused.
    pub struct MockHandle;
}

/// Visual state the mock host tracks per object.
#[derive(Debug, Clone)]
pub struct MockObject {
    pub name: Option<String>,
    pub color: Rgba,
    pub scale: f32,
    pub shape: Option<PrimitiveShape>,
}

/// In-memory [`SceneHost`] standing in for a real scene.
#[derive(Debug, Default)]
pub struct MockHost {
    objects: SlotMap<MockHandle, MockObject>,
    pub destroy_requests: Vec<MockHandle>,
    pub spawned: Vec<MockHandle>,
    pub decline_spawns: bool,
    cube_count: u32,
    sphere_count: u32,
}

impl MockHost {
    pub fn new() -> MockHost {
        MockHost::default()
    }

    /// Add a live named object. Does not register it with any manager.
    pub fn add_named(&mut self, name: &str) -> MockHandle {
        self.objects.insert(MockObject {
            name: Some(name.to_string()),
            color: Rgba::WHITE,
            scale: 1.0,
            shape: None,
        })
    }

    /// Add a live object that reports no display name.
    pub fn add_anonymous(&mut self) -> MockHandle {
        self.objects.insert(MockObject {
            name: None,
            color: Rgba::WHITE,
            scale: 1.0,
            shape: None,
        })
    }

    /// Kill an object host-side without telling anyone.
    pub fn kill(&mut self, handle: MockHandle) {
        self.objects.remove(handle);
    }

    pub fn live_count(&self) -> usize {
        self.objects.len()
    }

    pub fn handles(&self) -> Vec<MockHandle> {
        self.objects.keys().collect()
    }

    pub fn color_of(&self, handle: MockHandle) -> Option<Rgba> {
        self.objects.get(handle).map(|object| object.color)
    }

    pub fn scale_of(&self, handle: MockHandle) -> Option<f32> {
        self.objects.get(handle).map(|object| object.scale)
    }

    pub fn shape_of(&self, handle: MockHandle) -> Option<PrimitiveShape> {
        self.objects.get(handle).and_then(|object| object.shape)
    }

    pub fn last_spawned(&self) -> Option<MockHandle> {
        self.spawned.last().copied()
    }
}

impl SceneHost for MockHost {
    type Handle = MockHandle;

    fn is_alive(&self, handle: MockHandle) -> bool {
        self.objects.contains_key(handle)
    }

    fn display_name(&self, handle: MockHandle) -> Option<String> {
        self.objects.get(handle).and_then(|object| object.name.clone())
    }

    fn apply_color(&mut self, handle: MockHandle, color: Rgba) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.color = color;
        }
    }

    fn apply_scale(&mut self, handle: MockHandle, scale: f32) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.scale = scale.max(MIN_UNIFORM_SCALE);
        }
    }

    fn request_destroy(&mut self, handle: MockHandle) {
        self.destroy_requests.push(handle);
        self.objects.remove(handle);
    }

    fn spawn_primitive(&mut self, request: &SpawnRequest) -> Option<MockHandle> {
        if self.decline_spawns {
            return None;
        }
        let name = match request.shape {
            PrimitiveShape::Cube => {
                self.cube_count += 1;
                format!("Cube{:02}", self.cube_count)
            }
            PrimitiveShape::Sphere => {
                self.sphere_count += 1;
                format!("Sphere{:02}", self.sphere_count)
            }
        };
        let handle = self.objects.insert(MockObject {
            name: Some(name),
            color: request.color,
            scale: request.scale.max(MIN_UNIFORM_SCALE),
            shape: Some(request.shape),
        });
        self.spawned.push(handle);
        Some(handle)
    }
}

// ===========================================================================
// Event recorder
// ===========================================================================

/// One observed notification, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    List(Vec<ListItem>),
    Selection(Option<ObjectId>),
}

/// Captures both notification channels into one ordered log. Clones share
/// the log, so a recorder can be moved into closures and read afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    inner: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl EventRecorder {
    pub fn new() -> EventRecorder {
        EventRecorder::default()
    }

    /// Subscribe this recorder to both channels of `manager`.
    pub fn attach<H: Copy + Eq + fmt::Debug>(
        &self,
        manager: &mut ObjectManager<H>,
    ) -> (ObserverId, ObserverId) {
        let sink = Rc::clone(&self.inner);
        let list_id = manager.on_list_changed(Box::new(move |items| {
            sink.borrow_mut().push(RecordedEvent::List(items.to_vec()));
        }));
        let sink = Rc::clone(&self.inner);
        let selection_id = manager.on_selection_changed(Box::new(move |selected| {
            sink.borrow_mut().push(RecordedEvent::Selection(selected));
        }));
        (list_id, selection_id)
    }

    /// All events so far, oldest first.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.inner.borrow().clone()
    }

    /// Drain the log, returning everything recorded so far.
    pub fn take(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }

    /// Only the list snapshots, in order.
    pub fn lists(&self) -> Vec<Vec<ListItem>> {
        self.inner
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RecordedEvent::List(items) => Some(items.clone()),
                RecordedEvent::Selection(_) => None,
            })
            .collect()
    }

    /// Only the selection payloads, in order.
    pub fn selections(&self) -> Vec<Option<ObjectId>> {
        self.inner
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RecordedEvent::Selection(selected) => Some(*selected),
                RecordedEvent::List(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

// ===========================================================================
// List item constructor
// ===========================================================================

pub fn item(id: u32, name: &str) -> ListItem {
    ListItem {
        id: ObjectId(id),
        display_name: name.to_string(),
    }
}

// ===========================================================================
// Session builders (for benchmarks and stress tests)
// ===========================================================================

/// Host plus manager preloaded with `count` registered named objects.
pub fn build_session(count: usize) -> (MockHost, ObjectManager<MockHandle>) {
    let mut host = MockHost::new();
    let mut manager = ObjectManager::default();
    for index in 0..count {
        let handle = host.add_named(&format!("Object{index:03}"));
        manager.register_object(&host, handle);
    }
    (host, manager)
}
