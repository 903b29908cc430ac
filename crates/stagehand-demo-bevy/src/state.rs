use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use stagehand_core::id::ObjectId;
use stagehand_core::registry::ListItem;
use stagehand_core::service::ObjectManager;
use stagehand_core::settings::ObjectDefaults;
use stagehand_settings::SettingsStore;

pub struct StatePlugin;

/// Frame order: lifecycle sync feeds the registry, input mutates it, pending
/// notifications pump into ECS events, the UI refreshes from those.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageSet {
    Sync,
    Input,
    Pump,
    Refresh,
}

impl Plugin for StatePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                StageSet::Sync,
                StageSet::Input,
                StageSet::Pump,
                StageSet::Refresh,
            )
                .chain(),
        )
        .add_event::<ObjectListChanged>()
        .add_event::<SelectionChanged>()
        .init_resource::<CurrentObjects>()
        .init_resource::<CurrentSelection>()
        .add_systems(Startup, init_manager_state)
        .add_systems(Update, pump_notifications.in_set(StageSet::Pump));
    }
}

/// The object list changed; the fresh snapshot is in [`CurrentObjects`].
#[derive(Event)]
pub struct ObjectListChanged;

/// The selection moved; the new id is in [`CurrentSelection`].
#[derive(Event)]
pub struct SelectionChanged;

/// Latest list snapshot, mirrored out of the manager for UI queries.
#[derive(Resource, Default)]
pub struct CurrentObjects(pub Vec<ListItem>);

/// Latest selection, mirrored out of the manager for UI queries.
#[derive(Resource, Default)]
pub struct CurrentSelection(pub Option<ObjectId>);

/// Buffer the manager's observers write into; drained once per frame.
#[derive(Default)]
struct NotificationFeed {
    lists: Vec<Vec<ListItem>>,
    selections: Vec<Option<ObjectId>>,
}

/// Registry state wrapping the ObjectManager.
/// The observer callbacks capture an `Rc` feed and are not `Send + Sync`,
/// so we use `NonSend` / `NonSendMut` to access this resource.
pub struct ManagerState {
    pub manager: ObjectManager<Entity>,
    feed: Rc<RefCell<NotificationFeed>>,
}

fn init_manager_state(world: &mut World) {
    let settings_path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/stagehand.toml"));

    let store = SettingsStore::new(ObjectDefaults::default());
    if let Err(err) = store.load(settings_path) {
        warn!("settings load failed ({err}); continuing with defaults");
    }

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0);

    let mut manager = ObjectManager::with_seed(store.snapshot(), seed);

    let feed = Rc::new(RefCell::new(NotificationFeed::default()));

    let list_feed = Rc::clone(&feed);
    manager.on_list_changed(Box::new(move |items: &[ListItem]| {
        list_feed.borrow_mut().lists.push(items.to_vec());
    }));
    let selection_feed = Rc::clone(&feed);
    manager.on_selection_changed(Box::new(move |id: Option<ObjectId>| {
        selection_feed.borrow_mut().selections.push(id);
    }));

    world.insert_non_send_resource(ManagerState { manager, feed });
}

/// Collapse the frame's notifications into one resource update per channel.
/// Observers fired synchronously during the Sync/Input systems; only the
/// final state of each channel matters to the UI.
fn pump_notifications(
    state: NonSend<ManagerState>,
    mut objects: ResMut<CurrentObjects>,
    mut selection: ResMut<CurrentSelection>,
    mut list_events: EventWriter<ObjectListChanged>,
    mut selection_events: EventWriter<SelectionChanged>,
) {
    let mut feed = state.feed.borrow_mut();

    if let Some(list) = feed.lists.drain(..).last() {
        objects.0 = list;
        list_events.send(ObjectListChanged);
    }
    if let Some(id) = feed.selections.drain(..).last() {
        selection.0 = id;
        selection_events.send(SelectionChanged);
    }
}
