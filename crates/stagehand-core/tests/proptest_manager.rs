//! Property-based tests for the object manager.
//!
//! Uses proptest to generate random operation sequences against a mock
//! scene, then verify registry, selection, and notification invariants
//! after every step.

use proptest::prelude::*;
use stagehand_core::color::Rgba;
use stagehand_core::host::MIN_UNIFORM_SCALE;
use stagehand_core::id::ObjectId;
use stagehand_core::service::ObjectManager;
use stagehand_core::settings::SpawnKind;
use stagehand_core::test_utils::*;

// ===========================================================================
// Generators
// ===========================================================================

/// One step a UI or scene could take against the manager.
#[derive(Debug, Clone)]
enum SessionOp {
    AddAndRegister,
    Kill(usize),
    Unregister(usize),
    SelectId(u32),
    SelectIndex(usize),
    ClearSelection,
    SetColor,
    SetScale(f32),
    DeleteSelected,
    Spawn(Option<SpawnKind>),
    PullList,
    Sweep,
}

fn arb_spawn_kind() -> impl Strategy<Value = Option<SpawnKind>> {
    prop_oneof![
        Just(None),
        Just(Some(SpawnKind::Cube)),
        Just(Some(SpawnKind::Sphere)),
        Just(Some(SpawnKind::Random)),
    ]
}

fn arb_scale() -> impl Strategy<Value = f32> {
    prop_oneof![
        any::<f32>(),
        Just(f32::NAN),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
    ]
}

fn arb_session_ops(max_ops: usize) -> impl Strategy<Value = Vec<SessionOp>> {
    proptest::collection::vec(
        prop_oneof![
            Just(SessionOp::AddAndRegister),
            (0..64usize).prop_map(SessionOp::Kill),
            (0..64usize).prop_map(SessionOp::Unregister),
            (0..80u32).prop_map(SessionOp::SelectId),
            (0..70usize).prop_map(SessionOp::SelectIndex),
            Just(SessionOp::ClearSelection),
            Just(SessionOp::SetColor),
            arb_scale().prop_map(SessionOp::SetScale),
            Just(SessionOp::DeleteSelected),
            arb_spawn_kind().prop_map(SessionOp::Spawn),
            Just(SessionOp::PullList),
            Just(SessionOp::Sweep),
        ],
        1..=max_ops,
    )
}

// ===========================================================================
// Op runner
// ===========================================================================

/// Accumulated session state. `scene` keeps every handle ever created, dead
/// or alive, so ops also hit dead and unknown handles.
struct Session {
    host: MockHost,
    manager: ObjectManager<MockHandle>,
    scene: Vec<MockHandle>,
    names: u32,
}

impl Session {
    fn new() -> Session {
        Session {
            host: MockHost::new(),
            manager: ObjectManager::default(),
            scene: Vec::new(),
            names: 0,
        }
    }

    fn apply(&mut self, op: &SessionOp) {
        match op {
            SessionOp::AddAndRegister => {
                self.names += 1;
                let handle = self.host.add_named(&format!("Obj{:02}", self.names));
                self.manager.register_object(&self.host, handle);
                self.scene.push(handle);
            }
            SessionOp::Kill(idx) => {
                if !self.scene.is_empty() {
                    let handle = self.scene[idx % self.scene.len()];
                    self.host.kill(handle);
                }
            }
            SessionOp::Unregister(idx) => {
                if !self.scene.is_empty() {
                    let handle = self.scene[idx % self.scene.len()];
                    self.manager.unregister_object(&self.host, handle);
                }
            }
            SessionOp::SelectId(raw) => {
                let _ = self.manager.select_by_id(&self.host, ObjectId(*raw));
            }
            SessionOp::SelectIndex(index) => {
                let _ = self.manager.select_by_index(&self.host, *index);
            }
            SessionOp::ClearSelection => {
                let _ = self.manager.clear_selection(&self.host);
            }
            SessionOp::SetColor => {
                let _ = self.manager.set_selected_color(&mut self.host, Rgba::GREEN);
            }
            SessionOp::SetScale(scale) => {
                let _ = self.manager.set_selected_scale(&mut self.host, *scale);
            }
            SessionOp::DeleteSelected => {
                let _ = self.manager.delete_selected(&mut self.host);
            }
            SessionOp::Spawn(kind) => {
                if self.manager.spawn_object(&mut self.host, *kind)
                    && let Some(handle) = self.host.last_spawned()
                {
                    self.manager.register_object(&self.host, handle);
                    self.scene.push(handle);
                }
            }
            SessionOp::PullList => {
                let _ = self.manager.object_list(&self.host);
            }
            SessionOp::Sweep => {
                let _ = self.manager.sweep_dead(&self.host);
            }
        }
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// After any operation sequence: list ids stay strictly increasing,
    /// ids never resurface once gone, the selection always points into the
    /// live list, and the last selection broadcast matches current state.
    #[test]
    fn session_invariants_hold_under_any_op_sequence(ops in arb_session_ops(60)) {
        let mut session = Session::new();
        let recorder = EventRecorder::new();
        recorder.attach(&mut session.manager);

        let mut max_id = 0u32;
        let mut prev_ids = std::collections::HashSet::new();

        for op in &ops {
            session.apply(op);

            // Reconciles, so the assertions below see settled state.
            let list = session.manager.object_list(&session.host);

            for pair in list.windows(2) {
                prop_assert!(
                    pair[0].id < pair[1].id,
                    "list ids out of order after {:?}: {:?}",
                    op,
                    list
                );
            }

            for entry in &list {
                prop_assert!(
                    prev_ids.contains(&entry.id.0) || entry.id.0 > max_id,
                    "id {} resurfaced after {:?}",
                    entry.id,
                    op
                );
            }
            if let Some(entry) = list.last() {
                max_id = max_id.max(entry.id.0);
            }
            prev_ids = list.iter().map(|entry| entry.id.0).collect();

            if let Some(selected) = session.manager.selected_id() {
                prop_assert!(
                    list.iter().any(|entry| entry.id == selected),
                    "selection {} not in list after {:?}",
                    selected,
                    op
                );
            }

            let selections = recorder.selections();
            match selections.last() {
                Some(last) => prop_assert_eq!(*last, session.manager.selected_id()),
                None => prop_assert_eq!(session.manager.selected_id(), None),
            }
        }

        // Every broadcast snapshot was ordered too.
        for snapshot in recorder.lists() {
            for pair in snapshot.windows(2) {
                prop_assert!(pair[0].id < pair[1].id, "broadcast out of order: {snapshot:?}");
            }
        }
    }

    /// Two sessions fed the identical op sequence end in identical state,
    /// including spawns routed through the random kind roll.
    #[test]
    fn identical_op_sequences_are_deterministic(ops in arb_session_ops(40)) {
        let run = |ops: &[SessionOp]| {
            let mut session = Session::new();
            for op in ops {
                session.apply(op);
            }
            let list = session.manager.object_list(&session.host);
            (list, session.manager.selected_id())
        };

        prop_assert_eq!(run(&ops), run(&ops));
    }

    /// Whatever scale reaches the host, the stored value never drops below
    /// the minimum and never ends up NaN.
    #[test]
    fn applied_scales_never_undershoot_the_minimum(scales in proptest::collection::vec(arb_scale(), 1..20)) {
        let mut host = MockHost::new();
        let mut manager: ObjectManager<MockHandle> = ObjectManager::default();
        let handle = host.add_named("Target");
        manager.register_object(&host, handle);

        for scale in scales {
            prop_assert!(manager.set_selected_scale(&mut host, scale));
            let stored = host.scale_of(handle).unwrap();
            prop_assert!(
                stored >= MIN_UNIFORM_SCALE,
                "stored scale {} undershoots the minimum (applied {})",
                stored,
                scale
            );
            prop_assert!(!stored.is_nan(), "stored scale is NaN (applied {})", scale);
        }
    }
}
