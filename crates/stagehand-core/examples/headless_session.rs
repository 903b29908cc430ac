//! Headless registry session: a full object lifecycle without a renderer.
//!
//! Builds a mock scene, registers objects, then walks through selection,
//! repainting, rescaling, host-side death, deletion, and spawning while
//! printing every notification the way a UI would see it.
//!
//! Run with: `cargo run -p stagehand-core --example headless_session`

use stagehand_core::color::Rgba;
use stagehand_core::host::SceneHost;
use stagehand_core::id::ObjectId;
use stagehand_core::service::ObjectManager;
use stagehand_core::settings::{ObjectDefaults, SpawnKind};
use stagehand_core::test_utils::MockHost;

fn main() {
    let mut host = MockHost::new();
    let mut manager = ObjectManager::with_seed(ObjectDefaults::default(), 42);
    println!("Session defaults: {:?}", manager.defaults());

    // --- Step 1: Subscribe observers ---

    manager.on_list_changed(Box::new(|items| {
        let names: Vec<&str> = items
            .iter()
            .map(|item| item.display_name.as_str())
            .collect();
        println!("  [list]      {names:?}");
    }));
    manager.on_selection_changed(Box::new(|selected| match selected {
        Some(id) => println!("  [selection] object {id}"),
        None => println!("  [selection] none"),
    }));

    // --- Step 2: Populate the scene ---

    println!("Registering three scene objects...");
    let crate_a = host.add_named("CrateA");
    let crate_b = host.add_named("CrateB");
    let barrel = host.add_named("Barrel");
    manager.register_object(&host, crate_a);
    manager.register_object(&host, crate_b);
    manager.register_object(&host, barrel);

    // --- Step 3: Select and repaint ---

    println!("\nSelecting object 2 and repainting it...");
    manager.select_by_id(&host, ObjectId(2));
    manager.set_selected_color(&mut host, Rgba::BLUE);
    manager.set_selected_scale(&mut host, 1.5);
    println!(
        "  CrateB now carries {:?} at scale {}",
        host.color_of(crate_b).expect("CrateB is alive"),
        host.scale_of(crate_b).expect("CrateB is alive"),
    );

    // --- Step 4: An object dies behind the registry's back ---

    println!("\nKilling CrateB host-side; the next list pull sweeps it...");
    host.kill(crate_b);
    let list = manager.object_list(&host);
    println!("  live objects: {}", list.len());

    // --- Step 5: Delete the selected object ---

    println!("\nSelecting and deleting the Barrel...");
    manager.select_by_id(&host, ObjectId(3));
    manager.delete_selected(&mut host);
    println!("  Barrel alive host-side: {}", host.is_alive(barrel));

    // --- Step 6: Spawn new primitives ---

    println!("\nSpawning a cube and two random primitives...");
    let kinds = [
        Some(SpawnKind::Cube),
        Some(SpawnKind::Random),
        Some(SpawnKind::Random),
    ];
    for kind in kinds {
        if manager.spawn_object(&mut host, kind) {
            let handle = host.last_spawned().expect("spawn recorded");
            manager.register_object(&host, handle);
        }
    }

    // --- Step 7: Final state ---

    let final_list = manager.object_list(&host);
    println!("\nFinal registry:");
    for item in &final_list {
        println!("  {} -> {}", item.id, item.display_name);
    }
    match manager.selected_info(&host) {
        Some(item) => println!("Selected: {} ({})", item.display_name, item.id),
        None => println!("Selected: none"),
    }
}
