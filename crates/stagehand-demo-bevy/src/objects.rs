use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use stagehand_core::color::Rgba;
use stagehand_core::host::{MIN_UNIFORM_SCALE, PrimitiveShape, SceneHost, SpawnRequest};

use crate::camera::FlyCamera;
use crate::state::{ManagerState, StageSet};

pub struct ObjectsPlugin;

impl Plugin for ObjectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnTally>()
            .add_systems(Startup, setup_scene)
            .add_systems(Update, sync_scene_objects.in_set(StageSet::Sync));
    }
}

/// Marker for scene objects the registry manages. Color lives in the
/// entity's material, scale in its transform, the name in `Name`.
#[derive(Component)]
pub struct InteractiveObject;

/// Shared unit meshes; per-object size comes from the transform scale.
#[derive(Resource)]
pub struct PrimitiveMeshes {
    pub cube: Handle<Mesh>,
    pub sphere: Handle<Mesh>,
}

/// Counts spawned primitives so scene names run `Cube01`, `Sphere02`, ...
#[derive(Resource, Default)]
pub struct SpawnTally {
    cubes: u32,
    spheres: u32,
}

impl SpawnTally {
    fn next_name(&mut self, shape: PrimitiveShape) -> String {
        match shape {
            PrimitiveShape::Cube => {
                self.cubes += 1;
                format!("Cube{:02}", self.cubes)
            }
            PrimitiveShape::Sphere => {
                self.spheres += 1;
                format!("Sphere{:02}", self.spheres)
            }
        }
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut tally: ResMut<SpawnTally>,
) {
    let primitives = PrimitiveMeshes {
        cube: meshes.add(Cuboid::from_length(1.0)),
        sphere: meshes.add(Sphere::new(0.5)),
    };

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(30.0, 30.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.18, 0.20, 0.22),
            perceptual_roughness: 0.95,
            ..default()
        })),
    ));

    // Key light
    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(6.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Two starter objects so the list is never empty on boot.
    spawn_interactive(
        &mut commands,
        &mut materials,
        &primitives,
        &mut tally,
        PrimitiveShape::Cube,
        Rgba::WHITE,
        1.0,
        Vec3::new(-1.5, 0.5, 0.0),
    );
    spawn_interactive(
        &mut commands,
        &mut materials,
        &primitives,
        &mut tally,
        PrimitiveShape::Sphere,
        Rgba::BLUE,
        1.0,
        Vec3::new(1.5, 0.5, 0.0),
    );

    commands.insert_resource(primitives);
}

/// Mirror entity lifecycle into the registry. Departures run first so a
/// despawned entity is never confused with a newcomer in the same frame.
fn sync_scene_objects(
    mut state: NonSendMut<ManagerState>,
    mut removed: RemovedComponents<InteractiveObject>,
    added: Query<Entity, Added<InteractiveObject>>,
    host: BevyHost,
) {
    for entity in removed.read() {
        state.manager.unregister_object(&host, entity);
    }
    for entity in &added {
        state.manager.register_object(&host, entity);
    }
}

fn spawn_interactive(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    primitives: &PrimitiveMeshes,
    tally: &mut SpawnTally,
    shape: PrimitiveShape,
    color: Rgba,
    scale: f32,
    position: Vec3,
) -> Entity {
    let mesh = match shape {
        PrimitiveShape::Cube => primitives.cube.clone(),
        PrimitiveShape::Sphere => primitives.sphere.clone(),
    };

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: to_bevy_color(color),
                ..default()
            })),
            Transform::from_translation(position)
                .with_scale(Vec3::splat(scale.max(MIN_UNIFORM_SCALE))),
            Name::new(tally.next_name(shape)),
            InteractiveObject,
        ))
        .id()
}

pub fn to_bevy_color(color: Rgba) -> Color {
    Color::linear_rgba(color.r, color.g, color.b, color.a)
}

// ---------------------------------------------------------------------------
// Host adapter
// ---------------------------------------------------------------------------

/// Engine side of the registry's capability boundary. Entities double as
/// handles: Bevy's generational ids match the liveness contract, and a
/// deferred despawn stays "alive" here until the command applies, which is
/// when the lifecycle sync reports it gone.
#[derive(SystemParam)]
pub struct BevyHost<'w, 's> {
    commands: Commands<'w, 's>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    primitives: Res<'w, PrimitiveMeshes>,
    tally: ResMut<'w, SpawnTally>,
    objects: Query<
        'w,
        's,
        (
            &'static mut Transform,
            &'static MeshMaterial3d<StandardMaterial>,
            Option<&'static Name>,
        ),
        With<InteractiveObject>,
    >,
    camera: Query<'w, 's, &'static Transform, (With<FlyCamera>, Without<InteractiveObject>)>,
}

impl SceneHost for BevyHost<'_, '_> {
    type Handle = Entity;

    fn is_alive(&self, handle: Entity) -> bool {
        self.objects.contains(handle)
    }

    fn display_name(&self, handle: Entity) -> Option<String> {
        let (_, _, name) = self.objects.get(handle).ok()?;
        name.map(|name| name.as_str().to_string())
    }

    fn apply_color(&mut self, handle: Entity, color: Rgba) {
        let Ok((_, material, _)) = self.objects.get(handle) else {
            return;
        };
        if let Some(material) = self.materials.get_mut(&material.0) {
            material.base_color = to_bevy_color(color);
        }
    }

    fn apply_scale(&mut self, handle: Entity, scale: f32) {
        if let Ok((mut transform, _, _)) = self.objects.get_mut(handle) {
            transform.scale = Vec3::splat(scale.max(MIN_UNIFORM_SCALE));
        }
    }

    fn request_destroy(&mut self, handle: Entity) {
        if let Some(entity) = self.commands.get_entity(handle) {
            entity.despawn_recursive();
        }
    }

    fn spawn_primitive(&mut self, request: &SpawnRequest) -> Option<Entity> {
        // Drop the new object in front of the camera, never below the floor.
        let drop_point = self.camera.get_single().map_or_else(
            |_| Vec3::new(0.0, 0.5, 0.0),
            |cam| cam.translation + cam.forward() * 4.0,
        );

        let entity = spawn_interactive(
            &mut self.commands,
            &mut self.materials,
            &self.primitives,
            &mut self.tally,
            request.shape,
            request.color,
            request.scale,
            Vec3::new(drop_point.x, drop_point.y.max(0.5), drop_point.z),
        );
        Some(entity)
    }
}
