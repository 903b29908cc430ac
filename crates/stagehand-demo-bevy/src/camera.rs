use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            Update,
            (toggle_navigation, camera_look, camera_move, quit_on_escape),
        );
    }
}

/// Free-flying camera. Look and move input only applies while the right
/// mouse button is held; otherwise the cursor is free for the HUD.
#[derive(Component)]
pub struct FlyCamera {
    pub speed: f32,
    pub sensitivity: f32,
    yaw: f32,
    pitch: f32,
}

fn setup_camera(mut commands: Commands) {
    let transform =
        Transform::from_xyz(-6.0, 4.5, 9.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y);
    let (yaw, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);

    commands.spawn((
        Camera3d::default(),
        transform,
        FlyCamera {
            speed: 7.0,
            sensitivity: 0.0025,
            yaw,
            pitch,
        },
    ));
}

fn toggle_navigation(
    mouse: Res<ButtonInput<MouseButton>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.get_single_mut() else {
        return;
    };

    if mouse.just_pressed(MouseButton::Right) {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
    if mouse.just_released(MouseButton::Right) {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

fn camera_look(
    mouse: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut camera: Query<(&mut Transform, &mut FlyCamera)>,
) {
    if !mouse.pressed(MouseButton::Right) {
        motion.clear();
        return;
    }
    let Ok((mut transform, mut fly)) = camera.get_single_mut() else {
        return;
    };

    for event in motion.read() {
        fly.yaw -= event.delta.x * fly.sensitivity;
        fly.pitch -= event.delta.y * fly.sensitivity;
    }
    // Stop short of straight up/down so the forward vector stays usable.
    fly.pitch = fly.pitch.clamp(-1.54, 1.54);
    transform.rotation = Quat::from_euler(EulerRot::YXZ, fly.yaw, fly.pitch, 0.0);
}

fn camera_move(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut camera: Query<(&mut Transform, &FlyCamera)>,
) {
    if !mouse.pressed(MouseButton::Right) {
        return;
    }
    let Ok((mut transform, fly)) = camera.get_single_mut() else {
        return;
    };

    let mut direction = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        direction += *transform.forward();
    }
    if keys.pressed(KeyCode::KeyS) {
        direction -= *transform.forward();
    }
    if keys.pressed(KeyCode::KeyD) {
        direction += *transform.right();
    }
    if keys.pressed(KeyCode::KeyA) {
        direction -= *transform.right();
    }
    if keys.pressed(KeyCode::KeyE) {
        direction += Vec3::Y;
    }
    if keys.pressed(KeyCode::KeyQ) {
        direction -= Vec3::Y;
    }

    if direction != Vec3::ZERO {
        transform.translation += direction.normalize() * fly.speed * time.delta_secs();
    }
}

fn quit_on_escape(keys: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
}
