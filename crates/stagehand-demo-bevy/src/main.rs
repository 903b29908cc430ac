mod camera;
mod objects;
mod state;
mod ui;

use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Stagehand".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.10, 0.11, 0.13)))
        .add_plugins((
            state::StatePlugin,
            objects::ObjectsPlugin,
            camera::CameraPlugin,
            ui::UiPlugin,
        ))
        .run();
}
