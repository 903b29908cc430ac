use bevy::prelude::*;
use stagehand_core::color::Rgba;
use stagehand_core::settings::SpawnKind;

use crate::objects::{BevyHost, to_bevy_color};
use crate::state::{
    CurrentObjects, CurrentSelection, ManagerState, ObjectListChanged, SelectionChanged, StageSet,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud).add_systems(
            Update,
            (
                (
                    handle_list_entry_buttons,
                    handle_palette_buttons,
                    handle_command_buttons,
                    button_feedback,
                )
                    .in_set(StageSet::Input),
                (rebuild_object_list, refresh_selected_panel).in_set(StageSet::Refresh),
            ),
        );
    }
}

const PANEL_BG: Color = Color::srgba(0.1, 0.1, 0.12, 0.85);
const BTN_BG: Color = Color::srgb(0.22, 0.22, 0.28);
const BTN_HOVER: Color = Color::srgb(0.3, 0.3, 0.38);
const BTN_PRESSED: Color = Color::srgb(0.16, 0.16, 0.2);
const BTN_SELECTED: Color = Color::srgb(0.25, 0.45, 0.3);
const DANGER_BG: Color = Color::srgb(0.3, 0.2, 0.2);
const TEXT_DIM: Color = Color::srgb(0.55, 0.55, 0.6);

const SWATCHES: [Rgba; 5] = [Rgba::WHITE, Rgba::RED, Rgba::GREEN, Rgba::BLUE, Rgba::YELLOW];
const SCALE_PRESETS: [f32; 3] = [0.5, 1.0, 2.0];

// -----------------------------------------------------------------------
// HUD layout
// -----------------------------------------------------------------------

#[derive(Component)]
struct ObjectListPanel;

#[derive(Component)]
struct ListEntryButton(stagehand_core::id::ObjectId);

#[derive(Component)]
struct SelectedReadout;

#[derive(Component)]
struct SwatchButton(Rgba);

#[derive(Component)]
struct ScaleButton(f32);

#[derive(Component)]
struct SpawnButton(Option<SpawnKind>);

#[derive(Component)]
struct DeleteButton;

#[derive(Component)]
struct DeselectButton;

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            PickingBehavior::IGNORE,
        ))
        .with_children(|root| {
            // Left: object list
            root.spawn((
                Node {
                    width: Val::Px(260.0),
                    height: Val::Percent(100.0),
                    position_type: PositionType::Absolute,
                    left: Val::Px(0.0),
                    top: Val::Px(0.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(10.0)),
                    row_gap: Val::Px(8.0),
                    ..default()
                },
                BackgroundColor(PANEL_BG),
                PickingBehavior::IGNORE,
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new("Objects"),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
                panel.spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(4.0),
                        ..default()
                    },
                    ObjectListPanel,
                ));
            });

            // Right: selection readout and edit controls
            root.spawn((
                Node {
                    width: Val::Px(280.0),
                    height: Val::Percent(100.0),
                    position_type: PositionType::Absolute,
                    right: Val::Px(0.0),
                    top: Val::Px(0.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(10.0)),
                    row_gap: Val::Px(8.0),
                    ..default()
                },
                BackgroundColor(PANEL_BG),
                PickingBehavior::IGNORE,
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new("Selected"),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
                panel.spawn((
                    Text::new("Nothing selected"),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(TEXT_DIM),
                    SelectedReadout,
                ));

                section_label(panel, "Color");
                panel
                    .spawn(Node {
                        flex_direction: FlexDirection::Row,
                        column_gap: Val::Px(6.0),
                        ..default()
                    })
                    .with_children(|row| {
                        for color in SWATCHES {
                            row.spawn((
                                Button,
                                Node {
                                    width: Val::Px(26.0),
                                    height: Val::Px(26.0),
                                    ..default()
                                },
                                BackgroundColor(to_bevy_color(color)),
                                SwatchButton(color),
                            ));
                        }
                    });

                section_label(panel, "Scale");
                panel
                    .spawn(Node {
                        flex_direction: FlexDirection::Row,
                        column_gap: Val::Px(6.0),
                        ..default()
                    })
                    .with_children(|row| {
                        for preset in SCALE_PRESETS {
                            text_button(row, &format!("{preset:.1}x"), BTN_BG, ScaleButton(preset));
                        }
                    });

                section_label(panel, "Spawn");
                panel
                    .spawn(Node {
                        flex_direction: FlexDirection::Row,
                        column_gap: Val::Px(6.0),
                        ..default()
                    })
                    .with_children(|row| {
                        text_button(row, "Cube", BTN_BG, SpawnButton(Some(SpawnKind::Cube)));
                        text_button(row, "Sphere", BTN_BG, SpawnButton(Some(SpawnKind::Sphere)));
                        text_button(row, "Default", BTN_BG, SpawnButton(None));
                    });

                panel
                    .spawn(Node {
                        flex_direction: FlexDirection::Row,
                        column_gap: Val::Px(6.0),
                        margin: UiRect::top(Val::Px(10.0)),
                        ..default()
                    })
                    .with_children(|row| {
                        text_button(row, "Delete", DANGER_BG, DeleteButton);
                        text_button(row, "Deselect", BTN_BG, DeselectButton);
                    });
            });
        });
}

fn section_label(parent: &mut ChildBuilder, label: &str) {
    parent.spawn((
        Text::new(label),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(TEXT_DIM),
        Node {
            margin: UiRect::top(Val::Px(6.0)),
            ..default()
        },
    ));
}

fn text_button(parent: &mut ChildBuilder, label: &str, background: Color, marker: impl Bundle) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(background),
            marker,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

// -----------------------------------------------------------------------
// Button handlers
// -----------------------------------------------------------------------

fn handle_list_entry_buttons(
    interactions: Query<(&Interaction, &ListEntryButton), Changed<Interaction>>,
    mut state: NonSendMut<ManagerState>,
    host: BevyHost,
) {
    for (interaction, entry) in &interactions {
        if *interaction == Interaction::Pressed {
            state.manager.select_by_id(&host, entry.0);
        }
    }
}

fn handle_palette_buttons(
    swatches: Query<(&Interaction, &SwatchButton), Changed<Interaction>>,
    scales: Query<(&Interaction, &ScaleButton), Changed<Interaction>>,
    mut state: NonSendMut<ManagerState>,
    mut host: BevyHost,
) {
    for (interaction, swatch) in &swatches {
        if *interaction == Interaction::Pressed {
            state.manager.set_selected_color(&mut host, swatch.0);
        }
    }
    for (interaction, preset) in &scales {
        if *interaction == Interaction::Pressed {
            state.manager.set_selected_scale(&mut host, preset.0);
        }
    }
}

fn handle_command_buttons(
    spawns: Query<(&Interaction, &SpawnButton), Changed<Interaction>>,
    deletes: Query<&Interaction, (Changed<Interaction>, With<DeleteButton>)>,
    deselects: Query<&Interaction, (Changed<Interaction>, With<DeselectButton>)>,
    mut state: NonSendMut<ManagerState>,
    mut host: BevyHost,
) {
    for (interaction, spawn) in &spawns {
        if *interaction == Interaction::Pressed {
            state.manager.spawn_object(&mut host, spawn.0);
        }
    }
    for interaction in &deletes {
        if *interaction == Interaction::Pressed {
            state.manager.delete_selected(&mut host);
        }
    }
    for interaction in &deselects {
        if *interaction == Interaction::Pressed {
            state.manager.clear_selection(&host);
        }
    }
}

fn button_feedback(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor),
        (
            Changed<Interaction>,
            With<Button>,
            Without<ListEntryButton>,
            Without<SwatchButton>,
        ),
    >,
) {
    for (interaction, mut background) in &mut buttons {
        background.0 = match interaction {
            Interaction::Pressed => BTN_PRESSED,
            Interaction::Hovered => BTN_HOVER,
            Interaction::None => BTN_BG,
        };
    }
}

// -----------------------------------------------------------------------
// Refresh from notifications
// -----------------------------------------------------------------------

fn rebuild_object_list(
    mut events: EventReader<ObjectListChanged>,
    objects: Res<CurrentObjects>,
    panel: Query<Entity, With<ObjectListPanel>>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let Ok(panel) = panel.get_single() else {
        return;
    };

    commands
        .entity(panel)
        .despawn_descendants()
        .with_children(|list| {
            for item in &objects.0 {
                list.spawn((
                    Button,
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(BTN_BG),
                    ListEntryButton(item.id),
                ))
                .with_children(|btn| {
                    btn.spawn((
                        Text::new(format!("{}  (id {})", item.display_name, item.id)),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
            }
        });
}

fn refresh_selected_panel(
    mut events: EventReader<SelectionChanged>,
    state: NonSend<ManagerState>,
    host: BevyHost,
    selection: Res<CurrentSelection>,
    mut readout: Query<&mut Text, With<SelectedReadout>>,
    mut entries: Query<(&ListEntryButton, &mut BackgroundColor, &Interaction)>,
) {
    if !events.is_empty() {
        events.clear();
        let info = state.manager.selected_info(&host);
        for mut text in &mut readout {
            **text = match &info {
                Some(item) => format!("{} (id {})", item.display_name, item.id),
                None => "Nothing selected".into(),
            };
        }
    }

    // List entries spawn deferred, so the frame after a rebuild has to
    // re-apply the selected background; run the highlight pass every frame.
    for (entry, mut background, interaction) in &mut entries {
        background.0 = if selection.0 == Some(entry.0) {
            BTN_SELECTED
        } else if *interaction == Interaction::Hovered {
            BTN_HOVER
        } else {
            BTN_BG
        };
    }
}
