use bevy::prelude::*;
use bevy::ui::BackgroundColor;

use crate::game::Game;

#[derive(Component)]
pub struct PauseOverlay;

#[derive(Component)]
pub struct ModeLabel;

pub fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        // Fullscreen transparent overlay node
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(8.0),
            ..default()
        },
        BackgroundColor(Color::linear_rgba(0.0, 0.0, 0.0, 0.7)),
        PauseOverlay,
    ))
    .with_children(|parent| {
        parent.spawn((
            Text::new("Paused"),
            TextFont {
                font_size: 64.0,
                ..default()
            },
            TextLayout::new_with_justify(JustifyText::Center),
            TextColor(Color::WHITE),
        ));
        parent.spawn((
            Text::new("press P to resume"),
            TextFont {
                font_size: 20.0,
                ..default()
            },
            TextColor(Color::srgb(0.8, 0.8, 0.8)),
        ));
    });
}

pub fn despawn_pause_overlay(
    mut commands: Commands,
    query: Query<Entity, With<PauseOverlay>>,
) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// Corner hint: active selection mode and selected unit count.
pub fn spawn_mode_label(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(12.0),
            ..default()
        },
        ModeLabel,
    ));
}

pub fn update_mode_label(
    game: Res<Game>,
    mut query: Query<&mut Text, With<ModeLabel>>,
) {
    let Ok(mut text) = query.single_mut() else { return; };
    let label = format!(
        "{} select (Tab) | {} selected",
        game.selection_mode().label(),
        game.units().selected_count()
    );
    if text.0 != label {
        text.0 = label;
    }
}
