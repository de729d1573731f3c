use bevy::prelude::*;
use constants::render_settings::{
    AMBIENT_BRIGHTNESS, BACK_LIGHT_ILLUMINANCE, BACK_LIGHT_POSITION, KEY_LIGHT_ILLUMINANCE,
    KEY_LIGHT_POSITION,
};

use crate::engine::scene::scene_manager::ViewerEntity;

/// Soft ambient fill, a shadow-casting key light and a dim back light.
pub fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: KEY_LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        ViewerEntity,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: BACK_LIGHT_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(BACK_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        ViewerEntity,
    ));
}
