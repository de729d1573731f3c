use bevy::prelude::*;
use constants::render_settings::{
    AUTO_ROTATE_STEP, LOADING_OVERLAY_SECS, MARKER_LIFETIME_SECS, ORBIT_DAMPING,
    ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_ROTATE_SPEED, ORBIT_ZOOM_SPEED,
};
use constants::texture::{SETTINGS_PATH, TEXTURE_BASE_PATH};
use serde::{Deserialize, Serialize};

use crate::engine::camera::orbit_camera::OrbitCamera;

/// Runtime-tunable viewer behaviour. Defaults come from the `constants`
/// crate; `viewer_settings.json` in the asset folder may override any field.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub texture_base_path: String,
    pub auto_rotate_on_start: bool,
    pub auto_rotate_step: f32,
    pub marker_lifetime_secs: f32,
    pub loading_overlay_secs: f32,
    pub orbit_damping: f32,
    pub orbit_rotate_speed: f32,
    pub orbit_zoom_speed: f32,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            texture_base_path: TEXTURE_BASE_PATH.to_string(),
            auto_rotate_on_start: true,
            auto_rotate_step: AUTO_ROTATE_STEP,
            marker_lifetime_secs: MARKER_LIFETIME_SECS,
            loading_overlay_secs: LOADING_OVERLAY_SECS,
            orbit_damping: ORBIT_DAMPING,
            orbit_rotate_speed: ORBIT_ROTATE_SPEED,
            orbit_zoom_speed: ORBIT_ZOOM_SPEED,
            orbit_min_distance: ORBIT_MIN_DISTANCE,
            orbit_max_distance: ORBIT_MAX_DISTANCE,
        }
    }
}

impl ViewerSettings {
    /// Clamp values a hand-edited file could break.
    pub fn sanitised(mut self) -> Self {
        self.orbit_damping = self.orbit_damping.clamp(0.0, 1.0);
        self.orbit_min_distance = self.orbit_min_distance.max(0.1);
        self.orbit_max_distance = self.orbit_max_distance.max(self.orbit_min_distance);
        self.marker_lifetime_secs = self.marker_lifetime_secs.max(0.0);
        self.loading_overlay_secs = self.loading_overlay_secs.max(0.0);
        self
    }

    pub fn apply_to_orbit(&self, orbit: &mut OrbitCamera) {
        orbit.damping = self.orbit_damping;
        orbit.rotate_speed = self.orbit_rotate_speed;
        orbit.zoom_speed = self.orbit_zoom_speed;
        orbit.min_distance = self.orbit_min_distance;
        orbit.max_distance = self.orbit_max_distance;
        orbit.distance = orbit.distance.clamp(orbit.min_distance, orbit.max_distance);
    }
}

#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<ViewerSettings>>,
    settled: bool,
}

impl SettingsLoader {
    pub fn watching(handle: Handle<ViewerSettings>) -> Self {
        Self {
            handle: Some(handle),
            settled: false,
        }
    }

    /// The file was applied, or is known to be unusable.
    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

pub fn start_settings_load(mut loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    *loader = SettingsLoader::watching(asset_server.load(SETTINGS_PATH));
}

/// Swap in the file's settings once it arrives; a missing or malformed file
/// leaves the defaults in place.
pub fn apply_loaded_settings(
    mut loader: ResMut<SettingsLoader>,
    asset_server: Res<AssetServer>,
    loaded: Res<Assets<ViewerSettings>>,
    mut settings: ResMut<ViewerSettings>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if loader.settled {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };

    if let Some(file_settings) = loaded.get(&handle) {
        let file_settings = file_settings.clone().sanitised();
        file_settings.apply_to_orbit(&mut orbit);
        info!("✓ Viewer settings loaded from {}", SETTINGS_PATH);
        *settings = file_settings;
        loader.settled = true;
    } else if matches!(
        asset_server.get_load_state(&handle),
        Some(bevy::asset::LoadState::Failed(_))
    ) {
        info!("No usable {}, using built-in defaults", SETTINGS_PATH);
        loader.settled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let parsed: ViewerSettings =
            serde_json::from_str(r#"{ "texture_base_path": "assets/img", "auto_rotate_on_start": false }"#)
                .unwrap();
        assert_eq!(parsed.texture_base_path, "assets/img");
        assert!(!parsed.auto_rotate_on_start);
        assert_eq!(parsed.auto_rotate_step, AUTO_ROTATE_STEP);
        assert_eq!(parsed.marker_lifetime_secs, MARKER_LIFETIME_SECS);
    }

    #[test]
    fn sanitising_orders_distances() {
        let settings = ViewerSettings {
            orbit_min_distance: 9.0,
            orbit_max_distance: 2.0,
            orbit_damping: 4.0,
            ..default()
        }
        .sanitised();
        assert_eq!(settings.orbit_max_distance, 9.0);
        assert_eq!(settings.orbit_damping, 1.0);
    }
}
