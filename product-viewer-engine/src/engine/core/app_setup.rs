use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::{CAMERA_START_POSITION, CAMERA_TARGET};
// Crate engine modules
use crate::engine::camera::orbit_camera::{OrbitCamera, orbit_camera_controller};
use crate::engine::core::app_state::{
    ViewerState, initialize_viewer, request_dispose, teardown_viewer,
};
use crate::engine::core::settings::{
    SettingsLoader, ViewerSettings, apply_loaded_settings, start_settings_load,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::texture_provider::{
    TextureProvider, poll_texture_loads, start_texture_loads,
};
use crate::engine::scene::scene_manager::{
    ProductScene, ViewerCommand, ViewerEvent, handle_viewer_commands, handle_window_resize,
    setup_scene,
};
use crate::engine::systems::render_loop::auto_rotate_system;
// Crate tools modules
use crate::tools::measure::{
    MeasureClick, MeasureState, apply_measure_clicks, detect_canvas_clicks, expire_markers,
    sync_measure_readout,
};
use crate::tools::viewer_controller::handle_viewer_keyboard_shortcuts;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::tools::product_panel::ProductPanelPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    let settings = ViewerSettings::default();
    let mut orbit = OrbitCamera::new(CAMERA_START_POSITION, CAMERA_TARGET);
    settings.apply_to_orbit(&mut orbit);

    app.add_plugins(create_default_plugins())
        .init_state::<ViewerState>()
        // Registers ViewerSettings as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerSettings>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Native builds draw their own controls; on the web the host page does.
    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(ProductPanelPlugin);

    // Initialise resources early
    app.insert_resource(settings)
        .insert_resource(orbit)
        .init_resource::<SettingsLoader>()
        .init_resource::<ProductScene>()
        .init_resource::<MeasureState>()
        .init_resource::<TextureProvider>()
        .add_event::<ViewerCommand>()
        .add_event::<ViewerEvent>()
        .add_event::<MeasureClick>();

    // State-based system scheduling
    app.add_systems(Startup, start_settings_load)
        .add_systems(
            Update,
            (apply_loaded_settings, initialize_viewer)
                .chain()
                .run_if(in_state(ViewerState::Uninitialized)),
        )
        .add_systems(OnEnter(ViewerState::Running), setup_scene)
        .add_systems(OnEnter(ViewerState::Disposed), teardown_viewer);

    // Commands settle the scene before textures are requested and resolved.
    let scene_systems = (
        (handle_viewer_commands, start_texture_loads, poll_texture_loads).chain(),
        orbit_camera_controller,
        auto_rotate_system,
        handle_window_resize,
    );

    let measure_systems = (
        detect_canvas_clicks,
        apply_measure_clicks,
        expire_markers,
        sync_measure_readout,
    )
        .chain()
        .after(handle_viewer_commands);

    let host_systems = (
        handle_viewer_keyboard_shortcuts, // Native shortcuts or no-op for WASM
        request_dispose,
    );

    app.add_systems(Update, scene_systems.run_if(in_state(ViewerState::Running)))
        .add_systems(Update, measure_systems.run_if(in_state(ViewerState::Running)))
        .add_systems(Update, host_systems.run_if(in_state(ViewerState::Running)));

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: "wgpu=error,naga=warn".into(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
