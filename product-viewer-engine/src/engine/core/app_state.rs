use bevy::prelude::*;

use crate::engine::core::settings::SettingsLoader;
use crate::engine::loading::texture_provider::TextureProvider;
use crate::engine::scene::scene_manager::{ProductScene, ViewerCommand, ViewerEntity, ViewerEvent};
use crate::tools::measure::MeasureState;

/// Viewer lifecycle. Per-frame systems only run while `Running`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewerState {
    #[default]
    Uninitialized,
    Running,
    Disposed,
}

/// Start the scene once the settings file has been applied or given up on,
/// so the first frame already uses the overrides.
pub fn initialize_viewer(
    loader: Res<SettingsLoader>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    if !loader.is_settled() {
        return;
    }
    info!("→ Viewer initialised, transitioning to Running state");
    next_state.set(ViewerState::Running);
}

pub fn request_dispose(
    mut viewer_commands: EventReader<ViewerCommand>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    if viewer_commands
        .read()
        .any(|command| *command == ViewerCommand::Dispose)
    {
        info!("→ Dispose requested, transitioning to Disposed state");
        next_state.set(ViewerState::Disposed);
    }
}

/// Remove every viewer entity, cancel marker timers and drop pending texture
/// loads. Nothing the viewer scheduled can fire afterwards.
pub fn teardown_viewer(
    mut commands: Commands,
    entities: Query<Entity, With<ViewerEntity>>,
    mut scene: ResMut<ProductScene>,
    mut measure: ResMut<MeasureState>,
    mut provider: ResMut<TextureProvider>,
    mut viewer_events: EventWriter<ViewerEvent>,
) {
    measure.clear(&mut commands);
    provider.cancel_all();
    scene.take_displayed();
    scene.auto_rotate = false;

    let mut count = 0;
    for entity in entities.iter() {
        commands.entity(entity).try_despawn();
        count += 1;
    }

    info!("Viewer disposed ({} entities removed)", count);
    viewer_events.write(ViewerEvent::Disposed);
}
