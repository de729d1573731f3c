use bevy::prelude::*;

use crate::engine::assets::catalog::ProductKind;
use crate::engine::scene::scene_manager::ViewerCommand;

/// Keyboard binding for each viewer command.
pub fn shortcut_command(key: KeyCode) -> Option<ViewerCommand> {
    match key {
        KeyCode::Digit1 => Some(ViewerCommand::SelectProduct(ProductKind::NapkinSquare)),
        KeyCode::Digit2 => Some(ViewerCommand::SelectProduct(ProductKind::TableBaseRect)),
        KeyCode::Digit3 => Some(ViewerCommand::SelectProduct(ProductKind::TableclothRect)),
        KeyCode::KeyR => Some(ViewerCommand::ResetView),
        KeyCode::Space => Some(ViewerCommand::ToggleAutoRotate),
        KeyCode::KeyM => Some(ViewerCommand::ToggleMeasures),
        _ => None,
    }
}

/// System handling keyboard shortcuts for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_viewer_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    for key in keyboard.get_just_pressed() {
        if let Some(command) = shortcut_command(*key) {
            debug!("Shortcut {:?} -> {:?}", key, command);
            viewer_commands.write(command);
        }
    }
}

/// Placeholder system for WASM builds where the host page drives the viewer over RPC.
#[cfg(target_arch = "wasm32")]
pub fn handle_viewer_keyboard_shortcuts() {}
