use bevy::prelude::*;
use bevy::window::PresentMode;

use crate::engine::core::error::ViewerError;

#[cfg(target_arch = "wasm32")]
use constants::render_settings::{VIEWER_CANVAS_SELECTOR, VIEWER_CONTAINER_ID};

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some(VIEWER_CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Oficina da Fampa - Visualizador 3D".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

/// The host page must provide the container and its canvas before the app
/// starts; without them there is nothing to render into.
#[cfg(target_arch = "wasm32")]
pub fn locate_viewer_canvas() -> Result<(), ViewerError> {
    let missing = || ViewerError::ContainerMissing(VIEWER_CONTAINER_ID.to_string());
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(missing)?;

    document
        .get_element_by_id(VIEWER_CONTAINER_ID)
        .ok_or_else(missing)?;

    match document.query_selector(VIEWER_CANVAS_SELECTOR) {
        Ok(Some(_)) => Ok(()),
        _ => Err(missing()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn locate_viewer_canvas() -> Result<(), ViewerError> {
    Ok(())
}
