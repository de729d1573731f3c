//! Native control panel around the viewer.
//!
//! Product selector with active highlighting, product information, the
//! reset/auto-rotate/measures controls, the dimension overlay and the
//! loading cover shown while the scene comes up.

/// Button and overlay systems that forward to `ViewerCommand` and mirror viewer state.
pub mod interactions;

/// Panel resources, marker components and button colours.
pub mod state;

/// Panel spawning.
pub mod ui;

use bevy::prelude::*;

use crate::engine::core::app_state::ViewerState;
use interactions::*;
use ui::spawn_product_panel;

pub struct ProductPanelPlugin;

impl Plugin for ProductPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(ViewerState::Running), spawn_product_panel)
            .add_systems(
                Update,
                (
                    product_button_interaction,
                    control_button_interaction,
                    refresh_button_colours,
                    update_panel_texts,
                    sync_dimension_overlay,
                    hide_loading_overlay,
                )
                    .run_if(in_state(ViewerState::Running)),
            );
    }
}
