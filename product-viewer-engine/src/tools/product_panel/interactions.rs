use bevy::prelude::*;

use super::state::*;
use crate::engine::scene::scene_manager::{ProductScene, ViewerCommand, ViewerEvent};

// Product buttons switch the displayed product
pub fn product_button_interaction(
    q: Query<(&Interaction, &ProductButton), (Changed<Interaction>, With<Button>)>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    for (interaction, button) in &q {
        if *interaction == Interaction::Pressed {
            viewer_commands.write(ViewerCommand::SelectProduct(button.0));
        }
    }
}

// Reset, auto-rotate and measures buttons map straight onto viewer commands
pub fn control_button_interaction(
    reset: Query<&Interaction, (Changed<Interaction>, With<ResetViewButton>)>,
    rotate: Query<&Interaction, (Changed<Interaction>, With<AutoRotateButton>)>,
    measures: Query<&Interaction, (Changed<Interaction>, With<MeasuresButton>)>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    let pressed = |i: &Interaction| *i == Interaction::Pressed;
    if reset.iter().any(pressed) {
        viewer_commands.write(ViewerCommand::ResetView);
    }
    if rotate.iter().any(pressed) {
        viewer_commands.write(ViewerCommand::ToggleAutoRotate);
    }
    if measures.iter().any(pressed) {
        viewer_commands.write(ViewerCommand::ToggleMeasures);
    }
}

// Active product, auto-rotate and measures buttons stay highlighted while on
pub fn refresh_button_colours(
    scene: Res<ProductScene>,
    mut products: Query<(&Interaction, &ProductButton, &mut BackgroundColor)>,
    mut rotate: Query<
        (&Interaction, &mut BackgroundColor),
        (With<AutoRotateButton>, Without<ProductButton>, Without<MeasuresButton>),
    >,
    mut measures: Query<
        (&Interaction, &mut BackgroundColor),
        (With<MeasuresButton>, Without<ProductButton>, Without<AutoRotateButton>),
    >,
    mut plain: Query<
        (&Interaction, &mut BackgroundColor),
        (
            With<ResetViewButton>,
            Without<ProductButton>,
            Without<AutoRotateButton>,
            Without<MeasuresButton>,
        ),
    >,
) {
    let displayed = scene.displayed_kind();
    for (interaction, button, mut bg) in &mut products {
        *bg = BackgroundColor(button_colour(*interaction, displayed == Some(button.0)));
    }
    for (interaction, mut bg) in &mut rotate {
        *bg = BackgroundColor(button_colour(*interaction, scene.auto_rotate));
    }
    for (interaction, mut bg) in &mut measures {
        *bg = BackgroundColor(button_colour(*interaction, scene.measures_visible));
    }
    for (interaction, mut bg) in &mut plain {
        *bg = BackgroundColor(button_colour(*interaction, false));
    }
}

pub fn update_panel_texts(
    mut viewer_events: EventReader<ViewerEvent>,
    mut texts: Query<(&PanelText, &mut Text)>,
) {
    let Some(kind) = viewer_events
        .read()
        .filter_map(|event| match event {
            ViewerEvent::ProductChanged(kind) => Some(*kind),
            _ => None,
        })
        .last()
    else {
        return;
    };

    for (field, mut text) in &mut texts {
        text.0 = field.content(kind);
    }
}

pub fn sync_dimension_overlay(
    scene: Res<ProductScene>,
    mut overlays: Query<&mut Node, With<DimensionOverlay>>,
) {
    if !scene.is_changed() {
        return;
    }
    let display = if scene.measures_visible {
        Display::Flex
    } else {
        Display::None
    };
    for mut node in &mut overlays {
        if node.display != display {
            node.display = display;
        }
    }
}

pub fn hide_loading_overlay(
    time: Res<Time>,
    mut commands: Commands,
    timer: Option<ResMut<LoadingOverlayTimer>>,
    overlays: Query<Entity, With<LoadingOverlay>>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    for entity in &overlays {
        commands.entity(entity).try_despawn();
    }
    commands.remove_resource::<LoadingOverlayTimer>();
}
