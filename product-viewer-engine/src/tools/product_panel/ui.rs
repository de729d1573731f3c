use bevy::prelude::*;

use super::state::*;
use crate::engine::assets::catalog::ProductKind;
use crate::engine::core::settings::ViewerSettings;
use crate::engine::scene::scene_manager::ViewerEntity;

// Spawns the product selector panel, the dimension overlay and the loading cover
pub fn spawn_product_panel(mut commands: Commands, settings: Res<ViewerSettings>) {
    commands
        .spawn((
            ProductPanelRoot,
            Interaction::default(),
            Name::new("ProductPanel"),
            ViewerEntity,
            BackgroundColor(Color::srgba(0.10, 0.11, 0.13, 0.92)),
            Node {
                width: Val::Px(260.0),
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
        ))
        .with_children(|panel| {
            for kind in ProductKind::ALL {
                spawn_button(panel, product_label(kind), ProductButton(kind));
            }

            spawn_panel_text(panel, PanelText::Name, 20.0);
            spawn_panel_text(panel, PanelText::Summary, 14.0);
            spawn_panel_text(panel, PanelText::Description, 13.0);

            spawn_button(panel, "Resetar Vista", ResetViewButton);
            spawn_button(panel, "Rotação Automática", AutoRotateButton);
            spawn_button(panel, "Medidas", MeasuresButton);
        });

    commands
        .spawn((
            DimensionOverlay,
            Interaction::default(),
            Name::new("DimensionOverlay"),
            ViewerEntity,
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(12.0),
                bottom: Val::Px(12.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
        ))
        .with_children(|overlay| {
            for field in [
                PanelText::Width,
                PanelText::Height,
                PanelText::Shape,
                PanelText::Places,
            ] {
                overlay.spawn((
                    field,
                    Text::new(""),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.17, 0.35, 0.63)),
                ));
            }
        });

    commands
        .spawn((
            LoadingOverlay,
            Interaction::default(),
            Name::new("LoadingOverlay"),
            ViewerEntity,
            BackgroundColor(Color::srgb(0.97, 0.98, 0.98)),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|cover| {
            cover.spawn((
                Text::new("Carregando visualizador 3D..."),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.3, 0.3, 0.3)),
            ));
        });

    commands.insert_resource(LoadingOverlayTimer(Timer::from_seconds(
        settings.loading_overlay_secs,
        TimerMode::Once,
    )));
}

fn spawn_button(parent: &mut ChildSpawnerCommands, label: &str, marker: impl Component) {
    parent
        .spawn((
            marker,
            Button,
            BackgroundColor(BUTTON_IDLE),
            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
            Node {
                height: Val::Px(32.0),
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn spawn_panel_text(parent: &mut ChildSpawnerCommands, field: PanelText, font_size: f32) {
    parent.spawn((
        field,
        Text::new(""),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn panel_and_overlays_catch_the_pointer() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewerSettings>();
        app.world_mut().run_system_once(spawn_product_panel).unwrap();

        let world = app.world_mut();
        let blocking = world
            .query_filtered::<(), (
                With<Interaction>,
                Or<(With<ProductPanelRoot>, With<DimensionOverlay>, With<LoadingOverlay>)>,
            )>()
            .iter(world)
            .count();
        assert_eq!(blocking, 3);

        let buttons = world
            .query_filtered::<(), (With<Button>, With<Interaction>)>()
            .iter(world)
            .count();
        assert_eq!(buttons, ProductKind::ALL.len() + 3);
        assert!(world.contains_resource::<LoadingOverlayTimer>());
    }
}
