use bevy::prelude::*;
use bevy::window::WindowResized;
use constants::render_settings::{BACKGROUND_RGB, CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};
use constants::texture::PLACEHOLDER_REPEAT;

use crate::engine::assets::catalog::{ProductKind, lookup};
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::core::settings::ViewerSettings;
use crate::engine::loading::texture_provider::{TextureProvider, TextureToken, placeholder_image};
use crate::engine::mesh::product_mesh::{
    build_product_material, build_product_mesh, product_base_rotation,
};
use crate::engine::scene::grid::spawn_ground_grid;
use crate::engine::scene::lighting::spawn_lighting;
use crate::tools::measure::MeasureState;

/// Everything spawned by the viewer. Dispose removes all of it.
#[derive(Component, Default)]
pub struct ViewerEntity;

/// The product surface. At most one exists at a time.
#[derive(Component, Debug, Clone, Copy)]
pub struct ProductModel {
    pub kind: ProductKind,
}

/// The product currently on screen.
#[derive(Debug, Clone)]
pub struct DisplayedProduct {
    pub kind: ProductKind,
    pub entity: Entity,
    pub material: Handle<StandardMaterial>,
    pub generation: u64,
}

impl DisplayedProduct {
    pub fn token(&self) -> TextureToken {
        TextureToken {
            kind: self.kind,
            generation: self.generation,
        }
    }
}

#[derive(Resource, Debug)]
pub struct ProductScene {
    displayed: Option<DisplayedProduct>,
    generation: u64,
    pub auto_rotate: bool,
    pub measures_visible: bool,
}

impl Default for ProductScene {
    fn default() -> Self {
        Self {
            displayed: None,
            generation: 0,
            auto_rotate: true,
            measures_visible: true,
        }
    }
}

impl ProductScene {
    pub fn displayed(&self) -> Option<&DisplayedProduct> {
        self.displayed.as_ref()
    }

    pub fn displayed_kind(&self) -> Option<ProductKind> {
        self.displayed.as_ref().map(|d| d.kind)
    }

    /// Replace the tracked product, returning the one it supersedes.
    pub fn set_displayed(&mut self, displayed: DisplayedProduct) -> Option<DisplayedProduct> {
        self.generation = self.generation.max(displayed.generation);
        self.displayed.replace(displayed)
    }

    pub fn take_displayed(&mut self) -> Option<DisplayedProduct> {
        self.displayed.take()
    }

    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

/// Requests accepted by the viewer, from the UI panel, keyboard or RPC.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    SelectProduct(ProductKind),
    ResetView,
    SetAutoRotate(bool),
    ToggleAutoRotate,
    ToggleMeasures,
    Dispose,
}

/// State changes the surrounding UI and host page react to.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    ProductChanged(ProductKind),
    AutoRotateChanged(bool),
    MeasuresVisibilityChanged(bool),
    MeasurePlaced {
        kind: ProductKind,
        x_cm: u32,
        y_cm: u32,
        text: String,
    },
    MeasureCleared,
    Disposed,
}

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<ViewerSettings>,
    orbit: Res<OrbitCamera>,
    mut scene: ResMut<ProductScene>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    info!("=== PRODUCT VIEWER ===");

    commands.insert_resource(ClearColor(Color::srgb_u8(
        BACKGROUND_RGB[0],
        BACKGROUND_RGB[1],
        BACKGROUND_RGB[2],
    )));

    spawn_camera(&mut commands, &orbit);
    spawn_lighting(&mut commands);
    spawn_ground_grid(&mut commands, &mut meshes, &mut materials);

    scene.auto_rotate = settings.auto_rotate_on_start;
    viewer_commands.write(ViewerCommand::SelectProduct(ProductKind::default()));
}

fn spawn_camera(commands: &mut Commands, orbit: &OrbitCamera) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        orbit.transform(),
        ViewerEntity,
    ));
}

/// Spawn the surface for `kind` with its placeholder texture and queue the
/// real image. Returns what is now displayed.
pub fn spawn_product(
    commands: &mut Commands,
    kind: ProductKind,
    generation: u64,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    provider: &mut TextureProvider,
) -> DisplayedProduct {
    let measurement = lookup(kind);
    let placeholder = images.add(placeholder_image(kind));
    let material = materials.add(build_product_material(
        kind,
        placeholder,
        PLACEHOLDER_REPEAT,
    ));
    let mesh = meshes.add(build_product_mesh(kind, measurement));

    let entity = commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material.clone()),
            Transform::from_rotation(product_base_rotation()),
            ProductModel { kind },
            ViewerEntity,
        ))
        .id();

    let displayed = DisplayedProduct {
        kind,
        entity,
        material,
        generation,
    };
    provider.request(displayed.token());
    displayed
}

/// Apply queued viewer commands. Dispose is handled by the lifecycle systems.
pub fn handle_viewer_commands(
    mut commands: Commands,
    mut viewer_commands: EventReader<ViewerCommand>,
    mut viewer_events: EventWriter<ViewerEvent>,
    mut scene: ResMut<ProductScene>,
    mut orbit: ResMut<OrbitCamera>,
    mut measure: ResMut<MeasureState>,
    mut provider: ResMut<TextureProvider>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut models: Query<(Entity, &mut Transform), With<ProductModel>>,
) {
    let mut despawned: Vec<Entity> = Vec::new();

    for command in viewer_commands.read() {
        match *command {
            ViewerCommand::SelectProduct(kind) => {
                let mut stale: Vec<Entity> = models.iter().map(|(entity, _)| entity).collect();
                if let Some(previous) = scene.take_displayed() {
                    stale.push(previous.entity);
                }
                for entity in stale {
                    if !despawned.contains(&entity) {
                        commands.entity(entity).try_despawn();
                        despawned.push(entity);
                    }
                }

                if measure.clear(&mut commands) {
                    viewer_events.write(ViewerEvent::MeasureCleared);
                }

                let generation = scene.next_generation();
                let displayed = spawn_product(
                    &mut commands,
                    kind,
                    generation,
                    &mut meshes,
                    &mut materials,
                    &mut images,
                    &mut provider,
                );
                scene.set_displayed(displayed);

                info!("Product switched to {}", kind.id());
                viewer_events.write(ViewerEvent::ProductChanged(kind));
            }
            ViewerCommand::ResetView => {
                orbit.reset();
                for (_, mut transform) in models.iter_mut() {
                    transform.rotation = product_base_rotation();
                }
                if measure.clear(&mut commands) {
                    viewer_events.write(ViewerEvent::MeasureCleared);
                }
                debug!("View reset");
            }
            ViewerCommand::SetAutoRotate(enabled) => {
                if scene.auto_rotate != enabled {
                    scene.auto_rotate = enabled;
                    viewer_events.write(ViewerEvent::AutoRotateChanged(enabled));
                }
            }
            ViewerCommand::ToggleAutoRotate => {
                scene.auto_rotate = !scene.auto_rotate;
                viewer_events.write(ViewerEvent::AutoRotateChanged(scene.auto_rotate));
            }
            ViewerCommand::ToggleMeasures => {
                scene.measures_visible = !scene.measures_visible;
                viewer_events.write(ViewerEvent::MeasuresVisibilityChanged(
                    scene.measures_visible,
                ));
            }
            ViewerCommand::Dispose => {}
        }
    }
}

/// Keep the projection aspect in step with the window.
pub fn handle_window_resize(
    mut resize_events: EventReader<WindowResized>,
    mut cameras: Query<&mut Projection, With<Camera3d>>,
) {
    let Some(resized) = resize_events.read().last() else {
        return;
    };
    if resized.width <= 0.0 || resized.height <= 0.0 {
        return;
    }

    for mut projection in cameras.iter_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = resized.width / resized.height;
        }
    }
    debug!("Viewport resized to {}x{}", resized.width, resized.height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measure::MeasurementMarker;

    fn texture_repeat(material: &StandardMaterial) -> f32 {
        material.uv_transform.matrix2.x_axis.x
    }

    fn viewer_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Assets::<Mesh>::default())
            .insert_resource(Assets::<StandardMaterial>::default())
            .insert_resource(Assets::<Image>::default())
            .init_resource::<ProductScene>()
            .init_resource::<OrbitCamera>()
            .init_resource::<MeasureState>()
            .init_resource::<TextureProvider>()
            .add_event::<ViewerCommand>()
            .add_event::<ViewerEvent>()
            .add_systems(Update, handle_viewer_commands);
        app
    }

    fn product_models(app: &mut App) -> Vec<ProductKind> {
        let world = app.world_mut();
        let mut query = world.query::<&ProductModel>();
        query.iter(world).map(|m| m.kind).collect()
    }

    fn send(app: &mut App, command: ViewerCommand) {
        app.world_mut().send_event(command);
    }

    #[test]
    fn switching_leaves_exactly_one_mesh_for_every_pair() {
        for from in ProductKind::ALL {
            for to in ProductKind::ALL {
                let mut app = viewer_app();
                send(&mut app, ViewerCommand::SelectProduct(from));
                app.update();
                send(&mut app, ViewerCommand::SelectProduct(to));
                app.update();

                assert_eq!(product_models(&mut app), vec![to], "{from:?} -> {to:?}");
                let scene = app.world().resource::<ProductScene>();
                assert_eq!(scene.displayed_kind(), Some(to));
            }
        }
    }

    #[test]
    fn switching_twice_in_one_frame_leaves_one_mesh() {
        let mut app = viewer_app();
        send(&mut app, ViewerCommand::SelectProduct(ProductKind::NapkinSquare));
        send(&mut app, ViewerCommand::SelectProduct(ProductKind::TableclothRect));
        app.update();
        assert_eq!(
            product_models(&mut app),
            vec![ProductKind::TableclothRect]
        );
    }

    #[test]
    fn each_switch_issues_a_new_texture_token() {
        let mut app = viewer_app();
        send(&mut app, ViewerCommand::SelectProduct(ProductKind::TableclothRect));
        app.update();
        send(&mut app, ViewerCommand::SelectProduct(ProductKind::TableclothRect));
        app.update();

        let provider = app.world().resource::<TextureProvider>();
        let queued = provider.queued();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].kind, queued[1].kind);
        assert!(queued[1].generation > queued[0].generation);

        let scene = app.world().resource::<ProductScene>();
        assert_eq!(scene.displayed().map(|d| d.token()), Some(queued[1]));
    }

    #[test]
    fn new_product_starts_with_repeating_placeholder() {
        let mut app = viewer_app();
        send(&mut app, ViewerCommand::SelectProduct(ProductKind::TableBaseRect));
        app.update();

        let world = app.world();
        let displayed = world.resource::<ProductScene>().displayed().cloned();
        let Some(displayed) = displayed else {
            panic!("no product displayed");
        };
        let materials = world.resource::<Assets<StandardMaterial>>();
        let material = materials.get(&displayed.material).unwrap();
        assert!(material.base_color_texture.is_some());
        assert_eq!(texture_repeat(material), PLACEHOLDER_REPEAT);
    }

    #[test]
    fn reset_clears_markers_and_readout() {
        let mut app = viewer_app();
        send(&mut app, ViewerCommand::SelectProduct(ProductKind::NapkinSquare));
        app.update();

        let markers: Vec<Entity> = (0..3)
            .map(|_| app.world_mut().spawn(ViewerEntity).id())
            .collect();
        {
            let mut measure = app.world_mut().resource_mut::<MeasureState>();
            for (i, entity) in markers.iter().enumerate() {
                measure.place(
                    MeasurementMarker::new(*entity, Vec3::splat(i as f32), 3.0),
                    format!("Posição: {i}cm x {i}cm"),
                );
            }
        }

        send(&mut app, ViewerCommand::ResetView);
        app.update();

        let measure = app.world().resource::<MeasureState>();
        assert!(measure.markers().is_empty());
        assert_eq!(measure.readout(), None);
        for entity in markers {
            assert!(app.world().get_entity(entity).is_err());
        }
    }

    #[test]
    fn reset_restores_orbit_and_model_rotation() {
        let mut app = viewer_app();
        send(&mut app, ViewerCommand::SelectProduct(ProductKind::NapkinSquare));
        app.update();

        let home = app.world().resource::<OrbitCamera>().pose;
        {
            let world = app.world_mut();
            world.resource_mut::<OrbitCamera>().pose.yaw += 1.0;
            let mut query = world.query_filtered::<&mut Transform, With<ProductModel>>();
            for mut transform in query.iter_mut(world) {
                transform.rotate_y(0.7);
            }
        }

        send(&mut app, ViewerCommand::ResetView);
        app.update();

        assert_eq!(app.world().resource::<OrbitCamera>().pose, home);
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<ProductModel>>();
        for transform in query.iter(world) {
            assert!(transform.rotation.abs_diff_eq(product_base_rotation(), 1e-6));
        }
    }

    #[test]
    fn toggles_report_new_state() {
        let mut app = viewer_app();
        send(&mut app, ViewerCommand::ToggleAutoRotate);
        send(&mut app, ViewerCommand::ToggleMeasures);
        send(&mut app, ViewerCommand::SetAutoRotate(false));
        app.update();

        let scene = app.world().resource::<ProductScene>();
        assert!(!scene.auto_rotate);
        assert!(!scene.measures_visible);

        let events = app.world().resource::<Events<ViewerEvent>>();
        let mut cursor = events.get_cursor();
        let seen: Vec<ViewerEvent> = cursor.read(events).cloned().collect();
        assert_eq!(
            seen,
            vec![
                ViewerEvent::AutoRotateChanged(false),
                ViewerEvent::MeasuresVisibilityChanged(false),
            ]
        );
    }

    #[test]
    fn setup_builds_backdrop_and_shows_the_napkin() {
        let mut app = viewer_app();
        app.init_resource::<ViewerSettings>()
            .add_systems(Startup, setup_scene);
        app.update();
        // The queued selection is handled on the following frame.
        app.update();

        let world = app.world_mut();
        let mut cameras = world.query_filtered::<&Projection, With<Camera3d>>();
        let fovs: Vec<f32> = cameras
            .iter(world)
            .filter_map(|projection| match projection {
                Projection::Perspective(perspective) => Some(perspective.fov),
                _ => None,
            })
            .collect();
        assert_eq!(fovs, vec![CAMERA_FOV_DEGREES.to_radians()]);

        let mut lights = world.query::<&DirectionalLight>();
        let shadowed: Vec<bool> = lights.iter(world).map(|l| l.shadows_enabled).collect();
        assert_eq!(shadowed.len(), 2);
        assert!(shadowed.contains(&true));

        assert_eq!(product_models(&mut app), vec![ProductKind::NapkinSquare]);
        assert!(app.world().resource::<ProductScene>().auto_rotate);
    }
}
