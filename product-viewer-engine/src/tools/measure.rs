use std::time::Duration;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::{CLICK_DRAG_TOLERANCE, MARKER_RADIUS, MARKER_SEGMENTS};

use crate::engine::assets::catalog::{Measurement, ProductKind, lookup};
use crate::engine::core::settings::ViewerSettings;
use crate::engine::scene::scene_manager::{ProductModel, ViewerEntity, ViewerEvent};
use crate::tools::ray::{MeshHit, ray_mesh_hit};

/// A click on the canvas, already turned into a world-space ray.
#[derive(Event, Debug, Clone, Copy)]
pub struct MeasureClick {
    pub ray: Ray3d,
}

#[derive(Component)]
pub struct MeasureMarker;

#[derive(Component)]
pub struct MeasureReadoutOverlay;

/// A placed marker and the timer that removes it.
#[derive(Debug, Clone)]
pub struct MeasurementMarker {
    pub entity: Entity,
    pub position: Vec3,
    timer: Timer,
}

impl MeasurementMarker {
    pub fn new(entity: Entity, position: Vec3, lifetime_secs: f32) -> Self {
        Self {
            entity,
            position,
            timer: Timer::from_seconds(lifetime_secs, TimerMode::Once),
        }
    }

    pub fn remaining_secs(&self) -> f32 {
        self.timer.remaining_secs()
    }
}

/// Live markers and the readout text. Markers own their timers, so removing
/// a marker from here also cancels its expiry.
#[derive(Resource, Default)]
pub struct MeasureState {
    markers: Vec<MeasurementMarker>,
    readout: Option<String>,
}

impl MeasureState {
    pub fn markers(&self) -> &[MeasurementMarker] {
        &self.markers
    }

    pub fn readout(&self) -> Option<&str> {
        self.readout.as_deref()
    }

    /// Despawn every marker and drop the readout. Returns whether anything
    /// was showing.
    pub fn clear(&mut self, commands: &mut Commands) -> bool {
        let had_any = !self.markers.is_empty() || self.readout.is_some();
        for marker in self.markers.drain(..) {
            commands.entity(marker.entity).try_despawn();
        }
        self.readout = None;
        had_any
    }

    pub fn place(&mut self, marker: MeasurementMarker, readout: String) {
        self.markers.push(marker);
        self.readout = Some(readout);
    }

    /// Advance marker timers, returning the entities whose time is up.
    /// The readout stays until the next click, reset or product switch.
    pub fn tick(&mut self, delta: Duration) -> Vec<Entity> {
        let mut expired = Vec::new();
        self.markers.retain_mut(|marker| {
            marker.timer.tick(delta);
            if marker.timer.finished() {
                expired.push(marker.entity);
                false
            } else {
                true
            }
        });
        expired
    }
}

/// Hit position on the product plane: across the width, then into the depth.
pub fn plane_coordinates(local_point: Vec3) -> Vec2 {
    Vec2::new(local_point.x, -local_point.y)
}

/// Map plane coordinates to whole centimetres from the product's corner.
pub fn real_position_cm(plane: Vec2, measurement: &Measurement) -> (u32, u32) {
    let to_cm = |value: f32, full: f32, real_cm: u32| {
        (((value + full * 0.5) / full) * real_cm as f32).round().max(0.0) as u32
    };
    (
        to_cm(plane.x, measurement.scene_width, measurement.real_width_cm),
        to_cm(plane.y, measurement.scene_height, measurement.real_height_cm),
    )
}

pub fn format_position(x_cm: u32, y_cm: u32) -> String {
    format!("Posição: {}cm x {}cm", x_cm, y_cm)
}

/// Whether the pointer is over an interactive UI node. Buttons, the panel
/// background and the overlays all carry `Interaction`.
pub fn pointer_over_ui<'a>(interactions: impl IntoIterator<Item = &'a Interaction>) -> bool {
    interactions
        .into_iter()
        .any(|interaction| *interaction != Interaction::None)
}

/// Turn a short left press/release on the canvas into a `MeasureClick`.
/// Drags (camera orbiting) and presses on UI are ignored.
pub fn detect_canvas_clicks(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    ui_nodes: Query<&Interaction>,
    mut press_position: Local<Option<Vec2>>,
    mut clicks: EventWriter<MeasureClick>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();

    if mouse.just_pressed(MouseButton::Left) {
        *press_position = if pointer_over_ui(&ui_nodes) {
            None
        } else {
            cursor
        };
    }

    if !mouse.just_released(MouseButton::Left) {
        return;
    }
    let (Some(start), Some(end)) = (press_position.take(), cursor) else {
        return;
    };
    if start.distance(end) > CLICK_DRAG_TOLERANCE {
        return;
    }
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    match camera.viewport_to_world(camera_transform, end) {
        Ok(ray) => {
            clicks.write(MeasureClick { ray });
        }
        Err(err) => debug!("Click could not be projected: {:?}", err),
    }
}

/// Cast each click against the product. A hit replaces any previous marker
/// and readout; a miss changes nothing.
pub fn apply_measure_clicks(
    mut commands: Commands,
    mut clicks: EventReader<MeasureClick>,
    models: Query<(&GlobalTransform, &Mesh3d, &ProductModel)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut measure: ResMut<MeasureState>,
    settings: Res<ViewerSettings>,
    mut viewer_events: EventWriter<ViewerEvent>,
) {
    for click in clicks.read() {
        let nearest: Option<(MeshHit, ProductKind)> = models
            .iter()
            .filter_map(|(xf, mesh3d, model)| {
                let mesh = meshes.get(&mesh3d.0)?;
                ray_mesh_hit(click.ray, xf, mesh).map(|hit| (hit, model.kind))
            })
            .min_by(|(a, _), (b, _)| a.distance.total_cmp(&b.distance));

        let Some((hit, kind)) = nearest else {
            debug!("Click missed the product");
            continue;
        };

        measure.clear(&mut commands);

        let (x_cm, y_cm) = real_position_cm(plane_coordinates(hit.local_point), lookup(kind));
        let text = format_position(x_cm, y_cm);

        let entity = commands
            .spawn((
                Mesh3d(
                    meshes.add(
                        Sphere::new(MARKER_RADIUS)
                            .mesh()
                            .uv(MARKER_SEGMENTS, MARKER_SEGMENTS),
                    ),
                ),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(1.0, 0.0, 0.0),
                    unlit: true,
                    ..default()
                })),
                Transform::from_translation(hit.point),
                MeasureMarker,
                ViewerEntity,
            ))
            .id();

        measure.place(
            MeasurementMarker::new(entity, hit.point, settings.marker_lifetime_secs),
            text.clone(),
        );
        debug!("{} on {}", text, kind.id());
        viewer_events.write(ViewerEvent::MeasurePlaced {
            kind,
            x_cm,
            y_cm,
            text,
        });
    }
}

pub fn expire_markers(time: Res<Time>, mut commands: Commands, mut measure: ResMut<MeasureState>) {
    for entity in measure.tick(time.delta()) {
        commands.entity(entity).try_despawn();
    }
}

/// The readout overlay exists only while there is a readout to show.
pub fn sync_measure_readout(
    mut commands: Commands,
    measure: Res<MeasureState>,
    mut overlays: Query<(Entity, &mut Text), With<MeasureReadoutOverlay>>,
) {
    if !measure.is_changed() {
        return;
    }

    match (measure.readout(), overlays.single_mut()) {
        (Some(readout), Ok((_, mut text))) => {
            if text.0 != readout {
                text.0 = readout.to_string();
            }
        }
        (Some(readout), Err(_)) => {
            commands.spawn((
                Text::new(readout),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(10.0),
                    left: Val::Px(10.0),
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                    ..default()
                },
                MeasureReadoutOverlay,
                ViewerEntity,
            ));
        }
        (None, Ok((entity, _))) => {
            commands.entity(entity).try_despawn();
        }
        (None, Err(_)) => {}
    }
}
