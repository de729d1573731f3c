use std::f32::consts::TAU;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::{
    CAMERA_FOV_DEGREES, CAMERA_START_POSITION, CAMERA_TARGET, ORBIT_DAMPING, ORBIT_MAX_DISTANCE,
    ORBIT_MIN_DISTANCE, ORBIT_PAN_SPEED, ORBIT_PITCH_LIMIT, ORBIT_ROTATE_SPEED, ORBIT_ZOOM_SPEED,
};

use crate::tools::measure::pointer_over_ui;

/// Camera pose on a sphere around `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitPose {
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }
}

/// Damped orbit controls: input accumulates deltas which bleed into the pose
/// a fraction per frame, giving the camera inertia.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub pose: OrbitPose,
    home: OrbitPose,
    pub yaw_delta: f32,
    pub pitch_delta: f32,
    pub pan_delta: Vec3,
    pub zoom_scale: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CAMERA_START_POSITION, CAMERA_TARGET)
    }
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let pose = OrbitPose::from_position(position, target);
        Self {
            pose,
            home: pose,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            pan_delta: Vec3::ZERO,
            zoom_scale: 1.0,
            damping: ORBIT_DAMPING,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_speed: ORBIT_ZOOM_SPEED,
            pan_speed: ORBIT_PAN_SPEED,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            distance: pose.distance,
        }
    }

    /// Drag across the full viewport height turns the camera a full circle
    /// (scaled by `rotate_speed`).
    pub fn rotate_by_pixels(&mut self, delta: Vec2, viewport_height: f32) {
        let radians_per_pixel = TAU / viewport_height.max(1.0) * self.rotate_speed;
        self.yaw_delta -= delta.x * radians_per_pixel;
        self.pitch_delta += delta.y * radians_per_pixel;
    }

    pub fn pan_by_pixels(&mut self, delta: Vec2, viewport_height: f32) {
        let half_fov = CAMERA_FOV_DEGREES.to_radians() * 0.5;
        let world_per_pixel = 2.0 * self.distance * half_fov.tan() / viewport_height.max(1.0);
        let rotation = self.transform().rotation;
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        self.pan_delta += (-right * delta.x + up * delta.y) * world_per_pixel * self.pan_speed;
    }

    /// Positive steps zoom in.
    pub fn zoom(&mut self, steps: f32) {
        let per_step = 0.95f32.powf(self.zoom_speed);
        self.zoom_scale *= per_step.powf(steps);
    }

    /// Advance one frame. Returns whether the pose moved.
    pub fn update(&mut self) -> bool {
        let before = self.pose;
        let factor = if self.damping > 0.0 { self.damping } else { 1.0 };

        self.pose.yaw += self.yaw_delta * factor;
        self.pose.pitch = (self.pose.pitch + self.pitch_delta * factor)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
        self.pose.target += self.pan_delta * factor;

        self.distance = (self.distance * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.pose.distance = self.distance;
        self.zoom_scale = 1.0;

        if self.damping > 0.0 {
            let keep = 1.0 - self.damping;
            self.yaw_delta *= keep;
            self.pitch_delta *= keep;
            self.pan_delta *= keep;
            if self.yaw_delta.abs() < 1e-6 {
                self.yaw_delta = 0.0;
            }
            if self.pitch_delta.abs() < 1e-6 {
                self.pitch_delta = 0.0;
            }
            if self.pan_delta.length_squared() < 1e-12 {
                self.pan_delta = Vec3::ZERO;
            }
        } else {
            self.yaw_delta = 0.0;
            self.pitch_delta = 0.0;
            self.pan_delta = Vec3::ZERO;
        }

        self.pose != before
    }

    pub fn reset(&mut self) {
        self.pose = self.home;
        self.distance = self.home.distance;
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
        self.pan_delta = Vec3::ZERO;
        self.zoom_scale = 1.0;
    }

    pub fn is_settled(&self) -> bool {
        self.yaw_delta == 0.0 && self.pitch_delta == 0.0 && self.pan_delta == Vec3::ZERO
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.pose.position()).looking_at(self.pose.target, Vec3::Y)
    }
}

/// Left drag orbits, right drag pans, wheel zooms. Input over the UI is
/// ignored.
pub fn orbit_camera_controller(
    mut orbit: ResMut<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_nodes: Query<&Interaction>,
) {
    let pointer_on_ui = pointer_over_ui(&ui_nodes);
    let viewport_height = windows.single().map(|w| w.height()).unwrap_or(1.0);

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_delta != Vec2::ZERO && !pointer_on_ui {
        if mouse_button.pressed(MouseButton::Left) {
            orbit.rotate_by_pixels(mouse_delta, viewport_height);
        } else if mouse_button.pressed(MouseButton::Right) {
            orbit.pan_by_pixels(mouse_delta, viewport_height);
        }
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON && !pointer_on_ui {
        orbit.zoom(scroll_accum);
    }

    orbit.update();

    if let Ok(mut camera_transform) = camera_query.single_mut() {
        *camera_transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_pose_matches_start_position() {
        let orbit = OrbitCamera::default();
        let position = orbit.pose.position();
        assert_relative_eq!(position.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(position.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(position.z, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut orbit = OrbitCamera::default();
        orbit.yaw_delta = 1.0;
        orbit.update();
        assert_relative_eq!(orbit.pose.yaw, 0.05, epsilon = 1e-6);
        assert_relative_eq!(orbit.yaw_delta, 0.95, epsilon = 1e-6);
        for _ in 0..2000 {
            orbit.update();
        }
        assert!(orbit.is_settled());
        assert_relative_eq!(orbit.pose.yaw, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.zoom(200.0);
        orbit.update();
        assert_eq!(orbit.distance, ORBIT_MIN_DISTANCE);
        orbit.zoom(-400.0);
        orbit.update();
        assert_eq!(orbit.distance, ORBIT_MAX_DISTANCE);
    }

    #[test]
    fn reset_restores_home_pose() {
        let mut orbit = OrbitCamera::default();
        let home = orbit.pose;
        orbit.rotate_by_pixels(Vec2::new(120.0, -40.0), 600.0);
        orbit.pan_by_pixels(Vec2::new(10.0, 10.0), 600.0);
        orbit.zoom(3.0);
        orbit.update();
        assert_ne!(orbit.pose, home);

        orbit.reset();
        assert_eq!(orbit.pose, home);
        assert!(orbit.is_settled());
    }

    #[test]
    fn pitch_stays_off_the_poles() {
        let mut orbit = OrbitCamera::default();
        orbit.damping = 0.0;
        orbit.pitch_delta = 10.0;
        orbit.update();
        assert_eq!(orbit.pose.pitch, ORBIT_PITCH_LIMIT);
    }
}
