use bevy::math::Vec3;

/// Clear colour behind the scene (#f8f9fa).
pub const BACKGROUND_RGB: [u8; 3] = [0xf8, 0xf9, 0xfa];

pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(0.0, 2.0, 8.0);
pub const CAMERA_TARGET: Vec3 = Vec3::ZERO;

pub const AMBIENT_BRIGHTNESS: f32 = 400.0;
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 10.0, 7.0);
pub const KEY_LIGHT_ILLUMINANCE: f32 = 8_000.0;
pub const BACK_LIGHT_POSITION: Vec3 = Vec3::new(-5.0, -5.0, -5.0);
pub const BACK_LIGHT_ILLUMINANCE: f32 = 3_000.0;

/// Ground grid: total edge length and number of cells per side.
pub const GRID_SIZE: f32 = 10.0;
pub const GRID_DIVISIONS: u32 = 10;
pub const GRID_OPACITY: f32 = 0.1;

pub const ORBIT_DAMPING: f32 = 0.05;
pub const ORBIT_ROTATE_SPEED: f32 = 0.5;
pub const ORBIT_ZOOM_SPEED: f32 = 0.8;
pub const ORBIT_PAN_SPEED: f32 = 1.0;
pub const ORBIT_MIN_DISTANCE: f32 = 3.0;
pub const ORBIT_MAX_DISTANCE: f32 = 15.0;
/// Keeps the camera off the poles so `looking_at` stays well defined.
pub const ORBIT_PITCH_LIMIT: f32 = 1.55;

/// Model yaw added every frame while auto-rotation is on (radians).
pub const AUTO_ROTATE_STEP: f32 = 0.005;

pub const MARKER_RADIUS: f32 = 0.05;
pub const MARKER_SEGMENTS: u32 = 8;
pub const MARKER_LIFETIME_SECS: f32 = 3.0;

/// Cursor travel (logical px) below which a press/release pair counts as a click.
pub const CLICK_DRAG_TOLERANCE: f32 = 5.0;

pub const LOADING_OVERLAY_SECS: f32 = 1.0;

/// Host page element the wasm build renders into.
pub const VIEWER_CONTAINER_ID: &str = "product-viewer-3d";
pub const VIEWER_CANVAS_SELECTOR: &str = "#product-viewer-3d > canvas";
