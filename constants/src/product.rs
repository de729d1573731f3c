/// Scene-space extents and real sizes, one row per product.
pub const NAPKIN_SCENE_SIZE: (f32, f32) = (4.0, 4.0);
pub const NAPKIN_REAL_CM: (u32, u32) = (40, 40);

pub const TABLE_BASE_SCENE_SIZE: (f32, f32) = (4.7, 3.7);
pub const TABLE_BASE_REAL_CM: (u32, u32) = (47, 37);

// Scaled down to fit the scene.
pub const TABLECLOTH_SCENE_SIZE: (f32, f32) = (6.2, 3.8);
pub const TABLECLOTH_REAL_CM: (u32, u32) = (310, 190);

pub const NAPKIN_SEGMENTS: u32 = 16;
pub const TABLE_BASE_SEGMENTS: u32 = 1;
pub const TABLECLOTH_SEGMENTS: u32 = 32;

pub const NAPKIN_OPACITY: f32 = 0.9;
pub const TABLE_BASE_OPACITY: f32 = 0.85;
pub const TABLECLOTH_OPACITY: f32 = 1.0;

/// Peak height of the tablecloth drape curve, reached at the centre.
pub const DRAPE_AMPLITUDE: f32 = 0.4;
