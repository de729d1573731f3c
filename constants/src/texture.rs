/// Edge length of the procedurally painted placeholder (pixels).
pub const PLACEHOLDER_SIZE: u32 = 512;

/// Dot lattice spacing, dot edge and the diagonal period that selects which lattice points get a dot.
pub const PLACEHOLDER_DOT_SPACING: u32 = 8;
pub const PLACEHOLDER_DOT_SIZE: u32 = 2;
pub const PLACEHOLDER_DOT_PERIOD: u32 = 16;
/// White overlay alpha for the dots.
pub const PLACEHOLDER_DOT_ALPHA: f32 = 0.1;

pub const NAPKIN_BASE_RGB: [u8; 3] = [0xf5, 0xe6, 0xc5];
pub const TABLE_BASE_BASE_RGB: [u8; 3] = [0x2c, 0x5a, 0xa0];
pub const TABLECLOTH_BASE_RGB: [u8; 3] = [0xff, 0xff, 0xff];

pub const PLACEHOLDER_REPEAT: f32 = 4.0;
pub const LOADED_TEXTURE_REPEAT: f32 = 2.0;

/// Folder (relative to the asset root) holding `<product-id>.jpg` images.
pub const TEXTURE_BASE_PATH: &str = "img";
pub const TEXTURE_EXTENSION: &str = "jpg";

pub const SETTINGS_PATH: &str = "viewer_settings.json";
