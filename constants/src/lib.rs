//! Tunable values shared by the product viewer crates.

/// Product table dimensions and procedural geometry parameters.
pub mod product;

/// Camera, lighting, orbit and marker settings.
pub mod render_settings;

/// Placeholder texture painting and real asset locations.
pub mod texture;
