//! Scene graph of the viewer.
//!
//! Owns the displayed product, the static backdrop (camera, lights, grid)
//! and the command handling that swaps products and resets the view.

/// Flat line grid drawn under the product.
pub mod grid;

/// Ambient, key and back lights.
pub mod lighting;

/// Product switching, view reset and toggles driven by `ViewerCommand` events.
///
/// Tracks the single displayed product and the generation used to reject stale textures.
pub mod scene_manager;
