//! Interactive tools layered on the viewer.
//!
//! Click-to-measure on the product surface, the native control panel and
//! keyboard shortcuts. All of them drive the scene through `ViewerCommand`
//! events rather than touching it directly.

/// Click detection, marker placement and the position readout overlay.
///
/// Markers expire on their own timers, which are dropped with the marker.
pub mod measure;

/// Product selector, controls and overlays (native only).
pub mod product_panel;

/// Ray casting against product meshes in local space.
///
/// Bounding box rejection followed by two-sided triangle tests.
pub mod ray;

/// Keyboard shortcuts mapped to viewer commands.
pub mod viewer_controller;
