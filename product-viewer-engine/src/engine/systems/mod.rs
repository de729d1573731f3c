//! Per-frame runtime systems.
//!
//! Drives the product's auto-rotation.

/// Auto-rotation of the displayed product.
pub mod render_loop;
