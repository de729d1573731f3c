//! Damped orbit camera for inspecting the product.
//!
//! Mouse drag orbits and pans around the product, the wheel zooms within
//! fixed distance limits, and motion eases out over several frames.

/// Orbit camera resource and its input controller system.
pub mod orbit_camera;
