//! Procedural product geometry.

/// Subdivided plane meshes, tablecloth drape and product materials.
pub mod product_mesh;
