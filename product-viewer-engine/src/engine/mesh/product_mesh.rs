use std::f32::consts::{FRAC_PI_2, PI};

use bevy::asset::RenderAssetUsages;
use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use constants::product::{
    DRAPE_AMPLITUDE, NAPKIN_OPACITY, NAPKIN_SEGMENTS, TABLE_BASE_OPACITY, TABLE_BASE_SEGMENTS,
    TABLECLOTH_OPACITY, TABLECLOTH_SEGMENTS,
};

use crate::engine::assets::catalog::{Measurement, ProductKind};

/// Per-kind geometry and surface parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductMeshSpec {
    pub segments: u32,
    pub opacity: f32,
    pub drape: bool,
}

pub fn mesh_spec(kind: ProductKind) -> ProductMeshSpec {
    match kind {
        ProductKind::NapkinSquare => ProductMeshSpec {
            segments: NAPKIN_SEGMENTS,
            opacity: NAPKIN_OPACITY,
            drape: false,
        },
        ProductKind::TableBaseRect => ProductMeshSpec {
            segments: TABLE_BASE_SEGMENTS,
            opacity: TABLE_BASE_OPACITY,
            drape: false,
        },
        ProductKind::TableclothRect => ProductMeshSpec {
            segments: TABLECLOTH_SEGMENTS,
            opacity: TABLECLOTH_OPACITY,
            drape: true,
        },
    }
}

/// Build the renderable surface for `kind`, in the local XY plane.
pub fn build_product_mesh(kind: ProductKind, measurement: &Measurement) -> Mesh {
    let spec = mesh_spec(kind);
    let mut mesh = plane_grid_mesh(
        measurement.scene_width,
        measurement.scene_height,
        spec.segments,
        spec.segments,
    );

    if spec.drape {
        apply_drape(&mut mesh, measurement.scene_width, measurement.scene_height);
    }

    mesh
}

/// Subdivided plane facing +Z. Rows run from +y down to -y, columns from -x to +x.
pub fn plane_grid_mesh(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Mesh {
    let segments_x = segments_x.max(1);
    let segments_y = segments_y.max(1);
    let columns = segments_x + 1;
    let rows = segments_y + 1;

    let half_width = width * 0.5;
    let half_height = height * 0.5;
    let cell_width = width / segments_x as f32;
    let cell_height = height / segments_y as f32;

    let vertex_count = (columns * rows) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for iy in 0..rows {
        let y = iy as f32 * cell_height - half_height;
        for ix in 0..columns {
            let x = ix as f32 * cell_width - half_width;
            positions.push([x, -y, 0.0]);
            normals.push([0.0, 0.0, 1.0]);
            uvs.push([
                ix as f32 / segments_x as f32,
                1.0 - iy as f32 / segments_y as f32,
            ]);
        }
    }

    let mut indices = Vec::with_capacity((segments_x * segments_y * 6) as usize);
    for iy in 0..segments_y {
        for ix in 0..segments_x {
            let a = ix + columns * iy;
            let b = ix + columns * (iy + 1);
            let c = (ix + 1) + columns * (iy + 1);
            let d = (ix + 1) + columns * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    // Positions stay in the main world so clicks can be ray cast on the CPU.
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Radial cosine bump used to fake cloth hanging over a table.
/// `x` and `y` are normalised so the plane edges sit at +-1.
pub fn drape_height(x: f32, y: f32) -> f32 {
    let distance = (x * x + y * y).sqrt();
    (distance * PI / 2.0).cos() * DRAPE_AMPLITUDE
}

pub fn apply_drape(mesh: &mut Mesh, width: f32, height: f32) {
    let half_width = width * 0.5;
    let half_height = height * 0.5;

    if let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    {
        for position in positions.iter_mut() {
            position[2] = drape_height(position[0] / half_width, position[1] / half_height);
        }
    }

    mesh.compute_normals();
}

pub fn build_product_material(
    kind: ProductKind,
    texture: Handle<Image>,
    uv_repeat: f32,
) -> StandardMaterial {
    let spec = mesh_spec(kind);
    let alpha_mode = if spec.opacity < 1.0 {
        AlphaMode::Blend
    } else {
        AlphaMode::Opaque
    };

    StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, spec.opacity),
        base_color_texture: Some(texture),
        uv_transform: Affine2::from_scale(Vec2::splat(uv_repeat)),
        alpha_mode,
        double_sided: true,
        cull_mode: None,
        perceptual_roughness: 1.0,
        reflectance: 0.1,
        ..default()
    }
}

/// Lays the plane flat: local +Y ends up pointing at world -Z.
pub fn product_base_rotation() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::catalog::lookup;
    use approx::assert_relative_eq;

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|values| values.as_float3())
            .map(|values| values.to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn vertex_counts_follow_subdivision() {
        let expected = [
            (ProductKind::NapkinSquare, 17 * 17),
            (ProductKind::TableBaseRect, 2 * 2),
            (ProductKind::TableclothRect, 33 * 33),
        ];
        for (kind, count) in expected {
            let mesh = build_product_mesh(kind, lookup(kind));
            assert_eq!(mesh.count_vertices(), count, "{kind:?}");
            let segments = mesh_spec(kind).segments as usize;
            assert_eq!(mesh.indices().map(|i| i.len()), Some(segments * segments * 6));
        }
    }

    #[test]
    fn drape_matches_closed_form() {
        assert_relative_eq!(drape_height(0.0, 0.0), 0.4);
        assert_relative_eq!(
            drape_height(1.0, 1.0),
            (2f32.sqrt() * PI / 2.0).cos() * 0.4,
            epsilon = 1e-6
        );
        assert_relative_eq!(drape_height(1.0, 0.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(
            drape_height(0.5, -0.5),
            (0.5f32.sqrt() * PI / 2.0).cos() * 0.4,
            epsilon = 1e-6
        );
    }

    #[test]
    fn tablecloth_vertices_are_displaced() {
        let m = lookup(ProductKind::TableclothRect);
        let mesh = build_product_mesh(ProductKind::TableclothRect, m);
        let verts = positions(&mesh);

        // 33 columns, the centre vertex is row 16, column 16.
        let centre = verts[16 * 33 + 16];
        assert_relative_eq!(centre[0], 0.0, epsilon = 1e-5);
        assert_relative_eq!(centre[1], 0.0, epsilon = 1e-5);
        assert_relative_eq!(centre[2], 0.4, epsilon = 1e-5);

        let corner = verts[0];
        assert_relative_eq!(corner[0], -3.1, epsilon = 1e-5);
        assert_relative_eq!(corner[1], 1.9, epsilon = 1e-5);
        assert_relative_eq!(
            corner[2],
            (2f32.sqrt() * PI / 2.0).cos() * 0.4,
            epsilon = 1e-5
        );
    }

    #[test]
    fn rigid_products_stay_flat() {
        for kind in [ProductKind::NapkinSquare, ProductKind::TableBaseRect] {
            let mesh = build_product_mesh(kind, lookup(kind));
            assert!(positions(&mesh).iter().all(|p| p[2] == 0.0));
        }
    }

    #[test]
    fn material_transparency_per_kind() {
        let napkin = build_product_material(ProductKind::NapkinSquare, Handle::default(), 4.0);
        assert_eq!(napkin.alpha_mode, AlphaMode::Blend);
        assert_relative_eq!(napkin.base_color.alpha(), 0.9);
        assert!(napkin.double_sided);

        let cloth = build_product_material(ProductKind::TableclothRect, Handle::default(), 4.0);
        assert_eq!(cloth.alpha_mode, AlphaMode::Opaque);
    }
}
