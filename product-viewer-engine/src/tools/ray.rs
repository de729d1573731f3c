use bevy::prelude::*;
use bevy::render::mesh::{MeshAabb, VertexAttributeValues};

/// Nearest intersection of a ray with a mesh surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    pub point: Vec3,
    pub local_point: Vec3,
    pub distance: f32,
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = ray_direction.recip();
    let t0 = (min - ray_origin) * inv;
    let t1 = (max - ray_origin) * inv;

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    for axis in 0..3 {
        if ray_direction[axis] == 0.0 {
            // Parallel to this slab: inside it or never.
            if ray_origin[axis] < min[axis] || ray_origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let (near, far) = if t0[axis] <= t1[axis] {
            (t0[axis], t1[axis])
        } else {
            (t1[axis], t0[axis])
        };
        tmin = tmin.max(near);
        tmax = tmax.min(far);
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Two-sided Möller–Trumbore. Returns the ray parameter of the hit.
pub fn ray_triangle_hit_t(origin: Vec3, direction: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Cast `ray` against a triangle mesh placed by `xf`. The ray is moved into
/// mesh space, rejected early against the mesh bounds, then tested per
/// triangle; the nearest hit wins.
pub fn ray_mesh_hit(ray: Ray3d, xf: &GlobalTransform, mesh: &Mesh) -> Option<MeshHit> {
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return None;
    };
    let positions: Vec<Vec3> = positions.iter().copied().map(Vec3::from).collect();

    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(ray.origin);
    let d_local = inv.transform_vector3(*ray.direction);

    let aabb = mesh.compute_aabb()?;
    let pad = Vec3::splat(1e-4);
    let min = Vec3::from(aabb.center - aabb.half_extents) - pad;
    let max = Vec3::from(aabb.center + aabb.half_extents) + pad;
    ray_aabb_hit_t(o_local, d_local, min, max)?;

    let triangle_indices: Vec<usize> = match mesh.indices() {
        Some(indices) => indices.iter().collect(),
        None => (0..positions.len()).collect(),
    };

    let nearest = triangle_indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let (a, b, c) = (
                *positions.get(tri[0])?,
                *positions.get(tri[1])?,
                *positions.get(tri[2])?,
            );
            ray_triangle_hit_t(o_local, d_local, a, b, c)
        })
        .min_by(|a, b| a.total_cmp(b))?;

    // The local direction is not renormalised, so `t` is valid in both spaces.
    let local_point = o_local + d_local * nearest;
    let point = ray.origin + *ray.direction * nearest;
    Some(MeshHit {
        point,
        local_point,
        distance: nearest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::product_mesh::{plane_grid_mesh, product_base_rotation};
    use approx::assert_relative_eq;

    fn down_ray(x: f32, z: f32) -> Ray3d {
        Ray3d::new(Vec3::new(x, 5.0, z), Dir3::NEG_Y)
    }

    #[test]
    fn aabb_slab_hits_and_misses() {
        let min = Vec3::splat(-1.0);
        let max = Vec3::splat(1.0);
        assert_eq!(
            ray_aabb_hit_t(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, min, max),
            Some(4.0)
        );
        assert_eq!(
            ray_aabb_hit_t(Vec3::new(3.0, 0.0, -5.0), Vec3::Z, min, max),
            None
        );
        // Starting inside returns the exit distance.
        assert_eq!(ray_aabb_hit_t(Vec3::ZERO, Vec3::X, min, max), Some(1.0));
    }

    #[test]
    fn triangle_is_hit_from_both_sides() {
        let (a, b, c) = (Vec3::ZERO, Vec3::X, Vec3::Y);
        let front = ray_triangle_hit_t(Vec3::new(0.2, 0.2, 1.0), Vec3::NEG_Z, a, b, c);
        let back = ray_triangle_hit_t(Vec3::new(0.2, 0.2, -1.0), Vec3::Z, a, b, c);
        assert_eq!(front, Some(1.0));
        assert_eq!(back, Some(1.0));
        assert_eq!(
            ray_triangle_hit_t(Vec3::new(0.8, 0.8, 1.0), Vec3::NEG_Z, a, b, c),
            None
        );
    }

    #[test]
    fn flat_product_hit_reports_local_coordinates() {
        let mesh = plane_grid_mesh(4.0, 4.0, 16, 16);
        let xf = GlobalTransform::from(Transform::from_rotation(product_base_rotation()));

        let hit = ray_mesh_hit(down_ray(1.1, 0.6), &xf, &mesh).unwrap();
        assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point.x, 1.1, epsilon = 1e-5);
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-5);
        // World +Z maps to local -Y.
        assert_relative_eq!(hit.local_point.x, 1.1, epsilon = 1e-5);
        assert_relative_eq!(hit.local_point.y, -0.6, epsilon = 1e-5);
    }

    #[test]
    fn ray_beside_the_product_misses() {
        let mesh = plane_grid_mesh(4.0, 4.0, 16, 16);
        let xf = GlobalTransform::from(Transform::from_rotation(product_base_rotation()));
        assert!(ray_mesh_hit(down_ray(2.5, 0.0), &xf, &mesh).is_none());
        assert!(ray_mesh_hit(Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::Y), &xf, &mesh).is_none());
    }

    #[test]
    fn translated_product_is_hit_at_its_height() {
        let mesh = plane_grid_mesh(2.0, 2.0, 1, 1);
        let xf = GlobalTransform::from(
            Transform::from_rotation(product_base_rotation()).with_translation(Vec3::Y),
        );
        let hit = ray_mesh_hit(down_ray(0.3, 0.2), &xf, &mesh).unwrap();
        assert_relative_eq!(hit.point.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-5);
    }
}
