/// Flat reference grid under the product
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::render_settings::{GRID_DIVISIONS, GRID_OPACITY, GRID_SIZE};

use crate::engine::scene::scene_manager::ViewerEntity;

#[derive(Component)]
pub struct GroundGrid;

/// Square line grid centred on the origin in the XZ plane.
pub fn grid_line_mesh(size: f32, divisions: u32) -> Mesh {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;

    let mut vertices = Vec::with_capacity(((divisions + 1) * 4) as usize);
    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        // Line parallel to Z at fixed X, then parallel to X at fixed Z.
        vertices.push([offset, 0.0, -half]);
        vertices.push([offset, 0.0, half]);
        vertices.push([-half, 0.0, offset]);
        vertices.push([half, 0.0, offset]);
    }
    let indices: Vec<u32> = (0..vertices.len() as u32).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub fn spawn_ground_grid(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let grid_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 0.0, 0.0, GRID_OPACITY),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(grid_line_mesh(GRID_SIZE, GRID_DIVISIONS))),
        MeshMaterial3d(grid_material),
        Transform::IDENTITY,
        GroundGrid,
        ViewerEntity,
    ));
}
