//! Flat reference grid under the city.
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use constants::backdrop::{GRID_DIVISIONS, GRID_SIZE, GRID_Y};
use constants::render_settings::{SLATE_700, SLATE_800};

#[derive(Component)]
pub struct GroundGrid;

/// Spawn the ground grid: dim cell lines plus brighter centre axes.
pub fn create_ground_grid(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let line_material = materials.add(StandardMaterial {
        base_color: SLATE_800,
        unlit: true,
        ..default()
    });
    let axis_material = materials.add(StandardMaterial {
        base_color: SLATE_700,
        unlit: true,
        ..default()
    });

    let (cells, axes) = grid_line_offsets(GRID_SIZE, GRID_DIVISIONS);
    spawn_grid_line_entity(commands, meshes, line_material, grid_lines_mesh(&cells, GRID_SIZE));
    spawn_grid_line_entity(commands, meshes, axis_material, grid_lines_mesh(&axes, GRID_SIZE));
}

/// Offsets of every grid line along one axis, split into (cell lines, centre lines).
fn grid_line_offsets(size: f32, divisions: u32) -> (Vec<f32>, Vec<f32>) {
    let half = size / 2.0;
    let spacing = size / divisions as f32;
    let centre = divisions / 2;

    let mut cells = Vec::new();
    let mut axes = Vec::new();
    for i in 0..=divisions {
        let offset = -half + i as f32 * spacing;
        if divisions % 2 == 0 && i == centre {
            axes.push(offset);
        } else {
            cells.push(offset);
        }
    }
    (cells, axes)
}

/// Lines at each offset in both directions, spanning the full grid size
fn grid_lines_mesh(offsets: &[f32], size: f32) -> Mesh {
    let half = size / 2.0;
    let mut vertices = Vec::with_capacity(offsets.len() * 4);
    let mut indices = Vec::with_capacity(offsets.len() * 4);

    for &offset in offsets {
        // Line running along Z (X fixed)
        vertices.push([offset, GRID_Y, -half]);
        vertices.push([offset, GRID_Y, half]);
        // Line running along X (Z fixed)
        vertices.push([-half, GRID_Y, offset]);
        vertices.push([half, GRID_Y, offset]);
    }
    for i in 0..vertices.len() as u32 {
        indices.push(i);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));

    mesh
}

/// Spawn grid line entity with no frustum culling
fn spawn_grid_line_entity(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    grid_material: Handle<StandardMaterial>,
    line_mesh: Mesh,
) {
    commands.spawn((
        Mesh3d(meshes.add(line_mesh)),
        MeshMaterial3d(grid_material),
        Visibility::Visible,
        NoFrustumCulling,
        Transform::IDENTITY,
        GroundGrid,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_divisions_give_forty_one_lines_with_one_axis() {
        let (cells, axes) = grid_line_offsets(120.0, 40);
        assert_eq!(cells.len() + axes.len(), 41);
        assert_eq!(axes, vec![0.0]);
        assert_eq!(cells.first().copied(), Some(-60.0));
        assert_eq!(cells.last().copied(), Some(60.0));
    }
}
