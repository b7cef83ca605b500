//! Procedurally placed background buildings giving the scene a city context.

use std::f32::consts::TAU;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::backdrop::*;
use constants::render_settings::{BACKDROP_BODY, CYAN_LIGHT, SLATE_600, SLATE_900};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::engine::core::SceneSettings;
use crate::engine::simulation::error::SimulationError;

/// One decorative building. Immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropStructure {
    pub id: usize,
    pub position: Vec3,
    pub size: Vec3,
    pub emissive: bool,
}

impl BackdropStructure {
    /// Distance from the scene origin on the ground plane.
    pub fn planar_radius(&self) -> f32 {
        Vec2::new(self.position.x, self.position.z).length()
    }
}

/// Structures generated for this session, kept for lookups after spawning.
#[derive(Resource, Debug, Default)]
pub struct BackdropLayout {
    pub structures: Vec<BackdropStructure>,
}

impl BackdropLayout {
    pub fn structure(&self, id: usize) -> Result<&BackdropStructure, SimulationError> {
        self.structures
            .get(id)
            .ok_or(SimulationError::IndexOutOfRange {
                kind: "backdrop structure",
                index: id,
                valid: "0..count",
            })
    }
}

#[derive(Component)]
pub struct BackdropBuilding(pub usize);

/// Generate `count` structures. A fixed `seed` gives a reproducible layout.
pub fn generate(count: usize, seed: Option<u64>) -> Vec<BackdropStructure> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(clock_seed));

    (0..count)
        .map(|id| {
            let angle = rng.random_range(0.0..TAU);
            let radius = rng.random_range(RADIUS_MIN..RADIUS_MAX);
            let height = rng.random_range(HEIGHT_MIN..HEIGHT_MAX);
            let width = rng.random_range(WIDTH_MIN..WIDTH_MAX);
            let depth = rng.random_range(DEPTH_MIN..DEPTH_MAX);
            let emissive = rng.random_bool(EMISSIVE_PROBABILITY);

            BackdropStructure {
                id,
                position: Vec3::new(
                    radius * angle.cos(),
                    height / 2.0 + GROUND_OFFSET,
                    radius * angle.sin(),
                ),
                size: Vec3::new(width, height, depth),
                emissive,
            }
        })
        .collect()
}

/// Decorative layout, so the wall clock is entropy enough (and available on wasm).
fn clock_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .map(|n| n as u64)
        .unwrap_or(now.timestamp_millis() as u64)
}

/// Startup system: generate once and spawn buildings, ground and grid.
pub fn spawn_backdrop(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let structures = generate(settings.backdrop_count, settings.backdrop_seed);
    info!(
        "Generated {} backdrop structures (seed: {:?})",
        structures.len(),
        settings.backdrop_seed
    );

    let body_material = materials.add(StandardMaterial {
        base_color: BACKDROP_BODY,
        emissive: SLATE_900.to_linear() * 0.2,
        perceptual_roughness: 0.4,
        metallic: 0.5,
        ..default()
    });
    let edge_material = materials.add(StandardMaterial {
        base_color: SLATE_600.with_alpha(0.3),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let window_material = materials.add(StandardMaterial {
        base_color: CYAN_LIGHT.with_alpha(0.6),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let window_mesh = meshes.add(Rectangle::new(WINDOW_SIZE, WINDOW_SIZE));

    for structure in &structures {
        commands
            .spawn((
                Name::new(format!("Backdrop{}", structure.id)),
                BackdropBuilding(structure.id),
                Mesh3d(meshes.add(Cuboid::from_size(structure.size))),
                MeshMaterial3d(body_material.clone()),
                Transform::from_translation(structure.position),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(meshes.add(box_edges_mesh(structure.size))),
                    MeshMaterial3d(edge_material.clone()),
                ));
                if structure.emissive {
                    parent.spawn((
                        Mesh3d(window_mesh.clone()),
                        MeshMaterial3d(window_material.clone()),
                        Transform::from_xyz(
                            0.0,
                            structure.size.y * WINDOW_HEIGHT_FRACTION,
                            structure.size.z * WINDOW_DEPTH_FRACTION,
                        ),
                    ));
                }
            });
    }

    spawn_ground(&mut commands, &mut meshes, &mut materials);
    commands.insert_resource(BackdropLayout { structures });
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("GroundPlane"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_PLANE_SIZE, GROUND_PLANE_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: SLATE_900,
            perceptual_roughness: 0.1,
            metallic: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_PLANE_Y, 0.0),
    ));

    super::grid::create_ground_grid(commands, meshes, materials);
}

/// Line-list mesh tracing the 12 edges of a box of `size` centred on the origin.
pub fn box_edges_mesh(size: Vec3) -> Mesh {
    let h = size / 2.0;
    let vertices: Vec<[f32; 3]> = (0..8)
        .map(|i| {
            [
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            ]
        })
        .collect();

    // Pairs of corners differing in exactly one axis bit.
    let mut indices = Vec::with_capacity(24);
    for a in 0u32..8 {
        for bit in [1u32, 2, 4] {
            let b = a | bit;
            if b != a {
                indices.extend_from_slice(&[a, b]);
            }
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate(STRUCTURE_COUNT, Some(7));
        let b = generate(STRUCTURE_COUNT, Some(7));
        assert_eq!(a.len(), 65);
        assert_eq!(a, b);
        assert_ne!(a, generate(STRUCTURE_COUNT, Some(8)));
    }

    #[test]
    fn structures_respect_policy_ranges() {
        for seed in 0..20 {
            for s in generate(STRUCTURE_COUNT, Some(seed)) {
                let r = s.planar_radius();
                assert!((RADIUS_MIN - 1e-3..=RADIUS_MAX + 1e-3).contains(&r), "radius {r}");
                assert!((HEIGHT_MIN..=HEIGHT_MAX).contains(&s.size.y));
                assert!((WIDTH_MIN..=WIDTH_MAX).contains(&s.size.x));
                assert!((DEPTH_MIN..=DEPTH_MAX).contains(&s.size.z));
                let base = s.position.y - s.size.y / 2.0;
                assert!((base - GROUND_OFFSET).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn ids_are_positional_and_lookup_is_bounded() {
        let layout = BackdropLayout {
            structures: generate(5, Some(1)),
        };
        for (i, s) in layout.structures.iter().enumerate() {
            assert_eq!(s.id, i);
        }
        assert!(layout.structure(4).is_ok());
        assert!(matches!(
            layout.structure(5),
            Err(SimulationError::IndexOutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn box_edges_has_twelve_segments() {
        let mesh = box_edges_mesh(Vec3::ONE);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(24));
    }
}
