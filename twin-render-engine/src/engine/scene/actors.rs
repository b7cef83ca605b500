//! Step-dependent scene actors: the main building and the four narrative props.
//!
//! [`ActorVisualState::for_step`] is the whole policy. The systems below
//! re-apply it every frame from the latest session step, so the scene can
//! never drift from the logical state.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use constants::render_settings::*;

use super::backdrop::box_edges_mesh;
use super::reveal::ShaftReveal;
use crate::engine::simulation::{SimulationSession, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingLook {
    Neutral,
    Highlighted,
}

/// Visible actors and their look for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorVisualState {
    pub building: BuildingLook,
    pub issue_marker: bool,
    pub elevator_shaft: bool,
    pub conflict_beacon: bool,
    pub finished_module: bool,
    pub auto_rotate: bool,
}

impl ActorVisualState {
    pub fn for_step(step: Step) -> Self {
        let s = step.value();
        Self {
            building: if s >= 1 {
                BuildingLook::Highlighted
            } else {
                BuildingLook::Neutral
            },
            issue_marker: s == 1,
            elevator_shaft: s == 2 || s == 3,
            conflict_beacon: s == 3,
            finished_module: s == 4,
            auto_rotate: s == 0,
        }
    }

    pub fn is_visible(&self, actor: SceneActor) -> bool {
        match actor {
            SceneActor::MainBuilding => true,
            SceneActor::IssueMarker => self.issue_marker,
            SceneActor::ElevatorShaft => self.elevator_shaft,
            SceneActor::ConflictBeacon => self.conflict_beacon,
            SceneActor::FinishedModule => self.finished_module,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneActor {
    MainBuilding,
    IssueMarker,
    ElevatorShaft,
    ConflictBeacon,
    FinishedModule,
}

/// Parts of the main building whose material follows [`BuildingLook`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingPart {
    Body,
    Edges,
    WindowPanel,
}

/// Bobbing and pulsing motion around a fixed anchor.
#[derive(Component)]
pub struct Floating {
    pub anchor: Vec3,
    pub speed: f32,
}

/// Neutral and highlighted materials for each building part.
#[derive(Resource)]
pub struct BuildingMaterials {
    body: [Handle<StandardMaterial>; 2],
    edges: [Handle<StandardMaterial>; 2],
    panel: [Handle<StandardMaterial>; 2],
}

impl BuildingMaterials {
    fn get(&self, part: BuildingPart, look: BuildingLook) -> &Handle<StandardMaterial> {
        let slot = match look {
            BuildingLook::Neutral => 0,
            BuildingLook::Highlighted => 1,
        };
        match part {
            BuildingPart::Body => &self.body[slot],
            BuildingPart::Edges => &self.edges[slot],
            BuildingPart::WindowPanel => &self.panel[slot],
        }
    }
}

pub fn spawn_scene_actors(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let building_materials = create_building_materials(&mut materials);
    spawn_main_building(&mut commands, &mut meshes, &building_materials);
    commands.insert_resource(building_materials);

    commands.spawn((
        Name::new("IssueMarker"),
        SceneActor::IssueMarker,
        Floating {
            anchor: MARKER_CENTER,
            speed: MARKER_FLOAT_SPEED,
        },
        Mesh3d(meshes.add(Sphere::new(MARKER_RADIUS).mesh().uv(32, 32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: ROSE,
            emissive: ROSE.to_linear() * MARKER_EMISSIVE,
            ..default()
        })),
        Transform::from_translation(MARKER_CENTER),
        Visibility::Hidden,
    ));

    commands.spawn((
        Name::new("ElevatorShaft"),
        SceneActor::ElevatorShaft,
        ShaftReveal::default(),
        Mesh3d(meshes.add(Cuboid::from_size(SHAFT_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: CYAN_SKY.with_alpha(0.8),
            alpha_mode: AlphaMode::Blend,
            emissive: CYAN_LIGHT.to_linear() * SHAFT_EMISSIVE,
            ..default()
        })),
        Transform::from_translation(SHAFT_ANCHOR).with_scale(Vec3::new(1.0, 0.0, 1.0)),
        Visibility::Hidden,
    ));

    commands.spawn((
        Name::new("ConflictBeacon"),
        SceneActor::ConflictBeacon,
        Mesh3d(meshes.add(Cylinder::new(BEACON_RADIUS, BEACON_LENGTH))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: RED,
            emissive: RED.to_linear() * BEACON_EMISSIVE,
            ..default()
        })),
        Transform::from_translation(BEACON_CENTER)
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
        Visibility::Hidden,
    ));

    commands.spawn((
        Name::new("FinishedModule"),
        SceneActor::FinishedModule,
        Mesh3d(meshes.add(Cuboid::from_size(MODULE_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            metallic: 1.0,
            perceptual_roughness: 0.0,
            emissive: LinearRgba::WHITE * MODULE_EMISSIVE,
            ..default()
        })),
        Transform::from_translation(SHAFT_ANCHOR),
        Visibility::Hidden,
    ));
}

fn create_building_materials(materials: &mut Assets<StandardMaterial>) -> BuildingMaterials {
    let body = |color: Color, alpha: f32| StandardMaterial {
        base_color: color.with_alpha(alpha),
        alpha_mode: if alpha < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        perceptual_roughness: 0.01,
        metallic: 1.0,
        ..default()
    };
    let edges = |color: Color| StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    };
    let panel = |color: Color, emissive: LinearRgba| StandardMaterial {
        base_color: color.with_alpha(0.9),
        alpha_mode: AlphaMode::Blend,
        emissive,
        ..default()
    };

    BuildingMaterials {
        body: [
            materials.add(body(SLATE_600, 1.0)),
            materials.add(body(CYAN_SKY, 0.7)),
        ],
        edges: [materials.add(edges(SLATE_400)), materials.add(edges(CYAN_LIGHT))],
        panel: [
            materials.add(panel(SLATE_700, LinearRgba::BLACK)),
            materials.add(panel(
                CYAN_PALE,
                CYAN_LIGHT.to_linear() * WINDOW_PANEL_EMISSIVE,
            )),
        ],
    }
}

fn spawn_main_building(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    building_materials: &BuildingMaterials,
) {
    let look = BuildingLook::Neutral;
    let panel_mesh = meshes.add(Rectangle::new(WINDOW_PANEL_SIZE, WINDOW_PANEL_SIZE));
    let half = MAIN_BUILDING_SIZE / 2.0;

    commands
        .spawn((
            Name::new("MainBuilding"),
            SceneActor::MainBuilding,
            BuildingPart::Body,
            Mesh3d(meshes.add(Cuboid::from_size(MAIN_BUILDING_SIZE))),
            MeshMaterial3d(building_materials.get(BuildingPart::Body, look).clone()),
            Transform::from_translation(MAIN_BUILDING_CENTER),
        ))
        .with_children(|parent| {
            parent.spawn((
                BuildingPart::Edges,
                Mesh3d(meshes.add(box_edges_mesh(MAIN_BUILDING_SIZE + Vec3::splat(0.05)))),
                MeshMaterial3d(building_materials.get(BuildingPart::Edges, look).clone()),
            ));

            for floor in 0..WINDOW_PANEL_FLOORS {
                for column in 0..WINDOW_PANEL_COLUMNS {
                    parent.spawn((
                        BuildingPart::WindowPanel,
                        Mesh3d(panel_mesh.clone()),
                        MeshMaterial3d(
                            building_materials
                                .get(BuildingPart::WindowPanel, look)
                                .clone(),
                        ),
                        Transform::from_translation(window_panel_offset(floor, column, half)),
                    ));
                }
            }
        });
}

/// Panel centre relative to the building centre; panels sit just proud of the front face.
fn window_panel_offset(floor: u32, column: u32, half_size: Vec3) -> Vec3 {
    let columns_span = (WINDOW_PANEL_COLUMNS - 1) as f32 * WINDOW_PANEL_SPACING;
    Vec3::new(
        -columns_span / 2.0 + column as f32 * WINDOW_PANEL_SPACING,
        -2.0 + floor as f32 * WINDOW_PANEL_SPACING,
        half_size.z + 0.02,
    )
}

/// Show or hide each actor for the current step.
pub fn apply_actor_visibility(
    session: Res<SimulationSession>,
    mut actors: Query<(&SceneActor, &mut Visibility)>,
) {
    let state = ActorVisualState::for_step(session.current_step());
    for (actor, mut visibility) in &mut actors {
        let wanted = if state.is_visible(*actor) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);
    }
}

/// Swap main building materials between the neutral and highlighted sets.
pub fn apply_building_look(
    session: Res<SimulationSession>,
    building_materials: Res<BuildingMaterials>,
    mut parts: Query<(&BuildingPart, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let look = ActorVisualState::for_step(session.current_step()).building;
    for (part, mut material) in &mut parts {
        let wanted = building_materials.get(*part, look);
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

pub fn animate_floating(time: Res<Time>, mut query: Query<(&Floating, &mut Transform)>) {
    let t = time.elapsed_secs();
    for (floating, mut transform) in &mut query {
        let phase = t * floating.speed;
        transform.translation = floating.anchor + Vec3::Y * (phase * 0.5).sin() * 0.25;
        transform.rotation = Quat::from_rotation_y(phase * 0.25)
            * Quat::from_rotation_x((phase * 0.3).sin() * 0.25);
        let wobble = 1.0 + (phase * 1.5).sin() * 0.08;
        transform.scale = Vec3::new(wobble, 2.0 - wobble, wobble);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(step: u8) -> ActorVisualState {
        ActorVisualState::for_step(Step::new(step).unwrap())
    }

    #[test]
    fn idle_is_neutral_and_rotating() {
        let s = state(0);
        assert_eq!(s.building, BuildingLook::Neutral);
        assert!(s.auto_rotate);
        assert!(!s.issue_marker && !s.elevator_shaft && !s.conflict_beacon && !s.finished_module);
    }

    #[test]
    fn actor_table_per_step() {
        let rows: Vec<(bool, bool, bool, bool)> = (1..=4)
            .map(|step| {
                let s = state(step);
                assert_eq!(s.building, BuildingLook::Highlighted);
                assert!(!s.auto_rotate);
                (
                    s.issue_marker,
                    s.elevator_shaft,
                    s.conflict_beacon,
                    s.finished_module,
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                (true, false, false, false),
                (false, true, false, false),
                (false, true, true, false),
                (false, false, false, true),
            ]
        );
    }

    #[test]
    fn main_building_is_always_visible() {
        for step in 0..=4 {
            assert!(state(step).is_visible(SceneActor::MainBuilding));
        }
    }

    #[test]
    fn window_panels_form_a_centred_grid() {
        let half = MAIN_BUILDING_SIZE / 2.0;
        let left = window_panel_offset(0, 0, half);
        let right = window_panel_offset(0, WINDOW_PANEL_COLUMNS - 1, half);
        assert!((left.x + right.x).abs() < 1e-5);
        assert!((left.x + 1.2).abs() < 1e-5);
        assert!((window_panel_offset(4, 1, half).y - 2.8).abs() < 1e-5);
        assert!((left.z - 1.02).abs() < 1e-5);
    }

    #[test]
    fn visibility_system_tracks_session_step() {
        let mut app = App::new();
        app.init_resource::<SimulationSession>()
            .add_systems(Update, apply_actor_visibility);
        let marker = app
            .world_mut()
            .spawn((SceneActor::IssueMarker, Visibility::Hidden))
            .id();
        let building = app
            .world_mut()
            .spawn((SceneActor::MainBuilding, Visibility::Hidden))
            .id();

        app.update();
        assert_eq!(app.world().get::<Visibility>(marker), Some(&Visibility::Hidden));
        assert_eq!(
            app.world().get::<Visibility>(building),
            Some(&Visibility::Inherited)
        );

        {
            let mut session = app.world_mut().resource_mut::<SimulationSession>();
            session.advance().unwrap();
            session.tick(std::time::Duration::from_secs(1));
        }
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(marker),
            Some(&Visibility::Inherited)
        );
    }
}
