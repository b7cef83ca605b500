//! 2D labels pinned to 3D actor positions.

use bevy::prelude::*;
use constants::render_settings::*;

use super::actors::{ActorVisualState, SceneActor};
use crate::engine::simulation::SimulationSession;

#[derive(Component, Debug, Clone, Copy)]
pub struct WorldLabel {
    pub actor: SceneActor,
    pub offset: Vec3,
    /// Centre the label on its anchor instead of hanging it from the top-left corner.
    pub centered: bool,
    /// Shrink with camera distance, like a sign in the world.
    pub scale_with_distance: bool,
}

/// Font size for a distance-scaled label.
pub fn label_font_size(distance: f32) -> f32 {
    (LABEL_FONT_SIZE * LABEL_DISTANCE_FACTOR / distance.max(1.0)).clamp(6.0, 28.0)
}

pub fn spawn_world_labels(mut commands: Commands) {
    spawn_label(
        &mut commands,
        WorldLabel {
            actor: SceneActor::ElevatorShaft,
            offset: SHAFT_LABEL_OFFSET,
            centered: false,
            scale_with_distance: true,
        },
        SHAFT_LABEL,
        CYAN_SKY,
        CYAN_PALE,
    );
    spawn_label(
        &mut commands,
        WorldLabel {
            actor: SceneActor::ConflictBeacon,
            offset: BEACON_LABEL_OFFSET,
            centered: true,
            scale_with_distance: false,
        },
        BEACON_LABEL,
        RED,
        RED_LIGHT,
    );
}

fn spawn_label(
    commands: &mut Commands,
    label: WorldLabel,
    text: &str,
    background: Color,
    border: Color,
) {
    commands.spawn((
        Name::new(format!("{:?}Label", label.actor)),
        label,
        Text::new(text),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(background),
        BorderColor(border),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            border: UiRect::all(Val::Px(2.0)),
            display: Display::None,
            ..default()
        },
        GlobalZIndex(10),
    ));
}

/// Project each label's anchor into the viewport and show it only while its actor is.
pub fn place_world_labels(
    session: Res<SimulationSession>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    actors: Query<(&SceneActor, &GlobalTransform)>,
    mut labels: Query<(&WorldLabel, &mut Node, &mut TextFont, &ComputedNode)>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let state = ActorVisualState::for_step(session.current_step());

    for (label, mut node, mut font, computed) in &mut labels {
        let anchor = actors
            .iter()
            .find(|(actor, _)| **actor == label.actor)
            .map(|(_, transform)| transform.translation() + label.offset);

        let screen = anchor
            .filter(|_| state.is_visible(label.actor))
            .and_then(|world| camera.world_to_viewport(camera_transform, world).ok());

        let Some(mut position) = screen else {
            if node.display != Display::None {
                node.display = Display::None;
            }
            continue;
        };

        if label.scale_with_distance {
            if let Some(world) = anchor {
                let size = label_font_size(camera_transform.translation().distance(world));
                if (font.font_size - size).abs() > 0.25 {
                    font.font_size = size;
                }
            }
        }
        if label.centered {
            position -= computed.size() * computed.inverse_scale_factor() / 2.0;
        }

        node.display = Display::Flex;
        node.left = Val::Px(position.x);
        node.top = Val::Px(position.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_shrinks_with_distance_within_bounds() {
        let near = label_font_size(20.0);
        let far = label_font_size(100.0);
        assert!(near > far);
        assert_eq!(label_font_size(0.0), 28.0);
        assert_eq!(label_font_size(10_000.0), 6.0);
    }
}
