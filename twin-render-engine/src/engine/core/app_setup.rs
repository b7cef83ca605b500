use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::camera::{PerspectiveProjection, Projection};
use constants::render_settings::*;

// Crate engine modules
use crate::engine::camera::orbit_camera::{OrbitCamera, camera_controller};
use crate::engine::core::SceneSettings;
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::ScenePlugin;
use crate::engine::simulation::SimulationPlugin;
use crate::engine::systems::fps_tracking::{FpsText, fps_notification_system};
// Host bridge and UI shell
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::ui::UiShellPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .insert_resource(ClearColor(BACKGROUND))
        .insert_resource(AmbientLight {
            color: CYAN_PALE,
            brightness: AMBIENT_BRIGHTNESS,
            ..default()
        })
        .init_resource::<SceneSettings>()
        .init_resource::<OrbitCamera>();

    // Session state first; scene and UI only read it.
    app.add_plugins(SimulationPlugin)
        .add_plugins(ScenePlugin)
        .add_plugins(UiShellPlugin)
        .add_plugins(WebRpcPlugin);

    app.add_systems(Startup, setup)
        .add_systems(Update, (camera_controller, fps_notification_system));

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: DIRECTIONAL_LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(DIRECTIONAL_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PointLight {
            color: CYAN_SKY,
            intensity: POINT_LIGHT_INTENSITY,
            range: 150.0,
            ..default()
        },
        Transform::from_translation(POINT_LIGHT_POSITION),
    ));
}

fn spawn_camera(commands: &mut Commands, orbit: &OrbitCamera) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        orbit.target_transform(),
        DistanceFog {
            color: BACKGROUND,
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands, orbit: Res<OrbitCamera>) {
    info!("=== CIM+BIM URBAN RENEWAL TWIN ===");
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands, &orbit);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: 11.0,
            ..default()
        },
        TextColor(SLATE_500),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(60.0),
            left: Val::Px(24.0),
            ..default()
        },
        FpsText,
    ));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
