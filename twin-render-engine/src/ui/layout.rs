use bevy::prelude::*;
use constants::phase::{PHASES, PhaseInfo};
use constants::render_settings::*;

use super::state::*;

const ASIDE_WIDTH: f32 = 360.0;

/// Text inside the phase panel fades with it. `base` is the fully visible colour.
#[derive(Component, Debug, Clone, Copy)]
pub struct PanelFade {
    pub base: Color,
}

fn glass() -> BackgroundColor {
    BackgroundColor(SLATE_900.with_alpha(0.85))
}

fn label(text: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

fn faded_label(
    text: impl Into<String>,
    size: f32,
    color: Color,
) -> (Text, TextFont, TextColor, PanelFade) {
    let (text, font, text_color) = label(text, size, color);
    (text, font, text_color, PanelFade { base: color })
}

// Spawns the full-screen shell over the 3D viewport
pub fn spawn_shell(mut commands: Commands) {
    commands
        .spawn((
            ShellRoot,
            Name::new("Shell"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                ..default()
            },
        ))
        .with_children(|root| {
            spawn_header(root);

            root.spawn((
                Name::new("Main"),
                Node {
                    flex_grow: 1.0,
                    min_height: Val::Px(0.0),
                    display: Display::Flex,
                    flex_direction: FlexDirection::Row,
                    ..default()
                },
            ))
            .with_children(|main| {
                spawn_viewport_overlays(main);
                spawn_aside(main);
            });

            spawn_footer(root);
        });
}

fn spawn_header(root: &mut ChildSpawnerCommands) {
    root.spawn((
        Name::new("Header"),
        glass(),
        BorderColor(Color::WHITE.with_alpha(0.1)),
        Node {
            width: Val::Percent(100.0),
            padding: UiRect::new(Val::Px(32.0), Val::Px(32.0), Val::Px(20.0), Val::Px(12.0)),
            border: UiRect::bottom(Val::Px(1.0)),
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(10.0),
            ..default()
        },
    ))
    .with_children(|header| {
        header
            .spawn(Node {
                display: Display::Flex,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                ..default()
            })
            .with_children(|row| {
                row.spawn(Node {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    ..default()
                })
                .with_children(|titles| {
                    titles.spawn(label(
                        "CIM+BIM Urban Renewal: Agent Simulation System",
                        20.0,
                        Color::WHITE,
                    ));
                    titles.spawn(label(
                        "KERNEL 6.0 STABLE / HIGH-RES SIMULATION",
                        10.0,
                        CYAN_LIGHT.with_alpha(0.8),
                    ));
                });

                row.spawn((
                    ResetButton,
                    Button,
                    Name::new("ResetButton"),
                    BackgroundColor(SLATE_800),
                    BorderColor(Color::WHITE.with_alpha(0.1)),
                    BorderRadius::all(Val::Px(4.0)),
                    Node {
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(6.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                ))
                .with_children(|btn| {
                    btn.spawn(label("Reset environment", 10.0, SLATE_200));
                });
            });

        spawn_stepper(header);
    });
}

fn spawn_stepper(header: &mut ChildSpawnerCommands) {
    header
        .spawn((
            Name::new("Stepper"),
            Node {
                width: Val::Percent(100.0),
                max_width: Val::Px(576.0),
                align_self: AlignSelf::Center,
                display: Display::Flex,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
        ))
        .with_children(|stepper| {
            // Track and fill sit behind the badges.
            stepper.spawn((
                BackgroundColor(SLATE_800),
                BorderRadius::all(Val::Px(2.0)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(0.0),
                    width: Val::Percent(100.0),
                    height: Val::Px(4.0),
                    ..default()
                },
            ));
            stepper.spawn((
                ProgressFill,
                BackgroundColor(CYAN_ACCENT),
                BorderRadius::all(Val::Px(2.0)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(0.0),
                    width: Val::Percent(0.0),
                    height: Val::Px(4.0),
                    ..default()
                },
            ));

            for phase in PHASES {
                spawn_stepper_badge(stepper, phase);
            }
        });
}

fn spawn_stepper_badge(stepper: &mut ChildSpawnerCommands, phase: &PhaseInfo) {
    stepper
        .spawn(Node {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|column| {
            column
                .spawn((
                    StepperBadge(phase.number),
                    BackgroundColor(SLATE_900),
                    BorderColor(SLATE_700),
                    BorderRadius::all(Val::Px(8.0)),
                    Node {
                        width: Val::Px(28.0),
                        height: Val::Px(28.0),
                        border: UiRect::all(Val::Px(1.0)),
                        display: Display::Flex,
                        align_items: AlignItems::Center,
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                ))
                .with_children(|badge| {
                    badge.spawn((
                        StepperGlyph(phase.number),
                        label(phase.icon.glyph(), 11.0, SLATE_500),
                    ));
                });
            column.spawn((
                StepperTitle(phase.number),
                label(phase.title.to_uppercase(), 8.0, SLATE_600),
            ));
        });
}

fn spawn_viewport_overlays(main: &mut ChildSpawnerCommands) {
    main.spawn((
        Name::new("Viewport"),
        Node {
            flex_grow: 1.0,
            min_width: Val::Px(0.0),
            height: Val::Percent(100.0),
            ..default()
        },
    ))
    .with_children(|viewport| {
        viewport
            .spawn((
                glass(),
                BorderColor(CYAN_SKY),
                BorderRadius::all(Val::Px(12.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(24.0),
                    left: Val::Px(24.0),
                    padding: UiRect::all(Val::Px(16.0)),
                    border: UiRect::left(Val::Px(4.0)),
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
            ))
            .with_children(|card| {
                card.spawn(label("ACTIVE BASE", 10.0, CYAN_LIGHT.with_alpha(0.7)));
                card.spawn(label("Beijing · Chenguangli renewal unit", 14.0, Color::WHITE));
            });

        viewport
            .spawn((
                BackgroundColor(Color::BLACK.with_alpha(0.6)),
                BorderColor(Color::WHITE.with_alpha(0.1)),
                BorderRadius::all(Val::Px(8.0)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(24.0),
                    right: Val::Px(24.0),
                    padding: UiRect::all(Val::Px(12.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::FlexEnd,
                    row_gap: Val::Px(6.0),
                    ..default()
                },
            ))
            .with_children(|readout| {
                for (key, value) in [
                    ("COORD", "39.8519 / 116.3762"),
                    ("STATUS", "SYNCED"),
                    ("LOD", "400_ULTRA"),
                ] {
                    readout
                        .spawn(Node {
                            column_gap: Val::Px(4.0),
                            ..default()
                        })
                        .with_children(|line| {
                            line.spawn(label(format!("{key}:"), 9.0, SLATE_400));
                            line.spawn(label(value, 9.0, CYAN_LIGHT));
                        });
                }
            });
    });
}

fn spawn_aside(main: &mut ChildSpawnerCommands) {
    main.spawn((
        Name::new("Aside"),
        glass(),
        BorderColor(Color::WHITE.with_alpha(0.1)),
        Node {
            width: Val::Px(ASIDE_WIDTH),
            height: Val::Percent(100.0),
            border: UiRect::left(Val::Px(1.0)),
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            ..default()
        },
    ))
    .with_children(|aside| {
        aside
            .spawn(Node {
                flex_grow: 1.0,
                min_height: Val::Px(0.0),
                padding: UiRect::all(Val::Px(24.0)),
                overflow: Overflow::clip_y(),
                ..default()
            })
            .with_children(|content| {
                spawn_idle_card(content);
                spawn_phase_panel(content);
            });

        spawn_console(aside);
        spawn_action_button(aside);
    });
}

fn spawn_idle_card(content: &mut ChildSpawnerCommands) {
    content
        .spawn((
            IdleCard,
            Name::new("IdleCard"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
        ))
        .with_children(|card| {
            card.spawn((
                BackgroundColor(CYAN_SKY.with_alpha(0.1)),
                BorderColor(CYAN_SKY.with_alpha(0.2)),
                BorderRadius::MAX,
                Node {
                    width: Val::Px(80.0),
                    height: Val::Px(80.0),
                    border: UiRect::all(Val::Px(1.0)),
                    display: Display::Flex,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
            ))
            .with_children(|icon| {
                icon.spawn(faded_label(">", 32.0, CYAN_LIGHT));
            });
            card.spawn(faded_label("Simulation engine ready", 20.0, Color::WHITE));
            card.spawn(faded_label(
                "Launch the CIM+BIM joint simulation from the control panel below.",
                12.0,
                SLATE_400,
            ));
        });
}

fn spawn_phase_panel(content: &mut ChildSpawnerCommands) {
    content
        .spawn((
            PhasePanel,
            Name::new("PhasePanel"),
            Node {
                width: Val::Percent(100.0),
                display: Display::None,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(24.0),
                ..default()
            },
        ))
        .with_children(|panel| {
            panel
                .spawn(Node {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(10.0),
                    ..default()
                })
                .with_children(|heading| {
                    heading
                        .spawn((
                            BackgroundColor(CYAN_SKY.with_alpha(0.2)),
                            BorderColor(CYAN_SKY.with_alpha(0.3)),
                            BorderRadius::all(Val::Px(4.0)),
                            Node {
                                align_self: AlignSelf::FlexStart,
                                padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ))
                        .with_children(|tag| {
                            tag.spawn((PhaseTag, faded_label("PHASE 01", 10.0, CYAN_LIGHT)));
                        });
                    heading.spawn((PhaseTitle, faded_label("", 28.0, Color::WHITE)));
                    heading.spawn((PhaseDescription, faded_label("", 13.0, SLATE_400)));
                });

            panel
                .spawn(Node {
                    display: Display::Flex,
                    column_gap: Val::Px(16.0),
                    ..default()
                })
                .with_children(|stats| {
                    for (caption, value) in [
                        ("COMPONENT PRECISION", "LOD 400"),
                        ("RESPONSE LATENCY", "1.2ms"),
                    ] {
                        stats
                            .spawn((
                                BackgroundColor(SLATE_900.with_alpha(0.6)),
                                BorderColor(Color::WHITE.with_alpha(0.05)),
                                BorderRadius::all(Val::Px(12.0)),
                                Node {
                                    flex_grow: 1.0,
                                    padding: UiRect::all(Val::Px(16.0)),
                                    border: UiRect::all(Val::Px(1.0)),
                                    display: Display::Flex,
                                    flex_direction: FlexDirection::Column,
                                    row_gap: Val::Px(4.0),
                                    ..default()
                                },
                            ))
                            .with_children(|card| {
                                card.spawn(faded_label(caption, 9.0, SLATE_500));
                                card.spawn(faded_label(value, 20.0, CYAN_LIGHT));
                            });
                    }
                });

            panel
                .spawn((
                    BorderColor(Color::WHITE.with_alpha(0.05)),
                    Node {
                        padding: UiRect::top(Val::Px(24.0)),
                        border: UiRect::top(Val::Px(1.0)),
                        display: Display::Flex,
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(12.0),
                        ..default()
                    },
                ))
                .with_children(|stack| {
                    stack.spawn(faded_label("STACK PROCESSING", 10.0, SLATE_500));
                    for phase in PHASES {
                        spawn_stack_row(stack, phase);
                    }
                });
        });
}

fn spawn_stack_row(stack: &mut ChildSpawnerCommands, phase: &PhaseInfo) {
    stack
        .spawn((
            StackRow(phase.number),
            BackgroundColor(SLATE_900.with_alpha(0.2)),
            BorderColor(Color::WHITE.with_alpha(0.05)),
            BorderRadius::all(Val::Px(12.0)),
            Node {
                padding: UiRect::all(Val::Px(14.0)),
                border: UiRect::all(Val::Px(1.0)),
                display: Display::Flex,
                align_items: AlignItems::Center,
                column_gap: Val::Px(16.0),
                ..default()
            },
        ))
        .with_children(|row| {
            row.spawn((
                BackgroundColor(SLATE_800),
                BorderRadius::all(Val::Px(4.0)),
                Node {
                    width: Val::Px(24.0),
                    height: Val::Px(24.0),
                    display: Display::Flex,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
            ))
            .with_children(|index| {
                index.spawn((
                    StackIndex(phase.number),
                    faded_label(phase.number.to_string(), 10.0, SLATE_500),
                ));
            });
            row.spawn((
                StackTitle(phase.number),
                faded_label(format!("{} unit", phase.title), 12.0, SLATE_600),
            ));
        });
}

fn spawn_console(aside: &mut ChildSpawnerCommands) {
    aside
        .spawn((
            Name::new("Console"),
            BackgroundColor(Color::BLACK.with_alpha(0.8)),
            BorderColor(Color::WHITE.with_alpha(0.1)),
            Node {
                height: Val::Px(192.0),
                padding: UiRect::all(Val::Px(20.0)),
                border: UiRect::top(Val::Px(1.0)),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                ..default()
            },
        ))
        .with_children(|console| {
            console
                .spawn((
                    BorderColor(Color::WHITE.with_alpha(0.1)),
                    Node {
                        padding: UiRect::bottom(Val::Px(8.0)),
                        border: UiRect::bottom(Val::Px(1.0)),
                        display: Display::Flex,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                ))
                .with_children(|bar| {
                    bar.spawn(label("CONSOLE LOG", 10.0, CYAN_LIGHT));
                    bar.spawn((
                        BackgroundColor(CYAN_SKY),
                        BorderRadius::all(Val::Px(2.0)),
                        Node {
                            padding: UiRect::horizontal(Val::Px(4.0)),
                            ..default()
                        },
                    ))
                    .with_children(|tag| {
                        tag.spawn(label("LIVE", 8.0, Color::BLACK));
                    });
                });

            // Newest lines are kept in view by anchoring the column to the bottom.
            console
                .spawn(Node {
                    flex_grow: 1.0,
                    min_height: Val::Px(0.0),
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::FlexEnd,
                    overflow: Overflow::clip_y(),
                    ..default()
                })
                .with_children(|scroll| {
                    scroll.spawn((
                        ConsoleLines,
                        Node {
                            display: Display::Flex,
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(6.0),
                            ..default()
                        },
                    ));
                    scroll.spawn((
                        ConsoleCursor,
                        BackgroundColor(CYAN_SKY),
                        Node {
                            width: Val::Px(8.0),
                            height: Val::Px(14.0),
                            margin: UiRect::left(Val::Px(4.0)),
                            ..default()
                        },
                    ));
                });
        });
}

fn spawn_action_button(aside: &mut ChildSpawnerCommands) {
    aside
        .spawn(Node {
            padding: UiRect::all(Val::Px(24.0)),
            ..default()
        })
        .with_children(|area| {
            area.spawn((
                ActionButton,
                Button,
                Name::new("ActionButton"),
                BackgroundColor(ActionButtonState::Start.background()),
                BorderRadius::all(Val::Px(16.0)),
                Node {
                    width: Val::Percent(100.0),
                    padding: UiRect::vertical(Val::Px(20.0)),
                    display: Display::Flex,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
            ))
            .with_children(|btn| {
                btn.spawn((
                    ActionLabel,
                    label(ActionButtonState::Start.label(), 18.0, Color::WHITE),
                ));
            });
        });
}

fn spawn_footer(root: &mut ChildSpawnerCommands) {
    root.spawn((
        Name::new("Footer"),
        glass(),
        BorderColor(Color::WHITE.with_alpha(0.1)),
        Node {
            height: Val::Px(48.0),
            padding: UiRect::horizontal(Val::Px(32.0)),
            border: UiRect::top(Val::Px(1.0)),
            display: Display::Flex,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::SpaceBetween,
            ..default()
        },
    ))
    .with_children(|footer| {
        footer
            .spawn(Node {
                column_gap: Val::Px(32.0),
                ..default()
            })
            .with_children(|left| {
                left.spawn(label("SYSTEM_OK", 10.0, SLATE_500));
                left.spawn(label("GPU_ACCEL", 10.0, SLATE_500));
            });
        footer
            .spawn(Node {
                column_gap: Val::Px(24.0),
                ..default()
            })
            .with_children(|right| {
                right.spawn(label("CORE v6.0_STABLE", 10.0, CYAN_SKY));
                right.spawn(label("© DIGITAL TWIN INTERFACE", 10.0, SLATE_500.with_alpha(0.4)));
            });
    });
}
