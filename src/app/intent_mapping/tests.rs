use glam::DVec2;

use crate::app::{AppCommand, AppIntent, AppState, RotationAxis};
use crate::labels::{Label, NodeRef};

use super::map_intent_to_commands;

#[test]
fn drag_with_both_buttons_moves_camera() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::MouseDragged {
            delta: DVec2::new(3.0, -2.0),
            left: true,
            right: true,
        },
    );

    assert_eq!(
        commands,
        vec![
            AppCommand::MoveCamera {
                delta: DVec2::new(3.0, -2.0)
            },
            AppCommand::PublishFrame,
        ]
    );
}

#[test]
fn drag_with_left_button_rolls_camera() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::MouseDragged {
            delta: DVec2::new(4.0, 9.0),
            left: true,
            right: false,
        },
    );

    assert_eq!(commands.len(), 2);
    assert_eq!(
        commands[0],
        AppCommand::RotateCamera {
            axis: RotationAxis::Roll,
            degrees: 4.0
        }
    );
}

#[test]
fn drag_with_right_button_yaws_and_pitches_in_order() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::MouseDragged {
            delta: DVec2::new(1.0, 2.0),
            left: false,
            right: true,
        },
    );

    assert_eq!(commands.len(), 3);
    assert!(matches!(
        commands[0],
        AppCommand::RotateCamera {
            axis: RotationAxis::Yaw,
            ..
        }
    ));
    assert!(matches!(
        commands[1],
        AppCommand::RotateCamera {
            axis: RotationAxis::Pitch,
            ..
        }
    ));
    assert_eq!(commands[2], AppCommand::PublishFrame);
}

#[test]
fn click_after_drag_does_not_pick() {
    let state = AppState::new();

    let dragged = map_intent_to_commands(
        &state,
        AppIntent::CanvasClicked {
            position: DVec2::new(10.0, 10.0),
            dragged: true,
        },
    );
    let clicked = map_intent_to_commands(
        &state,
        AppIntent::CanvasClicked {
            position: DVec2::new(10.0, 10.0),
            dragged: false,
        },
    );

    assert!(dragged.is_empty());
    assert!(matches!(clicked[0], AppCommand::PickAt { .. }));
}

#[test]
fn invalid_layer_color_maps_to_nothing() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::LayerColorChanged {
            layer: "Strecke".into(),
            color: "blau".into(),
        },
    );

    assert!(commands.is_empty());
}

#[test]
fn degenerate_viewport_is_ignored() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::ViewportResized {
            size: DVec2::new(0.0, 600.0),
        },
    );

    assert!(commands.is_empty());
}

#[test]
fn upload_refreshes_map_list_afterwards() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::MapUploadRequested {
            name: "a.json".into(),
            data: b"{}".to_vec(),
        },
    );

    assert_eq!(commands.len(), 2);
    assert_eq!(commands[1], AppCommand::RefreshMapList);
}

#[test]
fn time_elapsed_only_advances_timers_with_labels() {
    let mut state = AppState::new();
    let tick = AppIntent::TimeElapsed { elapsed_ms: 100 };

    assert!(map_intent_to_commands(&state, tick.clone()).is_empty());

    state
        .labels
        .add(Label::new(NodeRef::new("L", "1"), vec!["1".into()]));
    assert_eq!(
        map_intent_to_commands(&state, tick),
        vec![AppCommand::AdvanceTimers { elapsed_ms: 100 }]
    );
}
