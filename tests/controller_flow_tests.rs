use std::path::PathBuf;

use glam::DVec2;
use minemap_editor::remote::DirectoryMapService;
use minemap_editor::{AppCommand, AppController, AppIntent, AppState, EditorOptions};

const CROSS_MAP: &str = r#"{
    "MT.nodes": [
        {"id": "west", "x": 0, "y": 0, "z": 0, "layer": "Punkte"},
        {"id": "mitte", "x": 5, "y": 0, "z": 0, "layer": "Punkte"},
        {"id": "ost", "x": 10, "y": 0, "z": 0, "layer": "Punkte"}
    ]
}"#;

const TUNNEL_MAP: &str = r#"{
    "MT.nodes": [
        {"id": "1", "x": 0, "y": 0, "z": 0, "layer": "Strecke"},
        {"id": "2", "x": 10, "y": 0, "z": 0, "layer": "Strecke"}
    ],
    "MT.edges": [
        {"id": "e", "from": "1", "to": "2", "layer": "Strecke"}
    ]
}"#;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("minemap_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("Temp-Verzeichnis");
    dir
}

fn box_options() -> EditorOptions {
    EditorOptions {
        drawing_primitive: false,
        ..EditorOptions::default()
    }
}

fn load(controller: &mut AppController, state: &mut AppState, name: &str, map: &str) {
    controller
        .handle_intent(
            state,
            AppIntent::MapDataReceived {
                filename: name.to_string(),
                data: map.as_bytes().to_vec(),
            },
        )
        .expect("Karte laden");
}

#[test]
fn test_initial_map_without_id_uses_fallback_location() {
    let dir = temp_dir("fallback");
    let fallback = dir.join("mapinfo.json");
    std::fs::write(&fallback, CROSS_MAP).expect("schreiben");

    let options = EditorOptions {
        fallback_map_location: fallback.to_string_lossy().into_owned(),
        ..box_options()
    };
    let mut state = AppState::with_options(options);
    let mut controller = AppController::new();

    controller
        .handle_intent(&mut state, AppIntent::InitialMapRequested)
        .expect("Rueckfallkarte");

    assert_eq!(state.node_count(), 3);
    assert_eq!(
        state.ui.loaded_file.as_ref().map(|f| f.name.as_str()),
        Some("mapinfo.json")
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_initial_map_prefers_configured_id_and_falls_back_on_error() {
    let dir = temp_dir("service");
    std::fs::write(dir.join("tunnel.json"), TUNNEL_MAP).expect("schreiben");
    let fallback = dir.join("rueckfall.txt");
    std::fs::write(&fallback, CROSS_MAP).expect("schreiben");
    let fallback_json = dir.join("rueckfall.json");
    std::fs::write(&fallback_json, CROSS_MAP).expect("schreiben");

    let configured = EditorOptions {
        default_map_id: Some("tunnel.json".into()),
        fallback_map_location: fallback_json.to_string_lossy().into_owned(),
        ..box_options()
    };
    let mut state =
        AppState::with_options(configured.clone()).with_map_service(DirectoryMapService::new(&dir));
    let mut controller = AppController::new();
    controller
        .handle_intent(&mut state, AppIntent::InitialMapRequested)
        .expect("Karte aus dem Dienst");
    assert_eq!(state.edge_count(), 1);
    assert!(state.ui.remote_error.is_none());

    let missing = EditorOptions {
        default_map_id: Some("gibt_es_nicht.json".into()),
        ..configured
    };
    let mut state =
        AppState::with_options(missing).with_map_service(DirectoryMapService::new(&dir));
    controller
        .handle_intent(&mut state, AppIntent::InitialMapRequested)
        .expect("Rueckfall");
    assert_eq!(state.node_count(), 3);
    assert_eq!(
        state.ui.remote_error.as_ref().map(|e| e.message.as_str()),
        Some("MAP.ERROR.MAPCENTER")
    );

    controller
        .handle_intent(&mut state, AppIntent::MapListRequested)
        .expect("Liste");
    assert_eq!(state.ui.map_list.len(), 2);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_click_selects_node_under_pointer_and_miss_clears_selection() {
    let mut state = AppState::with_options(box_options());
    let mut controller = AppController::new();
    load(&mut controller, &mut state, "kreuz.json", CROSS_MAP);

    let center = state.view.viewport * 0.5;
    controller
        .handle_intent(
            &mut state,
            AppIntent::CanvasClicked {
                position: center,
                dragged: false,
            },
        )
        .expect("Pick");

    let selected = state.ui.selected.clone().expect("Treffer");
    assert_eq!(selected.model_id, "mitte");
    let primitive = state
        .model
        .scene()
        .primitive_state(selected.primitive)
        .expect("Primitiv");
    assert!(primitive.selected);

    controller
        .handle_intent(
            &mut state,
            AppIntent::CanvasClicked {
                position: DVec2::new(1.0, 1.0),
                dragged: false,
            },
        )
        .expect("Pick");
    assert!(state.ui.selected.is_none());
    assert!(
        !state
            .model
            .scene()
            .primitive_state(selected.primitive)
            .expect("Primitiv")
            .selected
    );
}

#[test]
fn test_labels_spread_on_timer_ticks() {
    let near_map = r#"{
        "MT.nodes": [
            {"id": "a", "x": 0, "y": 0, "z": 0, "layer": "Punkte"},
            {"id": "b", "x": 0.01, "y": 0, "z": 0, "layer": "Punkte"},
            {"id": "c", "x": 30, "y": 30, "z": 0, "layer": "Punkte"}
        ]
    }"#;
    let mut state = AppState::with_options(box_options());
    let mut controller = AppController::new();
    load(&mut controller, &mut state, "nah.json", near_map);

    controller
        .handle_intent(
            &mut state,
            AppIntent::LayerLabelsRequested {
                layer: "Punkte".into(),
            },
        )
        .expect("Labels");
    assert_eq!(state.labels.len(), 3);
    for index in 0..3 {
        controller
            .handle_intent(
                &mut state,
                AppIntent::LabelMeasured {
                    index,
                    size: DVec2::new(60.0, 20.0),
                },
            )
            .expect("Groesse");
    }

    controller
        .handle_intent(&mut state, AppIntent::TimeElapsed { elapsed_ms: 300 })
        .expect("Tick");
    let a = state.labels.labels()[0].offset;
    let b = state.labels.labels()[1].offset;
    assert_ne!(a, DVec2::ZERO);
    assert!((a - b).length() > 0.0);

    controller
        .handle_intent(
            &mut state,
            AppIntent::AutomaticSpreadToggled { enabled: false },
        )
        .expect("Schalter");
    controller
        .handle_intent(&mut state, AppIntent::TimeElapsed { elapsed_ms: 300 })
        .expect("Tick");
    assert_eq!(state.labels.labels()[0].offset, a);
    assert!(!state.options.automatic_label_spread);
}

#[test]
fn test_ignored_layer_leaves_scene_and_returns() {
    let mut state = AppState::with_options(box_options());
    let mut controller = AppController::new();
    load(&mut controller, &mut state, "tunnel.json", TUNNEL_MAP);
    assert_eq!(state.model.scene().primitive_count(), 3);

    controller
        .handle_intent(
            &mut state,
            AppIntent::LayerIgnoreToggled {
                layer: "Strecke".into(),
                ignored: true,
            },
        )
        .expect("ignorieren");
    assert_eq!(state.model.scene().primitive_count(), 0);
    assert_eq!(state.options.ignored_layers, vec!["Strecke".to_string()]);

    controller
        .handle_intent(
            &mut state,
            AppIntent::LayerIgnoreToggled {
                layer: "Strecke".into(),
                ignored: false,
            },
        )
        .expect("wieder zeichnen");
    assert_eq!(state.model.scene().primitive_count(), 3);
    assert!(state.options.ignored_layers.is_empty());
}

#[test]
fn test_extrapolation_requires_option_and_redraws() {
    let mut state = AppState::with_options(box_options());
    let mut controller = AppController::new();
    load(&mut controller, &mut state, "tunnel.json", TUNNEL_MAP);

    let denied = controller.handle_intent(
        &mut state,
        AppIntent::ExtrapolateRequested {
            layer: "Strecke".into(),
        },
    );
    assert!(denied.is_err());
    assert_eq!(state.model.grid_count(), 0);

    state.options.allow_extrapolating = true;
    controller
        .handle_intent(
            &mut state,
            AppIntent::ExtrapolateRequested {
                layer: "Strecke".into(),
            },
        )
        .expect("extrapolieren");
    assert_eq!(state.model.grid_count(), 1);
    // 2 Nodes + 1 Kante, dazu 2 kopierte Nodes + 1 Gitterlinie
    assert_eq!(state.model.scene().primitive_count(), 6);

    let last = state.command_log.entries().last().expect("Eintrag");
    assert_eq!(
        last,
        &AppCommand::ExtrapolateLayer {
            layer: "Strecke".into()
        }
    );
}

#[test]
fn test_view_selection_and_reset() {
    let mut state = AppState::with_options(box_options());
    let mut controller = AppController::new();
    load(&mut controller, &mut state, "tunnel.json", TUNNEL_MAP);
    assert_eq!(state.view.camera.active_view(), Some("Top"));

    controller
        .handle_intent(
            &mut state,
            AppIntent::ViewSelected {
                name: "West-East".into(),
            },
        )
        .expect("Ansicht");
    assert_eq!(state.view.camera.active_view(), Some("West-East"));

    controller
        .handle_intent(&mut state, AppIntent::ResetCameraRequested)
        .expect("Reset");
    assert_eq!(state.view.camera.active_view(), None);
    assert_eq!(
        state.view.camera.position(),
        state.options.default_camera_position()
    );
}

#[test]
fn test_viewport_resize_updates_aspect() {
    let mut state = AppState::new();
    let mut controller = AppController::new();

    controller
        .handle_intent(
            &mut state,
            AppIntent::ViewportResized {
                size: DVec2::new(1200.0, 300.0),
            },
        )
        .expect("Groesse");
    assert_eq!(state.view.viewport, DVec2::new(1200.0, 300.0));
    assert!((state.view.camera.optics().aspect - 4.0).abs() < 1e-12);
    assert_eq!(
        state.model.scene().frame().map(|f| f.viewport),
        Some(DVec2::new(1200.0, 300.0))
    );
}
