use super::*;
use crate::core::{EdgeRecord, MapLogEvent};
use crate::formats::ParseError;
use crate::render::RetainedScene;
use pollster::block_on;

const SMALL_MAP: &str = r#"{
    "MT.nodes": [
        {"id": "1", "x": 0, "y": 0, "z": 0, "layer": "Strecke"},
        {"id": "2", "x": 10, "y": 0, "z": 0, "layer": "Strecke"},
        {"id": "3", "x": 10, "y": 5, "z": -2, "layer": "Strecke"}
    ],
    "MT.edges": [
        {"id": "a", "from": "1", "to": "2", "layer": "Strecke"},
        {"id": "b", "from": "2", "to": "3", "layer": "Strecke"}
    ]
}"#;

fn model() -> MapModel<RetainedScene> {
    MapModel::new(RetainedScene::new(false), MapSettings::default())
}

fn csv_parser(raw: &[u8], sink: &mut dyn FnMut(MapElement)) -> Result<(), ParseError> {
    let text = std::str::from_utf8(raw)?;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.split(';').collect();
        let [id, x, y, z] = fields.as_slice() else {
            return Err(ParseError::Invalid(format!("Zeile '{}'", line)));
        };
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| ParseError::Invalid(format!("keine Zahl: '{}'", v)))
        };
        sink(MapElement::Node(NodeRecord::new(
            *id,
            parse(x)?,
            parse(y)?,
            parse(z)?,
        )));
    }
    Ok(())
}

#[test]
fn test_file_extension() {
    assert_eq!(file_extension("karte.JSON"), "json");
    assert_eq!(file_extension("a.b.dxf"), "dxf");
    assert_eq!(file_extension("ohne_punkt"), "");
    assert_eq!(file_extension(".versteckt"), "");
    assert_eq!(file_extension("ende."), "");
}

#[test]
fn test_parse_json_populates_layers() {
    let mut model = model();
    assert_eq!(model.state(), MapState::Empty);

    let outcome = model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");
    assert_eq!(
        outcome,
        ParseOutcome::Parsed {
            elements: 5,
            rejected: 0
        }
    );
    assert_eq!(model.state(), MapState::Populated);
    assert_eq!(model.node_count(), 3);
    assert_eq!(model.edge_count(), 2);
    assert_eq!(model.info().filename.as_deref(), Some("karte.json"));
    assert!(model.layer("Strecke").is_some());
}

#[test]
fn test_missing_extension_is_skipped() {
    let mut model = model();
    let outcome = model.parse_map_data(b"{}", "karte");
    assert_eq!(
        outcome,
        ParseOutcome::Skipped(IngestError::MissingExtension("karte".to_string()))
    );
    assert!(model.is_empty());
}

#[test]
fn test_pending_parse_runs_when_parser_arrives() {
    let mut model = model();
    let events = model.subscribe();

    let outcome = model.parse_map_data(b"1;0;0;0\n", "alt.csv");
    assert_eq!(
        outcome,
        ParseOutcome::Deferred {
            extension: "csv".to_string()
        }
    );
    // Neuere Daten ersetzen die zurückgehaltenen
    model.parse_map_data(b"1;0;0;0\n2;1;1;1\n", "neu.csv");
    assert_eq!(model.pending_filename(), Some("neu.csv"));
    assert!(model.is_empty());

    let outcome = model.add_parser("CSV", csv_parser);
    assert_eq!(
        outcome,
        Some(ParseOutcome::Parsed {
            elements: 2,
            rejected: 0
        })
    );
    assert_eq!(model.pending_filename(), None);
    assert_eq!(model.layer(DEFAULT_LAYER).map(|l| l.nodes.len()), Some(2));

    let keys: Vec<&str> = events.try_iter().map(|e| e.key()).collect();
    assert!(keys.contains(&"MAP.PARSER_PENDING"));
    assert!(keys.contains(&"MAP.PARSING_DONE"));
}

#[test]
fn test_unrelated_parser_keeps_pending_data() {
    let mut model = model();
    model.parse_map_data(b"1;0;0;0", "karte.csv");
    assert_eq!(model.add_parser("dxf", csv_parser), None);
    assert_eq!(model.pending_filename(), Some("karte.csv"));
}

#[test]
fn test_parser_failure_discards_partial_elements() {
    let mut model = model();
    model.add_parser("csv", csv_parser);

    let outcome = model.parse_map_data(b"1;0;0;0\nkaputt\n", "karte.csv");
    assert!(matches!(
        outcome,
        ParseOutcome::Skipped(IngestError::ParserFailed { .. })
    ));
    assert!(model.is_empty());
    assert_eq!(model.state(), MapState::Empty);
}

#[test]
fn test_invalid_elements_are_rejected_individually() {
    let mut model = model();
    let events = model.subscribe();
    let raw = br#"{"MT.nodes": [
        {"id": "", "x": 0, "y": 0, "z": 0},
        {"id": "ok", "x": 1, "y": 2, "z": 3}
    ]}"#;

    let outcome = model.parse_map_data(raw, "karte.json");
    assert_eq!(
        outcome,
        ParseOutcome::Parsed {
            elements: 1,
            rejected: 1
        }
    );
    assert!(events
        .try_iter()
        .any(|e| matches!(e, MapLogEvent::ElementRejected { .. })));
}

#[test]
fn test_first_layer_definition_wins() {
    let mut model = model();
    let mut first = LayerDef::named("L");
    first.priority = 3;
    let mut second = LayerDef::named("L");
    second.priority = 7;

    model.add_element(MapElement::Layer(first)).expect("Layer");
    model.add_element(MapElement::Layer(second)).expect("Layer");
    assert_eq!(model.layer("L").map(|l| l.priority), Some(3));
}

#[test]
fn test_draw_map_creates_primitives_in_scene() {
    let mut model = model();
    model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");

    let report = block_on(model.draw_map());
    assert_eq!(report.layers, 1);
    assert_eq!(report.nodes, 3);
    assert_eq!(report.edges, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(model.scene().primitive_count(), 5);
    assert_eq!(model.scene().layer_count(), 1);

    // Erneutes Zeichnen ersetzt, statt zu verdoppeln
    let nodes_before = model.scene().live_node_count();
    block_on(model.draw_map());
    assert_eq!(model.scene().primitive_count(), 5);
    assert_eq!(model.scene().live_node_count(), nodes_before);
}

#[test]
fn test_draw_map_skips_edges_with_missing_endpoint() {
    let mut model = model();
    let events = model.subscribe();
    model
        .add_element(MapElement::Node(NodeRecord::new("1", 0.0, 0.0, 0.0)))
        .expect("Node");
    model
        .add_element(MapElement::Edge(EdgeRecord::new("e", "1", "fehlt")))
        .expect("Edge");

    let report = block_on(model.draw_map());
    assert_eq!(report.nodes, 1);
    assert_eq!(report.edges, 0);
    assert_eq!(report.skipped, 1);
    assert!(events.try_iter().any(|e| matches!(
        e,
        MapLogEvent::EdgeSkipped { ref missing, .. } if missing == "fehlt"
    )));
}

#[test]
fn test_ignored_layers_are_not_drawn() {
    let settings = MapSettings {
        ignored_layers: vec!["Strecke".to_string()],
        ..MapSettings::default()
    };
    let mut model = MapModel::new(RetainedScene::new(false), settings);
    model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");

    let report = block_on(model.draw_map());
    assert_eq!(report.layers, 0);
    assert_eq!(model.scene().primitive_count(), 0);
    assert_eq!(model.node_count(), 3);

    assert!(model.set_layer_ignored("Strecke", false));
    assert!(model.settings().ignored_layers.is_empty());
    block_on(model.draw_map());
    assert_eq!(model.scene().primitive_count(), 5);

    assert!(model.set_layer_ignored("Strecke", true));
    assert_eq!(model.scene().primitive_count(), 0);
    assert_eq!(model.settings().ignored_layers, vec!["Strecke".to_string()]);
}

#[test]
fn test_readding_drawn_element_releases_old_primitive() {
    let mut model = model();
    model
        .add_element(MapElement::Node(NodeRecord::new("1", 0.0, 0.0, 0.0)))
        .expect("Node");
    block_on(model.draw_map());
    assert_eq!(model.scene().primitive_count(), 1);

    model
        .add_element(MapElement::Node(NodeRecord::new("1", 5.0, 0.0, 0.0)))
        .expect("Node");
    assert_eq!(model.scene().primitive_count(), 0);
    assert_eq!(model.node_count(), 1);
}

#[test]
fn test_extrapolate_to_grid_builds_grid_layer() {
    let mut model = model();
    model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");

    let target = model.extrapolate_to_grid("Strecke").expect("Layer existiert");
    assert_eq!(target, "Strecke_extrapolated");
    let grid = model.layer(&target).expect("Gitter-Layer");
    assert_eq!(grid.grid_lines.len(), 2);
    assert_eq!(grid.nodes.len(), 3);
    assert!(grid.grid_lines.contains_key("a_Strecke_extrapolated"));
    assert!(grid.nodes.contains_key("1_Strecke_extrapolated"));

    block_on(model.draw_map());
    let drawn = model.scene().primitive_count();

    // Erneutes Extrapolieren baut den Layer neu auf
    model.extrapolate_to_grid("Strecke").expect("Layer existiert");
    assert_eq!(model.layer(&target).map(|l| l.grid_lines.len()), Some(2));
    block_on(model.draw_map());
    assert_eq!(model.scene().primitive_count(), drawn);

    assert_eq!(
        model.extrapolate_to_grid("gibt_es_nicht"),
        Err(IngestError::UnknownLayer("gibt_es_nicht".to_string()))
    );
}

#[test]
fn test_export_contains_all_layers() {
    let mut model = model();
    model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");
    model.extrapolate_to_grid("Strecke").expect("Layer existiert");

    let export = model.get_map_data_for_export();
    assert_eq!(export.nodes.len(), 6);
    assert_eq!(export.edges.len(), 2);
    assert_eq!(export.grids.len(), 2);

    let only = model.export_layers(&["Strecke", "unbekannt"]);
    assert_eq!(only.element_count(), 5);
}

#[test]
fn test_bounds_prefer_header_extents() {
    let mut model = model();
    model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");
    assert_eq!(
        model.bounds(),
        Some((DVec3::new(0.0, 0.0, -2.0), DVec3::new(10.0, 5.0, 0.0)))
    );

    model
        .add_element(MapElement::Header(MapHeader {
            ext_min: Some(DVec3::splat(-100.0)),
            ext_max: Some(DVec3::splat(100.0)),
            ..MapHeader::default()
        }))
        .expect("Header");
    assert_eq!(
        model.bounds(),
        Some((DVec3::splat(-100.0), DVec3::splat(100.0)))
    );
}

#[test]
fn test_destroy_map_releases_scene() {
    let mut model = model();
    let events = model.subscribe();
    model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");
    block_on(model.draw_map());

    model.destroy_map();
    assert!(model.is_empty());
    assert_eq!(model.state(), MapState::Empty);
    assert_eq!(model.scene().live_node_count(), 0);
    assert!(events.try_iter().any(|e| e == MapLogEvent::Removing));
}

#[test]
fn test_layer_setters_reach_scene() {
    let mut model = model();
    model.parse_map_data(SMALL_MAP.as_bytes(), "karte.json");
    block_on(model.draw_map());
    let handle = model
        .layer("Strecke")
        .and_then(|l| l.scene)
        .expect("gezeichnet");

    let red = Rgb::new(1.0, 0.0, 0.0);
    assert!(model.set_layer_visible("Strecke", false));
    assert!(model.set_layer_priority("Strecke", 4));
    assert!(model.set_layer_color("Strecke", red));
    assert!(!model.set_layer_color("unbekannt", red));

    let state = model.scene().layer_state(handle).expect("Layer in der Szene");
    assert!(!state.visible);
    assert_eq!(state.priority, 4);
    assert_eq!(state.color, red);
}
