use super::*;
use crate::core::{CameraPosition, MapElement, MapSettings, NodeRecord, OrbitCamera};
use crate::render::RetainedScene;

fn measured(id: &str, anchor: DVec2) -> Label {
    let mut label = Label::new(NodeRef::new("L", id), vec![id.to_string()])
        .with_size(DVec2::new(50.0, 20.0));
    label.anchor = anchor;
    label.visible = true;
    label
}

fn total_overlap(overlay: &LabelOverlay) -> f64 {
    let labels = overlay.labels();
    let mut area = 0.0;
    for i in 0..labels.len() {
        for j in (i + 1)..labels.len() {
            area += labels[i].overlap_area(&labels[j]);
        }
    }
    area
}

#[test]
fn test_add_replaces_label_of_same_node_in_place() {
    let mut overlay = LabelOverlay::new();
    overlay.add(measured("a", DVec2::ZERO));
    overlay.add(measured("b", DVec2::ZERO));

    let replacement = measured("a", DVec2::ZERO).with_kind("WLAN", "Access Point");
    assert_eq!(overlay.add(replacement), 0);
    assert_eq!(overlay.len(), 2);
    assert_eq!(overlay.labels()[0].kind, "WLAN");

    let node = NodeRef::new("L", "b");
    assert_eq!(overlay.index_of(&node), Some(1));
    assert!(overlay.remove(&node).is_some());
    assert!(overlay.find(&node).is_none());
    assert!(overlay.remove(&node).is_none());
}

#[test]
fn test_spread_converges_for_coincident_labels() {
    let mut overlay = LabelOverlay::new();
    overlay.add(measured("a", DVec2::new(100.0, 100.0)));
    overlay.add(measured("b", DVec2::new(100.0, 100.0)));

    let mut previous = total_overlap(&overlay);
    assert!(previous > 0.0);

    let mut resolved_at = None;
    for iteration in 0..60 {
        let collided = overlay.spread(1.0, 0.0);
        let area = total_overlap(&overlay);
        if previous > 0.0 {
            assert!(collided);
            assert!(area < previous, "Ueberlappung muss in Runde {} sinken", iteration);
        } else {
            assert_eq!(area, 0.0);
        }
        if area == 0.0 && resolved_at.is_none() {
            resolved_at = Some(iteration);
        }
        previous = area;
    }
    assert!(resolved_at.is_some());

    // Einmal aufgelöst, bewegt sich nichts mehr
    let offsets: Vec<DVec2> = overlay.labels().iter().map(|l| l.offset).collect();
    assert!(!overlay.spread(1.0, 0.0));
    let after: Vec<DVec2> = overlay.labels().iter().map(|l| l.offset).collect();
    assert_eq!(offsets, after);
}

#[test]
fn test_spread_skips_hovered_and_unmeasured_labels() {
    let mut overlay = LabelOverlay::new();
    overlay.add(measured("a", DVec2::new(10.0, 10.0)));
    overlay.add(measured("b", DVec2::new(12.0, 12.0)));
    overlay.add(Label::new(NodeRef::new("L", "c"), Vec::new()));
    overlay.set_hovered(0, true);

    assert!(overlay.spread(5.0, 0.0));
    assert_eq!(overlay.labels()[0].offset, DVec2::ZERO);
    assert_ne!(overlay.labels()[1].offset, DVec2::ZERO);
    assert_eq!(overlay.labels()[2].offset, DVec2::ZERO);
}

#[test]
fn test_placement_requires_label_inside_canvas() {
    let canvas = DVec2::new(800.0, 600.0);
    let mut overlay = LabelOverlay::new();
    overlay.add(measured("innen", DVec2::new(100.0, 100.0)));
    overlay.add(measured("rand", DVec2::new(780.0, 100.0)));
    overlay.add(measured("hinten", DVec2::new(100.0, 100.0)));
    overlay.label_mut(2).expect("Label").visible = false;

    assert_eq!(overlay.placement(0, canvas), Some(DVec2::new(100.0, 100.0)));
    assert!(overlay.labels()[0].in_margin);
    assert!(overlay.leader_line(0).is_some());

    assert_eq!(overlay.placement(1, canvas), None);
    assert!(!overlay.labels()[1].in_margin);
    assert!(overlay.leader_line(1).is_none());

    assert_eq!(overlay.placement(2, canvas), None);

    // Hover umgeht die Randprüfung
    overlay.set_hovered(1, true);
    assert_eq!(overlay.placement(1, canvas), Some(DVec2::new(780.0, 100.0)));
}

#[test]
fn test_leader_line_ends_at_label_center() {
    let mut overlay = LabelOverlay::new();
    let mut label = measured("a", DVec2::new(100.0, 100.0));
    label.offset = DVec2::new(10.0, -30.0);
    overlay.add(label);
    overlay.placement(0, DVec2::new(800.0, 600.0));

    let (from, to) = overlay.leader_line(0).expect("Linie");
    assert_eq!(from, DVec2::new(100.0, 100.0));
    assert_eq!(to, DVec2::new(135.0, 80.0));
}

#[test]
fn test_rotate_top_wraps_around() {
    let mut overlay = LabelOverlay::new();
    assert_eq!(overlay.rotate_top(), None);
    overlay.add(measured("a", DVec2::ZERO));
    overlay.add(measured("b", DVec2::ZERO));
    overlay.add(measured("c", DVec2::ZERO));

    let order: Vec<Option<usize>> = (0..4).map(|_| overlay.rotate_top()).collect();
    assert_eq!(order, vec![Some(1), Some(2), Some(0), Some(1)]);
    assert_eq!(overlay.top_index(), Some(1));
}

#[test]
fn test_drag_moves_offset_until_released() {
    let mut overlay = LabelOverlay::new();
    overlay.add(measured("a", DVec2::new(50.0, 50.0)));

    assert!(overlay.begin_drag(0, DVec2::new(200.0, 200.0)));
    assert!(overlay.drag_to(DVec2::new(230.0, 190.0)));
    assert_eq!(overlay.labels()[0].offset, DVec2::new(30.0, -10.0));
    assert!(overlay.labels()[0].dragged);

    overlay.end_drag();
    assert!(!overlay.labels()[0].dragged);
    assert!(!overlay.drag_to(DVec2::ZERO));
    assert_eq!(overlay.labels()[0].offset, DVec2::new(30.0, -10.0));
}

#[test]
fn test_background_colour_follows_active_flag() {
    let mut overlay = LabelOverlay::new();
    let mut label = measured("a", DVec2::ZERO);
    assert_eq!(overlay.background_colour(&label), "#FFFFFF");
    label.active = false;
    assert_eq!(overlay.background_colour(&label), "#A3A3A3");
    assert!(!overlay.is_maximized(&label));
    overlay.maximize_all = true;
    assert!(overlay.is_maximized(&label));
}

#[test]
fn test_project_and_retain_bound_follow_model() {
    let mut model = MapModel::new(RetainedScene::new(false), MapSettings::default());
    model
        .add_element(MapElement::Node(
            NodeRecord::new("vorne", 0.0, 0.0, 0.0).in_layer("L"),
        ))
        .expect("Node");
    model
        .add_element(MapElement::Node(
            NodeRecord::new("hinten", 0.0, 0.0, 50.0).in_layer("L"),
        ))
        .expect("Node");

    let mut camera = OrbitCamera::new(CameraPosition::new(
        DVec3::new(0.0, 0.0, 30.0),
        DVec3::ZERO,
        DVec3::Y,
    ));
    camera.fix_aspect(800.0, 600.0);
    let frame = camera.frame(DVec2::new(800.0, 600.0));

    let mut overlay = LabelOverlay::new();
    overlay.add(Label::new(NodeRef::new("L", "vorne"), Vec::new()));
    overlay.add(Label::new(NodeRef::new("L", "hinten"), Vec::new()));
    overlay.add(Label::new(NodeRef::new("L", "weg"), Vec::new()));
    overlay.project(&frame, &model);

    let front = &overlay.labels()[0];
    assert!(front.visible);
    assert!((front.anchor - DVec2::new(400.0, 300.0)).length() < 1e-6);
    assert!(!overlay.labels()[1].visible);
    assert!(!overlay.labels()[2].visible);

    assert_eq!(overlay.retain_bound(&model), 1);
    assert_eq!(overlay.len(), 2);
}
