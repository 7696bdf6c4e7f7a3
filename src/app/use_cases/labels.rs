//! Use-Cases für das Label-Overlay.

use glam::DVec2;

use crate::app::{AppState, TimerJob};
use crate::labels::{Label, NodeRef};

/// Ein Spreiz-Durchlauf mit den konfigurierten Werten. `true` bei gefundener Kollision.
pub fn spread(state: &mut AppState) -> bool {
    state
        .labels
        .spread(state.options.label_spread_speed, state.options.label_spread_margin)
}

/// Holt das nächste Label nach oben.
pub fn rotate_top(state: &mut AppState) -> Option<usize> {
    state.labels.rotate_top()
}

/// Legt für jeden Node eines Layers ein Label mit der Node-ID als Text an.
///
/// Bestehende Labels derselben Nodes werden an ihrer Stelle ersetzt. Liefert die Anzahl.
pub fn label_layer_nodes(state: &mut AppState, layer: &str) -> usize {
    let Some(model_layer) = state.model.layer(layer) else {
        log::warn!("Layer '{}' fuer Labels nicht gefunden", layer);
        return 0;
    };
    let labels: Vec<Label> = model_layer
        .nodes
        .keys()
        .map(|id| Label::new(NodeRef::new(layer, id.as_str()), vec![id.clone()]))
        .collect();

    let count = labels.len();
    for label in labels {
        state.labels.add(label);
    }
    log::info!("{} Labels fuer Layer '{}' angelegt", count, layer);
    count
}

/// Entfernt Labels ohne zugehörigen Node.
pub fn retain_bound(state: &mut AppState) -> usize {
    let removed = state.labels.retain_bound(&state.model);
    if removed > 0 {
        log::debug!("{} Labels ohne Node entfernt", removed);
    }
    removed
}

/// Setzt die gemessene Größe eines Labels.
pub fn set_size(state: &mut AppState, index: usize, size: DVec2) {
    let valid = size.is_finite() && size.x >= 0.0 && size.y >= 0.0;
    match state.labels.label_mut(index) {
        Some(label) if valid => label.size = Some(size),
        Some(_) => log::warn!("Ungueltige Label-Groesse ignoriert: {:?}", size),
        None => log::warn!("Label {} existiert nicht", index),
    }
}

/// Führt die fälligen Zeitgeber-Aufgaben aus.
pub fn advance_timers(state: &mut AppState, elapsed_ms: u64) {
    for job in state.timers.advance(elapsed_ms) {
        match job {
            TimerJob::LabelSpread => {
                if state.labels.automatic_spread {
                    spread(state);
                }
            }
            TimerJob::TopLabelRotation => {
                rotate_top(state);
            }
        }
    }
}
