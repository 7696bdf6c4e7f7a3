//! Handler für das Label-Overlay.

use glam::DVec2;

use crate::app::use_cases;
use crate::app::AppState;

/// Beschriftet alle Nodes eines Layers.
pub fn label_layer_nodes(state: &mut AppState, layer: &str) {
    use_cases::labels::label_layer_nodes(state, layer);
}

/// Übernimmt die gemessene Größe eines Labels.
pub fn set_size(state: &mut AppState, index: usize, size: DVec2) {
    use_cases::labels::set_size(state, index, size);
}

/// Hover-Zustand setzen.
pub fn set_hovered(state: &mut AppState, index: usize, hovered: bool) {
    if !state.labels.set_hovered(index, hovered) {
        log::warn!("Label {} existiert nicht", index);
    }
}

/// Ziehen beginnen.
pub fn begin_drag(state: &mut AppState, index: usize, pointer: DVec2) {
    if !state.labels.begin_drag(index, pointer) {
        log::warn!("Label {} existiert nicht", index);
    }
}

/// Gezogenes Label verschieben.
pub fn drag(state: &mut AppState, pointer: DVec2) {
    state.labels.drag_to(pointer);
}

/// Ziehen beenden.
pub fn end_drag(state: &mut AppState) {
    state.labels.end_drag();
}

/// Alle Labels ausklappen.
pub fn set_maximize_all(state: &mut AppState, maximized: bool) {
    state.labels.maximize_all = maximized;
}

/// Automatisches Spreizen schalten.
pub fn set_automatic_spread(state: &mut AppState, enabled: bool) {
    state.labels.automatic_spread = enabled;
    state.options.automatic_label_spread = enabled;
}

/// Zeitgeber weiterschalten.
pub fn advance_timers(state: &mut AppState, elapsed_ms: u64) {
    use_cases::labels::advance_timers(state, elapsed_ms);
}
