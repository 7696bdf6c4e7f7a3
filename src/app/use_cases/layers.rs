//! Use-Cases für Layer-Eigenschaften.

use crate::app::AppState;
use crate::core::Rgb;

/// Schaltet die Sichtbarkeit eines Layers.
pub fn set_visible(state: &mut AppState, layer: &str, visible: bool) {
    if !state.model.set_layer_visible(layer, visible) {
        log::warn!("Layer '{}' nicht gefunden", layer);
    }
}

/// Ändert die Priorität eines Layers.
pub fn set_priority(state: &mut AppState, layer: &str, priority: i32) {
    if !state.model.set_layer_priority(layer, priority) {
        log::warn!("Layer '{}' nicht gefunden", layer);
    }
}

/// Ändert die Farbe eines Layers.
pub fn set_color(state: &mut AppState, layer: &str, color: Rgb) {
    if !state.model.set_layer_color(layer, color) {
        log::warn!("Layer '{}' nicht gefunden", layer);
    }
}

/// Setzt einen Layer auf die Ignorier-Liste oder nimmt ihn herunter.
///
/// Die Liste wird in die Optionen übernommen. Ein wieder aufgenommener
/// Layer wird sofort gezeichnet.
pub fn set_ignored(state: &mut AppState, layer: &str, ignored: bool) {
    if !state.model.set_layer_ignored(layer, ignored) {
        log::warn!("Layer '{}' nicht gefunden", layer);
        return;
    }
    state.options.ignored_layers = state.model.settings().ignored_layers.clone();
    if !ignored {
        super::map_io::draw_map(state);
    } else if let Some(selected) = &state.ui.selected {
        let still_there = state
            .model
            .scene()
            .primitive_state(selected.primitive)
            .is_some();
        if !still_there {
            state.ui.selected = None;
        }
    }
}
