//! Use-Case-Funktionen für die Zeichenfläche.

use glam::DVec2;

use crate::app::AppState;

/// Übernimmt eine neue Größe der Zeichenfläche und passt das Seitenverhältnis an.
pub fn resize(state: &mut AppState, size: DVec2) {
    state.view.viewport = size;
    state
        .model
        .scene_mut()
        .resize(&mut state.view.camera, size.x, size.y);
}
