//! Use-Cases für die Selektion per Klick.

use glam::DVec2;

use crate::app::AppState;
use crate::render::SceneGraphAdapter;

/// Selektiert das Primitiv an einer Pixelposition.
///
/// Die bisherige Selektion wird aufgehoben. Trifft der Klick nichts, bleibt
/// nichts selektiert. Gitterlinien werden gemeldet, aber nicht umrandet.
pub fn pick_at(state: &mut AppState, position: DVec2) {
    clear(state);

    let scene = state.model.scene_mut();
    let Some(hit) = scene.pick_at(position.x, position.y) else {
        log::debug!("Kein Treffer bei {:?}", position);
        return;
    };
    scene.set_selected(hit.primitive, true);
    log::info!(
        "Selektiert: '{}' (Abstand {:.3})",
        hit.model_id,
        hit.distance
    );
    state.ui.selected = Some(hit);
}

/// Hebt die aktuelle Selektion auf.
pub fn clear(state: &mut AppState) {
    if let Some(previous) = state.ui.selected.take() {
        state
            .model
            .scene_mut()
            .set_selected(previous.primitive, false);
    }
}
