//! Handler für die Selektion.

use glam::DVec2;

use crate::app::use_cases;
use crate::app::AppState;

/// Selektiert das Primitiv unter dem Zeiger.
pub fn pick_at(state: &mut AppState, position: DVec2) {
    use_cases::selection::pick_at(state, position);
}
