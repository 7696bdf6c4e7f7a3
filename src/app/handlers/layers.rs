//! Handler für Layer-Eigenschaften.

use crate::app::use_cases;
use crate::app::AppState;
use crate::core::Rgb;

/// Layer ein-/ausblenden.
pub fn set_visible(state: &mut AppState, layer: &str, visible: bool) {
    use_cases::layers::set_visible(state, layer, visible);
}

/// Layer-Priorität setzen.
pub fn set_priority(state: &mut AppState, layer: &str, priority: i32) {
    use_cases::layers::set_priority(state, layer, priority);
}

/// Layer-Farbe setzen.
pub fn set_color(state: &mut AppState, layer: &str, color: Rgb) {
    use_cases::layers::set_color(state, layer, color);
}

/// Layer ignorieren.
pub fn set_ignored(state: &mut AppState, layer: &str, ignored: bool) {
    use_cases::layers::set_ignored(state, layer, ignored);
}
