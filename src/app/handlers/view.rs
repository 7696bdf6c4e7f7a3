//! Handler für Kamera und Viewport.

use glam::DVec2;

use crate::app::use_cases;
use crate::app::{AppState, RotationAxis};

/// Verschiebt die Kamera per Maus.
pub fn move_camera(state: &mut AppState, delta: DVec2) {
    use_cases::camera::move_by_mouse(state, delta);
}

/// Dreht die Kamera per Maus.
pub fn rotate_camera(state: &mut AppState, axis: RotationAxis, degrees: f64) {
    use_cases::camera::rotate_by_mouse(state, axis, degrees);
}

/// Zoomt per Mausrad.
pub fn zoom_camera(state: &mut AppState, wheel_delta: f64) {
    use_cases::camera::zoom_by_wheel(state, wheel_delta);
}

/// Setzt eine benannte Ansicht.
pub fn set_view(state: &mut AppState, name: &str) {
    use_cases::camera::set_view(state, name);
}

/// Setzt die Kamera auf den Standardzustand zurück.
pub fn reset_camera(state: &mut AppState) {
    use_cases::camera::reset_camera(state);
}

/// Aktualisiert die Viewport-Größe.
pub fn set_viewport_size(state: &mut AppState, size: DVec2) {
    use_cases::viewport::resize(state, size);
}

/// Gibt den Kamera-Frame weiter.
pub fn publish_frame(state: &mut AppState) {
    use_cases::camera::publish_frame(state);
}
