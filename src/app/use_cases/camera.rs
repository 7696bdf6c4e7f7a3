//! Use-Case-Funktionen für Kamera-Steuerung.

use glam::DVec2;

use crate::app::{AppState, RotationAxis};

/// Verschiebt die Kamera um ein Maus-Delta.
///
/// Jede Komponente wird auf `mouse_move_speed` begrenzt; die Richtung folgt dem Zeiger.
pub fn move_by_mouse(state: &mut AppState, delta: DVec2) {
    let limit = state.options.mouse_move_speed;
    let speed_x = delta.x.abs().min(limit);
    let speed_y = delta.y.abs().min(limit);

    let camera = &mut state.view.camera;
    camera.pan_horizontal(if delta.x < 0.0 { speed_x } else { -speed_x });
    camera.pan_vertical(if delta.y < 0.0 { -speed_y } else { speed_y });
}

/// Dreht die Kamera um eine lokale Achse.
///
/// Die Gradzahl wird mit `mouse_rotation_speed` skaliert und auf
/// ±`max_rotation_step_deg` begrenzt.
pub fn rotate_by_mouse(state: &mut AppState, axis: RotationAxis, degrees: f64) {
    if !degrees.is_finite() {
        return;
    }
    let max_step = state.options.max_rotation_step_deg.abs();
    let step = (degrees * state.options.mouse_rotation_speed).clamp(-max_step, max_step);
    if step == 0.0 {
        return;
    }

    let camera = &mut state.view.camera;
    match axis {
        RotationAxis::Yaw => camera.yaw(step),
        RotationAxis::Pitch => camera.pitch(step),
        RotationAxis::Roll => camera.roll(step),
    }
}

/// Zoomt per Mausrad: positives Delta nähert an, sonst entfernt.
pub fn zoom_by_wheel(state: &mut AppState, wheel_delta: f64) {
    let speed = state.options.mouse_zoom_speed;
    if wheel_delta > 0.0 {
        state.view.camera.forward(speed);
    } else {
        state.view.camera.backward(speed);
    }
}

/// Setzt eine Kamera-Ansicht per Name.
pub fn set_view(state: &mut AppState, name: &str) -> bool {
    state.view.camera.set_view(name)
}

/// Setzt die Kamera auf die konfigurierte Standardposition zurück.
pub fn reset_camera(state: &mut AppState) {
    let position = state.options.default_camera_position();
    state.view.camera.set_position(position);
}

/// Bereitet die Ansichten aus der Kartenausdehnung vor und wählt die Startansicht.
///
/// Gewählt wird die konfigurierte Ansicht, sonst die erste vorhandene.
pub fn fit_to_map(state: &mut AppState) {
    let Some((min, max)) = state.model.bounds() else {
        log::debug!("Keine Kartenausdehnung, Kamera bleibt unveraendert");
        return;
    };
    let center = state.view.camera.prepare_views(min, max);
    log::debug!("Ansichten vorbereitet, Zentrum {:?}", center);

    let configured = state.options.camera_default_view_name.clone();
    if state.view.camera.views().iter().any(|v| v.name == configured) {
        state.view.camera.set_view(&configured);
    } else if let Some(first) = state.view.camera.views().first().map(|v| v.name.clone()) {
        log::warn!(
            "Ansicht '{}' nicht vorhanden, verwende '{}'",
            configured,
            first
        );
        state.view.camera.set_view(&first);
    }
}

/// Gibt den aktuellen Kamera-Frame an Szene (Picking) und Label-Overlay weiter.
pub fn publish_frame(state: &mut AppState) {
    let frame = state.view.camera.frame(state.view.viewport);
    state.model.scene_mut().set_frame(frame);
    state.labels.project(&frame, &state.model);
}
