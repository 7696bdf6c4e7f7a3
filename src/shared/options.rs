//! Zentrale Konfiguration für den Grubenkarten-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::math::parse_vector;
use crate::core::views::VIEW_TOP;
use crate::core::{CameraPosition, MapSettings};

// ── Kamera ──────────────────────────────────────────────────────────

/// Standard-Eye-Vektor der Default-Ansicht.
pub const CAMERA_DEFAULT_EYE: &str = "0,0,-30";
/// Standard-Look-Vektor der Default-Ansicht.
pub const CAMERA_DEFAULT_LOOK: &str = "0,0,0";
/// Standard-Up-Vektor der Default-Ansicht.
pub const CAMERA_DEFAULT_UP: &str = "0,1,0";

// ── Maus ────────────────────────────────────────────────────────────

/// Maximale Verschiebung pro Mausereignis.
pub const MOUSE_MOVE_SPEED: f64 = 0.5;
/// Faktor für Drehungen per Maus.
pub const MOUSE_ROTATION_SPEED: f64 = 0.5;
/// Zoom-Schritt pro Mausrad-Ereignis.
pub const MOUSE_ZOOM_SPEED: f64 = 0.1;
/// Maximaler Drehwinkel pro Mausereignis in Grad.
pub const MAX_ROTATION_STEP_DEG: f64 = 5.0;

// ── Gitter ──────────────────────────────────────────────────────────

/// Standard-Ausrichtung von Gitterlinien.
pub const GRID_ALIGN: [f64; 3] = [0.0, 1.0, 0.0];
/// Standardgröße von Gitterlinien.
pub const GRID_SIZE: f64 = 1.0;

// ── Labels ──────────────────────────────────────────────────────────

/// Schrittweite beim Spreizen in Pixeln.
pub const LABEL_SPREAD_SPEED: f64 = 5.0;
/// Mindestabstand zwischen Labels in Pixeln.
pub const LABEL_SPREAD_MARGIN: f64 = 20.0;
/// Intervall des automatischen Spreizens.
pub const LABEL_SPREAD_INTERVAL_MS: u64 = 100;
/// Intervall, nach dem das nächste Label nach oben kommt.
pub const LABEL_TOP_ROTATION_INTERVAL_MS: u64 = 2000;

/// Fehler beim Auswerten der Konfiguration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Kein Vektor aus drei endlichen Zahlen
    #[error("'{key}' ist kein gueltiger Vektor: '{value}'")]
    InvalidVector {
        /// Konfigurationsschlüssel
        key: &'static str,
        /// Gelesener Wert
        value: String,
    },
    /// Eye und Look fallen zusammen
    #[error("Eye- und Look-Vektor sind identisch")]
    DegenerateCamera,
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `minemap_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorOptions {
    // ── Kamera ──────────────────────────────────────────────────
    /// Eye-Vektor der Default-Ansicht (`"x,y,z"`)
    pub camera_default_eye_vector: String,
    /// Look-Vektor der Default-Ansicht
    pub camera_default_look_at_vector: String,
    /// Up-Vektor der Default-Ansicht
    pub camera_default_up_vector: String,
    /// Ansicht nach dem Laden einer Karte
    pub camera_default_view_name: String,
    /// Hintergrund oben (CSS-Farbe)
    pub background_top_color: String,
    /// Hintergrund unten (CSS-Farbe)
    pub background_bottom_color: String,

    // ── Maus ────────────────────────────────────────────────────
    /// Maximale Verschiebung pro Mausereignis
    pub mouse_move_speed: f64,
    /// Faktor für Drehungen per Maus
    pub mouse_rotation_speed: f64,
    /// Zoom-Schritt pro Mausrad-Ereignis
    pub mouse_zoom_speed: f64,
    /// Maximaler Drehwinkel pro Mausereignis (Grad)
    pub max_rotation_step_deg: f64,

    // ── Szene ───────────────────────────────────────────────────
    /// Kanten als Linien (`true`) oder Tunnel-Boxen zeichnen
    pub drawing_primitive: bool,
    /// Layer, die nie gezeichnet werden
    pub ignored_layers: Vec<String>,
    /// Standard-Ausrichtung von Gitterlinien
    pub grid_align: [f64; 3],
    /// Standardgröße von Gitterlinien
    pub grid_size: f64,

    // ── Labels ──────────────────────────────────────────────────
    /// Schrittweite beim Spreizen (Pixel)
    pub label_spread_speed: f64,
    /// Mindestabstand zwischen Labels (Pixel)
    pub label_spread_margin: f64,
    /// Intervall des automatischen Spreizens
    pub label_spread_interval_ms: u64,
    /// Intervall des Label-Rundlaufs
    pub label_top_rotation_interval_ms: u64,
    /// Labels automatisch spreizen
    pub automatic_label_spread: bool,

    // ── Karten ──────────────────────────────────────────────────
    /// Karte, die beim Start geladen wird
    pub default_map_id: Option<String>,
    /// Ersatzkarte, wenn keine Karten-ID konfiguriert ist
    pub fallback_map_location: String,
    /// Extrapolieren zu Gittern erlaubt
    pub allow_extrapolating: bool,
    /// JSON-Export erlaubt
    pub allow_map_exporting_as_json: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            camera_default_eye_vector: CAMERA_DEFAULT_EYE.to_string(),
            camera_default_look_at_vector: CAMERA_DEFAULT_LOOK.to_string(),
            camera_default_up_vector: CAMERA_DEFAULT_UP.to_string(),
            camera_default_view_name: VIEW_TOP.to_string(),
            background_top_color: "#FFFFFF".to_string(),
            background_bottom_color: "#A9A9A9".to_string(),

            mouse_move_speed: MOUSE_MOVE_SPEED,
            mouse_rotation_speed: MOUSE_ROTATION_SPEED,
            mouse_zoom_speed: MOUSE_ZOOM_SPEED,
            max_rotation_step_deg: MAX_ROTATION_STEP_DEG,

            drawing_primitive: true,
            ignored_layers: Vec::new(),
            grid_align: GRID_ALIGN,
            grid_size: GRID_SIZE,

            label_spread_speed: LABEL_SPREAD_SPEED,
            label_spread_margin: LABEL_SPREAD_MARGIN,
            label_spread_interval_ms: LABEL_SPREAD_INTERVAL_MS,
            label_top_rotation_interval_ms: LABEL_TOP_ROTATION_INTERVAL_MS,
            automatic_label_spread: true,

            default_map_id: None,
            fallback_map_location: "static/mapinfo.json".to_string(),
            allow_extrapolating: false,
            allow_map_exporting_as_json: false,
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("minemap_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("minemap_editor.toml")
    }

    /// Kameraposition der Default-Ansicht; Fehler statt Rückfall.
    pub fn try_default_camera_position(&self) -> Result<CameraPosition, ConfigError> {
        let vector = |key: &'static str, value: &str| {
            parse_vector(value).ok_or_else(|| ConfigError::InvalidVector {
                key,
                value: value.to_string(),
            })
        };
        let eye = vector("camera_default_eye_vector", &self.camera_default_eye_vector)?;
        let look = vector(
            "camera_default_look_at_vector",
            &self.camera_default_look_at_vector,
        )?;
        let up = vector("camera_default_up_vector", &self.camera_default_up_vector)?;
        if eye == look {
            return Err(ConfigError::DegenerateCamera);
        }
        Ok(CameraPosition::new(eye, look, up))
    }

    /// Kameraposition der Default-Ansicht.
    ///
    /// Ist einer der drei Vektoren unbrauchbar, gilt [`CameraPosition::FALLBACK`].
    pub fn default_camera_position(&self) -> CameraPosition {
        self.try_default_camera_position().unwrap_or_else(|e| {
            log::warn!("Kamera-Konfiguration unbrauchbar ({}), verwende Rueckfall", e);
            CameraPosition::FALLBACK
        })
    }

    /// Einstellungen für das Kartenmodell.
    pub fn map_settings(&self) -> MapSettings {
        let align = DVec3::from_array(self.grid_align);
        let grid_align = if align.is_finite() && align.length_squared() > 0.0 {
            align
        } else {
            log::warn!("grid_align unbrauchbar, verwende {:?}", GRID_ALIGN);
            DVec3::from_array(GRID_ALIGN)
        };
        let grid_size = if self.grid_size.is_finite() && self.grid_size > 0.0 {
            self.grid_size
        } else {
            GRID_SIZE
        };
        MapSettings {
            ignored_layers: self.ignored_layers.clone(),
            grid_align,
            grid_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_position_parses_vectors() {
        let options = EditorOptions::default();
        let position = options.default_camera_position();
        assert_eq!(position.eye, DVec3::new(0.0, 0.0, -30.0));
        assert_eq!(position.look, DVec3::ZERO);
        assert_eq!(position.up, DVec3::Y);
    }

    #[test]
    fn test_any_broken_vector_yields_fallback() {
        let options = EditorOptions {
            camera_default_up_vector: "0,1".to_string(),
            ..EditorOptions::default()
        };
        assert!(matches!(
            options.try_default_camera_position(),
            Err(ConfigError::InvalidVector { key: "camera_default_up_vector", .. })
        ));
        assert_eq!(options.default_camera_position(), CameraPosition::FALLBACK);
    }

    #[test]
    fn test_toml_round_trip_and_partial_files() {
        let mut options = EditorOptions::default();
        options.ignored_layers = vec!["0".to_string(), "Hilfslinien".to_string()];
        options.default_map_id = Some("42".to_string());

        let text = toml::to_string_pretty(&options).expect("serialisierbar");
        let back: EditorOptions = toml::from_str(&text).expect("lesbar");
        assert_eq!(back, options);

        let partial: EditorOptions = toml::from_str("grid_size = 2.5\n").expect("lesbar");
        assert_eq!(partial.grid_size, 2.5);
        assert_eq!(partial.camera_default_view_name, VIEW_TOP);
    }

    #[test]
    fn test_map_settings_sanitize_grid_values() {
        let options = EditorOptions {
            grid_align: [0.0, 0.0, 0.0],
            grid_size: -1.0,
            ..EditorOptions::default()
        };
        let settings = options.map_settings();
        assert_eq!(settings.grid_align, DVec3::Y);
        assert_eq!(settings.grid_size, GRID_SIZE);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("minemap_editor_gibt_es_nicht.toml");
        assert_eq!(EditorOptions::load_from_file(&path), EditorOptions::default());
    }
}
