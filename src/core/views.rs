//! Voreingestellte Kamera-Ansichten (Default, Top, West-East, North-South).

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Name der aus der Konfiguration erzeugten Standard-Ansicht.
pub const VIEW_DEFAULT: &str = "Default";
/// Blick von oben (entlang -Z auf das Modell).
pub const VIEW_TOP: &str = "Top";
/// Blick auf die West-Ost-Seite (Kamera auf der Nord-Süd-Achse).
pub const VIEW_WEST_EAST: &str = "West-East";
/// Blick auf die Nord-Süd-Seite (Kamera auf der West-Ost-Achse).
pub const VIEW_NORTH_SOUTH: &str = "North-South";

/// Kameraposition aus Eye-, Look- und Up-Vektor (reine Daten).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    /// Standpunkt der Kamera
    pub eye: DVec3,
    /// Punkt, auf den die Kamera blickt
    pub look: DVec3,
    /// Oben-Richtung
    pub up: DVec3,
}

impl CameraPosition {
    /// Eingebaute Rückfallposition, wenn die Konfiguration unbrauchbar ist.
    pub const FALLBACK: Self = Self {
        eye: DVec3::new(0.0, 0.0, 100.0),
        look: DVec3::ZERO,
        up: DVec3::Y,
    };

    /// Erstellt eine neue Position.
    pub fn new(eye: DVec3, look: DVec3, up: DVec3) -> Self {
        Self { eye, look, up }
    }
}

impl Default for CameraPosition {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Benannte Kamera-Ansicht.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Anzeigename (auch Lookup-Schlüssel)
    pub name: String,
    /// Gespeicherte Kameravektoren
    pub camera_position: CameraPosition,
}

impl View {
    /// Erstellt eine Ansicht, deren Eye im Abstand `distance` entlang `direction` vom `center` liegt.
    pub fn looking_at(
        name: impl Into<String>,
        center: DVec3,
        direction: DVec3,
        distance: f64,
        up: DVec3,
    ) -> Self {
        Self {
            name: name.into(),
            camera_position: CameraPosition {
                eye: center + direction * distance,
                look: center,
                up,
            },
        }
    }
}

/// Höhe einer geraden Pyramide mit quadratischer Grundfläche der Seitenlänge `side`.
pub fn altitude(side: f64) -> f64 {
    side / std::f64::consts::SQRT_2
}

/// Liste der verfügbaren Ansichten. Die Default-Ansicht steht immer vorne.
#[derive(Debug, Clone)]
pub struct ViewSet {
    default_view: View,
    views: Vec<View>,
}

impl ViewSet {
    /// Erstellt eine Liste, die nur die Default-Ansicht enthält.
    pub fn new(default_position: CameraPosition) -> Self {
        let default_view = View {
            name: VIEW_DEFAULT.to_string(),
            camera_position: default_position,
        };
        Self {
            views: vec![default_view.clone()],
            default_view,
        }
    }

    /// Berechnet Top/West-East/North-South aus einer Bounding-Box.
    ///
    /// Die bisherige Liste wird vollständig ersetzt (nicht gemischt),
    /// die Default-Ansicht wird wieder vorangestellt.
    pub fn prepare(&mut self, min: DVec3, max: DVec3) -> DVec3 {
        let center = (min + max) * 0.5;
        let dist = (max - min).abs();

        self.views = vec![
            self.default_view.clone(),
            View::looking_at(
                VIEW_TOP,
                center,
                DVec3::Z,
                altitude(dist.x.max(dist.y)),
                DVec3::Y,
            ),
            View::looking_at(
                VIEW_WEST_EAST,
                center,
                DVec3::Y,
                altitude(dist.x.max(dist.z)),
                DVec3::Z,
            ),
            View::looking_at(
                VIEW_NORTH_SOUTH,
                center,
                DVec3::X,
                altitude(dist.y.max(dist.z)),
                DVec3::Z,
            ),
        ];

        log::info!(
            "{} Ansichten berechnet fuer Modell der Groesse [{}, {}, {}]",
            self.views.len(),
            dist.x,
            dist.y,
            dist.z
        );
        center
    }

    /// Sucht eine Ansicht per Name.
    pub fn find(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Alle Ansichten in Anzeige-Reihenfolge.
    pub fn all(&self) -> &[View] {
        &self.views
    }

    /// Die aus der Konfiguration erzeugte Default-Ansicht.
    pub fn default_view(&self) -> &View {
        &self.default_view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prepare_replaces_views_and_keeps_default_first() {
        let mut set = ViewSet::new(CameraPosition::FALLBACK);
        set.prepare(DVec3::ZERO, DVec3::new(10.0, 20.0, 5.0));
        set.prepare(DVec3::ZERO, DVec3::new(1.0, 1.0, 1.0));

        let names: Vec<&str> = set.all().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec![VIEW_DEFAULT, VIEW_TOP, VIEW_WEST_EAST, VIEW_NORTH_SOUTH]
        );
    }

    #[test]
    fn test_top_view_altitude_uses_larger_horizontal_side() {
        let mut set = ViewSet::new(CameraPosition::FALLBACK);
        let center = set.prepare(DVec3::new(-10.0, -20.0, 0.0), DVec3::new(10.0, 20.0, 4.0));
        let top = set.find(VIEW_TOP).expect("Top-Ansicht erwartet");

        assert_eq!(center, DVec3::new(0.0, 0.0, 2.0));
        let offset = top.camera_position.eye - top.camera_position.look;
        assert_relative_eq!(offset.x, 0.0);
        assert_relative_eq!(offset.y, 0.0);
        assert_relative_eq!(offset.z, altitude(40.0), epsilon = 1e-12);
        assert_eq!(top.camera_position.up, DVec3::Y);
    }

    #[test]
    fn test_unknown_view_is_not_found() {
        let set = ViewSet::new(CameraPosition::FALLBACK);
        assert!(set.find("Nirgendwo").is_none());
        assert!(set.find(VIEW_DEFAULT).is_some());
    }
}
