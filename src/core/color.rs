//! RGB-Farben (0..1) mit Hex-Konvertierung und fester Farbpalette.

use serde::{Deserialize, Serialize};

/// Farbwert mit Kanälen im Bereich 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Rot
    pub r: f32,
    /// Grün
    pub g: f32,
    /// Blau
    pub b: f32,
}

impl Rgb {
    /// Weiß, Rückfallfarbe für Elemente ohne Layer-Farbe.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Rot, Farbe der Selektions-Umrandung.
    pub const SELECTION: Self = Self::new(1.0, 0.0, 0.0);
    /// Standardfarbe neu angelegter Layer.
    pub const LAYER_DEFAULT: Self = Self::new(40.0 / 255.0, 40.0 / 255.0, 200.0 / 255.0);

    /// Erstellt eine Farbe aus drei Kanälen.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parst `#RRGGBB` (das `#` ist optional). `None` bei ungültiger Eingabe.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::new(
            ((value >> 16) & 255) as f32 / 255.0,
            ((value >> 8) & 255) as f32 / 255.0,
            (value & 255) as f32 / 255.0,
        ))
    }

    /// Formatiert als `#RRGGBB` (Großbuchstaben).
    pub fn to_hex(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Als Array für Vertex-Daten.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Farbpalette für die Layer-Farbauswahl.
pub const HEX_COLOR_SET: [&str; 117] = [
    "#330000", "#331900", "#333300", "#193300", "#003300", "#003319", "#003333", "#001933",
    "#000033", "#190033", "#330033", "#330019", "#000000", "#660000", "#663300", "#666600",
    "#336600", "#006600", "#006633", "#006666", "#003366", "#000066", "#330066", "#660066",
    "#660033", "#202020", "#990000", "#994C00", "#999900", "#4C9900", "#009900", "#00994C",
    "#009999", "#004C99", "#000099", "#4C0099", "#990099", "#99004C", "#404040", "#CC0000",
    "#CC6600", "#CCCC00", "#66CC00", "#00CC00", "#00CC66", "#00CCCC", "#0066CC", "#0000CC",
    "#6600CC", "#CC00CC", "#CC0066", "#606060", "#FF0000", "#FF8000", "#FFFF00", "#80FF00",
    "#00FF00", "#00FF80", "#00FFFF", "#0080FF", "#0000FF", "#7F00FF", "#FF00FF", "#FF007F",
    "#808080", "#FF3333", "#FF9933", "#FFFF33", "#99FF33", "#33FF33", "#33FF99", "#33FFFF",
    "#3399FF", "#3333FF", "#9933FF", "#FF33FF", "#FF3399", "#A0A0A0", "#FF6666", "#FFB266",
    "#FFFF66", "#B2FF66", "#66FF66", "#66FFB2", "#66FFFF", "#66B2FF", "#6666FF", "#B266FF",
    "#FF66FF", "#FF66B2", "#C0C0C0", "#FF9999", "#FFCC99", "#FFFF99", "#CCFF99", "#99FF99",
    "#99FFCC", "#99FFFF", "#99CCFF", "#9999FF", "#CC99FF", "#FF99FF", "#FF99CC", "#E0E0E0",
    "#FFCCCC", "#FFE5CC", "#FFFFCC", "#E5FFCC", "#CCFFCC", "#CCFFE5", "#CCFFFF", "#CCE5FF",
    "#CCCCFF", "#E5CCFF", "#FFCCFF", "#FFCCE5", "#FFFFFF",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let color = Rgb::from_hex("#FF8000").expect("gueltige Farbe");
        assert_eq!(color.r, 1.0);
        assert_eq!(color.b, 0.0);
        assert_eq!(color.to_hex(), "#FF8000");
    }

    #[test]
    fn test_invalid_hex_is_rejected() {
        assert!(Rgb::from_hex("#FFF").is_none());
        assert!(Rgb::from_hex("#GG0000").is_none());
        assert!(Rgb::from_hex("").is_none());
    }

    #[test]
    fn test_palette_entries_parse() {
        assert!(HEX_COLOR_SET.iter().all(|hex| Rgb::from_hex(hex).is_some()));
    }
}
