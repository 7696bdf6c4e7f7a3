//! Label-Stile pro Typ mit Standardstil als Rückfall.

use std::collections::HashMap;

use serde::Deserialize;

/// Schlüssel des Standardstils.
pub const DEFAULT_STYLE: &str = "defaultStyle";

/// Vollständiger Stil eines Label-Typs.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// Typ, für den der Stil gilt
    pub kind: String,
    /// Anzeigename (Übersetzungsschlüssel)
    pub visible_name: String,
    /// Hintergrund aktiver Labels
    pub active_colour: String,
    /// Hintergrund nach Timeout
    pub colour_on_timeout: String,
    /// Timeout in Sekunden
    pub timeout: u32,
    /// Schriftgröße in Pixeln
    pub font_size: u32,
    /// Immer ausgeklappt darstellen
    pub always_maximized: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            kind: DEFAULT_STYLE.to_string(),
            visible_name: "LABELS.DEFAULT".to_string(),
            active_colour: "#FFFFFF".to_string(),
            colour_on_timeout: "#A3A3A3".to_string(),
            timeout: 600,
            font_size: 14,
            always_maximized: false,
        }
    }
}

/// Teilweise Stil-Definition (z.B. aus JSON); fehlende Felder kommen vom Standardstil.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyleDef {
    /// Typ
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Anzeigename
    pub visible_name: Option<String>,
    /// Hintergrund aktiver Labels
    pub active_colour: Option<String>,
    /// Hintergrund nach Timeout
    pub colour_on_timeout: Option<String>,
    /// Timeout in Sekunden
    pub timeout: Option<u32>,
    /// Schriftgröße
    pub font_size: Option<u32>,
    /// Immer ausgeklappt
    pub always_maximized: Option<bool>,
}

/// Registry aller bekannten Stile.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    default_style: LabelStyle,
    styles: HashMap<String, LabelStyle>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self {
            default_style: LabelStyle::default(),
            styles: HashMap::new(),
        }
    }
}

impl StyleRegistry {
    /// Übernimmt Stil-Definitionen und liefert die Anzahl übernommener Stile.
    ///
    /// Definitionen ohne Typ oder Anzeigenamen werden verworfen.
    pub fn add_styles(&mut self, defs: impl IntoIterator<Item = LabelStyleDef>) -> usize {
        let mut added = 0;
        for def in defs {
            let (Some(kind), Some(visible_name)) = (def.kind.clone(), def.visible_name.clone())
            else {
                log::error!("Label-Stil ohne Typ oder Anzeigenamen verworfen: {:?}", def);
                continue;
            };
            let base = &self.default_style;
            let style = LabelStyle {
                kind: kind.clone(),
                visible_name,
                active_colour: def.active_colour.unwrap_or_else(|| base.active_colour.clone()),
                colour_on_timeout: def
                    .colour_on_timeout
                    .unwrap_or_else(|| base.colour_on_timeout.clone()),
                timeout: def.timeout.unwrap_or(base.timeout),
                font_size: def.font_size.unwrap_or(base.font_size),
                always_maximized: def.always_maximized.unwrap_or(base.always_maximized),
            };
            self.styles.insert(kind, style);
            added += 1;
        }
        added
    }

    /// Stil eines Typs oder der Standardstil.
    pub fn get(&self, kind: &str) -> &LabelStyle {
        self.styles.get(kind).unwrap_or(&self.default_style)
    }

    /// Anzahl registrierter Stile (ohne Standardstil).
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// `true`, wenn nur der Standardstil existiert.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_default_style() {
        let mut registry = StyleRegistry::default();
        let defs: Vec<LabelStyleDef> = serde_json::from_str(
            r##"[
                {"type": "WLAN", "visibleName": "LABELS.WLAN", "fontSize": 18},
                {"type": "RFID"},
                {"visibleName": "ohne Typ"}
            ]"##,
        )
        .expect("gueltiges JSON");

        assert_eq!(registry.add_styles(defs), 1);
        let wlan = registry.get("WLAN");
        assert_eq!(wlan.font_size, 18);
        assert_eq!(wlan.active_colour, "#FFFFFF");
        assert_eq!(wlan.timeout, 600);

        assert_eq!(registry.get("RFID").kind, DEFAULT_STYLE);
    }
}
