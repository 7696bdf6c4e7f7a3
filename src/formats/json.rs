//! JSON-Kartenformat mit den Schlüsseln `MT.header`, `MT.layers`, `MT.nodes`,
//! `MT.edges` und `MT.grids`. Alle Abschnitte sind optional.
//!
//! IDs und Koordinaten dürfen als Zahl oder als Text vorliegen
//! (`"x": "12.5"` ist gültig). Unbekannte Schlüssel werden ignoriert.

use glam::DVec3;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::ParseError;
use crate::core::{
    EdgeRecord, GridLineRecord, Layer, LayerDef, MapElement, MapHeader, NodeRecord,
};

/// Dateierweiterung, unter der der JSON-Parser registriert wird.
pub const JSON_EXTENSION: &str = "json";

/// Vektor im JSON-Format `{ "x": .., "y": .., "z": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsonVector {
    /// X
    #[serde(deserialize_with = "lenient_f64")]
    pub x: f64,
    /// Y
    #[serde(deserialize_with = "lenient_f64")]
    pub y: f64,
    /// Z
    #[serde(deserialize_with = "lenient_f64")]
    pub z: f64,
}

impl From<DVec3> for JsonVector {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<JsonVector> for DVec3 {
    fn from(v: JsonVector) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

/// Kopfdaten mit den Zeichnungsgrenzen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonHeader {
    /// Untere Ecke
    #[serde(rename = "$EXTMIN", default, skip_serializing_if = "Option::is_none")]
    pub ext_min: Option<JsonVector>,
    /// Obere Ecke
    #[serde(rename = "$EXTMAX", default, skip_serializing_if = "Option::is_none")]
    pub ext_max: Option<JsonVector>,
    /// Alle weiteren Schlüssel
    #[serde(flatten)]
    pub values: IndexMap<String, serde_json::Value>,
}

impl From<&MapHeader> for JsonHeader {
    fn from(header: &MapHeader) -> Self {
        Self {
            ext_min: header.ext_min.map(JsonVector::from),
            ext_max: header.ext_max.map(JsonVector::from),
            values: header
                .values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        }
    }
}

impl From<JsonHeader> for MapHeader {
    fn from(header: JsonHeader) -> Self {
        Self {
            ext_min: header.ext_min.map(DVec3::from),
            ext_max: header.ext_max.map(DVec3::from),
            values: header
                .values
                .into_iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(s) => (k, s),
                    other => (k, other.to_string()),
                })
                .collect(),
        }
    }
}

/// Layer-Definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonLayer {
    /// Name
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// Sichtbarkeit
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Priorität
    #[serde(default)]
    pub priority: i32,
    /// Farbe als `#RRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Node-Größe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<JsonVector>,
}

fn default_visible() -> bool {
    true
}

impl From<LayerDef> for JsonLayer {
    fn from(def: LayerDef) -> Self {
        Self {
            name: def.name,
            visible: def.visible,
            priority: def.priority,
            color: def.color,
            size: def.size.map(JsonVector::from),
        }
    }
}

impl From<JsonLayer> for LayerDef {
    fn from(layer: JsonLayer) -> Self {
        Self {
            name: layer.name,
            visible: layer.visible,
            priority: layer.priority,
            color: layer.color,
            size: layer.size.map(DVec3::from),
        }
    }
}

/// Node-Eintrag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonNode {
    /// ID
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// X
    #[serde(deserialize_with = "lenient_f64")]
    pub x: f64,
    /// Y
    #[serde(deserialize_with = "lenient_f64")]
    pub y: f64,
    /// Z
    #[serde(deserialize_with = "lenient_f64")]
    pub z: f64,
    /// Layer-Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

/// Kanten-Eintrag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonEdge {
    /// ID
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Start-Node
    #[serde(deserialize_with = "lenient_string")]
    pub from: String,
    /// End-Node
    #[serde(deserialize_with = "lenient_string")]
    pub to: String,
    /// Layer-Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

/// Gitterlinien-Eintrag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonGrid {
    /// ID
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Start-Node
    #[serde(deserialize_with = "lenient_string")]
    pub from: String,
    /// End-Node
    #[serde(deserialize_with = "lenient_string")]
    pub to: String,
    /// Layer-Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Ausrichtung
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<JsonVector>,
    /// Breite
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<f64>,
}

/// Gesamtes JSON-Dokument (Import und Export).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapExport {
    /// Kopfdaten
    #[serde(rename = "MT.header", default, skip_serializing_if = "Option::is_none")]
    pub header: Option<JsonHeader>,
    /// Layer-Definitionen
    #[serde(rename = "MT.layers", default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<JsonLayer>,
    /// Alle Nodes
    #[serde(rename = "MT.nodes", default)]
    pub nodes: Vec<JsonNode>,
    /// Alle Kanten
    #[serde(rename = "MT.edges", default)]
    pub edges: Vec<JsonEdge>,
    /// Alle Gitterlinien
    #[serde(rename = "MT.grids", default)]
    pub grids: Vec<JsonGrid>,
}

impl MapExport {
    /// Sammelt die Elemente aller Layer (Layer-Reihenfolge, dann Einfüge-Reihenfolge).
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Self {
        let mut export = Self::default();
        for layer in layers {
            export.layers.push(JsonLayer::from(layer.to_def()));
            export
                .nodes
                .extend(layer.nodes.values().map(|n| JsonNode {
                    id: n.record.id.clone(),
                    x: n.record.position.x,
                    y: n.record.position.y,
                    z: n.record.position.z,
                    layer: Some(layer.name.clone()),
                }));
            export
                .edges
                .extend(layer.edges.values().map(|e| JsonEdge {
                    id: e.record.id.clone(),
                    from: e.record.from.clone(),
                    to: e.record.to.clone(),
                    layer: Some(layer.name.clone()),
                }));
            export
                .grids
                .extend(layer.grid_lines.values().map(|g| JsonGrid {
                    id: g.record.id.clone(),
                    from: g.record.from.clone(),
                    to: g.record.to.clone(),
                    layer: Some(layer.name.clone()),
                    align: g.record.align.map(JsonVector::from),
                    size: g.record.size,
                }));
        }
        export
    }

    /// Übernimmt die Kopfdaten der Karte.
    pub fn with_header(mut self, header: Option<&MapHeader>) -> Self {
        self.header = header.map(JsonHeader::from);
        self
    }

    /// Anzahl der zeichenbaren Elemente (ohne Kopfdaten und Layer-Definitionen).
    pub fn element_count(&self) -> usize {
        self.nodes.len() + self.edges.len() + self.grids.len()
    }

    /// Formatiertes JSON.
    pub fn to_json_pretty(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Wandelt alle Einträge in Elemente.
    ///
    /// Reihenfolge: Kopfdaten, Layer-Definitionen, Nodes, Kanten, Gitter. Die
    /// Definitionen müssen vor den Elementen kommen, sonst legt der erste Node
    /// seinen Layer mit Standardwerten an.
    pub fn into_elements(self) -> impl Iterator<Item = MapElement> {
        let header = self
            .header
            .map(|h| MapElement::Header(MapHeader::from(h)))
            .into_iter();
        let layers = self
            .layers
            .into_iter()
            .map(|l| MapElement::Layer(LayerDef::from(l)));
        let nodes = self.nodes.into_iter().map(|n| {
            MapElement::Node(NodeRecord {
                id: n.id,
                position: DVec3::new(n.x, n.y, n.z),
                layer: n.layer,
            })
        });
        let edges = self.edges.into_iter().map(|e| {
            MapElement::Edge(EdgeRecord {
                id: e.id,
                from: e.from,
                to: e.to,
                layer: e.layer,
            })
        });
        let grids = self.grids.into_iter().map(|g| {
            MapElement::GridLine(GridLineRecord {
                id: g.id,
                from: g.from,
                to: g.to,
                align: g.align.map(DVec3::from),
                size: g.size,
                layer: g.layer,
            })
        });
        header.chain(layers).chain(nodes).chain(edges).chain(grids)
    }
}

/// Parser für das JSON-Format.
pub fn parse_json(raw: &[u8], sink: &mut dyn FnMut(MapElement)) -> Result<(), ParseError> {
    let text = std::str::from_utf8(raw)?;
    let document: MapExport = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
    log::debug!(
        "JSON-Karte: {} Layer, {} Nodes, {} Kanten, {} Gitter",
        document.layers.len(),
        document.nodes.len(),
        document.edges.len(),
        document.grids.len()
    );
    document.into_elements().for_each(sink);
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => n.to_string(),
        Scalar::Text(s) => s,
    })
}

fn scalar_to_f64<E: serde::de::Error>(scalar: Scalar) -> Result<f64, E> {
    match scalar {
        Scalar::Number(n) => n
            .as_f64()
            .ok_or_else(|| E::custom(format!("Zahl nicht darstellbar: {}", n))),
        Scalar::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("keine Zahl: '{}'", s))),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_to_f64(Scalar::deserialize(deserializer)?)
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Scalar>::deserialize(deserializer)?
        .map(scalar_to_f64)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(raw: &str) -> Result<Vec<MapElement>, ParseError> {
        let mut elements = Vec::new();
        parse_json(raw.as_bytes(), &mut |e| elements.push(e))?;
        Ok(elements)
    }

    #[test]
    fn test_parse_accepts_numbers_as_text() {
        let elements = collect(
            r#"{
                "MT.nodes": [{"id": 1, "x": "1.5", "y": 2, "z": "-3"}],
                "MT.edges": [{"id": "e1", "from": 1, "to": "2", "layer": "Stollen"}],
                "MT.grids": [{"id": "g1", "from": "1", "to": "2", "size": "2",
                              "align": {"x": 0, "y": "1", "z": 0}}],
                "Unbekannt": 42
            }"#,
        )
        .expect("gueltiges JSON");

        assert_eq!(elements.len(), 3);
        assert_eq!(
            elements[0],
            MapElement::Node(NodeRecord::new("1", 1.5, 2.0, -3.0))
        );
        assert_eq!(
            elements[1],
            MapElement::Edge(EdgeRecord::new("e1", "1", "2").in_layer("Stollen"))
        );
        match &elements[2] {
            MapElement::GridLine(g) => {
                assert_eq!(g.size, Some(2.0));
                assert_eq!(g.align, Some(DVec3::Y));
            }
            other => panic!("GridLine erwartet, erhalten: {:?}", other),
        }
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let elements = collect(r#"{"MT.nodes": []}"#).expect("gueltiges JSON");
        assert!(elements.is_empty());
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = collect(r#"{"MT.nodes": [{"id": 1, "x": "abc", "y": 0, "z": 0}]}"#);
        assert!(matches!(result, Err(ParseError::Json(_))));
        assert!(matches!(collect("{"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_export_uses_mt_keys() {
        let mut layer = Layer::new("Default");
        layer.nodes.insert(
            "n".into(),
            crate::core::Drawn::pending(NodeRecord::new("n", 1.0, 2.0, 3.0)),
        );
        let export = MapExport::from_layers([&layer]);
        let json = export.to_json_pretty().expect("serialisierbar");

        assert!(json.contains("\"MT.nodes\""));
        assert!(json.contains("\"MT.edges\""));
        assert!(json.contains("\"MT.grids\""));
        assert_eq!(export.element_count(), 1);
    }

    #[test]
    fn test_header_and_layer_sections_become_elements_first() {
        let elements = collect(
            r##"{
                "MT.nodes": [{"id": "1", "x": 0, "y": 0, "z": 0, "layer": "Sohle"}],
                "MT.layers": [{"name": "Sohle", "priority": 4, "color": "#FF0000",
                               "visible": false, "size": {"x": 1, "y": 1, "z": "0.5"}}],
                "MT.header": {"$EXTMIN": {"x": -1, "y": -2, "z": -3},
                              "$EXTMAX": {"x": 1, "y": 2, "z": 3},
                              "$ACADVER": "AC1015", "$INSUNITS": 6}
            }"##,
        )
        .expect("gueltiges JSON");

        assert_eq!(elements.len(), 3);
        match &elements[0] {
            MapElement::Header(h) => {
                assert_eq!(
                    h.extents(),
                    Some((DVec3::new(-1.0, -2.0, -3.0), DVec3::new(1.0, 2.0, 3.0)))
                );
                assert_eq!(h.values.get("$ACADVER").map(String::as_str), Some("AC1015"));
                assert_eq!(h.values.get("$INSUNITS").map(String::as_str), Some("6"));
            }
            other => panic!("Header erwartet, erhalten: {:?}", other),
        }
        match &elements[1] {
            MapElement::Layer(def) => {
                assert_eq!(def.name, "Sohle");
                assert_eq!(def.priority, 4);
                assert!(!def.visible);
                assert_eq!(def.color.as_deref(), Some("#FF0000"));
                assert_eq!(def.size, Some(DVec3::new(1.0, 1.0, 0.5)));
            }
            other => panic!("Layer erwartet, erhalten: {:?}", other),
        }
        assert!(matches!(elements[2], MapElement::Node(_)));
    }

    #[test]
    fn test_layer_without_flags_is_visible() {
        let elements = collect(r#"{"MT.layers": [{"name": "L"}]}"#).expect("gueltiges JSON");
        assert_eq!(elements, vec![MapElement::Layer(LayerDef::named("L"))]);
    }

    #[test]
    fn test_export_without_header_omits_section() {
        let export = MapExport::from_layers([&Layer::new("Default")]);
        let json = export.to_json_pretty().expect("serialisierbar");
        assert!(!json.contains("MT.header"));
        assert!(json.contains("\"MT.layers\""));
    }
}
