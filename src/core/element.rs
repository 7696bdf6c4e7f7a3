//! Kartenelemente als getaggte Variante.
//!
//! Jeder Parser liefert `MapElement`s; das Modell prüft sie mit
//! [`MapElement::validate`], bevor sie in einen Layer übernommen werden.

use glam::DVec3;
use indexmap::IndexMap;
use thiserror::Error;

/// Name des Layers für Elemente ohne Layer-Angabe.
pub const DEFAULT_LAYER: &str = "Default";

/// Verstoß gegen die Elementregeln an der Parse-Grenze.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    /// Element ohne ID
    #[error("{kind} ohne ID")]
    MissingId {
        /// Elementtyp
        kind: ElementKind,
    },
    /// Nicht-endliche Koordinate
    #[error("{kind} '{id}' hat ungueltige Koordinaten")]
    NonFinite {
        /// Elementtyp
        kind: ElementKind,
        /// Element-ID
        id: String,
    },
    /// Layer-Definition ohne Namen
    #[error("Layer-Definition ohne Namen")]
    UnnamedLayer,
}

/// Typ eines zeichenbaren Elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Einzelner Punkt
    Node,
    /// Verbindung zweier Nodes
    Edge,
    /// Extrapolierte Gitterlinie
    GridLine,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::Node => "Node",
            ElementKind::Edge => "Edge",
            ElementKind::GridLine => "GridLine",
        };
        f.write_str(name)
    }
}

/// Kopfdaten einer Karte (z.B. Zeichnungsgrenzen aus DXF `$EXTMIN`/`$EXTMAX`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapHeader {
    /// Untere Ecke der Zeichnung
    pub ext_min: Option<DVec3>,
    /// Obere Ecke der Zeichnung
    pub ext_max: Option<DVec3>,
    /// Weitere Schlüssel/Wert-Paare in Einfüge-Reihenfolge
    pub values: IndexMap<String, String>,
}

impl MapHeader {
    /// Zeichnungsgrenzen, wenn beide Ecken gesetzt und endlich sind.
    pub fn extents(&self) -> Option<(DVec3, DVec3)> {
        match (self.ext_min, self.ext_max) {
            (Some(min), Some(max)) if min.is_finite() && max.is_finite() => {
                Some((min.min(max), min.max(max)))
            }
            _ => None,
        }
    }
}

/// Layer-Definition aus einer Kartendatei.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDef {
    /// Eindeutiger Name
    pub name: String,
    /// Sichtbarkeit
    pub visible: bool,
    /// Priorität
    pub priority: i32,
    /// Farbe als `#RRGGBB`
    pub color: Option<String>,
    /// Node-Größe (halbe Kantenlängen)
    pub size: Option<DVec3>,
}

impl LayerDef {
    /// Sichtbare Definition ohne Farbe und Größe.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            priority: 0,
            color: None,
            size: None,
        }
    }
}

/// Punkt der Karte.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// ID, eindeutig innerhalb des Layers
    pub id: String,
    /// Weltposition
    pub position: DVec3,
    /// Layer-Name (`None` = Default)
    pub layer: Option<String>,
}

impl NodeRecord {
    /// Erstellt einen Node im Default-Layer.
    pub fn new(id: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: id.into(),
            position: DVec3::new(x, y, z),
            layer: None,
        }
    }

    /// Setzt den Layer.
    pub fn in_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }
}

/// Kante zwischen zwei Nodes desselben Layers.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// ID, eindeutig innerhalb des Layers
    pub id: String,
    /// Start-Node-ID
    pub from: String,
    /// End-Node-ID
    pub to: String,
    /// Layer-Name (`None` = Default)
    pub layer: Option<String>,
}

impl EdgeRecord {
    /// Erstellt eine Kante im Default-Layer.
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            layer: None,
        }
    }

    /// Setzt den Layer.
    pub fn in_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }
}

/// Gitterlinie zwischen zwei Nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLineRecord {
    /// ID, eindeutig innerhalb des Layers
    pub id: String,
    /// Start-Node-ID
    pub from: String,
    /// End-Node-ID
    pub to: String,
    /// Ausrichtung (`None` = Konfigurationswert)
    pub align: Option<DVec3>,
    /// Breite (`None` = Konfigurationswert)
    pub size: Option<f64>,
    /// Layer-Name (`None` = Default)
    pub layer: Option<String>,
}

impl GridLineRecord {
    /// Erstellt eine Gitterlinie im Default-Layer mit Standard-Ausrichtung.
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            align: None,
            size: None,
            layer: None,
        }
    }

    /// Setzt den Layer.
    pub fn in_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }
}

/// Ein von einem Parser geliefertes Element.
#[derive(Debug, Clone, PartialEq)]
pub enum MapElement {
    /// Kopfdaten
    Header(MapHeader),
    /// Layer-Definition
    Layer(LayerDef),
    /// Punkt
    Node(NodeRecord),
    /// Kante
    Edge(EdgeRecord),
    /// Gitterlinie
    GridLine(GridLineRecord),
}

impl MapElement {
    /// Prüft Pflichtfelder und Koordinaten.
    pub fn validate(&self) -> Result<(), ElementError> {
        match self {
            MapElement::Header(_) => Ok(()),
            MapElement::Layer(def) => {
                if def.name.trim().is_empty() {
                    Err(ElementError::UnnamedLayer)
                } else {
                    Ok(())
                }
            }
            MapElement::Node(node) => {
                require_id(ElementKind::Node, &node.id)?;
                if !node.position.is_finite() {
                    return Err(ElementError::NonFinite {
                        kind: ElementKind::Node,
                        id: node.id.clone(),
                    });
                }
                Ok(())
            }
            MapElement::Edge(edge) => require_id(ElementKind::Edge, &edge.id),
            MapElement::GridLine(grid) => {
                require_id(ElementKind::GridLine, &grid.id)?;
                let align_ok = grid.align.is_none_or(|a| a.is_finite());
                let size_ok = grid.size.is_none_or(f64::is_finite);
                if !align_ok || !size_ok {
                    return Err(ElementError::NonFinite {
                        kind: ElementKind::GridLine,
                        id: grid.id.clone(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Layer-Name eines zeichenbaren Elements (mit Default-Rückfall).
    pub fn layer_name(&self) -> Option<&str> {
        let layer = match self {
            MapElement::Node(n) => &n.layer,
            MapElement::Edge(e) => &e.layer,
            MapElement::GridLine(g) => &g.layer,
            MapElement::Header(_) | MapElement::Layer(_) => return None,
        };
        Some(layer.as_deref().unwrap_or(DEFAULT_LAYER))
    }
}

fn require_id(kind: ElementKind, id: &str) -> Result<(), ElementError> {
    if id.trim().is_empty() {
        Err(ElementError::MissingId { kind })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_name_defaults() {
        let node = MapElement::Node(NodeRecord::new("1", 0.0, 0.0, 0.0));
        assert_eq!(node.layer_name(), Some(DEFAULT_LAYER));

        let edge = MapElement::Edge(EdgeRecord::new("e", "1", "2").in_layer("Stollen"));
        assert_eq!(edge.layer_name(), Some("Stollen"));

        assert_eq!(MapElement::Header(MapHeader::default()).layer_name(), None);
    }

    #[test]
    fn test_validate_rejects_missing_id_and_nan() {
        let empty = MapElement::Node(NodeRecord::new(" ", 0.0, 0.0, 0.0));
        assert_eq!(
            empty.validate(),
            Err(ElementError::MissingId {
                kind: ElementKind::Node
            })
        );

        let nan = MapElement::Node(NodeRecord::new("n", f64::NAN, 0.0, 0.0));
        assert!(matches!(
            nan.validate(),
            Err(ElementError::NonFinite { .. })
        ));

        let layer = MapElement::Layer(LayerDef::named(""));
        assert_eq!(layer.validate(), Err(ElementError::UnnamedLayer));
    }

    #[test]
    fn test_header_extents_are_normalized() {
        let header = MapHeader {
            ext_min: Some(DVec3::new(5.0, 0.0, 1.0)),
            ext_max: Some(DVec3::new(-5.0, 2.0, 0.0)),
            values: IndexMap::new(),
        };
        let (min, max) = header.extents().expect("Grenzen erwartet");
        assert_eq!(min, DVec3::new(-5.0, 0.0, 0.0));
        assert_eq!(max, DVec3::new(5.0, 2.0, 1.0));
        assert!(MapHeader::default().extents().is_none());
    }
}
