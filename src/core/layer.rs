//! Layer: benannte Gruppe von Nodes, Kanten und Gitterlinien.

use glam::DVec3;
use indexmap::IndexMap;

use super::element::{EdgeRecord, GridLineRecord, LayerDef, NodeRecord};
use super::Rgb;
use crate::render::{LayerHandle, PrimitiveHandle};

/// Standard-Node-Größe (halbe Kantenlängen) neuer Layer.
pub const DEFAULT_NODE_SIZE: DVec3 = DVec3::splat(0.3);

/// Datensatz mit optionalem Verweis auf sein gezeichnetes Primitiv.
///
/// `scene` ist kein Besitz, sondern nur ein Handle für Update/Destroy.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawn<T> {
    /// Daten aus der Karte
    pub record: T,
    /// Gezeichnetes Primitiv (None = noch nicht gezeichnet oder übersprungen)
    pub scene: Option<PrimitiveHandle>,
}

impl<T> Drawn<T> {
    /// Ungezeichneter Datensatz.
    pub fn pending(record: T) -> Self {
        Self {
            record,
            scene: None,
        }
    }
}

/// Layer des Kartenmodells.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Eindeutiger Name
    pub name: String,
    /// Sichtbarkeit
    pub visible: bool,
    /// Priorität (höher gewinnt bei gleicher Material-Gruppe)
    pub priority: i32,
    /// Standardfarbe
    pub color: Rgb,
    /// Node-Größe (halbe Kantenlängen)
    pub node_size: DVec3,
    /// Nodes nach ID, in Einfüge-Reihenfolge
    pub nodes: IndexMap<String, Drawn<NodeRecord>>,
    /// Kanten nach ID
    pub edges: IndexMap<String, Drawn<EdgeRecord>>,
    /// Gitterlinien nach ID
    pub grid_lines: IndexMap<String, Drawn<GridLineRecord>>,
    /// Wird beim Zeichnen übersprungen
    pub is_ignored: bool,
    /// Layer in der Szene
    pub scene: Option<LayerHandle>,
}

impl Layer {
    /// Neuer, leerer und sichtbarer Layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            priority: 0,
            color: Rgb::LAYER_DEFAULT,
            node_size: DEFAULT_NODE_SIZE,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            grid_lines: IndexMap::new(),
            is_ignored: false,
            scene: None,
        }
    }

    /// Übernimmt Sichtbarkeit, Priorität, Farbe und Größe aus einer Definition.
    ///
    /// Eine ungültige Farbe behält die bisherige Farbe bei.
    pub fn apply_def(&mut self, def: &LayerDef) {
        self.visible = def.visible;
        self.priority = def.priority;
        if let Some(hex) = &def.color {
            match Rgb::from_hex(hex) {
                Some(color) => self.color = color,
                None => log::warn!("Layer '{}': ungueltige Farbe '{}'", self.name, hex),
            }
        }
        if let Some(size) = def.size {
            if size.is_finite() && size.min_element() > 0.0 {
                self.node_size = size;
            }
        }
    }

    /// Definition mit den aktuellen Werten.
    pub fn to_def(&self) -> LayerDef {
        LayerDef {
            name: self.name.clone(),
            visible: self.visible,
            priority: self.priority,
            color: Some(self.color.to_hex()),
            size: Some(self.node_size),
        }
    }

    /// Position eines Nodes dieses Layers.
    pub fn node_position(&self, id: &str) -> Option<DVec3> {
        self.nodes.get(id).map(|n| n.record.position)
    }

    /// `true`, wenn der Layer keine Elemente enthält.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.grid_lines.is_empty()
    }

    /// Alle Primitiv-Handles dieses Layers.
    pub fn primitive_handles(&self) -> impl Iterator<Item = PrimitiveHandle> + '_ {
        self.nodes
            .values()
            .filter_map(|n| n.scene)
            .chain(self.edges.values().filter_map(|e| e.scene))
            .chain(self.grid_lines.values().filter_map(|g| g.scene))
    }

    /// Vergisst alle Szenen-Handles (nach Zerstörung des Layers in der Szene).
    pub fn forget_scene(&mut self) {
        self.scene = None;
        self.nodes.values_mut().for_each(|n| n.scene = None);
        self.edges.values_mut().for_each(|e| e.scene = None);
        self.grid_lines.values_mut().for_each(|g| g.scene = None);
    }
}
