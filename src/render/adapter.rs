//! Abstraktionsgrenze zwischen Kartenmodell und 3D-Engine.
//!
//! `MapModel`, `OrbitCamera` und `LabelOverlay` kennen nur diesen Trait,
//! nie eine konkrete Engine. Die Erzeugung von Szenenknoten ist asynchron:
//! eine Engine darf Knoten erst in einem späteren Tick anlegen. Aufrufer
//! warten deshalb sequentiell (Layer vor seinen Kindern).

use std::future::Future;

use glam::DVec3;
use thiserror::Error;

use crate::core::Rgb;

/// Handle auf einen Layer in der Szene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerHandle(pub u64);

/// Handle auf ein Primitiv (Node, Edge, GridLine) in der Szene.
///
/// Reiner Verweis für Update- und Destroy-Aufrufe, keine Besitzrelation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveHandle(pub u64);

/// Beliebiges Szenen-Handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneHandle {
    /// Layer inklusive aller Kinder
    Layer(LayerHandle),
    /// Einzelnes Primitiv
    Primitive(PrimitiveHandle),
}

impl From<LayerHandle> for SceneHandle {
    fn from(handle: LayerHandle) -> Self {
        SceneHandle::Layer(handle)
    }
}

impl From<PrimitiveHandle> for SceneHandle {
    fn from(handle: PrimitiveHandle) -> Self {
        SceneHandle::Primitive(handle)
    }
}

/// Fehler der Szenen-Schnittstelle.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    /// Der angegebene Layer existiert nicht (mehr)
    #[error("Layer {0:?} existiert nicht")]
    UnknownLayer(LayerHandle),
    /// Das angegebene Primitiv existiert nicht (mehr)
    #[error("Primitiv {0:?} existiert nicht")]
    UnknownPrimitive(PrimitiveHandle),
    /// Geometrie enthält nicht-endliche Koordinaten
    #[error("Ungueltige Geometrie fuer '{model_id}': {reason}")]
    InvalidGeometry {
        /// Modell-ID des Elements
        model_id: String,
        /// Beschreibung
        reason: String,
    },
}

/// Beschreibung eines neuen Layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDesc {
    /// Anzeigename
    pub name: String,
    /// Sichtbarkeit
    pub visible: bool,
    /// Priorität (höher = wichtiger)
    pub priority: i32,
    /// Standardfarbe aller Primitive des Layers
    pub color: Rgb,
}

/// Beschreibung eines Punkt-Nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDesc {
    /// ID des Elements im Kartenmodell
    pub model_id: String,
    /// Weltposition
    pub position: DVec3,
    /// Halbe Kantenlängen der Box (und Pick-Radius bei Punkt-Primitiven)
    pub size: DVec3,
    /// Farbe; `None` übernimmt die Layer-Farbe
    pub color: Option<Rgb>,
    /// Unsichtbar zeichnen (Alpha 0)
    pub transparent: bool,
    /// Immer als Box zeichnen, unabhängig vom globalen Primitiv-Flag
    pub force_box: bool,
}

/// Beschreibung einer Kante zwischen zwei Nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDesc {
    /// ID des Elements im Kartenmodell
    pub model_id: String,
    /// Startpunkt
    pub start: DVec3,
    /// Endpunkt
    pub end: DVec3,
    /// Breite des Tunnels
    pub width: f64,
    /// Höhe des Tunnels
    pub height: f64,
    /// Farbe; `None` übernimmt die Layer-Farbe
    pub color: Option<Rgb>,
}

/// Beschreibung einer extrapolierten Gitterlinie.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLineDesc {
    /// ID des Elements im Kartenmodell
    pub model_id: String,
    /// Startpunkt
    pub start: DVec3,
    /// Endpunkt
    pub end: DVec3,
    /// Ausrichtungsvektor des Gitters
    pub align: DVec3,
    /// Breite und Höhe des Gitters
    pub size: f64,
    /// Farbe; `None` übernimmt die Layer-Farbe
    pub color: Option<Rgb>,
}

/// Ergebnis eines Picks.
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    /// Oberstes Primitiv über dem getroffenen Geometrie-Knoten
    pub primitive: PrimitiveHandle,
    /// Layer des Primitivs
    pub layer: LayerHandle,
    /// Modell-ID des Primitivs
    pub model_id: String,
    /// Abstand vom Strahlursprung
    pub distance: f64,
    /// Getroffener Weltpunkt
    pub world: DVec3,
}

/// Schnittstelle zu einer konkreten 3D-Engine.
///
/// Wird einmal pro Ziel-Engine implementiert.
pub trait SceneGraphAdapter {
    /// Legt einen Layer an.
    fn create_layer(
        &mut self,
        desc: LayerDesc,
    ) -> impl Future<Output = Result<LayerHandle, SceneError>>;

    /// Legt einen Node unter `layer` an.
    fn create_node(
        &mut self,
        layer: LayerHandle,
        desc: NodeDesc,
    ) -> impl Future<Output = Result<PrimitiveHandle, SceneError>>;

    /// Legt eine Kante unter `layer` an.
    fn create_edge(
        &mut self,
        layer: LayerHandle,
        desc: EdgeDesc,
    ) -> impl Future<Output = Result<PrimitiveHandle, SceneError>>;

    /// Legt eine Gitterlinie unter `layer` an.
    fn create_grid_line(
        &mut self,
        layer: LayerHandle,
        desc: GridLineDesc,
    ) -> impl Future<Output = Result<PrimitiveHandle, SceneError>>;

    /// Entfernt Layer (inkl. Kinder) oder Primitiv. Idempotent: `false`, wenn nichts mehr existierte.
    fn destroy(&mut self, handle: SceneHandle) -> bool;

    /// Setzt die Farbe. Bei Layern wird die Standardfarbe gesetzt und auf alle Primitive übertragen.
    fn set_color(&mut self, handle: SceneHandle, color: Rgb) -> bool;

    /// Schaltet die Sichtbarkeit eines Layers.
    fn set_visible(&mut self, layer: LayerHandle, visible: bool) -> bool;

    /// Ändert die Priorität eines Layers.
    fn set_priority(&mut self, layer: LayerHandle, priority: i32) -> bool;

    /// Schaltet die Selektions-Umrandung eines Primitivs.
    fn set_selected(&mut self, primitive: PrimitiveHandle, selected: bool) -> bool;

    /// Verschiebt einen Node.
    fn set_node_position(&mut self, primitive: PrimitiveHandle, position: DVec3) -> bool;

    /// Setzt neue Endpunkte einer Kante oder Gitterlinie.
    fn set_endpoints(&mut self, primitive: PrimitiveHandle, start: DVec3, end: DVec3) -> bool;

    /// Pick an Pixelposition. `None` wenn nichts getroffen wurde.
    fn pick_at(&mut self, x: f64, y: f64) -> Option<PickResult>;
}
