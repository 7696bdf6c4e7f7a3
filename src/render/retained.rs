//! Engine-unabhängiger Szenengraph im Speicher.
//!
//! Aufbau pro Layer:
//! - Node: `Name → Translate → Flags → Material → {Geometry, Select}`
//! - Tunnel-Kante: `Name → Material → Matrix → {Geometry, Select}`
//! - Linien-Kante: `Name → Material → {Geometry, Select}`
//! - Gitterlinie: `Name → Material → Geometry`
//!
//! Primitive mit gleicher Modell-ID und gleichem Typ bilden eine
//! Material-Gruppe. Pro Gruppe ist nur das Primitiv des sichtbaren Layers
//! mit der höchsten Priorität aktiv; nur aktive Primitive besitzen
//! Geometrie-, Matrix- und Select-Knoten.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use glam::{DMat4, DVec2, DVec3};
use indexmap::{IndexMap, IndexSet};

use super::adapter::{
    EdgeDesc, GridLineDesc, LayerDesc, LayerHandle, NodeDesc, PickResult, PrimitiveHandle,
    SceneError, SceneGraphAdapter, SceneHandle,
};
use super::geometry::{
    build_grid_line, line_between, selection_bounds, tunnel_half_extents, tunnel_transform,
    LineGeometry, SELECTION_MARGIN,
};
use super::picking::{ray_aabb, ray_segment_distance, ray_sphere, Ray};
use crate::core::{ElementKind, FrameContext, OrbitCamera, Rgb};

/// Pick-Toleranz für Linien-Geometrie in Welteinheiten.
pub const LINE_PICK_TOLERANCE: f64 = 0.5;

/// ID eines Szenenknotens.
pub type NodeId = u64;

/// Geometrie eines Blattknotens.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Einzelner Punkt im lokalen Ursprung
    Points {
        /// Radius für das Picking
        pick_radius: f64,
    },
    /// Quader `[-half, half]`
    Box {
        /// Halbe Kantenlängen
        half: DVec3,
    },
    /// Linien
    Lines(LineGeometry),
    /// Drahtgitter-Umrandung (Selektion)
    Boundary {
        /// Untere Ecke
        min: DVec3,
        /// Obere Ecke
        max: DVec3,
    },
}

/// Art eines Szenenknotens.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Wurzel eines Layers
    Layer,
    /// Benennung (Wurzel eines Primitivs)
    Name(String),
    /// Verschiebung
    Translate(DVec3),
    /// Darstellungs-Flags
    Flags {
        /// Transparent zeichnen
        transparent: bool,
    },
    /// Material
    Material {
        /// Farbe
        color: Rgb,
        /// Deckkraft
        alpha: f32,
    },
    /// Beliebige Transformation
    Matrix(DMat4),
    /// Blatt mit Geometrie
    Geometry(Geometry),
    /// Selektions-Umrandung
    Select {
        /// Sichtbar
        enabled: bool,
        /// Untere Ecke
        min: DVec3,
        /// Obere Ecke
        max: DVec3,
    },
}

/// Knoten im Szenengraph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Art und Daten
    pub kind: NodeKind,
    /// Elternknoten
    pub parent: Option<NodeId>,
    /// Kinder; IDs steigen monoton, die Reihenfolge ist also die Einfüge-Reihenfolge
    pub children: BTreeSet<NodeId>,
}

/// Eintrag der Zeichenliste.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Zugehöriges Primitiv
    pub primitive: PrimitiveHandle,
    /// Zugehöriger Layer
    pub layer: LayerHandle,
    /// Farbe
    pub color: Rgb,
    /// Deckkraft
    pub alpha: f32,
    /// Welt-Transformation
    pub transform: DMat4,
    /// Geometrie
    pub geometry: Geometry,
}

/// Zustand eines Primitivs (für UI und Tests).
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveState {
    /// Layer
    pub layer: LayerHandle,
    /// Modell-ID
    pub model_id: String,
    /// Typ
    pub kind: ElementKind,
    /// Aktiv in seiner Material-Gruppe
    pub active: bool,
    /// Selektiert
    pub selected: bool,
    /// Aktuelle Materialfarbe
    pub color: Rgb,
}

/// Zustand eines Layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerState {
    /// Name
    pub name: String,
    /// Sichtbarkeit
    pub visible: bool,
    /// Priorität
    pub priority: i32,
    /// Standardfarbe
    pub color: Rgb,
    /// Anzahl der Primitive
    pub primitive_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Node {
        position: DVec3,
        size: DVec3,
        points: bool,
    },
    Edge {
        start: DVec3,
        end: DVec3,
        width: f64,
        height: f64,
        line: bool,
    },
    Grid {
        start: DVec3,
        end: DVec3,
        align: DVec3,
        size: f64,
    },
}

impl Shape {
    fn kind(&self) -> ElementKind {
        match self {
            Shape::Node { .. } => ElementKind::Node,
            Shape::Edge { .. } => ElementKind::Edge,
            Shape::Grid { .. } => ElementKind::GridLine,
        }
    }
}

type GroupKey = (ElementKind, String);

#[derive(Debug)]
struct LayerEntry {
    name: String,
    visible: bool,
    priority: i32,
    color: Rgb,
    primitives: IndexSet<PrimitiveHandle>,
}

#[derive(Debug)]
struct PrimitiveEntry {
    layer: LayerHandle,
    model_id: String,
    shape: Shape,
    material: NodeId,
    translate: Option<NodeId>,
    parts: Vec<NodeId>,
    selected: bool,
    active: bool,
}

impl PrimitiveEntry {
    fn group_key(&self) -> GroupKey {
        (self.shape.kind(), self.model_id.clone())
    }
}

/// Blatt beim Durchlaufen eines Layers.
struct Leaf<'a> {
    node: NodeId,
    transform: DMat4,
    color: Rgb,
    alpha: f32,
    kind: &'a NodeKind,
}

/// Future, das genau einmal `Pending` liefert (Erzeugung im nächsten Tick).
#[derive(Debug, Default)]
struct NextTick {
    yielded: bool,
}

impl Future for NextTick {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Szenengraph im Speicher; Referenz-Implementierung von [`SceneGraphAdapter`].
#[derive(Debug)]
pub struct RetainedScene {
    nodes: HashMap<NodeId, SceneNode>,
    next_id: NodeId,
    layers: IndexMap<LayerHandle, LayerEntry>,
    primitives: HashMap<PrimitiveHandle, PrimitiveEntry>,
    groups: HashMap<GroupKey, IndexSet<PrimitiveHandle>>,
    drawing_primitive: bool,
    frame: Option<FrameContext>,
    last_pick: Option<PickResult>,
}

impl RetainedScene {
    /// Leere Szene. `drawing_primitive` wählt Linien/Punkte statt Tunnel/Boxen.
    pub fn new(drawing_primitive: bool) -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 0,
            layers: IndexMap::new(),
            primitives: HashMap::new(),
            groups: HashMap::new(),
            drawing_primitive,
            frame: None,
            last_pick: None,
        }
    }

    /// Zeichnet Kanten als Linien und Nodes als Punkte.
    pub fn drawing_primitive(&self) -> bool {
        self.drawing_primitive
    }

    /// Anzahl aller lebenden Szenenknoten.
    pub fn live_node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Anzahl der Layer.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Anzahl der Primitive.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Einzelner Knoten.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Zustand eines Layers.
    pub fn layer_state(&self, handle: LayerHandle) -> Option<LayerState> {
        self.layers.get(&handle).map(|entry| LayerState {
            name: entry.name.clone(),
            visible: entry.visible,
            priority: entry.priority,
            color: entry.color,
            primitive_count: entry.primitives.len(),
        })
    }

    /// Zustand eines Primitivs.
    pub fn primitive_state(&self, handle: PrimitiveHandle) -> Option<PrimitiveState> {
        let entry = self.primitives.get(&handle)?;
        let color = match self.nodes.get(&entry.material).map(|n| &n.kind) {
            Some(NodeKind::Material { color, .. }) => *color,
            _ => Rgb::WHITE,
        };
        Some(PrimitiveState {
            layer: entry.layer,
            model_id: entry.model_id.clone(),
            kind: entry.shape.kind(),
            active: entry.active,
            selected: entry.selected,
            color,
        })
    }

    /// Übernimmt die Kameramatrizen des aktuellen Frames (für das Picking).
    pub fn set_frame(&mut self, frame: FrameContext) {
        self.frame = Some(frame);
    }

    /// Aktueller Frame.
    pub fn frame(&self) -> Option<&FrameContext> {
        self.frame.as_ref()
    }

    /// Passt Kamera-Seitenverhältnis und Frame an eine neue Zeichenflächengröße an.
    pub fn resize(&mut self, camera: &mut OrbitCamera, width: f64, height: f64) {
        camera.fix_aspect(width, height);
        self.frame = Some(camera.frame(DVec2::new(width, height)));
    }

    /// Ergebnis des letzten erfolgreichen Picks.
    pub fn last_pick(&self) -> Option<&PickResult> {
        self.last_pick.as_ref()
    }

    /// Ändert Breite und Höhe einer Tunnel-Kante. Linien-Kanten haben keine Größe.
    pub fn set_edge_size(&mut self, handle: PrimitiveHandle, width: f64, height: f64) -> bool {
        let Some(entry) = self.primitives.get_mut(&handle) else {
            return false;
        };
        match &mut entry.shape {
            Shape::Edge {
                width: w,
                height: h,
                line: false,
                ..
            } => {
                if *w == width && *h == height {
                    return true;
                }
                *w = width;
                *h = height;
            }
            Shape::Edge { line: true, .. } => {
                log::error!(
                    "Groesse der Linien-Kante '{}' kann nicht gesetzt werden",
                    entry.model_id
                );
                return false;
            }
            _ => {
                log::error!("'{}' ist keine Kante", entry.model_id);
                return false;
            }
        }
        let active = entry.active;
        self.rebuild(handle, active);
        true
    }

    /// Zeichenliste: sichtbare Layer aufsteigend nach Priorität, darin Baumreihenfolge.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut layers: Vec<(LayerHandle, i32)> = self
            .layers
            .iter()
            .filter(|(_, entry)| entry.visible)
            .map(|(handle, entry)| (*handle, entry.priority))
            .collect();
        layers.sort_by_key(|(_, priority)| *priority);

        let mut items = Vec::new();
        for (layer, _) in layers {
            for leaf in self.leaves(layer) {
                let geometry = match leaf.kind {
                    NodeKind::Geometry(geometry) => geometry.clone(),
                    NodeKind::Select {
                        enabled: true,
                        min,
                        max,
                    } => Geometry::Boundary {
                        min: *min,
                        max: *max,
                    },
                    _ => continue,
                };
                let is_outline = matches!(geometry, Geometry::Boundary { .. });
                let Some(primitive) = self.primitive_of(leaf.node) else {
                    continue;
                };
                items.push(DrawItem {
                    primitive,
                    layer,
                    color: if is_outline { Rgb::SELECTION } else { leaf.color },
                    alpha: if is_outline { 1.0 } else { leaf.alpha },
                    transform: leaf.transform,
                    geometry,
                });
            }
        }
        items
    }

    fn allocate(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        self.next_id += 1;
        let id = self.next_id;
        self.nodes.insert(
            id,
            SceneNode {
                kind,
                parent,
                children: BTreeSet::new(),
            },
        );
        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent_node.children.insert(id);
        }
        id
    }

    fn remove_subtree(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };
        if let Some(parent_node) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent_node.children.remove(&id);
        }
        let mut stack: Vec<NodeId> = node.children.into_iter().collect();
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&child) {
                stack.extend(removed.children);
            }
        }
        true
    }

    /// Sucht das Primitiv, zu dem ein Knoten gehört (Weg nach oben bis zur Name-Wurzel).
    fn primitive_of(&self, mut id: NodeId) -> Option<PrimitiveHandle> {
        loop {
            if self.primitives.contains_key(&PrimitiveHandle(id)) {
                return Some(PrimitiveHandle(id));
            }
            id = self.nodes.get(&id)?.parent?;
        }
    }

    fn leaves(&self, layer: LayerHandle) -> Vec<Leaf<'_>> {
        let mut leaves = Vec::new();
        let mut stack = vec![(layer.0, DMat4::IDENTITY, Rgb::WHITE, 1.0_f32)];
        while let Some((id, transform, color, alpha)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let (transform, color, alpha) = match &node.kind {
                NodeKind::Translate(offset) => {
                    (transform * DMat4::from_translation(*offset), color, alpha)
                }
                NodeKind::Matrix(matrix) => (transform * *matrix, color, alpha),
                NodeKind::Material { color, alpha } => (transform, *color, *alpha),
                NodeKind::Geometry(_) | NodeKind::Select { .. } => {
                    leaves.push(Leaf {
                        node: id,
                        transform,
                        color,
                        alpha,
                        kind: &node.kind,
                    });
                    continue;
                }
                NodeKind::Layer | NodeKind::Name(_) | NodeKind::Flags { .. } => {
                    (transform, color, alpha)
                }
            };
            // Rückwärts, damit die Kinder in Einfüge-Reihenfolge vom Stack kommen
            for child in node.children.iter().rev() {
                stack.push((*child, transform, color, alpha));
            }
        }
        leaves
    }

    fn validate(model_id: &str, points: &[DVec3]) -> Result<(), SceneError> {
        if points.iter().all(|p| p.is_finite()) {
            Ok(())
        } else {
            Err(SceneError::InvalidGeometry {
                model_id: model_id.to_string(),
                reason: "nicht-endliche Koordinaten".to_string(),
            })
        }
    }

    fn insert_primitive(
        &mut self,
        layer: LayerHandle,
        model_id: String,
        shape: Shape,
        color: Option<Rgb>,
        transparent: bool,
    ) -> Result<PrimitiveHandle, SceneError> {
        let layer_color = self
            .layers
            .get(&layer)
            .map(|entry| entry.color)
            .ok_or(SceneError::UnknownLayer(layer))?;
        let material_kind = NodeKind::Material {
            color: color.unwrap_or(layer_color),
            alpha: if transparent { 0.0 } else { 1.0 },
        };

        let root = self.allocate(Some(layer.0), NodeKind::Name(model_id.clone()));
        let (material, translate) = match &shape {
            Shape::Node { position, .. } => {
                let translate = self.allocate(Some(root), NodeKind::Translate(*position));
                let flags = self.allocate(Some(translate), NodeKind::Flags { transparent });
                (self.allocate(Some(flags), material_kind), Some(translate))
            }
            Shape::Edge { .. } | Shape::Grid { .. } => {
                (self.allocate(Some(root), material_kind), None)
            }
        };

        let handle = PrimitiveHandle(root);
        let entry = PrimitiveEntry {
            layer,
            model_id,
            shape,
            material,
            translate,
            parts: Vec::new(),
            selected: false,
            active: false,
        };
        let key = entry.group_key();
        self.primitives.insert(handle, entry);
        if let Some(layer_entry) = self.layers.get_mut(&layer) {
            layer_entry.primitives.insert(handle);
        }
        self.groups.entry(key.clone()).or_default().insert(handle);
        self.resolve_groups([key]);
        Ok(handle)
    }

    /// Baut Matrix-, Geometrie- und Select-Knoten eines aktiven Primitivs.
    fn build_parts(&mut self, handle: PrimitiveHandle) -> Vec<NodeId> {
        let Some(entry) = self.primitives.get(&handle) else {
            return Vec::new();
        };
        let material = entry.material;
        let selected = entry.selected;
        let shape = entry.shape.clone();

        match shape {
            Shape::Node { size, points, .. } => {
                let geometry = if points {
                    Geometry::Points {
                        pick_radius: size.max_element(),
                    }
                } else {
                    Geometry::Box { half: size }
                };
                let (min, max) = selection_bounds(size);
                vec![
                    self.allocate(Some(material), NodeKind::Geometry(geometry)),
                    self.allocate(
                        Some(material),
                        NodeKind::Select {
                            enabled: selected,
                            min,
                            max,
                        },
                    ),
                ]
            }
            Shape::Edge {
                start,
                end,
                width,
                height,
                line: false,
            } => {
                let half = tunnel_half_extents(start, end, width, height);
                let matrix =
                    self.allocate(Some(material), NodeKind::Matrix(tunnel_transform(start, end)));
                self.allocate(
                    Some(matrix),
                    NodeKind::Geometry(Geometry::Box { half }),
                );
                let (min, max) = selection_bounds(half);
                self.allocate(
                    Some(matrix),
                    NodeKind::Select {
                        enabled: selected,
                        min,
                        max,
                    },
                );
                vec![matrix]
            }
            Shape::Edge {
                start,
                end,
                line: true,
                ..
            } => {
                let margin = DVec3::splat(SELECTION_MARGIN);
                vec![
                    self.allocate(
                        Some(material),
                        NodeKind::Geometry(Geometry::Lines(line_between(start, end))),
                    ),
                    self.allocate(
                        Some(material),
                        NodeKind::Select {
                            enabled: selected,
                            min: start.min(end) - margin,
                            max: start.max(end) + margin,
                        },
                    ),
                ]
            }
            Shape::Grid {
                start,
                end,
                align,
                size,
            } => vec![self.allocate(
                Some(material),
                NodeKind::Geometry(Geometry::Lines(build_grid_line(start, end, align, size))),
            )],
        }
    }

    /// Zerstört alle gebauten Knoten eines Primitivs und baut sie bei Bedarf neu.
    fn rebuild(&mut self, handle: PrimitiveHandle, active: bool) {
        let parts = match self.primitives.get_mut(&handle) {
            Some(entry) => {
                entry.active = active;
                std::mem::take(&mut entry.parts)
            }
            None => return,
        };
        for part in parts {
            self.remove_subtree(part);
        }
        if active {
            let parts = self.build_parts(handle);
            if let Some(entry) = self.primitives.get_mut(&handle) {
                entry.parts = parts;
            }
        }
    }

    /// Bestimmt für alle betroffenen Gruppen das aktive Primitiv neu.
    ///
    /// Erst wird der komplette Plan berechnet, dann in einem Durchgang angewendet.
    fn resolve_groups(&mut self, keys: impl IntoIterator<Item = GroupKey>) {
        let keys: IndexSet<GroupKey> = keys.into_iter().collect();
        let mut plan = Vec::new();
        for key in &keys {
            let Some(members) = self.groups.get(key) else {
                continue;
            };
            let winner = members
                .iter()
                .copied()
                .filter_map(|h| {
                    let layer = self.layers.get(&self.primitives.get(&h)?.layer)?;
                    layer.visible.then_some((h, layer.priority))
                })
                .max_by(|(ha, pa), (hb, pb)| pa.cmp(pb).then(hb.cmp(ha)))
                .map(|(h, _)| h);
            plan.extend(members.iter().map(|h| (*h, Some(*h) == winner)));
        }
        for (handle, active) in plan {
            self.rebuild(handle, active);
        }
    }

    fn keys_of_layer(&self, layer: LayerHandle) -> Vec<GroupKey> {
        self.layers
            .get(&layer)
            .map(|entry| {
                entry
                    .primitives
                    .iter()
                    .filter_map(|h| self.primitives.get(h).map(PrimitiveEntry::group_key))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn forget_primitive(&mut self, handle: PrimitiveHandle) -> Option<GroupKey> {
        let entry = self.primitives.remove(&handle)?;
        let key = entry.group_key();
        if let Some(members) = self.groups.get_mut(&key) {
            members.swap_remove(&handle);
            if members.is_empty() {
                self.groups.remove(&key);
            }
        }
        if let Some(layer) = self.layers.get_mut(&entry.layer) {
            layer.primitives.swap_remove(&handle);
        }
        Some(key)
    }

    fn destroy_primitive(&mut self, handle: PrimitiveHandle) -> bool {
        let Some(key) = self.forget_primitive(handle) else {
            return false;
        };
        self.remove_subtree(handle.0);
        self.resolve_groups([key]);
        true
    }

    fn destroy_layer(&mut self, handle: LayerHandle) -> bool {
        // Layer zuerst austragen: die Primitive verschwinden mit dem Teilbaum
        let Some(entry) = self.layers.shift_remove(&handle) else {
            return false;
        };
        let keys: Vec<GroupKey> = entry
            .primitives
            .into_iter()
            .filter_map(|h| self.forget_primitive(h))
            .collect();
        self.remove_subtree(handle.0);
        self.resolve_groups(keys);
        log::debug!("Layer {:?} zerstoert", handle);
        true
    }

    fn hit_distance(ray: &Ray, leaf: &Leaf<'_>) -> Option<f64> {
        let NodeKind::Geometry(geometry) = leaf.kind else {
            return None;
        };
        let inverse = leaf.transform.inverse();
        if !inverse.is_finite() {
            return None;
        }
        let local = ray.transformed(&inverse);
        match geometry {
            Geometry::Points { pick_radius } => ray_sphere(&local, DVec3::ZERO, *pick_radius),
            Geometry::Box { half } => ray_aabb(&local, -*half, *half),
            Geometry::Lines(lines) => lines
                .segments()
                .map(|(a, b)| ray_segment_distance(&local, a, b))
                .filter(|(distance, _)| *distance <= LINE_PICK_TOLERANCE)
                .map(|(_, t)| t)
                .min_by(f64::total_cmp),
            Geometry::Boundary { .. } => None,
        }
    }
}

impl Default for RetainedScene {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SceneGraphAdapter for RetainedScene {
    async fn create_layer(&mut self, desc: LayerDesc) -> Result<LayerHandle, SceneError> {
        NextTick::default().await;
        let handle = LayerHandle(self.allocate(None, NodeKind::Layer));
        log::debug!("Layer '{}' angelegt ({:?})", desc.name, handle);
        self.layers.insert(
            handle,
            LayerEntry {
                name: desc.name,
                visible: desc.visible,
                priority: desc.priority,
                color: desc.color,
                primitives: IndexSet::new(),
            },
        );
        Ok(handle)
    }

    async fn create_node(
        &mut self,
        layer: LayerHandle,
        desc: NodeDesc,
    ) -> Result<PrimitiveHandle, SceneError> {
        NextTick::default().await;
        Self::validate(&desc.model_id, &[desc.position, desc.size])?;
        let shape = Shape::Node {
            position: desc.position,
            size: desc.size,
            points: self.drawing_primitive && !desc.force_box,
        };
        self.insert_primitive(layer, desc.model_id, shape, desc.color, desc.transparent)
    }

    async fn create_edge(
        &mut self,
        layer: LayerHandle,
        desc: EdgeDesc,
    ) -> Result<PrimitiveHandle, SceneError> {
        NextTick::default().await;
        Self::validate(&desc.model_id, &[desc.start, desc.end])?;
        let shape = Shape::Edge {
            start: desc.start,
            end: desc.end,
            width: desc.width,
            height: desc.height,
            line: self.drawing_primitive,
        };
        self.insert_primitive(layer, desc.model_id, shape, desc.color, false)
    }

    async fn create_grid_line(
        &mut self,
        layer: LayerHandle,
        desc: GridLineDesc,
    ) -> Result<PrimitiveHandle, SceneError> {
        NextTick::default().await;
        Self::validate(&desc.model_id, &[desc.start, desc.end, desc.align])?;
        let shape = Shape::Grid {
            start: desc.start,
            end: desc.end,
            align: desc.align,
            size: desc.size,
        };
        self.insert_primitive(layer, desc.model_id, shape, desc.color, false)
    }

    fn destroy(&mut self, handle: SceneHandle) -> bool {
        match handle {
            SceneHandle::Layer(layer) => self.destroy_layer(layer),
            SceneHandle::Primitive(primitive) => self.destroy_primitive(primitive),
        }
    }

    fn set_color(&mut self, handle: SceneHandle, color: Rgb) -> bool {
        let root = match handle {
            SceneHandle::Layer(layer) => {
                let Some(entry) = self.layers.get_mut(&layer) else {
                    return false;
                };
                entry.color = color;
                layer.0
            }
            SceneHandle::Primitive(primitive) => {
                let Some(entry) = self.primitives.get(&primitive) else {
                    return false;
                };
                entry.material
            }
        };
        // Ein Durchlauf über den Teilbaum; Selektions-Umrandungen behalten ihre Farbe
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::Material { color: current, .. } => *current = color,
                NodeKind::Select { .. } => continue,
                _ => {}
            }
            stack.extend(node.children.iter().copied());
        }
        true
    }

    fn set_visible(&mut self, layer: LayerHandle, visible: bool) -> bool {
        let Some(entry) = self.layers.get_mut(&layer) else {
            return false;
        };
        if entry.visible != visible {
            entry.visible = visible;
            let keys = self.keys_of_layer(layer);
            self.resolve_groups(keys);
        }
        true
    }

    fn set_priority(&mut self, layer: LayerHandle, priority: i32) -> bool {
        let Some(entry) = self.layers.get_mut(&layer) else {
            return false;
        };
        if entry.priority != priority {
            entry.priority = priority;
            let keys = self.keys_of_layer(layer);
            self.resolve_groups(keys);
        }
        true
    }

    fn set_selected(&mut self, primitive: PrimitiveHandle, selected: bool) -> bool {
        let Some(entry) = self.primitives.get_mut(&primitive) else {
            return false;
        };
        if matches!(entry.shape, Shape::Grid { .. }) {
            log::error!(
                "Gitterlinie '{}' kann nicht selektiert werden",
                entry.model_id
            );
            return false;
        }
        entry.selected = selected;
        let mut stack = entry.parts.clone();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if let NodeKind::Select { enabled, .. } = &mut node.kind {
                *enabled = selected;
            }
            stack.extend(node.children.iter().copied());
        }
        true
    }

    fn set_node_position(&mut self, primitive: PrimitiveHandle, position: DVec3) -> bool {
        if !position.is_finite() {
            log::warn!("Ungueltige Node-Position {:?} ignoriert", position);
            return false;
        }
        let Some(entry) = self.primitives.get_mut(&primitive) else {
            return false;
        };
        let (Shape::Node { position: current, .. }, Some(translate)) =
            (&mut entry.shape, entry.translate)
        else {
            log::error!("'{}' ist kein Node", entry.model_id);
            return false;
        };
        *current = position;
        if let Some(node) = self.nodes.get_mut(&translate) {
            node.kind = NodeKind::Translate(position);
        }
        true
    }

    fn set_endpoints(&mut self, primitive: PrimitiveHandle, start: DVec3, end: DVec3) -> bool {
        if !start.is_finite() || !end.is_finite() {
            log::warn!("Ungueltige Endpunkte {:?} / {:?} ignoriert", start, end);
            return false;
        }
        let Some(entry) = self.primitives.get_mut(&primitive) else {
            return false;
        };
        match &mut entry.shape {
            Shape::Edge {
                start: s, end: e, ..
            }
            | Shape::Grid {
                start: s, end: e, ..
            } => {
                if *s == start && *e == end {
                    return true;
                }
                *s = start;
                *e = end;
            }
            Shape::Node { .. } => {
                log::error!("Node '{}' hat keine Endpunkte", entry.model_id);
                return false;
            }
        }
        let active = entry.active;
        self.rebuild(primitive, active);
        true
    }

    fn pick_at(&mut self, x: f64, y: f64) -> Option<PickResult> {
        let frame = self.frame?;
        let (origin, direction) = frame.ray_through(x, y)?;
        let ray = Ray::new(origin, direction)?;

        let mut best: Option<(f64, NodeId, LayerHandle)> = None;
        for (layer, entry) in &self.layers {
            if !entry.visible {
                continue;
            }
            for leaf in self.leaves(*layer) {
                let Some(t) = Self::hit_distance(&ray, &leaf) else {
                    continue;
                };
                if best.is_none_or(|(best_t, _, _)| t < best_t) {
                    best = Some((t, leaf.node, *layer));
                }
            }
        }

        let (distance, leaf, layer) = best?;
        let primitive = self.primitive_of(leaf)?;
        let model_id = self.primitives.get(&primitive)?.model_id.clone();
        let result = PickResult {
            primitive,
            layer,
            model_id,
            distance,
            world: ray.at(distance),
        };
        log::debug!("Pick ({}, {}) -> '{}'", x, y, result.model_id);
        self.last_pick = Some(result.clone());
        Some(result)
    }
}
