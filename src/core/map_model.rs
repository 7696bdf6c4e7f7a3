//! Kartenmodell: Layer-Baum, Parser-Registry und Zeichnen in eine Szene.
//!
//! Lebenszyklus: `Empty → Parsing → Populated → (Destroying → Empty)`.
//! Eingabefehler (unbekannte Erweiterung, fehlender Parser, fehlende
//! Endpunkte) werden protokolliert und übersprungen, nie an den Aufrufer
//! weitergereicht.

use std::collections::HashMap;

use glam::DVec3;
use indexmap::IndexMap;
use thiserror::Error;

use super::element::{
    ElementError, GridLineRecord, LayerDef, MapElement, MapHeader, NodeRecord, DEFAULT_LAYER,
};
use super::layer::{Drawn, Layer};
use super::map_log::{MapLog, MapLogEvent};
use super::math::bounds_of;
use super::Rgb;
use crate::formats::{parse_json, MapExport, MapParser, JSON_EXTENSION};
use crate::render::{
    EdgeDesc, GridLineDesc, LayerDesc, NodeDesc, PrimitiveHandle, SceneGraphAdapter, SceneHandle,
};

/// Suffix des durch Extrapolation erzeugten Layers.
pub const EXTRAPOLATED_SUFFIX: &str = "_extrapolated";

/// Lebenszyklus-Zustand der Karte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// Keine Layer
    Empty,
    /// Parser läuft
    Parsing,
    /// Mindestens ein Layer vorhanden
    Populated,
    /// Szene wird freigegeben
    Destroying,
}

/// Fehler an der Eingangsgrenze. Wird nur gemeldet, nie geworfen.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngestError {
    /// Dateiname ohne Erweiterung
    #[error("Dateierweiterung von '{0}' nicht bestimmbar")]
    MissingExtension(String),
    /// Parser hat einen Fehler gemeldet
    #[error("'{filename}' konnte nicht geparst werden: {reason}")]
    ParserFailed {
        /// Dateiname
        filename: String,
        /// Fehlerbeschreibung
        reason: String,
    },
    /// Layer existiert nicht
    #[error("Layer '{0}' existiert nicht")]
    UnknownLayer(String),
}

/// Ergebnis von [`MapModel::parse_map_data`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Daten wurden geparst
    Parsed {
        /// Übernommene Elemente
        elements: usize,
        /// Verworfene Elemente
        rejected: usize,
    },
    /// Kein Parser registriert, Daten werden zurückgehalten
    Deferred {
        /// Erweiterung, auf deren Parser gewartet wird
        extension: String,
    },
    /// Daten wurden verworfen
    Skipped(IngestError),
}

/// Modell-Einstellungen aus der Konfiguration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Layer, die nie gezeichnet werden
    pub ignored_layers: Vec<String>,
    /// Standard-Ausrichtung von Gitterlinien
    pub grid_align: DVec3,
    /// Standardgröße von Gitterlinien
    pub grid_size: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            ignored_layers: Vec::new(),
            grid_align: DVec3::Y,
            grid_size: crate::render::geometry::DEFAULT_GRID_SIZE,
        }
    }
}

/// Zusatzinformationen der geladenen Karte.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapInfo {
    /// Dateiname der zuletzt geparsten Karte
    pub filename: Option<String>,
    /// Kopfdaten
    pub header: Option<MapHeader>,
}

/// Bilanz eines `draw_map`-Durchlaufs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Gezeichnete Layer
    pub layers: usize,
    /// Gezeichnete Nodes
    pub nodes: usize,
    /// Gezeichnete Kanten
    pub edges: usize,
    /// Gezeichnete Gitterlinien
    pub grid_lines: usize,
    /// Wegen fehlender Endpunkte übersprungen
    pub skipped: usize,
    /// Von der Szene abgelehnt
    pub failed: usize,
}

impl DrawReport {
    /// Summe aller gezeichneten Primitive.
    pub fn primitives(&self) -> usize {
        self.nodes + self.edges + self.grid_lines
    }
}

struct PendingParse {
    data: Vec<u8>,
    filename: String,
    extension: String,
}

/// Liefert die Erweiterung (Text nach dem letzten `.`), klein geschrieben.
///
/// Ohne Punkt oder mit Punkt nur an erster Stelle (`.htpasswd`) ist sie leer.
pub fn file_extension(filename: &str) -> String {
    match filename.rfind('.') {
        Some(index) if index > 0 => filename[index + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Kartenmodell über einer Szene.
pub struct MapModel<S: SceneGraphAdapter> {
    scene: S,
    layers: IndexMap<String, Layer>,
    info: MapInfo,
    parsers: HashMap<String, Box<dyn MapParser>>,
    pending: Option<PendingParse>,
    settings: MapSettings,
    state: MapState,
    log: MapLog,
}

impl<S: SceneGraphAdapter> MapModel<S> {
    /// Erstellt ein leeres Modell; der JSON-Parser ist bereits registriert.
    pub fn new(scene: S, settings: MapSettings) -> Self {
        let mut model = Self {
            scene,
            layers: IndexMap::new(),
            info: MapInfo::default(),
            parsers: HashMap::new(),
            pending: None,
            settings,
            state: MapState::Empty,
            log: MapLog::new(),
        };
        model.add_parser(JSON_EXTENSION, parse_json);
        model
    }

    /// Szene (lesend).
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Szene (schreibend), z.B. für Picking und Selektion.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Abonniert die Fortschrittsmeldungen.
    pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<MapLogEvent> {
        self.log.subscribe()
    }

    /// Aktueller Zustand.
    pub fn state(&self) -> MapState {
        self.state
    }

    /// Zusatzinformationen.
    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    /// Einstellungen.
    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Alle Layer in Einfüge-Reihenfolge.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Layer per Name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Anzahl aller Nodes.
    pub fn node_count(&self) -> usize {
        self.layers.values().map(|l| l.nodes.len()).sum()
    }

    /// Anzahl aller Kanten.
    pub fn edge_count(&self) -> usize {
        self.layers.values().map(|l| l.edges.len()).sum()
    }

    /// Anzahl aller Gitterlinien.
    pub fn grid_count(&self) -> usize {
        self.layers.values().map(|l| l.grid_lines.len()).sum()
    }

    /// `true`, wenn keine Layer existieren.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Dateiname der zurückgehaltenen Karte.
    pub fn pending_filename(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.filename.as_str())
    }

    /// Prüft, ob für `extension` ein Parser registriert ist.
    pub fn has_parser(&self, extension: &str) -> bool {
        self.parsers
            .contains_key(&extension.trim_start_matches('.').to_lowercase())
    }

    /// Registriert einen Parser. Wartet eine Karte auf diese Erweiterung, wird sie sofort geparst.
    pub fn add_parser(
        &mut self,
        extension: &str,
        parser: impl MapParser + 'static,
    ) -> Option<ParseOutcome> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        log::debug!("Parser fuer '.{}' registriert", extension);
        self.parsers.insert(extension.clone(), Box::new(parser));

        let waiting = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.extension == extension);
        if !waiting {
            return None;
        }
        let pending = self.pending.take()?;
        log::info!("Zurueckgehaltene Karte '{}' wird geparst", pending.filename);
        Some(self.parse_map_data(&pending.data, &pending.filename))
    }

    /// Parst Kartendaten mit dem zur Erweiterung passenden Parser.
    ///
    /// Ohne passenden Parser werden die Daten zurückgehalten; eine neuere
    /// zurückgehaltene Karte ersetzt eine ältere.
    pub fn parse_map_data(&mut self, raw: &[u8], filename: &str) -> ParseOutcome {
        let extension = file_extension(filename);
        if extension.is_empty() {
            let error = IngestError::MissingExtension(filename.to_string());
            log::warn!("{}", error);
            return ParseOutcome::Skipped(error);
        }

        let Some(parser) = self.parsers.get(&extension) else {
            if let Some(old) = &self.pending {
                log::debug!("Zurueckgehaltene Karte '{}' wird ersetzt", old.filename);
            }
            self.log.emit(MapLogEvent::ParserPending {
                filename: filename.to_string(),
                extension: extension.clone(),
            });
            self.pending = Some(PendingParse {
                data: raw.to_vec(),
                filename: filename.to_string(),
                extension: extension.clone(),
            });
            return ParseOutcome::Deferred { extension };
        };

        let previous_state = self.state;
        self.state = MapState::Parsing;
        self.log.emit(MapLogEvent::Parsing {
            filename: filename.to_string(),
        });

        let mut elements = Vec::new();
        if let Err(e) = parser.parse(raw, &mut |element| elements.push(element)) {
            self.state = previous_state;
            let error = IngestError::ParserFailed {
                filename: filename.to_string(),
                reason: e.to_string(),
            };
            self.log.emit(MapLogEvent::ParseFailed {
                filename: filename.to_string(),
                reason: e.to_string(),
            });
            return ParseOutcome::Skipped(error);
        }

        self.pending = None;
        let mut accepted = 0;
        let mut rejected = 0;
        for element in elements {
            match self.add_element(element) {
                Ok(()) => accepted += 1,
                Err(e) => {
                    rejected += 1;
                    self.log.emit(MapLogEvent::ElementRejected {
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.info.filename = Some(filename.to_string());
        self.state = if self.layers.is_empty() {
            MapState::Empty
        } else {
            MapState::Populated
        };
        self.log.emit(MapLogEvent::ParsingDone {
            filename: filename.to_string(),
            elements: accepted,
        });
        ParseOutcome::Parsed {
            elements: accepted,
            rejected,
        }
    }

    /// Übernimmt ein einzelnes Element in den Layer-Baum.
    ///
    /// Ein bereits gezeichnetes Element gleicher ID (gleicher Layer und Typ)
    /// wird vorher aus der Szene entfernt.
    pub fn add_element(&mut self, element: MapElement) -> Result<(), ElementError> {
        element.validate()?;
        let layer_name = element.layer_name().map(str::to_string);

        match element {
            MapElement::Header(header) => {
                self.info.header = Some(header);
            }
            MapElement::Layer(def) => {
                if self.layers.contains_key(&def.name) {
                    log::debug!("Layer '{}' bereits definiert", def.name);
                } else {
                    let layer = self.make_layer(&def);
                    self.layers.insert(def.name.clone(), layer);
                }
            }
            MapElement::Node(mut node) => {
                let layer_name = layer_name.unwrap_or_else(|| DEFAULT_LAYER.to_string());
                node.layer = Some(layer_name.clone());
                let id = node.id.clone();
                let old = self.layer_entry(&layer_name).nodes.insert(id, Drawn::pending(node));
                self.release(old.and_then(|o| o.scene));
            }
            MapElement::Edge(mut edge) => {
                let layer_name = layer_name.unwrap_or_else(|| DEFAULT_LAYER.to_string());
                edge.layer = Some(layer_name.clone());
                let id = edge.id.clone();
                let old = self.layer_entry(&layer_name).edges.insert(id, Drawn::pending(edge));
                self.release(old.and_then(|o| o.scene));
            }
            MapElement::GridLine(grid) => {
                let layer_name = layer_name.unwrap_or_else(|| DEFAULT_LAYER.to_string());
                let grid = GridLineRecord {
                    layer: Some(layer_name.clone()),
                    ..grid
                };
                let id = grid.id.clone();
                let old = self
                    .layer_entry(&layer_name)
                    .grid_lines
                    .insert(id, Drawn::pending(grid));
                self.release(old.and_then(|o| o.scene));
            }
        }
        if self.state == MapState::Empty && !self.layers.is_empty() {
            self.state = MapState::Populated;
        }
        Ok(())
    }

    fn make_layer(&self, def: &LayerDef) -> Layer {
        let mut layer = Layer::new(def.name.clone());
        layer.apply_def(def);
        layer.is_ignored = self.settings.ignored_layers.contains(&def.name);
        layer
    }

    fn layer_entry(&mut self, name: &str) -> &mut Layer {
        let ignored = self.settings.ignored_layers.iter().any(|n| n == name);
        self.layers.entry(name.to_string()).or_insert_with(|| {
            let mut layer = Layer::new(name);
            layer.is_ignored = ignored;
            layer
        })
    }

    fn release(&mut self, handle: Option<PrimitiveHandle>) {
        if let Some(handle) = handle {
            self.scene.destroy(handle.into());
        }
    }

    /// Zeichnet alle nicht ignorierten Layer in Einfüge-Reihenfolge.
    ///
    /// Fehlt einem Layer die Szenen-Repräsentation, wird sie zuerst erzeugt.
    /// Bereits gezeichnete Elemente werden entfernt und neu gezeichnet.
    pub async fn draw_map(&mut self) -> DrawReport {
        self.log.emit(MapLogEvent::Drawing);
        let mut report = DrawReport::default();

        let names: Vec<String> = self.layers.keys().cloned().collect();
        for name in names {
            let Some(layer) = self.layers.get(&name) else {
                continue;
            };
            if layer.is_ignored {
                log::debug!("Layer '{}' wird ignoriert", name);
                continue;
            }
            if layer.scene.is_none() {
                let desc = LayerDesc {
                    name: layer.name.clone(),
                    visible: layer.visible,
                    priority: layer.priority,
                    color: layer.color,
                };
                match self.scene.create_layer(desc).await {
                    Ok(handle) => {
                        if let Some(layer) = self.layers.get_mut(&name) {
                            layer.scene = Some(handle);
                        }
                    }
                    Err(e) => {
                        log::error!("Layer '{}' konnte nicht angelegt werden: {}", name, e);
                        report.failed += 1;
                        continue;
                    }
                }
            }
            let drawn = self.draw_layer_elements(&name, &mut report).await;
            report.layers += 1;
            self.log.emit(MapLogEvent::LayerDrawn {
                layer: name,
                primitives: drawn,
            });
        }

        self.log.emit(MapLogEvent::DrawingDone {
            primitives: report.primitives(),
        });
        report
    }

    async fn draw_layer_elements(&mut self, name: &str, report: &mut DrawReport) -> usize {
        let Some(layer) = self.layers.get(name) else {
            return 0;
        };
        let Some(layer_handle) = layer.scene else {
            return 0;
        };
        let size = layer.node_size;
        let color = layer.color;
        let grid_align = self.settings.grid_align;
        let grid_size = self.settings.grid_size;

        let nodes: Vec<(String, NodeDesc)> = layer
            .nodes
            .values()
            .map(|n| {
                (
                    n.record.id.clone(),
                    NodeDesc {
                        model_id: n.record.id.clone(),
                        position: n.record.position,
                        size,
                        color: None,
                        transparent: false,
                        force_box: false,
                    },
                )
            })
            .collect();

        let mut edges = Vec::new();
        let mut skipped = Vec::new();
        for e in layer.edges.values() {
            let r = &e.record;
            match endpoints(layer, &r.from, &r.to) {
                Ok((start, end)) => edges.push((
                    r.id.clone(),
                    EdgeDesc {
                        model_id: r.id.clone(),
                        start,
                        end,
                        width: size.x,
                        height: size.y,
                        color: None,
                    },
                )),
                Err(missing) => skipped.push((r.id.clone(), missing, false)),
            }
        }

        let mut grids = Vec::new();
        for g in layer.grid_lines.values() {
            let r = &g.record;
            match endpoints(layer, &r.from, &r.to) {
                Ok((start, end)) => grids.push((
                    r.id.clone(),
                    GridLineDesc {
                        model_id: r.id.clone(),
                        start,
                        end,
                        align: r.align.unwrap_or(grid_align),
                        size: r.size.unwrap_or(grid_size),
                        color: Some(color),
                    },
                )),
                Err(missing) => skipped.push((r.id.clone(), missing, true)),
            }
        }

        let mut drawn = 0;
        for (id, desc) in nodes {
            let old = self.take_handle(name, |l| l.nodes.get_mut(&id).and_then(|n| n.scene.take()));
            self.release(old);
            match self.scene.create_node(layer_handle, desc).await {
                Ok(handle) => {
                    if let Some(node) = self.layers.get_mut(name).and_then(|l| l.nodes.get_mut(&id)) {
                        node.scene = Some(handle);
                    }
                    report.nodes += 1;
                    drawn += 1;
                }
                Err(e) => {
                    log::error!("Node '{}' nicht gezeichnet: {}", id, e);
                    report.failed += 1;
                }
            }
        }

        for (id, missing, is_grid) in skipped {
            let old = self.take_handle(name, |l| {
                if is_grid {
                    l.grid_lines.get_mut(&id).and_then(|g| g.scene.take())
                } else {
                    l.edges.get_mut(&id).and_then(|e| e.scene.take())
                }
            });
            self.release(old);
            report.skipped += 1;
            self.log.emit(MapLogEvent::EdgeSkipped {
                layer: name.to_string(),
                id,
                missing,
            });
        }

        for (id, desc) in edges {
            let old = self.take_handle(name, |l| l.edges.get_mut(&id).and_then(|e| e.scene.take()));
            self.release(old);
            match self.scene.create_edge(layer_handle, desc).await {
                Ok(handle) => {
                    if let Some(edge) = self.layers.get_mut(name).and_then(|l| l.edges.get_mut(&id)) {
                        edge.scene = Some(handle);
                    }
                    report.edges += 1;
                    drawn += 1;
                }
                Err(e) => {
                    log::error!("Kante '{}' nicht gezeichnet: {}", id, e);
                    report.failed += 1;
                }
            }
        }

        for (id, desc) in grids {
            let old = self.take_handle(name, |l| {
                l.grid_lines.get_mut(&id).and_then(|g| g.scene.take())
            });
            self.release(old);
            match self.scene.create_grid_line(layer_handle, desc).await {
                Ok(handle) => {
                    if let Some(grid) = self
                        .layers
                        .get_mut(name)
                        .and_then(|l| l.grid_lines.get_mut(&id))
                    {
                        grid.scene = Some(handle);
                    }
                    report.grid_lines += 1;
                    drawn += 1;
                }
                Err(e) => {
                    log::error!("Gitterlinie '{}' nicht gezeichnet: {}", id, e);
                    report.failed += 1;
                }
            }
        }

        drawn
    }

    fn take_handle(
        &mut self,
        layer: &str,
        take: impl FnOnce(&mut Layer) -> Option<PrimitiveHandle>,
    ) -> Option<PrimitiveHandle> {
        self.layers.get_mut(layer).and_then(take)
    }

    /// Erzeugt `<layer>_extrapolated` mit einer Gitterlinie pro Kante.
    ///
    /// Ein bestehender Gitter-Layer wird vollständig verworfen und neu aufgebaut.
    /// Gezeichnet wird erst beim nächsten [`MapModel::draw_map`].
    pub fn extrapolate_to_grid(&mut self, layer_name: &str) -> Result<String, IngestError> {
        let Some(source) = self.layers.get(layer_name) else {
            return Err(IngestError::UnknownLayer(layer_name.to_string()));
        };
        let target = format!("{}{}", layer_name, EXTRAPOLATED_SUFFIX);

        let mut nodes = Vec::new();
        let mut grids = Vec::new();
        let mut skipped = Vec::new();
        for edge in source.edges.values() {
            let r = &edge.record;
            let (Some(from), Some(to)) = (source.nodes.get(&r.from), source.nodes.get(&r.to)) else {
                let missing = if source.nodes.contains_key(&r.from) {
                    r.to.clone()
                } else {
                    r.from.clone()
                };
                skipped.push((r.id.clone(), missing));
                continue;
            };
            let from = clone_node_for_grid(&from.record, &target);
            let to = clone_node_for_grid(&to.record, &target);
            grids.push(GridLineRecord {
                id: format!("{}_{}", r.id, target),
                from: from.id.clone(),
                to: to.id.clone(),
                align: Some(self.settings.grid_align),
                size: Some(self.settings.grid_size),
                layer: Some(target.clone()),
            });
            nodes.push(from);
            nodes.push(to);
        }

        for (id, missing) in skipped {
            self.log.emit(MapLogEvent::EdgeSkipped {
                layer: layer_name.to_string(),
                id,
                missing,
            });
        }

        if let Some(old) = self.layers.shift_remove(&target) {
            if let Some(handle) = old.scene {
                self.scene.destroy(handle.into());
            }
        }
        let mut layer = self.make_layer(&LayerDef::named(target.clone()));
        for node in nodes {
            layer.nodes.insert(node.id.clone(), Drawn::pending(node));
        }
        let count = grids.len();
        for grid in grids {
            layer.grid_lines.insert(grid.id.clone(), Drawn::pending(grid));
        }
        self.layers.insert(target.clone(), layer);

        self.log.emit(MapLogEvent::Extrapolated {
            layer: layer_name.to_string(),
            target: target.clone(),
            grid_lines: count,
        });
        Ok(target)
    }

    /// Alle Layer als exportierbares Dokument.
    pub fn get_map_data_for_export(&self) -> MapExport {
        MapExport::from_layers(self.layers.values()).with_header(self.info.header.as_ref())
    }

    /// Ausgewählte Layer als exportierbares Dokument (unbekannte Namen werden übergangen).
    pub fn export_layers(&self, names: &[&str]) -> MapExport {
        MapExport::from_layers(names.iter().filter_map(|name| self.layers.get(*name)))
            .with_header(self.info.header.as_ref())
    }

    /// Bounding-Box der Karte: Zeichnungsgrenzen aus dem Header, sonst alle Node-Positionen.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        if let Some(extents) = self.info.header.as_ref().and_then(MapHeader::extents) {
            return Some(extents);
        }
        bounds_of(
            self.layers
                .values()
                .flat_map(|l| l.nodes.values().map(|n| n.record.position)),
        )
    }

    /// Gibt alle Szenen-Repräsentationen frei und leert das Modell.
    pub fn destroy_map(&mut self) {
        if self.layers.is_empty() {
            return;
        }
        self.state = MapState::Destroying;
        self.log.emit(MapLogEvent::Removing);
        for (_, layer) in self.layers.drain(..) {
            if let Some(handle) = layer.scene {
                self.scene.destroy(SceneHandle::Layer(handle));
            }
        }
        self.info = MapInfo::default();
        self.state = MapState::Empty;
    }

    /// Schaltet die Sichtbarkeit eines Layers.
    pub fn set_layer_visible(&mut self, name: &str, visible: bool) -> bool {
        let Some(layer) = self.layers.get_mut(name) else {
            return false;
        };
        layer.visible = visible;
        if let Some(handle) = layer.scene {
            self.scene.set_visible(handle, visible);
        }
        true
    }

    /// Ändert die Priorität eines Layers.
    pub fn set_layer_priority(&mut self, name: &str, priority: i32) -> bool {
        let Some(layer) = self.layers.get_mut(name) else {
            return false;
        };
        layer.priority = priority;
        if let Some(handle) = layer.scene {
            self.scene.set_priority(handle, priority);
        }
        true
    }

    /// Ändert die Standardfarbe eines Layers und überträgt sie auf alle Primitive.
    pub fn set_layer_color(&mut self, name: &str, color: Rgb) -> bool {
        let Some(layer) = self.layers.get_mut(name) else {
            return false;
        };
        layer.color = color;
        if let Some(handle) = layer.scene {
            self.scene.set_color(handle.into(), color);
        }
        true
    }

    /// Setzt oder entfernt einen Layer auf der Ignorier-Liste.
    ///
    /// Ein ignorierter Layer wird aus der Szene entfernt; seine Daten bleiben erhalten.
    pub fn set_layer_ignored(&mut self, name: &str, ignored: bool) -> bool {
        let Some(layer) = self.layers.get_mut(name) else {
            return false;
        };
        layer.is_ignored = ignored;
        if ignored {
            if let Some(handle) = layer.scene {
                self.scene.destroy(handle.into());
            }
            layer.forget_scene();
        }

        let list = &mut self.settings.ignored_layers;
        let listed = list.iter().position(|n| n == name);
        match (ignored, listed) {
            (true, None) => list.push(name.to_string()),
            (false, Some(index)) => {
                list.remove(index);
            }
            _ => {}
        }
        true
    }
}

fn endpoints(layer: &Layer, from: &str, to: &str) -> Result<(DVec3, DVec3), String> {
    let start = layer.node_position(from).ok_or_else(|| from.to_string())?;
    let end = layer.node_position(to).ok_or_else(|| to.to_string())?;
    Ok((start, end))
}

fn clone_node_for_grid(node: &NodeRecord, layer: &str) -> NodeRecord {
    NodeRecord {
        id: format!("{}_{}", node.id, layer),
        position: node.position,
        layer: Some(layer.to_string()),
    }
}

#[cfg(test)]
mod tests;
