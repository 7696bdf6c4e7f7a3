//! Label-Overlay: Beschriftungen an Nodes in Bildschirmkoordinaten.
//!
//! Die Labels liegen in einer geordneten Liste; die Reihenfolge bestimmt,
//! welches Label im Rundlauf gerade oben liegt.

pub mod label;
pub mod style;

use glam::{DVec2, DVec3};

use crate::core::{FrameContext, MapModel};
use crate::render::SceneGraphAdapter;

pub use label::{collide, Label, NodeRef};
pub use style::{LabelStyle, LabelStyleDef, StyleRegistry, DEFAULT_STYLE};

#[derive(Debug, Clone)]
struct DragState {
    node: NodeRef,
    start: DVec2,
}

/// Sammlung aller Labels samt Platzierungslogik.
#[derive(Debug, Clone)]
pub struct LabelOverlay {
    labels: Vec<Label>,
    styles: StyleRegistry,
    top_index: usize,
    drag: Option<DragState>,
    /// Automatisches Spreizen per Timer
    pub automatic_spread: bool,
    /// Alle Labels ausgeklappt darstellen
    pub maximize_all: bool,
}

impl Default for LabelOverlay {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            styles: StyleRegistry::default(),
            top_index: 0,
            drag: None,
            automatic_spread: true,
            maximize_all: false,
        }
    }
}

impl LabelOverlay {
    /// Leeres Overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Alle Labels in Reihenfolge.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label per Index.
    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Label per Index (schreibend), z.B. um die gemessene Größe zu setzen.
    pub fn label_mut(&mut self, index: usize) -> Option<&mut Label> {
        self.labels.get_mut(index)
    }

    /// Anzahl der Labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// `true`, wenn keine Labels existieren.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index des Labels eines Nodes.
    pub fn index_of(&self, node: &NodeRef) -> Option<usize> {
        self.labels.iter().position(|l| &l.node == node)
    }

    /// Label eines Nodes.
    pub fn find(&self, node: &NodeRef) -> Option<&Label> {
        self.labels.iter().find(|l| &l.node == node)
    }

    /// Fügt ein Label hinzu oder ersetzt das Label desselben Nodes an seiner Stelle.
    pub fn add(&mut self, label: Label) -> usize {
        match self.index_of(&label.node) {
            Some(index) => {
                self.labels[index] = label;
                index
            }
            None => {
                self.labels.push(label);
                self.labels.len() - 1
            }
        }
    }

    /// Entfernt das Label eines Nodes.
    pub fn remove(&mut self, node: &NodeRef) -> Option<Label> {
        let index = self.index_of(node)?;
        if self.drag.as_ref().is_some_and(|d| &d.node == node) {
            self.drag = None;
        }
        Some(self.labels.remove(index))
    }

    /// Entfernt alle Labels.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.drag = None;
        self.top_index = 0;
    }

    /// Entfernt Labels, deren Node im Modell nicht mehr existiert. Liefert die Anzahl.
    pub fn retain_bound<S: SceneGraphAdapter>(&mut self, model: &MapModel<S>) -> usize {
        let before = self.labels.len();
        self.labels.retain(|label| {
            model
                .layer(&label.node.layer)
                .is_some_and(|layer| layer.nodes.contains_key(&label.node.id))
        });
        if let Some(drag) = &self.drag {
            if self.index_of(&drag.node).is_none() {
                self.drag = None;
            }
        }
        before - self.labels.len()
    }

    /// Stil-Registry.
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Stil-Registry (schreibend).
    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    /// Hintergrundfarbe eines Labels: aktiv oder nach Timeout.
    pub fn background_colour(&self, label: &Label) -> &str {
        let style = self.styles.get(&label.kind);
        if label.active {
            &style.active_colour
        } else {
            &style.colour_on_timeout
        }
    }

    /// Ob ein Label ausgeklappt dargestellt wird.
    pub fn is_maximized(&self, label: &Label) -> bool {
        label.hovered || self.maximize_all || self.styles.get(&label.kind).always_maximized
    }

    /// Berechnet Anker und Sichtbarkeit aller Labels für einen Frame.
    ///
    /// `position` liefert die Weltposition eines Nodes; unbekannte Nodes werden unsichtbar.
    pub fn project_with(
        &mut self,
        frame: &FrameContext,
        mut position: impl FnMut(&NodeRef) -> Option<DVec3>,
    ) {
        for label in &mut self.labels {
            match position(&label.node) {
                Some(world) => {
                    let projected = frame.project(world);
                    label.anchor = projected.canvas;
                    label.visible = projected.depth >= 0.0;
                }
                None => label.visible = false,
            }
        }
    }

    /// Berechnet Anker und Sichtbarkeit anhand der Node-Positionen des Modells.
    pub fn project<S: SceneGraphAdapter>(&mut self, frame: &FrameContext, model: &MapModel<S>) {
        self.project_with(frame, |node| {
            model
                .layer(&node.layer)
                .and_then(|layer| layer.node_position(&node.id))
        });
    }

    /// Schiebt kollidierende Labels um `speed` Pixel auseinander.
    ///
    /// Ein Aufruf löst Überlappungen nur teilweise auf; wiederholte Aufrufe
    /// konvergieren. Labels ohne Größe und Labels unter dem Mauszeiger bewegen
    /// sich nicht. Liefert `true`, wenn in diesem Durchlauf eine Kollision gefunden wurde.
    pub fn spread(&mut self, speed: f64, margin: f64) -> bool {
        let mut overlapping = false;

        for i in 0..self.labels.len() {
            let current = &self.labels[i];
            if current.size.is_none() || current.hovered {
                continue;
            }
            let center = current.center();
            let mut movement = DVec2::ZERO;

            for (j, other) in self.labels.iter().enumerate() {
                if i == j || other.size.is_none() || !collide(current, other, margin) {
                    continue;
                }
                overlapping = true;

                let diff = center - other.center();
                let length = diff.length();
                if length > 0.0 {
                    // Nahe Labels stoßen sich stärker ab
                    movement += diff / (length * length);
                } else {
                    let offset_diff = current.offset - other.offset;
                    movement += DVec2::new(sign_or_one(offset_diff.x), sign_or_one(offset_diff.y));
                }
            }

            if let Some(direction) = movement.try_normalize() {
                self.labels[i].offset += direction * speed;
            }
        }
        overlapping
    }

    /// Platzierung (linke obere Ecke) eines Labels auf einer Zeichenfläche der Größe `canvas`.
    ///
    /// Sichtbar ist ein Label nur vor der Kamera und vollständig innerhalb der
    /// Zeichenfläche; ein Label unter dem Mauszeiger wird immer platziert.
    pub fn placement(&mut self, index: usize, canvas: DVec2) -> Option<DVec2> {
        let label = self.labels.get_mut(index)?;
        if label.visible {
            let top_left = label.top_left();
            if label.hovered {
                return Some(top_left);
            }
            let size = label.size.unwrap_or(DVec2::ZERO);
            let inside = top_left.x > 0.0
                && top_left.x < canvas.x - size.x
                && top_left.y > 0.0
                && top_left.y < canvas.y - size.y;
            if inside {
                label.in_margin = true;
                return Some(top_left);
            }
        }
        label.in_margin = false;
        None
    }

    /// Verbindungslinie vom Node zur Mitte des Labels, solange das Label platziert ist.
    pub fn leader_line(&self, index: usize) -> Option<(DVec2, DVec2)> {
        let label = self.labels.get(index)?;
        label.in_margin.then(|| (label.anchor, label.center()))
    }

    /// Schaltet das oben liegende Label auf das nächste weiter (mit Umlauf).
    pub fn rotate_top(&mut self) -> Option<usize> {
        if self.labels.is_empty() {
            self.top_index = 0;
            return None;
        }
        self.top_index = if self.top_index + 1 < self.labels.len() {
            self.top_index + 1
        } else {
            0
        };
        Some(self.top_index)
    }

    /// Index des oben liegenden Labels.
    pub fn top_index(&self) -> Option<usize> {
        (self.top_index < self.labels.len()).then_some(self.top_index)
    }

    /// Setzt den Hover-Zustand. Verlassen beendet auch ein laufendes Ziehen.
    pub fn set_hovered(&mut self, index: usize, hovered: bool) -> bool {
        let Some(label) = self.labels.get_mut(index) else {
            return false;
        };
        label.hovered = hovered;
        if !hovered {
            label.dragged = false;
            if self.drag.as_ref().is_some_and(|d| d.node == label.node) {
                self.drag = None;
            }
        }
        true
    }

    /// Beginnt das Ziehen eines Labels am Zeiger `pointer`.
    pub fn begin_drag(&mut self, index: usize, pointer: DVec2) -> bool {
        let Some(label) = self.labels.get_mut(index) else {
            return false;
        };
        label.dragged = true;
        self.drag = Some(DragState {
            node: label.node.clone(),
            start: pointer - label.offset,
        });
        true
    }

    /// Verschiebt das gezogene Label zum Zeiger.
    pub fn drag_to(&mut self, pointer: DVec2) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };
        let start = drag.start;
        let Some(index) = self.index_of(&drag.node) else {
            self.drag = None;
            return false;
        };
        self.labels[index].offset = pointer - start;
        true
    }

    /// Beendet das Ziehen.
    pub fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            if let Some(index) = self.index_of(&drag.node) {
                self.labels[index].dragged = false;
            }
        }
    }
}

fn sign_or_one(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests;
