//! Einzelnes Label und seine Geometrie auf der Zeichenfläche.

use glam::DVec2;

/// Verweis eines Labels auf einen Node (Layer + Node-ID).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// Layer-Name
    pub layer: String,
    /// Node-ID innerhalb des Layers
    pub id: String,
}

impl NodeRef {
    /// Erstellt einen Verweis.
    pub fn new(layer: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            id: id.into(),
        }
    }
}

/// Label an einem Node.
///
/// `anchor` ist die projizierte Position des Nodes, `offset` die
/// Verschiebung der linken oberen Ecke des Labels relativ dazu.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Zugehöriger Node
    pub node: NodeRef,
    /// Textzeilen
    pub text: Vec<String>,
    /// Typ (bestimmt den Stil)
    pub kind: String,
    /// Überschrift
    pub header: String,
    /// Verschiebung relativ zum Anker in Pixeln
    pub offset: DVec2,
    /// Projizierte Node-Position in Pixeln (`-1/-1` = noch nicht projiziert)
    pub anchor: DVec2,
    /// Node liegt vor der Kamera
    pub visible: bool,
    /// Aktiv (sonst Timeout-Farbe)
    pub active: bool,
    /// Mauszeiger über dem Label
    pub hovered: bool,
    /// Wird gerade gezogen
    pub dragged: bool,
    /// Gemessene Größe in Pixeln; ohne Größe nimmt das Label nicht am Spreizen teil
    pub size: Option<DVec2>,
    /// Ergebnis der letzten Platzierung
    pub in_margin: bool,
}

impl Label {
    /// Neues, aktives Label ohne Verschiebung.
    pub fn new(node: NodeRef, text: Vec<String>) -> Self {
        Self {
            node,
            text,
            kind: String::new(),
            header: String::new(),
            offset: DVec2::ZERO,
            anchor: DVec2::splat(-1.0),
            visible: false,
            active: true,
            hovered: false,
            dragged: false,
            size: None,
            in_margin: false,
        }
    }

    /// Setzt Typ und Überschrift.
    pub fn with_kind(mut self, kind: impl Into<String>, header: impl Into<String>) -> Self {
        self.kind = kind.into();
        self.header = header.into();
        self
    }

    /// Setzt die Anfangsverschiebung.
    pub fn with_offset(mut self, offset: DVec2) -> Self {
        self.offset = offset;
        self
    }

    /// Setzt die gemessene Größe.
    pub fn with_size(mut self, size: DVec2) -> Self {
        self.size = Some(size);
        self
    }

    /// Linke obere Ecke auf der Zeichenfläche.
    pub fn top_left(&self) -> DVec2 {
        self.anchor + self.offset
    }

    /// Mittelpunkt des Label-Rechtecks.
    pub fn center(&self) -> DVec2 {
        self.top_left() + self.size.unwrap_or(DVec2::ZERO) * 0.5
    }

    /// Fläche, in der sich zwei Labels überlappen (0 ohne Überlappung oder Größe).
    pub fn overlap_area(&self, other: &Label) -> f64 {
        let (Some(a), Some(b)) = (self.size, other.size) else {
            return 0.0;
        };
        let min = self.top_left().max(other.top_left());
        let max = (self.top_left() + a).min(other.top_left() + b);
        let extent = (max - min).max(DVec2::ZERO);
        extent.x * extent.y
    }
}

/// Prüft, ob sich zwei gemessene Labels inklusive `margin` überschneiden.
///
/// Nur berührende Kanten gelten nicht als Kollision.
pub fn collide(a: &Label, b: &Label, margin: f64) -> bool {
    let (Some(size_a), Some(size_b)) = (a.size, b.size) else {
        return false;
    };
    let a_min = a.top_left();
    let a_max = a_min + size_a + DVec2::splat(margin);
    let b_min = b.top_left();
    let b_max = b_min + size_b + DVec2::splat(margin);

    !(a_max.y <= b_min.y || a_min.y >= b_max.y || a_max.x <= b_min.x || a_min.x >= b_max.x)
}
