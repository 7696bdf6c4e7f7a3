//! Geometrie der Szenen-Primitive: Tunnel-Matrix, Linien und Gitter-Extrusion.

use glam::{DMat4, DVec3};

use crate::core::math::{is_collinear, midpoint, perpendicular_to, safe_atan_ratio};

/// Abstand der Selektions-Umrandung zur Primitiv-Größe.
pub const SELECTION_MARGIN: f64 = 1.0;

/// Standardgröße von Gitterlinien.
pub const DEFAULT_GRID_SIZE: f64 = 1.0;

/// Indizes pro Gittersegment (4 Kanten je Endfläche + 4 Verbindungskanten, je 2 Indizes).
pub const GRID_INDICES_PER_SEGMENT: usize = 24;

/// Positionen pro Gittersegment.
pub const GRID_POSITIONS_PER_SEGMENT: usize = 8;

/// Linien-Geometrie (Positionen + Index-Paare).
#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    /// Vertex-Positionen in Weltkoordinaten
    pub positions: Vec<DVec3>,
    /// Je zwei Indizes bilden eine Linie
    pub indices: Vec<u32>,
}

impl LineGeometry {
    /// Leere Geometrie.
    pub fn empty() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Achsenparallele Hülle aller Positionen.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        crate::core::math::bounds_of(self.positions.iter().copied())
    }

    /// Iteriert über alle Liniensegmente.
    pub fn segments(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        self.indices.chunks_exact(2).filter_map(|pair| {
            let a = self.positions.get(pair[0] as usize)?;
            let b = self.positions.get(pair[1] as usize)?;
            Some((*a, *b))
        })
    }
}

/// Transformation eines Tunnel-Quaders zwischen `start` und `end`.
///
/// Verschiebung in den Mittelpunkt, dann Drehung um X, dann um Z.
/// Die Winkel stammen aus `atan`-Zerlegung; 0/0 wird als Winkel 0 behandelt.
pub fn tunnel_transform(start: DVec3, end: DVec3) -> DMat4 {
    let d = start - end;
    let x_angle = safe_atan_ratio(d.z, d.y);
    let side = (d.y * d.y + d.z * d.z).sqrt();
    let z_angle = safe_atan_ratio(side, d.x);
    let z_angle = if start.y >= end.y { z_angle } else { -z_angle };

    DMat4::from_translation(midpoint(start, end))
        * DMat4::from_rotation_x(x_angle)
        * DMat4::from_rotation_z(z_angle)
}

/// Halbe Kantenlängen des Tunnel-Quaders: `[Länge/2, Breite, Höhe]`.
pub fn tunnel_half_extents(start: DVec3, end: DVec3, width: f64, height: f64) -> DVec3 {
    DVec3::new(start.distance(end) * 0.5, width, height)
}

/// Einfache Linie zwischen zwei Punkten.
pub fn line_between(start: DVec3, end: DVec3) -> LineGeometry {
    LineGeometry {
        positions: vec![start, end],
        indices: vec![0, 1],
    }
}

/// Ersetzt eine zur Linie kollineare Ausrichtung durch eine feste Senkrechte.
pub fn resolve_grid_align(start: DVec3, end: DVec3, align: DVec3) -> DVec3 {
    let direction = end - start;
    if !is_collinear(direction, align) {
        return align;
    }
    // Senkrechte zur Ausrichtung; ist auch die parallel, Senkrechte zur Linie
    let candidate = perpendicular_to(align);
    if is_collinear(direction, candidate) {
        perpendicular_to(direction)
    } else {
        candidate
    }
}

/// Extrudiert eine Linie zu einem Quader-Prisma mit quadratischem Querschnitt.
///
/// Die ersten vier Punkte liegen um `a`, die letzten vier um `b`.
/// `align` muss bereits mit [`resolve_grid_align`] aufgelöst sein.
pub fn extrapolate_line_to_grid(a: DVec3, b: DVec3, align: DVec3, scale: f64) -> [DVec3; 8] {
    let ab = b - a;
    let p1 = ab.cross(align).normalize_or_zero() * (scale * 0.5);
    let p2 = ab.cross(align).cross(ab).normalize_or_zero() * (scale * 0.5);

    let cap = [p1 + p2, -p1 + p2, -p1 - p2, p1 - p2];
    [
        a + cap[0],
        a + cap[1],
        a + cap[2],
        a + cap[3],
        b + cap[0],
        b + cap[1],
        b + cap[2],
        b + cap[3],
    ]
}

/// Drahtgitter-Indizes für `segment_count` Segmente zu je 8 Positionen.
pub fn grid_indices(segment_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(segment_count * GRID_INDICES_PER_SEGMENT);
    for segment in 0..segment_count {
        let i = (segment * GRID_POSITIONS_PER_SEGMENT) as u32;
        indices.extend_from_slice(&[
            // Endfläche bei a
            i,
            i + 1,
            i + 1,
            i + 2,
            i + 2,
            i + 3,
            i + 3,
            i,
            // Endfläche bei b
            i + 4,
            i + 5,
            i + 5,
            i + 6,
            i + 6,
            i + 7,
            i + 7,
            i + 4,
            // Verbindungen
            i,
            i + 4,
            i + 1,
            i + 5,
            i + 2,
            i + 6,
            i + 3,
            i + 7,
        ]);
    }
    indices
}

/// Baut die Geometrie einer Gitterlinie.
pub fn build_grid_line(a: DVec3, b: DVec3, align: DVec3, size: f64) -> LineGeometry {
    build_grid(&[(a, b)], align, size)
}

/// Baut mehrere Gittersegmente in eine gemeinsame Geometrie.
pub fn build_grid(segments: &[(DVec3, DVec3)], align: DVec3, size: f64) -> LineGeometry {
    let positions: Vec<DVec3> = segments
        .iter()
        .flat_map(|&(a, b)| extrapolate_line_to_grid(a, b, resolve_grid_align(a, b, align), size))
        .collect();
    LineGeometry {
        indices: grid_indices(segments.len()),
        positions,
    }
}

/// Grenzen der Selektions-Umrandung für halbe Kantenlängen `half`.
pub fn selection_bounds(half: DVec3) -> (DVec3, DVec3) {
    let extent = half + DVec3::splat(SELECTION_MARGIN);
    (-extent, extent)
}
