//! Vektor- und Quaternion-Hilfen auf Basis von `glam` (f64).
//!
//! Alle Funktionen arbeiten auf Kopien (`DVec3` ist `Copy`) und liefern
//! nie NaN zurück: degenerierte Eingaben werden durch sichere Ersatzwerte
//! abgefangen.

use glam::{DQuat, DVec3};

/// Toleranz für Längen- und Kollinearitätsprüfungen.
pub const EPSILON: f64 = 1e-12;

/// Grad → Bogenmaß.
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Normalisiert `v`; bei Länge ~0 oder nicht-endlichen Werten wird `fallback` geliefert.
pub fn safe_normalize(v: DVec3, fallback: DVec3) -> DVec3 {
    v.try_normalize().unwrap_or(fallback)
}

/// Prüft, ob alle drei Komponenten endlich sind.
pub fn is_finite(v: DVec3) -> bool {
    v.is_finite()
}

/// Prüft, ob zwei Vektoren kollinear sind (parallel oder antiparallel).
///
/// Ein Nullvektor gilt als kollinear zu allem, weil er keine Richtung festlegt.
pub fn is_collinear(a: DVec3, b: DVec3) -> bool {
    let scale = a.length() * b.length();
    if scale <= EPSILON {
        return true;
    }
    a.cross(b).length() <= scale * 1e-9
}

/// Liefert einen festen, zu `v` senkrechten Vektor.
///
/// Primär `(v.y, -v.x, 0)`; liegt `v` auf der Z-Achse, wird `(0, v.z, -v.y)` verwendet.
pub fn perpendicular_to(v: DVec3) -> DVec3 {
    let primary = DVec3::new(v.y, -v.x, 0.0);
    if primary.length_squared() > EPSILON {
        return primary;
    }
    let secondary = DVec3::new(0.0, v.z, -v.y);
    if secondary.length_squared() > EPSILON {
        return secondary;
    }
    DVec3::X
}

/// Baut ein Rotations-Quaternion aus Achse und Winkel in Grad.
///
/// Eine degenerierte Achse (Länge 0, NaN) ergibt die Identität.
pub fn axis_angle_quat(axis: DVec3, degrees: f64) -> DQuat {
    match axis.try_normalize() {
        Some(unit) if degrees.is_finite() => DQuat::from_axis_angle(unit, degrees * DEG_TO_RAD),
        _ => {
            log::warn!(
                "Ungueltige Rotation (Achse {:?}, {} Grad) - wird ignoriert",
                axis,
                degrees
            );
            DQuat::IDENTITY
        }
    }
}

/// `atan(num / den)` mit NaN-Schutz (0/0 → 0). Division durch 0 ergibt ±π/2.
pub fn safe_atan_ratio(num: f64, den: f64) -> f64 {
    let angle = (num / den).atan();
    if angle.is_nan() {
        0.0
    } else {
        angle
    }
}

/// Mittelpunkt zweier Punkte.
pub fn midpoint(a: DVec3, b: DVec3) -> DVec3 {
    (a + b) * 0.5
}

/// Achsenparallele Bounding-Box über eine Punktmenge. `None` bei leerer Menge.
pub fn bounds_of<I>(points: I) -> Option<(DVec3, DVec3)>
where
    I: IntoIterator<Item = DVec3>,
{
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((min.min(p), max.max(p))),
    })
}

/// Parst einen Vektor der Form `"1.5,2,-3"` in einen `DVec3`.
///
/// Liefert `None`, wenn nicht genau drei endliche Zahlen gefunden werden.
pub fn parse_vector(text: &str) -> Option<DVec3> {
    let values: Vec<f64> = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => {
            Some(DVec3::new(*x, *y, *z))
        }
        _ => None,
    }
}
