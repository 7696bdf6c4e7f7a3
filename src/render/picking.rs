//! Strahl-Tests für das Picking.

use glam::{DMat4, DVec3};

/// Strahl mit Ursprung und (nicht zwingend normierter) Richtung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ursprung
    pub origin: DVec3,
    /// Richtung
    pub direction: DVec3,
}

impl Ray {
    /// Erstellt einen Strahl mit normierter Richtung. `None` bei Nullrichtung.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        origin.is_finite().then_some(Self { origin, direction })
    }

    /// Punkt bei Parameter `t`.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Transformiert den Strahl; `t` bleibt zwischen beiden Räumen vergleichbar.
    pub fn transformed(&self, matrix: &DMat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// Schnitt Strahl/achsenparallele Box (Slab-Verfahren). Liefert das kleinste `t >= 0`.
pub fn ray_aabb(ray: &Ray, min: DVec3, max: DVec3) -> Option<f64> {
    let mut t_near = 0.0_f64;
    let mut t_far = f64::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < 1e-15 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }
    Some(t_near)
}

/// Abstand Strahl/Strecke und Strahlparameter des nächsten Punktes.
pub fn ray_segment_distance(ray: &Ray, a: DVec3, b: DVec3) -> (f64, f64) {
    let u = ray.direction;
    let v = b - a;
    let w = ray.origin - a;
    let uu = u.dot(u);
    let uv = u.dot(v);
    let vv = v.dot(v);
    let uw = u.dot(w);
    let vw = v.dot(w);
    let denom = uu * vv - uv * uv;

    let s = if vv < 1e-15 {
        0.0
    } else if denom.abs() < 1e-15 {
        (vw / vv).clamp(0.0, 1.0)
    } else {
        ((uu * vw - uv * uw) / denom).clamp(0.0, 1.0)
    };
    let on_segment = a + v * s;
    let t = ((on_segment - ray.origin).dot(u) / uu).max(0.0);
    (ray.at(t).distance(on_segment), t)
}

/// Schnitt Strahl/Kugel.
pub fn ray_sphere(ray: &Ray, center: DVec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let t = -b - sqrt;
    if t >= 0.0 {
        Some(t)
    } else if -b + sqrt >= 0.0 {
        Some(0.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ray_down_z() -> Ray {
        Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::NEG_Z).expect("gueltiger Strahl")
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let ray = ray_down_z();
        let t = ray_aabb(&ray, DVec3::splat(-1.0), DVec3::splat(1.0)).expect("Treffer");
        assert_relative_eq!(t, 9.0);
        assert!(ray_aabb(&ray, DVec3::new(2.0, 2.0, -1.0), DVec3::new(3.0, 3.0, 1.0)).is_none());
    }

    #[test]
    fn test_transformed_ray_sees_moved_box() {
        let ray = ray_down_z();
        let moved = DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0));
        let local = ray.transformed(&moved.inverse());
        assert!(ray_aabb(&local, -DVec3::ONE, DVec3::ONE).is_none());

        let local = ray.transformed(&DMat4::IDENTITY);
        let t = ray_aabb(&local, -DVec3::ONE, DVec3::ONE).expect("Treffer");
        assert_relative_eq!(t, 9.0);
    }

    #[test]
    fn test_ray_segment_distance() {
        let ray = ray_down_z();
        let (distance, t) =
            ray_segment_distance(&ray, DVec3::new(-1.0, 0.5, 0.0), DVec3::new(1.0, 0.5, 0.0));
        assert_relative_eq!(distance, 0.5, epsilon = 1e-12);
        assert_relative_eq!(t, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_sphere() {
        let ray = ray_down_z();
        assert_relative_eq!(ray_sphere(&ray, DVec3::ZERO, 1.0).unwrap_or(-1.0), 9.0);
        assert!(ray_sphere(&ray, DVec3::new(3.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        assert!(Ray::new(DVec3::ZERO, DVec3::ZERO).is_none());
    }
}
