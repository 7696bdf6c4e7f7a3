//! Orbit-Kamera: kreist um einen festen Mittelpunkt statt um den eigenen Standpunkt.
//!
//! Die Position wird durch vier Vektoren beschrieben: `eye` (Standpunkt),
//! `look` (Blickpunkt), `up` (Oben-Richtung) und `center` (Drehpunkt).
//! Bei Bewegungen ändern sich Eye und Look, der Drehpunkt bleibt bis zur
//! nächsten expliziten Positionierung (oder einem Pan) erhalten.
//!
//! Die lokalen Drehachsen werden bei jeder Rotation mitgedreht. Ohne das
//! würde z.B. ein Yaw nach 90° Pitch wie ein Roll aussehen.

use glam::{DMat4, DVec2, DVec3};

use super::math::{self, axis_angle_quat, safe_normalize};
use super::views::{CameraPosition, View, ViewSet};

/// Lokale Drehachsen der Kamera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalAxes {
    /// Seitwärts-Achse (Pitch)
    pub x: DVec3,
    /// Oben-Achse (Yaw)
    pub y: DVec3,
    /// Blickachse (Roll)
    pub z: DVec3,
}

/// Optik der Perspektivprojektion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Optics {
    /// Vertikaler Öffnungswinkel in Grad
    pub fovy_deg: f64,
    /// Seitenverhältnis Breite / Höhe
    pub aspect: f64,
    /// Near-Plane
    pub near: f64,
    /// Far-Plane
    pub far: f64,
}

impl Default for Optics {
    fn default() -> Self {
        Self {
            fovy_deg: 45.0,
            aspect: 2.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

/// Auf die Zeichenfläche projizierter Punkt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Pixelposition (Ursprung links oben)
    pub canvas: DVec2,
    /// Z im Clip-Space; `>= 0` bedeutet "vor der Kamera"
    pub depth: f64,
}

/// Momentaufnahme der Kamera für einen Frame (View- und Projektionsmatrix).
///
/// Reine Daten: bleibt gültig, auch wenn die Kamera danach weiterbewegt wird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// View-Matrix (Welt → Kamera)
    pub view: DMat4,
    /// Projektionsmatrix (Kamera → Clip)
    pub projection: DMat4,
    /// Kameravektoren zum Zeitpunkt der Aufnahme
    pub position: CameraPosition,
    /// Größe der Zeichenfläche in Pixeln
    pub viewport: DVec2,
}

impl FrameContext {
    /// Projiziert einen Weltpunkt auf die Zeichenfläche.
    pub fn project(&self, world: DVec3) -> ProjectedPoint {
        let clip = self.projection * self.view * world.extend(1.0);
        let w = if clip.w.abs() > math::EPSILON { clip.w } else { math::EPSILON };
        let ndc = DVec2::new(clip.x / w, clip.y / w);
        ProjectedPoint {
            canvas: DVec2::new(
                (ndc.x + 1.0) * 0.5 * self.viewport.x,
                (1.0 - ndc.y) * 0.5 * self.viewport.y,
            ),
            depth: clip.z,
        }
    }

    /// Erzeugt einen Welt-Strahl durch die Pixelposition `(x, y)`.
    ///
    /// Liefert `None`, wenn die Matrizen nicht invertierbar sind.
    pub fn ray_through(&self, x: f64, y: f64) -> Option<(DVec3, DVec3)> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let inverse = (self.projection * self.view).inverse();
        if !inverse.is_finite() {
            return None;
        }
        let ndc_x = x / self.viewport.x * 2.0 - 1.0;
        let ndc_y = 1.0 - y / self.viewport.y * 2.0;
        let near = inverse.project_point3(DVec3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        let direction = (far - near).try_normalize()?;
        Some((near, direction))
    }
}

/// Hintergrund-Verlauf der Zeichenfläche.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    /// Farbe oben (CSS)
    pub top_color: String,
    /// Farbe unten (CSS)
    pub bottom_color: String,
}

impl Background {
    /// CSS-Stilangabe für den Verlauf.
    pub fn style(&self) -> String {
        format!("linear-gradient({}, {})", self.top_color, self.bottom_color)
    }
}

impl Default for Background {
    fn default() -> Self {
        Self {
            top_color: "#FFFFFF".to_string(),
            bottom_color: "#A9A9A9".to_string(),
        }
    }
}

/// Orbit-Kamera mit voreingestellten Ansichten.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    eye: DVec3,
    look: DVec3,
    up: DVec3,
    center: DVec3,
    distance: f64,
    axes: LocalAxes,
    optics: Optics,
    views: ViewSet,
    active_view: Option<String>,
    /// Hintergrund der Szene
    pub background: Background,
}

impl OrbitCamera {
    /// Kleinster erlaubter Abstand zwischen Eye und Look.
    pub const MIN_DISTANCE: f64 = 1e-6;
    /// Teiler für Pan-Schritte: ein Schritt von 1.0 verschiebt um `distance / 50`.
    pub const PAN_DIVISOR: f64 = 50.0;

    /// Erstellt eine Kamera an der Default-Position.
    pub fn new(default_position: CameraPosition) -> Self {
        let mut camera = Self {
            eye: CameraPosition::FALLBACK.eye,
            look: CameraPosition::FALLBACK.look,
            up: CameraPosition::FALLBACK.up,
            center: CameraPosition::FALLBACK.look,
            distance: CameraPosition::FALLBACK.eye.distance(CameraPosition::FALLBACK.look),
            axes: LocalAxes {
                x: DVec3::X,
                y: DVec3::Y,
                z: DVec3::NEG_Z,
            },
            optics: Optics::default(),
            views: ViewSet::new(default_position),
            active_view: None,
            background: Background::default(),
        };
        camera.set_position(default_position);
        camera
    }

    /// Setzt Eye, Look und Up.
    ///
    /// Der Drehpunkt wird auf Look gesetzt, Abstand und lokale Achsen werden
    /// neu berechnet und eine aktive Ansicht verworfen. Nicht-endliche
    /// Vektoren werden verworfen (Position bleibt unverändert).
    pub fn set_position(&mut self, position: CameraPosition) {
        if !(math::is_finite(position.eye)
            && math::is_finite(position.look)
            && math::is_finite(position.up))
        {
            log::warn!("Kameraposition mit nicht-endlichen Werten ignoriert: {:?}", position);
            return;
        }

        self.eye = position.eye;
        self.look = position.look;
        self.center = position.look;
        self.active_view = None;

        let dist_vec = self.eye - self.look;
        self.distance = dist_vec.length();
        if self.distance < Self::MIN_DISTANCE {
            // Eye fällt auf Look: entlang der bisherigen Blickachse zurücksetzen
            self.distance = Self::MIN_DISTANCE;
            self.eye = self.look - self.axes.z * self.distance;
        }

        let forward = safe_normalize(self.look - self.eye, DVec3::NEG_Z);
        let up = safe_normalize(position.up, DVec3::Y);
        self.up = orthogonalize(up, forward);
        self.axes = LocalAxes {
            x: safe_normalize(forward.cross(self.up), forward.any_orthonormal_vector()),
            y: self.up,
            z: forward,
        };

        log::debug!(
            "Kameraposition gesetzt: eye={:?} look={:?} up={:?}",
            self.eye,
            self.look,
            self.up
        );
    }

    /// Aktuelle Kameravektoren als Kopie.
    pub fn position(&self) -> CameraPosition {
        CameraPosition::new(self.eye, self.look, self.up)
    }

    /// Dreht die Kamera um den Drehpunkt entlang `axis` um `degrees` Grad.
    ///
    /// Eye, Look, Up und die lokalen Achsen werden mit demselben Quaternion
    /// gedreht; der Abstand Eye-Look bleibt erhalten.
    pub fn rotate(&mut self, axis: DVec3, degrees: f64) {
        let quat = axis_angle_quat(axis, degrees);

        // Drehpunkt in den Ursprung verschieben
        let eye = self.eye - self.center;
        let look = self.look - self.center;
        let up_point = self.up + eye;

        let eye = quat * eye;
        let look = quat * look;
        let up_point = quat * up_point;

        self.axes = LocalAxes {
            x: quat * self.axes.x,
            y: quat * self.axes.y,
            z: quat * self.axes.z,
        };

        let forward = safe_normalize(look - eye, self.axes.z);
        let up = safe_normalize(up_point - eye, self.axes.y);
        self.up = orthogonalize(up, forward);

        self.eye = eye + self.center;
        self.look = look + self.center;
    }

    /// Yaw um die lokale Y-Achse.
    pub fn yaw(&mut self, degrees: f64) {
        self.rotate(self.axes.y, -degrees);
    }

    /// Pitch um die lokale X-Achse.
    pub fn pitch(&mut self, degrees: f64) {
        self.rotate(self.axes.x, -degrees);
    }

    /// Roll um die lokale Z-Achse (Blickachse).
    pub fn roll(&mut self, degrees: f64) {
        self.rotate(self.axes.z, degrees);
    }

    /// Verschiebt Eye und Look seitwärts (senkrecht zu Blickrichtung und Up).
    pub fn pan_horizontal(&mut self, scale: f64) {
        let forward = safe_normalize(self.look - self.eye, self.axes.z);
        let step = forward.cross(self.up) * (scale * (self.distance / Self::PAN_DIVISOR));
        self.translate(step);
    }

    /// Verschiebt Eye und Look entlang des Up-Vektors.
    pub fn pan_vertical(&mut self, scale: f64) {
        let step = self.up * (scale * (self.distance / Self::PAN_DIVISOR));
        self.translate(step);
    }

    fn translate(&mut self, step: DVec3) {
        if !math::is_finite(step) {
            return;
        }
        self.eye += step;
        self.look += step;
        self.center = self.look;
    }

    /// Skaliert den Abstand Eye-Look um `(1 + scale)`. Look bleibt fix.
    pub fn zoom(&mut self, scale: f64) {
        if !scale.is_finite() {
            return;
        }
        let forward = safe_normalize(self.look - self.eye, self.axes.z);
        self.distance = (self.distance + self.distance * scale).max(Self::MIN_DISTANCE);
        self.eye = self.look - forward * self.distance;
    }

    /// Fährt näher an den Blickpunkt heran.
    pub fn forward(&mut self, speed: f64) {
        self.zoom(-speed);
    }

    /// Entfernt sich vom Blickpunkt.
    pub fn backward(&mut self, speed: f64) {
        self.zoom(speed);
    }

    /// Passt das Seitenverhältnis an die Zeichenfläche an.
    pub fn set_aspect(&mut self, aspect: f64) {
        self.optics.aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
    }

    /// Passt das Seitenverhältnis an Breite und Höhe an.
    pub fn fix_aspect(&mut self, width: f64, height: f64) {
        self.set_aspect(width / height);
    }

    /// Berechnet die Ansichten für eine Bounding-Box neu.
    pub fn prepare_views(&mut self, min: DVec3, max: DVec3) -> DVec3 {
        self.views.prepare(min, max)
    }

    /// Wechselt zur Ansicht mit dem Namen `name`.
    ///
    /// Unbekannte Namen werden geloggt und ignoriert (`false`).
    pub fn set_view(&mut self, name: &str) -> bool {
        let Some(view) = self.views.find(name) else {
            log::error!("Kamera-Ansicht nicht gefunden: {}", name);
            return false;
        };
        let position = view.camera_position;
        self.set_position(position);
        self.active_view = Some(name.to_string());
        log::info!("Kamera-Ansicht gesetzt: {}", name);
        true
    }

    /// Verfügbare Ansichten.
    pub fn views(&self) -> &[View] {
        self.views.all()
    }

    /// Name der zuletzt gesetzten Ansicht, sofern seitdem nicht umpositioniert wurde.
    pub fn active_view(&self) -> Option<&str> {
        self.active_view.as_deref()
    }

    /// Aktueller Drehpunkt.
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Abstand Eye-Look.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Lokale Drehachsen.
    pub fn axes(&self) -> LocalAxes {
        self.axes
    }

    /// Optik der Projektion.
    pub fn optics(&self) -> Optics {
        self.optics
    }

    /// View-Matrix (rechtshändig).
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.look, self.up)
    }

    /// Perspektivische Projektionsmatrix (OpenGL-Clip-Space).
    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh_gl(
            self.optics.fovy_deg * math::DEG_TO_RAD,
            self.optics.aspect,
            self.optics.near,
            self.optics.far,
        )
    }

    /// Momentaufnahme für Labels und Picking.
    pub fn frame(&self, viewport: DVec2) -> FrameContext {
        FrameContext {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            position: self.position(),
            viewport,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraPosition::FALLBACK)
    }
}

/// Orthogonalisiert `up` gegen `forward` (Gram-Schmidt).
///
/// Ist `up` parallel zur Blickrichtung, wird eine beliebige Senkrechte gewählt.
fn orthogonalize(up: DVec3, forward: DVec3) -> DVec3 {
    let projected = up - forward * up.dot(forward);
    safe_normalize(projected, forward.any_orthonormal_vector())
}
