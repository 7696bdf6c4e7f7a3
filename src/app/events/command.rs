use std::path::PathBuf;

use glam::DVec2;

use crate::core::Rgb;

/// Drehachse einer Maus-Rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    /// Um die lokale y-Achse
    Yaw,
    /// Um die lokale x-Achse
    Pitch,
    /// Um die Blickachse
    Roll,
}

/// Mutierende Commands, die zentral vom Controller ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Kartendatei lesen, parsen und zeichnen
    LoadMapFile { path: PathBuf },
    /// Kartendaten aus dem Speicher parsen und zeichnen
    LoadMapData { filename: String, data: Vec<u8> },
    /// Karte per ID aus dem Kartendienst laden
    LoadRemoteMap { id: String },
    /// Startkarte laden
    LoadInitialMap,
    /// Kartenliste neu holen
    RefreshMapList,
    /// Karte hochladen
    UploadMap { name: String, data: Vec<u8> },
    /// Karte als JSON schreiben
    ExportMap { path: PathBuf },
    /// Layer auf das Gitter extrapolieren und neu zeichnen
    ExtrapolateLayer { layer: String },

    /// Kamera verschieben (Maus-Delta)
    MoveCamera { delta: DVec2 },
    /// Kamera drehen (Grad vor Geschwindigkeitsfaktor)
    RotateCamera { axis: RotationAxis, degrees: f64 },
    /// Kamera per Mausrad zoomen
    ZoomCamera { wheel_delta: f64 },
    /// Kamera-Ansicht setzen
    SetView { name: String },
    /// Kamera auf die Standardposition setzen
    ResetCamera,
    /// Zeichenfläche anpassen
    SetViewportSize { size: DVec2 },
    /// Aktuellen Frame an Szene und Labels weitergeben
    PublishFrame,

    /// Primitiv an Pixelposition selektieren
    PickAt { position: DVec2 },

    /// Layer-Sichtbarkeit setzen
    SetLayerVisible { layer: String, visible: bool },
    /// Layer-Priorität setzen
    SetLayerPriority { layer: String, priority: i32 },
    /// Layer-Farbe setzen
    SetLayerColor { layer: String, color: Rgb },
    /// Layer ignorieren
    SetLayerIgnored { layer: String, ignored: bool },

    /// Labels für alle Nodes eines Layers anlegen
    LabelLayerNodes { layer: String },
    /// Label-Größe setzen
    SetLabelSize { index: usize, size: DVec2 },
    /// Hover-Zustand eines Labels setzen
    SetLabelHovered { index: usize, hovered: bool },
    /// Ziehen beginnen
    BeginLabelDrag { index: usize, pointer: DVec2 },
    /// Ziehen fortsetzen
    DragLabel { pointer: DVec2 },
    /// Ziehen beenden
    EndLabelDrag,
    /// Alle Labels ausklappen
    SetMaximizeAllLabels { maximized: bool },
    /// Automatisches Spreizen schalten
    SetAutomaticSpread { enabled: bool },

    /// Zeitgeber weiterschalten und fällige Aufgaben ausführen
    AdvanceTimers { elapsed_ms: u64 },
}
