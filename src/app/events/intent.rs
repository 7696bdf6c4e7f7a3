use std::path::PathBuf;

use glam::DVec2;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Kartendatei wurde ausgewählt oder auf die Zeichenfläche gezogen
    MapFileDropped { path: PathBuf },
    /// Kartendaten liegen bereits im Speicher vor (z.B. Upload-Feld)
    MapDataReceived { filename: String, data: Vec<u8> },
    /// Karte aus dem Kartendienst laden
    RemoteMapRequested { id: String },
    /// Startkarte laden (konfigurierte ID, sonst Rückfallkarte)
    InitialMapRequested,
    /// Kartenliste des Kartendienstes aktualisieren
    MapListRequested,
    /// Karte in den Kartendienst hochladen
    MapUploadRequested { name: String, data: Vec<u8> },
    /// Karte als JSON exportieren
    ExportRequested { path: PathBuf },
    /// Layer auf das Gitter extrapolieren
    ExtrapolateRequested { layer: String },

    /// Maus wurde mit gedrückten Tasten bewegt (Delta in Pixeln)
    MouseDragged {
        delta: DVec2,
        left: bool,
        right: bool,
    },
    /// Mausrad
    MouseWheel { delta: f64 },
    /// Maustaste über der Zeichenfläche losgelassen
    CanvasClicked { position: DVec2, dragged: bool },
    /// Kamera-Ansicht gewählt
    ViewSelected { name: String },
    /// Kamera auf Standard zurücksetzen
    ResetCameraRequested,
    /// Zeichenfläche hat eine neue Größe
    ViewportResized { size: DVec2 },

    /// Layer ein-/ausblenden
    LayerVisibilityToggled { layer: String, visible: bool },
    /// Layer-Priorität geändert
    LayerPriorityChanged { layer: String, priority: i32 },
    /// Layer-Farbe geändert (`#RRGGBB`)
    LayerColorChanged { layer: String, color: String },
    /// Layer ignorieren oder wieder zeichnen
    LayerIgnoreToggled { layer: String, ignored: bool },

    /// Alle Nodes eines Layers beschriften
    LayerLabelsRequested { layer: String },
    /// Gemessene Größe eines Labels
    LabelMeasured { index: usize, size: DVec2 },
    /// Mauszeiger betritt/verlässt ein Label
    LabelHovered { index: usize, hovered: bool },
    /// Ziehen eines Labels beginnt
    LabelDragStarted { index: usize, pointer: DVec2 },
    /// Gezogenes Label folgt dem Zeiger
    LabelDragged { pointer: DVec2 },
    /// Ziehen beendet
    LabelDragEnded,
    /// Alle Labels ausklappen/einklappen
    MaximizeAllLabelsToggled { maximized: bool },
    /// Automatisches Spreizen an/aus
    AutomaticSpreadToggled { enabled: bool },

    /// Zeit ist vergangen (Millisekunden seit dem letzten Tick)
    TimeElapsed { elapsed_ms: u64 },
}
