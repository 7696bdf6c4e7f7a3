//! Application State — zentrale Datenhaltung.

use crossbeam_channel::Receiver;
use glam::DVec2;

use super::{CommandLog, Timers};
use crate::core::{Background, MapLogEvent, MapModel, OrbitCamera};
use crate::labels::LabelOverlay;
use crate::remote::{MapRecord, MapService, RemoteError};
use crate::render::{PickResult, RetainedScene};
use crate::shared::EditorOptions;

/// Standardgröße der Zeichenfläche bis zur ersten Größenmeldung.
pub const DEFAULT_VIEWPORT: DVec2 = DVec2::new(800.0, 400.0);

/// Kamera und Zeichenfläche
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Orbit-Kamera
    pub camera: OrbitCamera,
    /// Größe der Zeichenfläche in Pixeln
    pub viewport: DVec2,
}

impl ViewState {
    /// Erstellt den View-State aus den Optionen.
    pub fn from_options(options: &EditorOptions) -> Self {
        let mut camera = OrbitCamera::new(options.default_camera_position());
        camera.background = Background {
            top_color: options.background_top_color.clone(),
            bottom_color: options.background_bottom_color.clone(),
        };
        camera.fix_aspect(DEFAULT_VIEWPORT.x, DEFAULT_VIEWPORT.y);
        Self {
            camera,
            viewport: DEFAULT_VIEWPORT,
        }
    }
}

/// Kennzahlen der zuletzt geladenen Datei
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    /// Dateiname
    pub name: String,
    /// Größe, menschenlesbar (z.B. `1.50 KB`)
    pub size_label: String,
    /// Anzahl der Zeilen
    pub lines: usize,
}

/// UI-bezogener Anwendungszustand
#[derive(Debug, Default)]
pub struct UiState {
    /// Rückmeldungen zum Laden/Zeichnen als Übersetzungsschlüssel (`MAP.DRAWING`, ...)
    pub feedback: Vec<String>,
    /// Zuletzt geladene Datei
    pub loaded_file: Option<LoadedFile>,
    /// Aktuell selektiertes Primitiv
    pub selected: Option<PickResult>,
    /// Letzter Fehler des Kartendienstes
    pub remote_error: Option<RemoteError>,
    /// Kartenliste des Kartendienstes
    pub map_list: Vec<MapRecord>,
    /// Temporäre Statusnachricht
    pub status_message: Option<String>,
}

impl UiState {
    /// Obergrenze der Rückmeldungen; ältere Einträge werden verworfen.
    pub const MAX_FEEDBACK: usize = 256;
}

/// Gesamter Anwendungszustand.
pub struct AppState {
    /// Kartenmodell samt Szene
    pub model: MapModel<RetainedScene>,
    /// View-State
    pub view: ViewState,
    /// Label-Overlay
    pub labels: LabelOverlay,
    /// UI-State
    pub ui: UiState,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Periodische Aufgaben
    pub timers: Timers,
    /// Kartendienst (optional)
    pub map_service: Option<Box<dyn MapService>>,
    map_events: Receiver<MapLogEvent>,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State mit Standardoptionen.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Erstellt einen neuen, leeren App-State.
    pub fn with_options(options: EditorOptions) -> Self {
        let mut model = MapModel::new(
            RetainedScene::new(options.drawing_primitive),
            options.map_settings(),
        );
        let map_events = model.subscribe();

        let mut labels = LabelOverlay::new();
        labels.automatic_spread = options.automatic_label_spread;

        Self {
            model,
            view: ViewState::from_options(&options),
            labels,
            ui: UiState::default(),
            command_log: CommandLog::new(),
            timers: Timers::new(
                options.label_spread_interval_ms,
                options.label_top_rotation_interval_ms,
            ),
            map_service: None,
            map_events,
            options,
        }
    }

    /// Setzt den Kartendienst.
    pub fn with_map_service(mut self, service: impl MapService + 'static) -> Self {
        self.map_service = Some(Box::new(service));
        self
    }

    /// Übernimmt angefallene Modell-Ereignisse als Rückmeldung. Liefert die Anzahl.
    pub fn drain_map_events(&mut self) -> usize {
        let mut count = 0;
        for event in self.map_events.try_iter() {
            if self.ui.feedback.len() >= UiState::MAX_FEEDBACK {
                self.ui.feedback.drain(..UiState::MAX_FEEDBACK / 2);
            }
            self.ui.feedback.push(event.key().to_string());
            count += 1;
        }
        count
    }

    /// Gibt die Anzahl der Nodes zurück (für UI-Anzeige)
    pub fn node_count(&self) -> usize {
        self.model.node_count()
    }

    /// Gibt die Anzahl der Kanten zurück (für UI-Anzeige)
    pub fn edge_count(&self) -> usize {
        self.model.edge_count()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
