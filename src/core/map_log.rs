//! Fortschrittsmeldungen des Kartenmodells.
//!
//! Das Modell besitzt seinen `MapLog`; Interessenten abonnieren einen
//! eigenen Kanal. Getrennte Empfänger werden beim nächsten Senden entfernt.

use crossbeam_channel::{Receiver, Sender};

/// Ereignis beim Parsen, Zeichnen oder Entfernen einer Karte.
#[derive(Debug, Clone, PartialEq)]
pub enum MapLogEvent {
    /// Bestehende Karte wird entfernt
    Removing,
    /// Parsen beginnt
    Parsing {
        /// Dateiname der Karte
        filename: String,
    },
    /// Parsen abgeschlossen
    ParsingDone {
        /// Dateiname der Karte
        filename: String,
        /// Anzahl übernommener Elemente
        elements: usize,
    },
    /// Kein Parser für die Erweiterung, Daten werden zurückgehalten
    ParserPending {
        /// Dateiname der Karte
        filename: String,
        /// Dateierweiterung
        extension: String,
    },
    /// Parser ist fehlgeschlagen
    ParseFailed {
        /// Dateiname der Karte
        filename: String,
        /// Fehlerbeschreibung
        reason: String,
    },
    /// Element wurde verworfen
    ElementRejected {
        /// Fehlerbeschreibung
        reason: String,
    },
    /// Zeichnen beginnt
    Drawing,
    /// Layer wurde gezeichnet
    LayerDrawn {
        /// Layer-Name
        layer: String,
        /// Anzahl neu gezeichneter Primitive
        primitives: usize,
    },
    /// Kante oder Gitterlinie ohne Endpunkt übersprungen
    EdgeSkipped {
        /// Layer-Name
        layer: String,
        /// Element-ID
        id: String,
        /// Fehlender Node
        missing: String,
    },
    /// Zeichnen abgeschlossen
    DrawingDone {
        /// Anzahl neu gezeichneter Primitive
        primitives: usize,
    },
    /// Gitter-Layer erzeugt
    Extrapolated {
        /// Quell-Layer
        layer: String,
        /// Erzeugter Layer
        target: String,
        /// Anzahl Gitterlinien
        grid_lines: usize,
    },
}

impl MapLogEvent {
    /// Übersetzungsschlüssel für die UI.
    pub fn key(&self) -> &'static str {
        match self {
            MapLogEvent::Removing => "MAP.REMOVING",
            MapLogEvent::Parsing { .. } => "MAP.PARSING",
            MapLogEvent::ParsingDone { .. } => "MAP.PARSING_DONE",
            MapLogEvent::ParserPending { .. } => "MAP.PARSER_PENDING",
            MapLogEvent::ParseFailed { .. } => "MAP.PARSE_FAILED",
            MapLogEvent::ElementRejected { .. } => "MAP.ELEMENT_REJECTED",
            MapLogEvent::Drawing => "MAP.DRAWING",
            MapLogEvent::LayerDrawn { .. } => "MAP.LAYER_DRAWN",
            MapLogEvent::EdgeSkipped { .. } => "MAP.EDGE_SKIPPED",
            MapLogEvent::DrawingDone { .. } => "MAP.DRAWING_DONE",
            MapLogEvent::Extrapolated { .. } => "MAP.EXTRAPOLATED",
        }
    }

    /// Warnungen werden mit `log::warn!` protokolliert.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            MapLogEvent::ParseFailed { .. }
                | MapLogEvent::ElementRejected { .. }
                | MapLogEvent::EdgeSkipped { .. }
        )
    }
}

impl std::fmt::Display for MapLogEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapLogEvent::Removing => write!(f, "Entferne bestehende Karte"),
            MapLogEvent::Parsing { filename } => write!(f, "Parse {}", filename),
            MapLogEvent::ParsingDone { filename, elements } => {
                write!(f, "{} geparst: {} Elemente", filename, elements)
            }
            MapLogEvent::ParserPending {
                filename,
                extension,
            } => write!(
                f,
                "Kein Parser fuer '.{}' - {} wartet auf Registrierung",
                extension, filename
            ),
            MapLogEvent::ParseFailed { filename, reason } => {
                write!(f, "{} konnte nicht geparst werden: {}", filename, reason)
            }
            MapLogEvent::ElementRejected { reason } => {
                write!(f, "Element verworfen: {}", reason)
            }
            MapLogEvent::Drawing => write!(f, "Zeichne Karte"),
            MapLogEvent::LayerDrawn { layer, primitives } => {
                write!(f, "Layer '{}': {} Primitive gezeichnet", layer, primitives)
            }
            MapLogEvent::EdgeSkipped { layer, id, missing } => write!(
                f,
                "Layer '{}': kein Endpunkt '{}' fuer '{}' gefunden",
                layer, missing, id
            ),
            MapLogEvent::DrawingDone { primitives } => {
                write!(f, "Karte gezeichnet: {} Primitive", primitives)
            }
            MapLogEvent::Extrapolated {
                layer,
                target,
                grid_lines,
            } => write!(
                f,
                "Layer '{}' nach '{}' extrapoliert: {} Gitterlinien",
                layer, target, grid_lines
            ),
        }
    }
}

/// Ereigniskanal des Kartenmodells.
#[derive(Debug, Default)]
pub struct MapLog {
    subscribers: Vec<Sender<MapLogEvent>>,
}

impl MapLog {
    /// Kanal ohne Abonnenten.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abonniert alle künftigen Ereignisse.
    pub fn subscribe(&mut self) -> Receiver<MapLogEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Anzahl verbundener Abonnenten.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Protokolliert und verteilt ein Ereignis.
    pub fn emit(&mut self, event: MapLogEvent) {
        if event.is_warning() {
            log::warn!("[{}] {}", event.key(), event);
        } else {
            log::info!("[{}] {}", event.key(), event);
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
