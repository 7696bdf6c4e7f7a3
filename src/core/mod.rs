//! Core-Domänentypen: Vektormathematik, Kamera, Layer und Kartenmodell.

pub mod camera;
pub mod color;
pub mod element;
pub mod layer;
pub mod map_log;
/// Kartenmodell
///
/// - MapModel: Layer-Baum, Parser-Registry, Zeichnen in eine Szene
/// - MapSettings: Einstellungen aus der Konfiguration
/// - ParseOutcome / IngestError: Ergebnis der Eingangsverarbeitung
pub mod map_model;
pub mod math;
pub mod views;

pub use camera::{Background, FrameContext, LocalAxes, OrbitCamera, Optics, ProjectedPoint};
pub use color::{Rgb, HEX_COLOR_SET};
pub use element::{
    EdgeRecord, ElementError, ElementKind, GridLineRecord, LayerDef, MapElement, MapHeader,
    NodeRecord, DEFAULT_LAYER,
};
pub use layer::{Drawn, Layer, DEFAULT_NODE_SIZE};
pub use map_log::{MapLog, MapLogEvent};
pub use map_model::{
    file_extension, DrawReport, IngestError, MapInfo, MapModel, MapSettings, MapState,
    ParseOutcome, EXTRAPOLATED_SUFFIX,
};
pub use views::{CameraPosition, View, ViewSet};
