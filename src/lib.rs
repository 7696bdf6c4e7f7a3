//! Grubenkarten-Editor Library.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod formats;
pub mod labels;
pub mod remote;
pub mod render;
pub mod shared;

pub use app::{AppCommand, AppController, AppIntent, AppState, UiState, ViewState};
pub use core::{
    CameraPosition, DrawReport, Layer, MapElement, MapLogEvent, MapModel, MapSettings, MapState,
    OrbitCamera, ParseOutcome, Rgb,
};
pub use formats::{MapExport, MapParser, ParseError};
pub use labels::{Label, LabelOverlay, NodeRef};
pub use remote::{DirectoryMapService, InMemoryMapService, MapService, RemoteError};
pub use render::{RetainedScene, SceneGraphAdapter};
pub use shared::EditorOptions;
