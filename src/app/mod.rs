//! Application-Layer: Controller, State, Events und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
mod intent_mapping;
/// Application State und Controller
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Karte, Kamera, Labels, UI).
pub mod state;
pub mod timers;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent, RotationAxis};
pub use state::{AppState, LoadedFile, UiState, ViewState};
pub use timers::{TimerJob, Timers};
