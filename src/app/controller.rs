//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};
use crate::core::ParseOutcome;
use crate::formats::MapParser;

/// Orchestriert UI-Events und Use-Cases auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Registriert einen Parser für eine Dateiendung.
    ///
    /// Parser sind Funktionen und laufen daher nicht über das Command-Log.
    pub fn register_parser(
        &mut self,
        state: &mut AppState,
        extension: &str,
        parser: impl MapParser + 'static,
    ) -> Option<ParseOutcome> {
        super::use_cases::map_io::register_parser(state, extension, parser)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Karten-I/O ===
            AppCommand::LoadMapFile { path } => handlers::file_io::load_file(state, &path)?,
            AppCommand::LoadMapData { filename, data } => {
                handlers::file_io::load_data(state, &filename, &data)?
            }
            AppCommand::LoadRemoteMap { id } => handlers::file_io::load_remote(state, &id)?,
            AppCommand::LoadInitialMap => handlers::file_io::load_initial(state)?,
            AppCommand::RefreshMapList => handlers::file_io::refresh_map_list(state)?,
            AppCommand::UploadMap { name, data } => {
                handlers::file_io::upload(state, &name, &data)?
            }
            AppCommand::ExportMap { path } => handlers::file_io::export(state, &path)?,
            AppCommand::ExtrapolateLayer { layer } => {
                handlers::file_io::extrapolate(state, &layer)?
            }

            // === Kamera & Viewport ===
            AppCommand::MoveCamera { delta } => handlers::view::move_camera(state, delta),
            AppCommand::RotateCamera { axis, degrees } => {
                handlers::view::rotate_camera(state, axis, degrees)
            }
            AppCommand::ZoomCamera { wheel_delta } => {
                handlers::view::zoom_camera(state, wheel_delta)
            }
            AppCommand::SetView { name } => handlers::view::set_view(state, &name),
            AppCommand::ResetCamera => handlers::view::reset_camera(state),
            AppCommand::SetViewportSize { size } => handlers::view::set_viewport_size(state, size),
            AppCommand::PublishFrame => handlers::view::publish_frame(state),

            // === Selektion ===
            AppCommand::PickAt { position } => handlers::selection::pick_at(state, position),

            // === Layer ===
            AppCommand::SetLayerVisible { layer, visible } => {
                handlers::layers::set_visible(state, &layer, visible)
            }
            AppCommand::SetLayerPriority { layer, priority } => {
                handlers::layers::set_priority(state, &layer, priority)
            }
            AppCommand::SetLayerColor { layer, color } => {
                handlers::layers::set_color(state, &layer, color)
            }
            AppCommand::SetLayerIgnored { layer, ignored } => {
                handlers::layers::set_ignored(state, &layer, ignored)
            }

            // === Labels ===
            AppCommand::LabelLayerNodes { layer } => {
                handlers::labels::label_layer_nodes(state, &layer)
            }
            AppCommand::SetLabelSize { index, size } => {
                handlers::labels::set_size(state, index, size)
            }
            AppCommand::SetLabelHovered { index, hovered } => {
                handlers::labels::set_hovered(state, index, hovered)
            }
            AppCommand::BeginLabelDrag { index, pointer } => {
                handlers::labels::begin_drag(state, index, pointer)
            }
            AppCommand::DragLabel { pointer } => handlers::labels::drag(state, pointer),
            AppCommand::EndLabelDrag => handlers::labels::end_drag(state),
            AppCommand::SetMaximizeAllLabels { maximized } => {
                handlers::labels::set_maximize_all(state, maximized)
            }
            AppCommand::SetAutomaticSpread { enabled } => {
                handlers::labels::set_automatic_spread(state, enabled)
            }

            // === Zeitgeber ===
            AppCommand::AdvanceTimers { elapsed_ms } => {
                handlers::labels::advance_timers(state, elapsed_ms)
            }
        }

        Ok(())
    }
}
