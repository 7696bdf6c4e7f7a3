//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState, RotationAxis};
use crate::core::Rgb;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::MapFileDropped { path } => vec![AppCommand::LoadMapFile { path }],
        AppIntent::MapDataReceived { filename, data } => {
            vec![AppCommand::LoadMapData { filename, data }]
        }
        AppIntent::RemoteMapRequested { id } => vec![AppCommand::LoadRemoteMap { id }],
        AppIntent::InitialMapRequested => vec![AppCommand::LoadInitialMap],
        AppIntent::MapListRequested => vec![AppCommand::RefreshMapList],
        AppIntent::MapUploadRequested { name, data } => vec![
            AppCommand::UploadMap { name, data },
            AppCommand::RefreshMapList,
        ],
        AppIntent::ExportRequested { path } => vec![AppCommand::ExportMap { path }],
        AppIntent::ExtrapolateRequested { layer } => {
            vec![AppCommand::ExtrapolateLayer { layer }]
        }

        AppIntent::MouseDragged { delta, left, right } => {
            let mut commands = if left && right {
                vec![AppCommand::MoveCamera { delta }]
            } else if left {
                vec![AppCommand::RotateCamera {
                    axis: RotationAxis::Roll,
                    degrees: delta.x,
                }]
            } else {
                vec![
                    AppCommand::RotateCamera {
                        axis: RotationAxis::Yaw,
                        degrees: delta.x,
                    },
                    AppCommand::RotateCamera {
                        axis: RotationAxis::Pitch,
                        degrees: delta.y,
                    },
                ]
            };
            commands.push(AppCommand::PublishFrame);
            commands
        }
        AppIntent::MouseWheel { delta } => vec![
            AppCommand::ZoomCamera { wheel_delta: delta },
            AppCommand::PublishFrame,
        ],
        AppIntent::CanvasClicked { position, dragged } => {
            if dragged {
                Vec::new()
            } else {
                vec![AppCommand::PickAt { position }]
            }
        }
        AppIntent::ViewSelected { name } => {
            vec![AppCommand::SetView { name }, AppCommand::PublishFrame]
        }
        AppIntent::ResetCameraRequested => {
            vec![AppCommand::ResetCamera, AppCommand::PublishFrame]
        }
        AppIntent::ViewportResized { size } => {
            if size.x > 0.0 && size.y > 0.0 && size.is_finite() {
                vec![AppCommand::SetViewportSize { size }, AppCommand::PublishFrame]
            } else {
                log::warn!("Ungueltige Viewport-Groesse ignoriert: {:?}", size);
                Vec::new()
            }
        }

        AppIntent::LayerVisibilityToggled { layer, visible } => {
            vec![AppCommand::SetLayerVisible { layer, visible }]
        }
        AppIntent::LayerPriorityChanged { layer, priority } => {
            vec![AppCommand::SetLayerPriority { layer, priority }]
        }
        AppIntent::LayerColorChanged { layer, color } => match Rgb::from_hex(&color) {
            Some(color) => vec![AppCommand::SetLayerColor { layer, color }],
            None => {
                log::warn!("Ungueltige Layer-Farbe '{}' fuer '{}'", color, layer);
                Vec::new()
            }
        },
        AppIntent::LayerIgnoreToggled { layer, ignored } => {
            vec![AppCommand::SetLayerIgnored { layer, ignored }]
        }

        AppIntent::LayerLabelsRequested { layer } => vec![
            AppCommand::LabelLayerNodes { layer },
            AppCommand::PublishFrame,
        ],
        AppIntent::LabelMeasured { index, size } => {
            vec![AppCommand::SetLabelSize { index, size }]
        }
        AppIntent::LabelHovered { index, hovered } => {
            vec![AppCommand::SetLabelHovered { index, hovered }]
        }
        AppIntent::LabelDragStarted { index, pointer } => {
            vec![AppCommand::BeginLabelDrag { index, pointer }]
        }
        AppIntent::LabelDragged { pointer } => vec![AppCommand::DragLabel { pointer }],
        AppIntent::LabelDragEnded => vec![AppCommand::EndLabelDrag],
        AppIntent::MaximizeAllLabelsToggled { maximized } => {
            vec![AppCommand::SetMaximizeAllLabels { maximized }]
        }
        AppIntent::AutomaticSpreadToggled { enabled } => {
            vec![AppCommand::SetAutomaticSpread { enabled }]
        }

        AppIntent::TimeElapsed { elapsed_ms } => {
            if elapsed_ms == 0 || state.labels.is_empty() {
                Vec::new()
            } else {
                vec![AppCommand::AdvanceTimers { elapsed_ms }]
            }
        }
    }
}

#[cfg(test)]
mod tests;
