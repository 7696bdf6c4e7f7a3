//! Handler für Laden, Export, Extrapolation und Kartendienst.

use std::path::Path;

use crate::app::use_cases;
use crate::app::AppState;

/// Lädt eine Kartendatei.
pub fn load_file(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    use_cases::map_io::load_map_file(state, path)
}

/// Lädt Kartendaten aus dem Speicher.
pub fn load_data(state: &mut AppState, filename: &str, data: &[u8]) -> anyhow::Result<()> {
    use_cases::map_io::load_map_data(state, data, filename)
}

/// Lädt eine Karte aus dem Kartendienst.
pub fn load_remote(state: &mut AppState, id: &str) -> anyhow::Result<()> {
    use_cases::map_io::load_remote_map(state, id)
}

/// Lädt die Startkarte.
pub fn load_initial(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::map_io::load_initial_map(state)
}

/// Aktualisiert die Kartenliste.
pub fn refresh_map_list(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::map_io::refresh_map_list(state)
}

/// Lädt eine Karte hoch.
pub fn upload(state: &mut AppState, name: &str, data: &[u8]) -> anyhow::Result<()> {
    use_cases::map_io::upload_map(state, name, data).map(|_| ())
}

/// Exportiert die Karte als JSON.
pub fn export(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    use_cases::map_io::export_map(state, path).map(|_| ())
}

/// Extrapoliert einen Layer auf das Gitter.
pub fn extrapolate(state: &mut AppState, layer: &str) -> anyhow::Result<()> {
    use_cases::map_io::extrapolate_layer(state, layer).map(|_| ())
}
