//! Use-Cases zum Laden, Exportieren und Extrapolieren von Karten.

use std::cell::Cell;
use std::path::Path;

use anyhow::{bail, Context};

use super::{camera, labels};
use crate::app::state::LoadedFile;
use crate::app::AppState;
use crate::core::{DrawReport, ParseOutcome};
use crate::formats::MapParser;
use crate::remote::{self, MapRecord, RemoteError};

/// Rückmeldung, wenn keine Karte zum Zeichnen vorliegt.
pub const FEEDBACK_NO_MAP: &str = "MAP.ERROR.NULL";
/// Fehlermeldung bei Problemen mit dem Kartendienst.
pub const FEEDBACK_MAP_SERVICE_ERROR: &str = "MAP.ERROR.MAPCENTER";

const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Menschenlesbare Größe mit drei signifikanten Stellen (Basis 1000).
pub fn bytes_to_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Byte".to_string();
    }
    let k = 1000_f64;
    let bytes = bytes as f64;
    let exponent = ((bytes.ln() / k.ln()).floor() as usize).min(SIZE_UNITS.len() - 1);
    let value = bytes / k.powi(exponent as i32);
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*} {}", decimals, value, SIZE_UNITS[exponent])
}

/// Anzahl der Zeilen; `\r\n`, `\r` und `\n` gelten als Umbruch. Leerer Text hat 0 Zeilen.
pub fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let bytes = text.as_bytes();
    let mut lines = 1;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines += 1;
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => lines += 1,
            _ => {}
        }
        i += 1;
    }
    lines
}

/// Ersetzt die aktuelle Karte durch `data`, zeichnet sie und richtet die Kamera aus.
///
/// Fehlt der Parser für die Dateiendung, werden die Daten zurückgehalten
/// und beim Registrieren des Parsers verarbeitet.
pub fn load_map_data(state: &mut AppState, data: &[u8], filename: &str) -> anyhow::Result<()> {
    state.ui.feedback.clear();
    if !state.model.is_empty() {
        state.model.destroy_map();
        state.ui.selected = None;
    }
    // Angebrochene Perioden gehören zur alten Karte
    state.timers.reset();

    state.ui.loaded_file = Some(LoadedFile {
        name: filename.to_string(),
        size_label: bytes_to_size(data.len() as u64),
        lines: count_lines(&String::from_utf8_lossy(data)),
    });

    match state.model.parse_map_data(data, filename) {
        ParseOutcome::Parsed { elements, rejected } => {
            log::info!(
                "Karte '{}' geparst: {} Elemente, {} verworfen",
                filename,
                elements,
                rejected
            );
            draw_map(state);
            Ok(())
        }
        ParseOutcome::Deferred { extension } => {
            state.drain_map_events();
            state.ui.status_message = Some(format!(
                "Warte auf Parser fuer '.{}' ({})",
                extension, filename
            ));
            Ok(())
        }
        ParseOutcome::Skipped(e) => {
            state.drain_map_events();
            Err(anyhow::Error::new(e).context(format!("Karte '{}' nicht geladen", filename)))
        }
    }
}

/// Liest eine Kartendatei und lädt sie.
pub fn load_map_file(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let data = std::fs::read(path)
        .with_context(|| format!("Kartendatei nicht lesbar: {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    log::info!("Lade Karte: {}", path.display());
    load_map_data(state, &data, &filename)
}

/// Zeichnet das Modell, richtet die Kamera aus und aktualisiert die Labels.
///
/// Ein leeres Modell wird nicht gezeichnet; es gibt dann nur eine Rückmeldung.
pub fn draw_map(state: &mut AppState) -> Option<DrawReport> {
    // Rückmeldungen beziehen sich immer auf den letzten Durchlauf
    state.ui.feedback.clear();
    if state.model.is_empty() {
        log::warn!("Keine Karte zum Zeichnen");
        state.drain_map_events();
        state.ui.feedback.push(FEEDBACK_NO_MAP.to_string());
        return None;
    }

    let report = pollster::block_on(state.model.draw_map());
    // Neu gezeichnete Primitive haben neue Handles
    state.ui.selected = None;
    log::info!(
        "Karte gezeichnet: {} Layer, {} Primitive, {} Kanten uebersprungen",
        report.layers,
        report.primitives(),
        report.skipped
    );

    camera::fit_to_map(state);
    labels::retain_bound(state);
    camera::publish_frame(state);
    state.drain_map_events();
    Some(report)
}

/// Registriert einen Parser; zurückgehaltene Daten werden sofort verarbeitet und gezeichnet.
pub fn register_parser(
    state: &mut AppState,
    extension: &str,
    parser: impl MapParser + 'static,
) -> Option<ParseOutcome> {
    if state.model.has_parser(extension) {
        log::info!("Parser fuer '.{}' wird ersetzt", extension);
    }
    let outcome = state.model.add_parser(extension, parser);
    match &outcome {
        Some(ParseOutcome::Parsed { .. }) => {
            state.ui.status_message = None;
            draw_map(state);
        }
        Some(_) => {
            state.drain_map_events();
        }
        None => {}
    }
    outcome
}

fn map_service_error(error: RemoteError) -> RemoteError {
    let details = error.details.unwrap_or(error.message);
    RemoteError::with_details(FEEDBACK_MAP_SERVICE_ERROR, details)
}

/// Lädt eine Karte aus dem Kartendienst.
pub fn load_remote_map(state: &mut AppState, id: &str) -> anyhow::Result<()> {
    let Some(service) = state.map_service.as_deref() else {
        bail!("Kein Kartendienst konfiguriert");
    };

    let fetched = Cell::new(None);
    remote::fetch_map(
        service,
        id,
        |data, name| fetched.set(Some(Ok((data, name)))),
        |e| fetched.set(Some(Err(e))),
    );

    match fetched.into_inner() {
        Some(Ok((data, name))) => {
            state.ui.remote_error = None;
            load_map_data(state, &data, &name)
        }
        Some(Err(e)) => {
            let error = map_service_error(e);
            state.ui.remote_error = Some(error.clone());
            Err(anyhow::Error::new(error).context(format!("Karte '{}' nicht geladen", id)))
        }
        None => bail!("Kartendienst hat nicht geantwortet"),
    }
}

/// Lädt die Rückfallkarte aus `fallback_map_location`.
pub fn load_fallback_map(state: &mut AppState) -> anyhow::Result<()> {
    let location = state.options.fallback_map_location.clone();
    log::info!("Lade Rueckfallkarte: {}", location);
    load_map_file(state, Path::new(&location))
}

/// Lädt die konfigurierte Startkarte; ohne ID oder bei Fehler die Rückfallkarte.
pub fn load_initial_map(state: &mut AppState) -> anyhow::Result<()> {
    if let Some(id) = state.options.default_map_id.clone() {
        match load_remote_map(state, &id) {
            Ok(()) => return Ok(()),
            Err(e) => log::warn!("Startkarte nicht geladen, Rueckfall: {:#}", e),
        }
    }
    load_fallback_map(state)
}

/// Aktualisiert die Kartenliste aus dem Kartendienst.
pub fn refresh_map_list(state: &mut AppState) -> anyhow::Result<()> {
    let Some(service) = state.map_service.as_deref() else {
        bail!("Kein Kartendienst konfiguriert");
    };

    let listed: Cell<Option<Result<Vec<MapRecord>, RemoteError>>> = Cell::new(None);
    remote::list_maps(
        service,
        |list| listed.set(Some(Ok(list))),
        |e| listed.set(Some(Err(e))),
    );

    match listed.into_inner() {
        Some(Ok(list)) => {
            state.ui.map_list = list;
            state.ui.remote_error = None;
            Ok(())
        }
        Some(Err(e)) => {
            let error = map_service_error(e);
            state.ui.remote_error = Some(error.clone());
            Err(anyhow::Error::new(error).context("Kartenliste nicht geladen"))
        }
        None => bail!("Kartendienst hat nicht geantwortet"),
    }
}

/// Lädt eine Karte in den Kartendienst hoch.
pub fn upload_map(state: &mut AppState, name: &str, data: &[u8]) -> anyhow::Result<String> {
    let Some(service) = state.map_service.as_deref_mut() else {
        bail!("Kein Kartendienst konfiguriert");
    };
    match service.put_map(name, data) {
        Ok(id) => {
            log::info!("Karte '{}' hochgeladen (ID {})", name, id);
            state.ui.remote_error = None;
            Ok(id)
        }
        Err(e) => {
            let error = map_service_error(e);
            state.ui.remote_error = Some(error.clone());
            Err(anyhow::Error::new(error).context(format!("Karte '{}' nicht hochgeladen", name)))
        }
    }
}

/// Exportiert das Modell als JSON-Datei.
pub fn export_map(state: &mut AppState, path: &Path) -> anyhow::Result<usize> {
    if !state.options.allow_map_exporting_as_json {
        bail!("JSON-Export ist in den Optionen deaktiviert");
    }
    let export = state.model.get_map_data_for_export();
    let json = export
        .to_json_pretty()
        .context("Karte nicht serialisierbar")?;
    std::fs::write(path, json)
        .with_context(|| format!("Export nicht schreibbar: {}", path.display()))?;
    log::info!(
        "Karte exportiert: {} ({} Elemente)",
        path.display(),
        export.element_count()
    );
    Ok(export.element_count())
}

/// Extrapoliert einen Layer auf das Gitter und zeichnet die Karte neu.
pub fn extrapolate_layer(state: &mut AppState, layer: &str) -> anyhow::Result<String> {
    if !state.options.allow_extrapolating {
        bail!("Extrapolieren ist in den Optionen deaktiviert");
    }
    let target = state
        .model
        .extrapolate_to_grid(layer)
        .with_context(|| format!("Layer '{}' nicht extrapoliert", layer))?;
    draw_map(state);
    Ok(target)
}
