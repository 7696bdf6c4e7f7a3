//! Grubenkarten-Editor (Kommandozeile).
//!
//! Lädt eine Karte in die Referenz-Szene, richtet die Kamera aus und gibt
//! eine Übersicht aus. Optional wird extrapoliert und als JSON exportiert.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minemap_editor::remote::DirectoryMapService;
use minemap_editor::{AppController, AppIntent, AppState, EditorOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "3D-Viewer fuer Grubenkarten")]
struct Args {
    /// Kartendatei; ohne Angabe wird die Startkarte aus der Konfiguration geladen
    map: Option<PathBuf>,

    /// Optionen-Datei (Standard: minemap_editor.toml neben der Binary)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verzeichnis mit JSON-Karten als Kartendienst
    #[arg(long)]
    maps_dir: Option<PathBuf>,

    /// Karte aus dem Kartendienst laden (ID)
    #[arg(long)]
    map_id: Option<String>,

    /// Layer auf das Gitter extrapolieren
    #[arg(long)]
    extrapolate: Option<String>,

    /// Karte als JSON exportieren
    #[arg(long)]
    export: Option<PathBuf>,

    /// Kamera-Ansicht nach dem Laden
    #[arg(long)]
    view: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Grubenkarten-Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(EditorOptions::config_path);
    let mut options = EditorOptions::load_from_file(&config_path);
    // Explizite Kommandozeilen-Aufträge sind immer erlaubt
    if args.extrapolate.is_some() {
        options.allow_extrapolating = true;
    }
    if args.export.is_some() {
        options.allow_map_exporting_as_json = true;
    }

    let mut state = AppState::with_options(options);
    if let Some(dir) = &args.maps_dir {
        state = state.with_map_service(DirectoryMapService::new(dir));
    }
    let mut controller = AppController::new();

    let load = match (&args.map, &args.map_id) {
        (Some(path), _) => AppIntent::MapFileDropped { path: path.clone() },
        (None, Some(id)) => AppIntent::RemoteMapRequested { id: id.clone() },
        (None, None) => AppIntent::InitialMapRequested,
    };
    controller
        .handle_intent(&mut state, load)
        .context("Karte konnte nicht geladen werden")?;

    if let Some(layer) = args.extrapolate {
        controller.handle_intent(&mut state, AppIntent::ExtrapolateRequested { layer })?;
    }
    if let Some(name) = args.view {
        controller.handle_intent(&mut state, AppIntent::ViewSelected { name })?;
    }
    if let Some(path) = args.export {
        controller.handle_intent(&mut state, AppIntent::ExportRequested { path })?;
    }

    print_summary(&state);
    Ok(())
}

fn print_summary(state: &AppState) {
    if let Some(file) = &state.ui.loaded_file {
        println!("Datei: {} ({}, {} Zeilen)", file.name, file.size_label, file.lines);
    }
    println!(
        "Karte: {} Nodes, {} Kanten, {} Gitterlinien",
        state.model.node_count(),
        state.model.edge_count(),
        state.model.grid_count()
    );
    for layer in state.model.layers() {
        println!(
            "  Layer '{}': {} Nodes, {} Kanten, {} Gitterlinien{}{}",
            layer.name,
            layer.nodes.len(),
            layer.edges.len(),
            layer.grid_lines.len(),
            if layer.visible { "" } else { ", ausgeblendet" },
            if layer.is_ignored { ", ignoriert" } else { "" },
        );
    }
    if let Some((min, max)) = state.model.bounds() {
        println!("Ausdehnung: {:?} .. {:?}", min, max);
    }

    let position = state.view.camera.position();
    println!(
        "Kamera ({}): eye {:?}, look {:?}, up {:?}",
        state.view.camera.active_view().unwrap_or("frei"),
        position.eye,
        position.look,
        position.up
    );
    println!("Hintergrund: {}", state.view.camera.background.style());
    println!(
        "Szene: {} Primitive in {} Layern, {} Szenenknoten",
        state.model.scene().primitive_count(),
        state.model.scene().layer_count(),
        state.model.scene().live_node_count()
    );
    for key in &state.ui.feedback {
        log::debug!("Rueckmeldung: {}", key);
    }
}
