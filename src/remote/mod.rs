//! Entfernter Kartendienst: Karten per ID laden, verfügbare Karten auflisten, hochladen.
//!
//! Der Transport ist austauschbar; der Rest der Anwendung kennt nur [`MapService`].
//! Kartendaten werden auf dem Transportweg Base64-kodiert übertragen.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Local, NaiveDateTime};
use indexmap::IndexMap;
use thiserror::Error;

/// Anzeigeformat für Zeitstempel.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fehler des Kartendienstes, aufbereitet für die Anzeige.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct RemoteError {
    /// Kurzbeschreibung
    pub message: String,
    /// Technische Details
    pub details: Option<String>,
}

impl RemoteError {
    /// Fehler ohne Details.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Fehler mit Details.
    pub fn with_details(message: impl Into<String>, details: impl ToString) -> Self {
        Self {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }
}

/// Eintrag der Kartenliste.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRecord {
    /// Karten-ID
    pub id: String,
    /// Anzeigename
    pub name: String,
    /// Zeitpunkt der letzten Änderung
    pub timestamp: NaiveDateTime,
}

impl MapRecord {
    /// Zeitstempel im Format `YYYY-MM-DD HH:MM:SS`.
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Geladene Karte.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteMap {
    /// Anzeigename (wird als Dateiname für die Parser-Auswahl verwendet)
    pub name: String,
    /// Dekodierte Kartendaten
    pub data: Vec<u8>,
}

/// Kartendienst.
pub trait MapService {
    /// Lädt eine Karte per ID.
    fn get_map(&self, id: &str) -> Result<RemoteMap, RemoteError>;

    /// Listet alle verfügbaren Karten.
    fn list_maps(&self) -> Result<Vec<MapRecord>, RemoteError>;

    /// Lädt eine Karte hoch und liefert ihre ID.
    fn put_map(&mut self, name: &str, data: &[u8]) -> Result<String, RemoteError>;
}

/// Dekodiert Base64-Kartendaten.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, RemoteError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| RemoteError::with_details("Kartendaten nicht lesbar", e))
}

/// Kodiert Kartendaten für den Transport.
pub fn encode_payload(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Lädt eine Karte und ruft je nach Ergebnis genau einen der Callbacks auf.
pub fn fetch_map<S: MapService + ?Sized>(
    service: &S,
    id: &str,
    on_success: impl FnOnce(Vec<u8>, String),
    on_error: impl FnOnce(RemoteError),
) {
    match service.get_map(id) {
        Ok(map) => on_success(map.data, map.name),
        Err(e) => {
            log::warn!("Karte '{}' nicht geladen: {}", id, e);
            on_error(e)
        }
    }
}

/// Listet Karten und ruft je nach Ergebnis genau einen der Callbacks auf.
pub fn list_maps<S: MapService + ?Sized>(
    service: &S,
    on_success: impl FnOnce(Vec<MapRecord>),
    on_error: impl FnOnce(RemoteError),
) {
    match service.list_maps() {
        Ok(list) => on_success(list),
        Err(e) => {
            log::warn!("Kartenliste nicht geladen: {}", e);
            on_error(e)
        }
    }
}

#[derive(Debug, Clone)]
struct StoredMap {
    name: String,
    encoded: String,
    timestamp: NaiveDateTime,
}

/// Kartendienst im Speicher; hält die Daten wie auf dem Transportweg Base64-kodiert.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMapService {
    maps: IndexMap<String, StoredMap>,
    next_id: u64,
}

impl InMemoryMapService {
    /// Leerer Dienst.
    pub fn new() -> Self {
        Self::default()
    }

    /// Legt eine Karte mit fester ID und festem Zeitstempel an.
    pub fn insert(&mut self, id: &str, name: &str, data: &[u8], timestamp: NaiveDateTime) {
        self.maps.insert(
            id.to_string(),
            StoredMap {
                name: name.to_string(),
                encoded: encode_payload(data),
                timestamp,
            },
        );
    }

    /// Anzahl gespeicherter Karten.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// `true`, wenn keine Karten gespeichert sind.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MapService for InMemoryMapService {
    fn get_map(&self, id: &str) -> Result<RemoteMap, RemoteError> {
        let stored = self
            .maps
            .get(id)
            .ok_or_else(|| RemoteError::with_details("Karte nicht gefunden", id))?;
        Ok(RemoteMap {
            name: stored.name.clone(),
            data: decode_payload(&stored.encoded)?,
        })
    }

    fn list_maps(&self) -> Result<Vec<MapRecord>, RemoteError> {
        Ok(self
            .maps
            .iter()
            .map(|(id, stored)| MapRecord {
                id: id.clone(),
                name: stored.name.clone(),
                timestamp: stored.timestamp,
            })
            .collect())
    }

    fn put_map(&mut self, name: &str, data: &[u8]) -> Result<String, RemoteError> {
        // Per `insert` vergebene IDs überspringen
        let id = loop {
            self.next_id += 1;
            let candidate = self.next_id.to_string();
            if !self.maps.contains_key(&candidate) {
                break candidate;
            }
        };
        self.insert(&id, name, data, Local::now().naive_local());
        Ok(id)
    }
}

/// Kartendienst über ein Verzeichnis mit `*.json`-Karten (ID = Dateiname).
#[derive(Debug, Clone)]
pub struct DirectoryMapService {
    root: PathBuf,
}

impl DirectoryMapService {
    /// Dienst über `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Wurzelverzeichnis.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> Result<PathBuf, RemoteError> {
        let plain = Path::new(id)
            .file_name()
            .is_some_and(|name| name == std::ffi::OsStr::new(id));
        if !plain {
            return Err(RemoteError::with_details("Ungueltige Karten-ID", id));
        }
        Ok(self.root.join(id))
    }
}

impl MapService for DirectoryMapService {
    fn get_map(&self, id: &str) -> Result<RemoteMap, RemoteError> {
        let path = self.resolve(id)?;
        let data = std::fs::read(&path)
            .map_err(|e| RemoteError::with_details(format!("Karte '{}' nicht lesbar", id), e))?;
        Ok(RemoteMap {
            name: id.to_string(),
            data,
        })
    }

    fn list_maps(&self) -> Result<Vec<MapRecord>, RemoteError> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|e| RemoteError::with_details("Kartenverzeichnis nicht lesbar", e))?;

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json || !path.is_file() {
                continue;
            }
            let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = path
                .file_stem()
                .and_then(|n| n.to_str())
                .unwrap_or(id)
                .to_string();
            let timestamp = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(|t| DateTime::<Local>::from(t).naive_local())
                .unwrap_or_default();
            records.push(MapRecord {
                id: id.to_string(),
                name,
                timestamp,
            });
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    fn put_map(&mut self, name: &str, data: &[u8]) -> Result<String, RemoteError> {
        let id = if name.to_lowercase().ends_with(".json") {
            name.to_string()
        } else {
            format!("{}.json", name)
        };
        let path = self.resolve(&id)?;
        std::fs::write(&path, data)
            .map_err(|e| RemoteError::with_details(format!("Karte '{}' nicht gespeichert", id), e))?;
        log::info!("Karte gespeichert: {}", path.display());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 1))
            .expect("gueltiges Datum")
    }

    #[test]
    fn test_in_memory_round_trip_through_base64() {
        let mut service = InMemoryMapService::new();
        service.insert("7", "grube.json", br#"{"MT.nodes": []}"#, timestamp());

        let mut received = None;
        fetch_map(
            &service,
            "7",
            |data, name| received = Some((data, name)),
            |e| panic!("unerwarteter Fehler: {}", e),
        );
        let (data, name) = received.expect("Karte erwartet");
        assert_eq!(data, br#"{"MT.nodes": []}"#);
        assert_eq!(name, "grube.json");

        let id = service.put_map("neu.json", b"{}").expect("Upload");
        assert_eq!(service.get_map(&id).map(|m| m.data), Ok(b"{}".to_vec()));
    }

    #[test]
    fn test_unknown_map_reports_structured_error() {
        let service = InMemoryMapService::new();
        let mut error = None;
        fetch_map(
            &service,
            "fehlt",
            |_, _| panic!("kein Erfolg erwartet"),
            |e| error = Some(e),
        );
        let error = error.expect("Fehler erwartet");
        assert_eq!(error.message, "Karte nicht gefunden");
        assert_eq!(error.details.as_deref(), Some("fehlt"));
    }

    #[test]
    fn test_list_formats_timestamps() {
        let mut service = InMemoryMapService::new();
        service.insert("1", "a.json", b"{}", timestamp());

        let mut list = Vec::new();
        list_maps(&service, |l| list = l, |e| panic!("{}", e));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].timestamp_label(), "2015-03-07 09:05:01");
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(decode_payload("***").is_err());
        assert_eq!(decode_payload(&encode_payload(b"abc")), Ok(b"abc".to_vec()));
    }

    #[test]
    fn test_directory_service_lists_json_maps() {
        let dir = std::env::temp_dir().join(format!("minemap_remote_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Verzeichnis anlegen");
        let mut service = DirectoryMapService::new(&dir);

        let id = service.put_map("karte", b"{}").expect("speichern");
        assert_eq!(id, "karte.json");
        std::fs::write(dir.join("notiz.txt"), b"x").expect("schreiben");

        let list = service.list_maps().expect("Liste");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "karte");
        assert_eq!(service.get_map("karte.json").map(|m| m.data), Ok(b"{}".to_vec()));
        assert!(service.get_map("../karte.json").is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_upload_does_not_overwrite_inserted_maps() {
        let mut service = InMemoryMapService::new();
        service.insert("1", "fest.json", b"alt", timestamp());
        service.insert("2", "auch_fest.json", b"alt2", timestamp());

        let id = service.put_map("neu.json", b"neu").expect("hochgeladen");

        assert_eq!(id, "3");
        assert_eq!(service.len(), 3);
        assert_eq!(service.get_map("1").map(|m| m.data), Ok(b"alt".to_vec()));
        assert_eq!(service.get_map("3").map(|m| m.name), Ok("neu.json".to_string()));
    }
}
