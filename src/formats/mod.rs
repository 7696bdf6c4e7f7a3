//! Kartenformate: Parser-Schnittstelle und eingebaute Formate.

pub mod json;

use thiserror::Error;

use crate::core::MapElement;

pub use json::{
    parse_json, JsonEdge, JsonGrid, JsonHeader, JsonLayer, JsonNode, JsonVector, MapExport,
    JSON_EXTENSION,
};

/// Fehler eines Format-Parsers.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Ungültiges JSON
    #[error("Ungueltiges JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Daten sind kein gültiger Text
    #[error("Ungueltige Zeichenkodierung: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    /// Sonstiger Formatfehler
    #[error("{0}")]
    Invalid(String),
}

/// Parser für ein Kartenformat.
///
/// Jedes gefundene Element wird sofort an `sink` übergeben. Jede Funktion
/// `Fn(&[u8], &mut dyn FnMut(MapElement)) -> Result<(), ParseError>` ist ein Parser.
pub trait MapParser {
    /// Parst `raw` und meldet alle Elemente an `sink`.
    fn parse(&self, raw: &[u8], sink: &mut dyn FnMut(MapElement)) -> Result<(), ParseError>;
}

impl<F> MapParser for F
where
    F: Fn(&[u8], &mut dyn FnMut(MapElement)) -> Result<(), ParseError>,
{
    fn parse(&self, raw: &[u8], sink: &mut dyn FnMut(MapElement)) -> Result<(), ParseError> {
        self(raw, sink)
    }
}
