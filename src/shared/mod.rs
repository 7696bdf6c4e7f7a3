//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Konfiguration, die `app`, `core` und `main` gemeinsam nutzen.

pub mod options;

pub use options::{ConfigError, EditorOptions};
