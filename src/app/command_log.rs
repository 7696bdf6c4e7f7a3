//! Verlauf ausgeführter Commands (Diagnose, Nachvollziehen von Bedienfolgen).

use super::AppCommand;

/// Speichert ausgeführte Commands in Reihenfolge.
///
/// Kartendaten werden nicht mitgeschrieben; periodische Commands
/// (Frame-Weitergabe, Zeitgeber) erscheinen nicht im Log.
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<AppCommand>,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;
}

impl CommandLog {
    /// Erstellt ein leeres Command-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Begrenzt auf MAX_ENTRIES, ältere Einträge werden verworfen.
    pub fn record(&mut self, command: &AppCommand) {
        let entry = match command {
            AppCommand::PublishFrame | AppCommand::AdvanceTimers { .. } => return,
            AppCommand::LoadMapData { filename, .. } => AppCommand::LoadMapData {
                filename: filename.clone(),
                data: Vec::new(),
            },
            AppCommand::UploadMap { name, .. } => AppCommand::UploadMap {
                name: name.clone(),
                data: Vec::new(),
            },
            other => other.clone(),
        };
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(entry);
    }

    /// Gibt die Anzahl der geloggten Commands zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[AppCommand] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_not_logged() {
        let mut log = CommandLog::new();
        log.record(&AppCommand::LoadMapData {
            filename: "a.json".into(),
            data: vec![1, 2, 3],
        });
        log.record(&AppCommand::PublishFrame);

        assert_eq!(log.len(), 1);
        assert_eq!(
            log.entries()[0],
            AppCommand::LoadMapData {
                filename: "a.json".into(),
                data: Vec::new()
            }
        );
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = CommandLog::new();
        for _ in 0..1001 {
            log.record(&AppCommand::ResetCamera);
        }
        assert_eq!(log.len(), 501);
    }
}
