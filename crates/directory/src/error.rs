//! Fehlertypen fuer das Raum-Verzeichnis

use signalhaus_store::StoreError;
use thiserror::Error;

/// Alle moeglichen Fehler im Raum-Verzeichnis
#[derive(Debug, Error)]
pub enum VerzeichnisError {
    #[error("Raum existiert bereits: {0}")]
    RaumVergeben(String),

    #[error("Raum nicht gefunden: {0}")]
    RaumNichtGefunden(String),

    #[error("Benutzer bereits Mitglied des Raums: {0}")]
    BereitsMitglied(String),

    #[error("Store-Fehler: {0}")]
    Store(#[from] StoreError),
}

/// Result-Alias fuer das Raum-Verzeichnis
pub type VerzeichnisResult<T> = Result<T, VerzeichnisError>;
