//! Fehlertypen fuer das Store-Crate

use signalhaus_crypto::CryptoError;
use thiserror::Error;

/// Fehler beim Laden oder Speichern des Datenbestands
///
/// Wird dem Aufrufer gemeldet und bricht die angefragte Operation ab.
/// Ein kaputter Datenbestand faellt niemals still auf ein leeres
/// Dokument zurueck – das wuerde Daten verlieren.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entschluesselung des Datenbestands fehlgeschlagen: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Datenbestand nicht parsebar: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result-Alias fuer das Store-Crate
pub type StoreResult<T> = Result<T, StoreError>;
