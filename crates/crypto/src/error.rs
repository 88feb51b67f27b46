//! Fehlertypen fuer das Kryptografie-Crate

use thiserror::Error;

/// Fehler beim Ver- oder Entschluesseln des Umschlags
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Ungueltige Schluessel-Laenge: erwartet {erwartet} Bytes, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erwartet: usize, erhalten: usize },

    #[error("Ungueltige IV-Laenge: erwartet {erwartet} Bytes, erhalten {erhalten}")]
    UngueltigeIvLaenge { erwartet: usize, erhalten: usize },

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Entschluesselung fehlgeschlagen: {0}")]
    Entschluesselung(String),

    #[error("Hex-Dekodierung fehlgeschlagen: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Result-Alias fuer das Kryptografie-Crate
pub type CryptoResult<T> = Result<T, CryptoError>;
