//! Fehlertypen fuer den Konto-Service

use signalhaus_store::StoreError;
use thiserror::Error;

/// Alle moeglichen Fehler im Konto-Service
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Benutzername bereits vergeben: {0}")]
    BenutzerVergeben(String),

    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    #[error("Store-Fehler: {0}")]
    Store(#[from] StoreError),
}

/// Result-Alias fuer den Konto-Service
pub type AuthResult<T> = Result<T, AuthError>;
