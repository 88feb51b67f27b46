//! RaumKatalog – Existenzpruefung fuer Raeume beim Join
//!
//! Entkoppelt den Router von der konkreten Raum-Quelle: der Server
//! bindet hier das persistierte Verzeichnis an, Tests verwenden den
//! `OffenerKatalog`.

use async_trait::async_trait;
use signalhaus_core::RaumId;
use thiserror::Error;

/// Fehler bei der Katalog-Abfrage (z.B. Store nicht lesbar)
#[derive(Debug, Error)]
#[error("Katalog-Abfrage fehlgeschlagen: {0}")]
pub struct KatalogError(pub String);

/// Quelle der Wahrheit fuer Raum-Existenz
#[async_trait]
pub trait RaumKatalog: Send + Sync {
    /// Prueft ob der Raum betreten werden darf
    async fn existiert(&self, raum_id: &RaumId) -> Result<bool, KatalogError>;
}

/// Katalog der jeden Raum zulaesst
///
/// Fuer Tests und Betrieb ohne persistiertes Verzeichnis.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffenerKatalog;

#[async_trait]
impl RaumKatalog for OffenerKatalog {
    async fn existiert(&self, _raum_id: &RaumId) -> Result<bool, KatalogError> {
        Ok(true)
    }
}
