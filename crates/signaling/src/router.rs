//! Signaling-Router – verarbeitet eingehende Nachrichten einer Verbindung
//!
//! Der Router ist zustandslos; aller Live-Zustand liegt in der
//! `SessionRegistry`. Fehlerhafte Nachrichten eines Clients sind
//! Diagnosen und werden verworfen – sie duerfen andere Verbindungen
//! nie beeintraechtigen.

use std::sync::Arc;

use signalhaus_core::{RaumId, VerbindungsId};
use signalhaus_protocol::{RelayArt, SignalNachricht};

use crate::katalog::RaumKatalog;
use crate::registry::SessionRegistry;

/// Router fuer Signaling-Nachrichten
///
/// Generisch ueber den `RaumKatalog`, der beim Join die Raum-Existenz
/// beantwortet (im Server: das persistierte Verzeichnis).
pub struct SignalingRouter<K: RaumKatalog> {
    registry: SessionRegistry,
    katalog: Arc<K>,
}

impl<K: RaumKatalog> SignalingRouter<K> {
    /// Erstellt einen neuen Router
    pub fn neu(registry: SessionRegistry, katalog: Arc<K>) -> Self {
        Self { registry, katalog }
    }

    /// Gibt die zugrundeliegende Registry zurueck
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Verarbeitet eine eingehende Nachricht einer Verbindung
    pub async fn verarbeiten(&self, absender: VerbindungsId, nachricht: SignalNachricht) {
        match nachricht {
            SignalNachricht::Join { room } => {
                self.beitreten(absender, RaumId::from(room)).await;
            }
            SignalNachricht::Offer { room, target, payload } => {
                self.registry
                    .relay(&RaumId::from(room), absender, RelayArt::Offer, target, payload);
            }
            SignalNachricht::Answer { room, target, payload } => {
                self.registry
                    .relay(&RaumId::from(room), absender, RelayArt::Answer, target, payload);
            }
            SignalNachricht::Candidate { room, target, payload } => {
                self.registry
                    .relay(&RaumId::from(room), absender, RelayArt::Candidate, target, payload);
            }
            SignalNachricht::Message { room, payload } => {
                self.registry
                    .relay(&RaumId::from(room), absender, RelayArt::Message, None, payload);
            }
        }
    }

    /// Behandelt das Ende einer Verbindung (idempotent)
    pub fn trennen(&self, id: VerbindungsId) {
        self.registry.trennen(id);
    }

    /// Join mit Existenzpruefung gegen den Katalog
    ///
    /// Nur Raeume die der Katalog kennt sind betretbar; alles andere
    /// ist eine Diagnose und das Event wird verworfen.
    async fn beitreten(&self, absender: VerbindungsId, raum_id: RaumId) {
        match self.katalog.existiert(&raum_id).await {
            Ok(true) => {
                self.registry.beitreten(&raum_id, absender);
            }
            Ok(false) => {
                tracing::warn!(raum = %raum_id, verbindung = %absender, "Join in unbekannten Raum verworfen");
            }
            Err(e) => {
                tracing::error!(raum = %raum_id, verbindung = %absender, fehler = %e, "Katalog-Abfrage fehlgeschlagen, Join verworfen");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
