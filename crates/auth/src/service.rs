//! Konto-Service – Registrierung und Anmeldung
//!
//! Jede Operation ist ein vollstaendiger Store-Zyklus; Mutationen laufen
//! durch `DateiStore::aendern` und sind damit gegen parallele Schreiber
//! serialisiert.

use std::sync::Arc;

use chrono::Utc;
use signalhaus_store::{BenutzerRecord, DateiStore};

use crate::error::{AuthError, AuthResult};
use crate::passwort::{passwort_hashen, passwort_verifizieren};

/// Konto-Service auf Basis des verschluesselten Stores
pub struct KontoService {
    store: Arc<DateiStore>,
}

impl KontoService {
    /// Erstellt einen neuen KontoService
    pub fn neu(store: Arc<DateiStore>) -> Self {
        Self { store }
    }

    /// Registriert einen neuen Benutzer
    ///
    /// Schlaegt mit `BenutzerVergeben` fehl wenn der Name bereits
    /// existiert; der bestehende Datensatz bleibt dann unveraendert.
    pub async fn registrieren(&self, benutzername: &str, passwort: &str) -> AuthResult<()> {
        // Hashing ausserhalb des Schreib-Locks, das Duplikat wird in der
        // Closure unter dem Lock geprueft
        let passwort_hash = passwort_hashen(passwort)?;
        let name = benutzername.to_string();

        self.store
            .aendern(move |db| {
                if db.benutzer.contains_key(&name) {
                    return Err(AuthError::BenutzerVergeben(name));
                }
                db.benutzer.insert(
                    name,
                    BenutzerRecord {
                        passwort_hash,
                        erstellt_am: Utc::now(),
                    },
                );
                Ok(())
            })
            .await?;

        tracing::info!(benutzername, "Neuer Benutzer registriert");
        Ok(())
    }

    /// Prueft Benutzername und Passwort
    ///
    /// Ein unbekannter Benutzername ist ein normales negatives Ergebnis
    /// (`Ok(false)`), kein Fehler.
    pub async fn anmelden(&self, benutzername: &str, passwort: &str) -> AuthResult<bool> {
        let db = self.store.laden().await?;

        let Some(benutzer) = db.benutzer.get(benutzername) else {
            // Gleiche Arbeit wie im Treffer-Fall, sonst laesst sich der
            // Benutzername an der Antwortzeit ablesen
            let _ = passwort_verifizieren(passwort, crate::passwort::PLATZHALTER_HASH);
            return Ok(false);
        };

        let korrekt = passwort_verifizieren(passwort, &benutzer.passwort_hash)?;
        if !korrekt {
            tracing::warn!(benutzername, "Fehlgeschlagener Anmeldeversuch");
        }
        Ok(korrekt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use signalhaus_crypto::Schluessel;

    fn test_service(dir: &tempfile::TempDir) -> KontoService {
        let store = DateiStore::neu(
            dir.path().join("data.json"),
            Schluessel::aus_bytes(&[5u8; 32]).unwrap(),
        );
        KontoService::neu(Arc::new(store))
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let dir = tempfile::tempdir().unwrap();
        let konten = test_service(&dir);

        konten.registrieren("bob", "secret").await.unwrap();

        assert!(konten.anmelden("bob", "secret").await.unwrap());
        assert!(!konten.anmelden("bob", "wrong").await.unwrap());
        assert!(!konten.anmelden("nobody", "x").await.unwrap());
    }

    #[tokio::test]
    async fn duplikat_wird_abgelehnt_und_hash_bleibt() {
        let dir = tempfile::tempdir().unwrap();
        let konten = test_service(&dir);

        konten.registrieren("alice", "p1").await.unwrap();

        let zweiter = konten.registrieren("alice", "p2").await;
        assert!(matches!(zweiter, Err(AuthError::BenutzerVergeben(n)) if n == "alice"));

        // Das urspruengliche Passwort muss weiterhin gelten
        assert!(konten.anmelden("alice", "p1").await.unwrap());
        assert!(!konten.anmelden("alice", "p2").await.unwrap());
    }

    #[tokio::test]
    async fn registrierung_ueberlebt_neustart() {
        let dir = tempfile::tempdir().unwrap();

        test_service(&dir).registrieren("carol", "pw").await.unwrap();

        // Neuer Service auf derselben Datei simuliert einen Prozess-Neustart
        let konten = test_service(&dir);
        assert!(konten.anmelden("carol", "pw").await.unwrap());
    }
}
