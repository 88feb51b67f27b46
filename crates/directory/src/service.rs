//! Raum-Verzeichnis – Anlegen, Beitreten, Auflisten persistierter Raeume

use std::sync::Arc;

use signalhaus_store::{DateiStore, RaumRecord};

use crate::error::{VerzeichnisError, VerzeichnisResult};

/// Verzeichnis der persistierten Raeume
pub struct RaumVerzeichnis {
    store: Arc<DateiStore>,
}

impl RaumVerzeichnis {
    /// Erstellt ein neues RaumVerzeichnis
    pub fn neu(store: Arc<DateiStore>) -> Self {
        Self { store }
    }

    /// Legt einen neuen Raum an
    ///
    /// Schlaegt mit `RaumVergeben` fehl wenn die ID bereits existiert.
    pub async fn raum_erstellen(&self, raum_id: &str) -> VerzeichnisResult<()> {
        let id = raum_id.to_string();
        self.store
            .aendern(move |db| {
                if db.raum(&id).is_some() {
                    return Err(VerzeichnisError::RaumVergeben(id));
                }
                db.raeume.push(RaumRecord::neu(id));
                Ok(())
            })
            .await?;

        tracing::info!(raum_id, "Raum angelegt");
        Ok(())
    }

    /// Haengt einen Benutzer an die Mitgliederliste eines Raums an
    pub async fn mitglied_hinzufuegen(
        &self,
        raum_id: &str,
        benutzername: &str,
    ) -> VerzeichnisResult<()> {
        let id = raum_id.to_string();
        let name = benutzername.to_string();
        self.store
            .aendern(move |db| {
                let Some(raum) = db.raum_mut(&id) else {
                    return Err(VerzeichnisError::RaumNichtGefunden(id));
                };
                if raum.mitglieder.iter().any(|m| m == &name) {
                    return Err(VerzeichnisError::BereitsMitglied(name));
                }
                raum.mitglieder.push(name);
                Ok(())
            })
            .await?;

        tracing::debug!(raum_id, benutzername, "Mitglied hinzugefuegt");
        Ok(())
    }

    /// Gibt alle persistierten Raeume zurueck (leer ist kein Fehler)
    pub async fn raeume_auflisten(&self) -> VerzeichnisResult<Vec<RaumRecord>> {
        let db = self.store.laden().await?;
        Ok(db.raeume)
    }

    /// Prueft ob ein Raum im Verzeichnis existiert
    pub async fn existiert(&self, raum_id: &str) -> VerzeichnisResult<bool> {
        let db = self.store.laden().await?;
        Ok(db.raum(raum_id).is_some())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use signalhaus_crypto::Schluessel;

    fn test_verzeichnis(dir: &tempfile::TempDir) -> RaumVerzeichnis {
        let store = DateiStore::neu(
            dir.path().join("data.json"),
            Schluessel::aus_bytes(&[6u8; 32]).unwrap(),
        );
        RaumVerzeichnis::neu(Arc::new(store))
    }

    #[tokio::test]
    async fn raum_erstellen_und_auflisten() {
        let dir = tempfile::tempdir().unwrap();
        let verzeichnis = test_verzeichnis(&dir);

        assert!(verzeichnis.raeume_auflisten().await.unwrap().is_empty());

        verzeichnis.raum_erstellen("lobby").await.unwrap();
        verzeichnis.raum_erstellen("technik").await.unwrap();

        let raeume = verzeichnis.raeume_auflisten().await.unwrap();
        assert_eq!(raeume.len(), 2);
        assert_eq!(raeume[0].id, "lobby");
        assert!(verzeichnis.existiert("lobby").await.unwrap());
        assert!(!verzeichnis.existiert("unbekannt").await.unwrap());
    }

    #[tokio::test]
    async fn doppelter_raum_wird_abgelehnt() {
        let dir = tempfile::tempdir().unwrap();
        let verzeichnis = test_verzeichnis(&dir);

        verzeichnis.raum_erstellen("lobby").await.unwrap();
        let zweiter = verzeichnis.raum_erstellen("lobby").await;
        assert!(matches!(zweiter, Err(VerzeichnisError::RaumVergeben(id)) if id == "lobby"));
    }

    #[tokio::test]
    async fn mitglied_hinzufuegen() {
        let dir = tempfile::tempdir().unwrap();
        let verzeichnis = test_verzeichnis(&dir);

        verzeichnis.raum_erstellen("lobby").await.unwrap();
        verzeichnis.mitglied_hinzufuegen("lobby", "alice").await.unwrap();
        verzeichnis.mitglied_hinzufuegen("lobby", "bob").await.unwrap();

        let raeume = verzeichnis.raeume_auflisten().await.unwrap();
        assert_eq!(raeume[0].mitglieder, vec!["alice", "bob"], "Beitrittsreihenfolge");
    }

    #[tokio::test]
    async fn mitglied_fehlschlaege() {
        let dir = tempfile::tempdir().unwrap();
        let verzeichnis = test_verzeichnis(&dir);

        let fehlt = verzeichnis.mitglied_hinzufuegen("fehlt", "alice").await;
        assert!(matches!(fehlt, Err(VerzeichnisError::RaumNichtGefunden(_))));

        verzeichnis.raum_erstellen("lobby").await.unwrap();
        verzeichnis.mitglied_hinzufuegen("lobby", "alice").await.unwrap();

        let doppelt = verzeichnis.mitglied_hinzufuegen("lobby", "alice").await;
        assert!(matches!(doppelt, Err(VerzeichnisError::BereitsMitglied(_))));
    }
}
