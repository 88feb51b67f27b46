//! DateiStore – atomarer, verschluesselter Dateizugriff
//!
//! ## Zugriffsdisziplin
//! - `laden` liest und entschluesselt das gesamte Dokument.
//! - `speichern` schreibt in eine Temp-Datei im selben Verzeichnis und
//!   benennt sie atomar um – ein mitten im Schreiben gekillter Prozess
//!   hinterlaesst nie einen halben Datenbestand.
//! - `aendern` ist der einzige Mutationspfad: ein Lock ueber die ganze
//!   Laden-Aendern-Speichern-Spanne verhindert verlorene Updates bei
//!   parallelen Anfragen.

use std::path::{Path, PathBuf};

use signalhaus_crypto::{entschluesseln, verschluesseln, Schluessel, Umschlag};
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::modell::Datenbank;

/// Der Ein-Datei-Store
pub struct DateiStore {
    pfad: PathBuf,
    schluessel: Schluessel,
    /// Serialisiert alle Schreiber (Laden-Aendern-Speichern als Einheit)
    schreib_lock: Mutex<()>,
}

impl DateiStore {
    /// Erstellt einen Store fuer die angegebene Datei
    ///
    /// Die Datei muss nicht existieren; der erste `laden`-Aufruf liefert
    /// dann ein leeres Dokument (Erststart-Bootstrap).
    pub fn neu(pfad: impl Into<PathBuf>, schluessel: Schluessel) -> Self {
        Self {
            pfad: pfad.into(),
            schluessel,
            schreib_lock: Mutex::new(()),
        }
    }

    /// Gibt den Pfad der Store-Datei zurueck
    pub fn pfad(&self) -> &Path {
        &self.pfad
    }

    /// Laedt und entschluesselt das gesamte Dokument
    ///
    /// Fehlende Datei -> leere Datenbank. Alle anderen Fehler (IO,
    /// Entschluesselung, Parsen) werden dem Aufrufer gemeldet.
    pub async fn laden(&self) -> StoreResult<Datenbank> {
        let inhalt = match tokio::fs::read(&self.pfad).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(pfad = %self.pfad.display(), "Store-Datei fehlt, leere Datenbank");
                return Ok(Datenbank::default());
            }
            Err(e) => return Err(e.into()),
        };

        let umschlag: Umschlag = serde_json::from_slice(&inhalt)?;
        let klartext = entschluesseln(&umschlag, &self.schluessel)?;
        let db: Datenbank = serde_json::from_slice(&klartext)?;
        Ok(db)
    }

    /// Verschluesselt und speichert das Dokument atomar
    pub async fn speichern(&self, db: &Datenbank) -> StoreResult<()> {
        let _guard = self.schreib_lock.lock().await;
        self.speichern_intern(db).await
    }

    /// Fuehrt eine Mutation unter dem Schreib-Lock aus
    ///
    /// Laedt das Dokument, wendet die Closure an und speichert nur bei
    /// `Ok`. Bricht die Closure mit einem Fehler ab, bleibt die Datei
    /// unveraendert.
    pub async fn aendern<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Datenbank) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.schreib_lock.lock().await;
        let mut db = self.laden().await?;
        let ergebnis = f(&mut db)?;
        self.speichern_intern(&db).await?;
        Ok(ergebnis)
    }

    /// Schreibpfad ohne Lock – Aufrufer haelt das Schreib-Lock bereits
    async fn speichern_intern(&self, db: &Datenbank) -> StoreResult<()> {
        let klartext = serde_json::to_vec(db)?;
        let umschlag = verschluesseln(&klartext, &self.schluessel)?;
        let inhalt = serde_json::to_vec(&umschlag)?;

        let temp_pfad = self.pfad.with_extension("tmp");
        tokio::fs::write(&temp_pfad, &inhalt).await?;
        tokio::fs::rename(&temp_pfad, &self.pfad).await?;

        tracing::debug!(
            pfad = %self.pfad.display(),
            benutzer = db.benutzer.len(),
            raeume = db.raeume.len(),
            "Datenbestand gespeichert"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
