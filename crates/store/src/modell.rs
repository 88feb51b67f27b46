//! Persistentes Datenmodell
//!
//! Entspricht dem entschluesselten JSON-Dokument auf der Platte:
//! ```text
//! { "users": { "<name>": { "password": "<phc-hash>", ... } },
//!   "rooms": [ { "id": "...", "users": ["..."], ... } ] }
//! ```
//! Feldnamen auf der Platte bleiben englisch (Dateiformat), die
//! Rust-Seite verwendet die ueblichen Bezeichner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ein registrierter Benutzer
///
/// Wird bei der Registrierung erstellt und danach nie mutiert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    /// Argon2id-PHC-Hash des Passworts (inkl. Salt und Parametern)
    #[serde(rename = "password")]
    pub passwort_hash: String,
    /// Zeitpunkt der Registrierung
    #[serde(rename = "created_at", default = "Utc::now")]
    pub erstellt_am: DateTime<Utc>,
}

/// Ein persistierter Raum mit seiner Mitgliederliste
///
/// Mitglieder werden nur angehaengt; ein Leave/Delete existiert im
/// persistierten Modell nicht.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaumRecord {
    /// Eindeutiger Raumname
    pub id: String,
    /// Mitglieder in Beitrittsreihenfolge
    #[serde(rename = "users")]
    pub mitglieder: Vec<String>,
    /// Zeitpunkt der Erstellung
    #[serde(rename = "created_at", default = "Utc::now")]
    pub erstellt_am: DateTime<Utc>,
}

impl RaumRecord {
    /// Erstellt einen neuen Raum ohne Mitglieder
    pub fn neu(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mitglieder: Vec::new(),
            erstellt_am: Utc::now(),
        }
    }
}

/// Das gesamte persistente Dokument
///
/// Genau eine Instanz pro Store-Datei; jede Mutation ist ein
/// vollstaendiges Read-Modify-Write des ganzen Dokuments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Datenbank {
    /// Benutzer, indiziert nach Benutzername
    #[serde(rename = "users", default)]
    pub benutzer: HashMap<String, BenutzerRecord>,
    /// Persistierte Raeume in Erstellungsreihenfolge
    #[serde(rename = "rooms", default)]
    pub raeume: Vec<RaumRecord>,
}

impl Datenbank {
    /// Sucht einen Raum anhand seiner ID
    pub fn raum(&self, id: &str) -> Option<&RaumRecord> {
        self.raeume.iter().find(|r| r.id == id)
    }

    /// Sucht einen Raum anhand seiner ID (mutabel)
    pub fn raum_mut(&mut self, id: &str) -> Option<&mut RaumRecord> {
        self.raeume.iter_mut().find(|r| r.id == id)
    }
}
