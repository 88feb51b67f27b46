//! Gemeinsame Identifikationstypen fuer Signalhaus
//!
//! `VerbindungsId` verwendet das Newtype-Pattern um Verwechslungen mit
//! anderen UUID-Werten zur Compilezeit auszuschliessen. Raum-IDs sind
//! vom Client gewaehlte Namen und bleiben deshalb Strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige ID einer aktiven Transport-Verbindung
///
/// Wird beim Verbindungsaufbau serverseitig vergeben und ist nur fuer
/// die Lebensdauer des Prozesses gueltig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerbindungsId(pub Uuid);

impl VerbindungsId {
    /// Erstellt eine neue zufaellige VerbindungsId
    pub fn neu() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for VerbindungsId {
    fn default() -> Self {
        Self::neu()
    }
}

impl std::fmt::Display for VerbindungsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "verbindung:{}", self.0)
    }
}

/// Name eines Raums, vom Client gewaehlt
///
/// Identifiziert sowohl persistierte Raeume im Verzeichnis als auch
/// Live-Raeume in der Session-Registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaumId(pub String);

impl RaumId {
    /// Erstellt eine RaumId aus einem beliebigen String
    pub fn neu(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Gibt den Namen als &str zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RaumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "raum:{}", self.0)
    }
}

impl From<&str> for RaumId {
    fn from(s: &str) -> Self {
        Self::neu(s)
    }
}

impl From<String> for RaumId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbindungs_id_eindeutig() {
        let a = VerbindungsId::neu();
        let b = VerbindungsId::neu();
        assert_ne!(a, b, "Zwei neue VerbindungsIds muessen verschieden sein");
    }

    #[test]
    fn raum_id_display() {
        let id = RaumId::neu("lobby");
        assert_eq!(id.to_string(), "raum:lobby");
        assert_eq!(id.as_str(), "lobby");
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let vid = VerbindungsId::neu();
        let json = serde_json::to_string(&vid).unwrap();
        let vid2: VerbindungsId = serde_json::from_str(&json).unwrap();
        assert_eq!(vid, vid2);

        let rid = RaumId::neu("lobby");
        let json = serde_json::to_string(&rid).unwrap();
        assert_eq!(json, "\"lobby\"", "RaumId serialisiert als nackter String");
        let rid2: RaumId = serde_json::from_str(&json).unwrap();
        assert_eq!(rid, rid2);
    }
}
