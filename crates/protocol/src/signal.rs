//! Signaling-Nachrichten
//!
//! ## Design
//! - Tagged Enums (`"type"`-Feld) fuer typsichere Nachrichtenarten
//! - JSON-Serialisierung via serde (Signaling ist nicht zeitkritisch)
//! - Relay-Payloads bleiben opake `serde_json::Value`s

use serde::{Deserialize, Serialize};
use serde_json::Value;
use signalhaus_core::VerbindungsId;

// ---------------------------------------------------------------------------
// Client -> Server
// ---------------------------------------------------------------------------

/// Eingehende Nachricht eines verbundenen Clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalNachricht {
    /// Einem Raum beitreten
    Join { room: String },
    /// SDP-Offer weiterleiten (gezielt oder an den ganzen Raum)
    Offer {
        room: String,
        #[serde(default)]
        target: Option<VerbindungsId>,
        payload: Value,
    },
    /// SDP-Answer weiterleiten
    Answer {
        room: String,
        #[serde(default)]
        target: Option<VerbindungsId>,
        payload: Value,
    },
    /// ICE-Candidate weiterleiten
    Candidate {
        room: String,
        #[serde(default)]
        target: Option<VerbindungsId>,
        payload: Value,
    },
    /// Freitext-Nachricht an alle anderen Teilnehmer des Raums
    Message { room: String, payload: Value },
}

// ---------------------------------------------------------------------------
// Server -> Client
// ---------------------------------------------------------------------------

/// Ausgehendes Event an einen verbundenen Client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalEvent {
    /// Beim Verbindungsaufbau: die serverseitig vergebene ID
    AssignedId { id: VerbindungsId },
    /// Ein Teilnehmer ist dem eigenen Raum beigetreten
    PeerJoined { id: VerbindungsId },
    /// Ein Teilnehmer hat den eigenen Raum verlassen
    PeerLeft { id: VerbindungsId },
    /// Weitergeleitetes SDP-Offer
    Offer { sender: VerbindungsId, payload: Value },
    /// Weitergeleitete SDP-Answer
    Answer { sender: VerbindungsId, payload: Value },
    /// Weitergeleiteter ICE-Candidate
    Candidate { sender: VerbindungsId, payload: Value },
    /// Weitergeleitete Freitext-Nachricht
    Message { sender: VerbindungsId, payload: Value },
}

/// Art eines Relay-Events (bestimmt den ausgehenden Event-Typ)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayArt {
    Offer,
    Answer,
    Candidate,
    Message,
}

impl RelayArt {
    /// Baut das ausgehende Event mit angehaengtem Absender
    pub fn event(self, sender: VerbindungsId, payload: Value) -> SignalEvent {
        match self {
            Self::Offer => SignalEvent::Offer { sender, payload },
            Self::Answer => SignalEvent::Answer { sender, payload },
            Self::Candidate => SignalEvent::Candidate { sender, payload },
            Self::Message => SignalEvent::Message { sender, payload },
        }
    }
}

impl std::fmt::Display for RelayArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offer => write!(f, "offer"),
            Self::Answer => write!(f, "answer"),
            Self::Candidate => write!(f, "candidate"),
            Self::Message => write!(f, "message"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
