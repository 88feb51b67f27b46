//! signalhaus-protocol – Wire-Format des Signaling-Kanals
//!
//! Definiert die JSON-Nachrichten die ueber die bidirektionale
//! Verbindung laufen. Payloads (SDP-Offers, ICE-Candidates, ...) sind
//! fuer den Server opake JSON-Werte – er routet sie nur.

pub mod signal;

pub use signal::{RelayArt, SignalEvent, SignalNachricht};
