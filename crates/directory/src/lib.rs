//! signalhaus-directory – Persistiertes Raum-Verzeichnis
//!
//! Das Verzeichnis ist die Quelle der Wahrheit fuer Raum-Existenz:
//! Raeume werden hier angelegt und ueberleben Neustarts. Die
//! Live-Teilnahme (wer ist gerade verbunden) verwaltet die
//! Session-Registry im Signaling-Crate; beide Modelle teilen nur die
//! Raum-ID.

pub mod error;
pub mod service;

pub use error::{VerzeichnisError, VerzeichnisResult};
pub use service::RaumVerzeichnis;
