//! signalhaus-store – Der verschluesselte Ein-Datei-Store
//!
//! Haelt das gesamte persistente Datenmodell (Benutzer + Raeume) in
//! einem einzigen JSON-Dokument, das bei jedem Zugriff durch den
//! Umschlag-Codec laeuft. Jede Mutation ist ein vollstaendiger
//! Laden-Aendern-Speichern-Zyklus; `DateiStore::aendern` serialisiert
//! alle Schreiber ueber ein Lock, damit keine Updates verloren gehen.

pub mod datei;
pub mod error;
pub mod modell;

pub use datei::DateiStore;
pub use error::{StoreError, StoreResult};
pub use modell::{BenutzerRecord, Datenbank, RaumRecord};
