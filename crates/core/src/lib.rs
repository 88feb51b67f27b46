//! signalhaus-core – Gemeinsame Typen fuer alle Signalhaus-Crates

pub mod types;

pub use types::{RaumId, VerbindungsId};
