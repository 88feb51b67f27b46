//! signalhaus-signaling – Live-Routing der Signaling-Events
//!
//! ## Architektur
//!
//! ```text
//! Transport (WebSocket, pro Verbindung ein Task)
//!     |
//!     v
//! SignalingRouter        – validiert Nachrichten, prueft Raum-Existenz
//!     |                    (RaumKatalog), entscheidet das Fan-out
//!     v
//! SessionRegistry        – Live-Raeume + Sende-Queues aller Clients;
//!                          Mutation und Zustellung eines Events bilden
//!                          eine kritische Sektion pro Raum
//! ```
//!
//! Die Registry ist reiner Prozesszustand: sie entsteht leer bei jedem
//! Start und wird ausschliesslich durch Join/Disconnect-Events gefuellt.
//! Persistierte Raeume (signalhaus-directory) liefern nur die Antwort
//! auf die Frage "darf dieser Raum betreten werden".

pub mod katalog;
pub mod registry;
pub mod router;

pub use katalog::{KatalogError, OffenerKatalog, RaumKatalog};
pub use registry::SessionRegistry;
pub use router::SignalingRouter;
