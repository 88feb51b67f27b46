//! signalhaus-auth – Konto-Service
//!
//! Registrierung und Anmeldung von Benutzern auf Basis des
//! verschluesselten Stores. Passwoerter werden mit Argon2id und
//! benutzereigenem Salt gehasht; die Verifikation laeuft in
//! konstanter Zeit ueber den Argon2-Verifier.

pub mod error;
pub mod passwort;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use service::KontoService;
