//! Umschlag-Codec – symmetrische Verschluesselung des Datenbank-Dokuments
//!
//! ## Format auf der Platte
//! ```text
//! { "iv": "<hex, 12 Bytes Nonce>", "content": "<hex, Ciphertext + Auth-Tag>" }
//! ```
//!
//! Der `iv` wird bei jedem Verschluesseln frisch aus dem System-RNG
//! gezogen. AES-256-GCM haengt einen 16-Byte-Auth-Tag an den Ciphertext,
//! d.h. manipulierte Bytes fallen beim Entschluesseln auf.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Laenge des Schluessels in Bytes (AES-256)
pub const SCHLUESSEL_LAENGE: usize = 32;

/// Laenge des IV/Nonce in Bytes (GCM)
pub const IV_LAENGE: usize = 12;

// ---------------------------------------------------------------------------
// Schluessel
// ---------------------------------------------------------------------------

/// 32-Byte-Schluessel fuer den Umschlag-Codec
///
/// Wird aus einem Hex-String (64 Zeichen) geparst, wie ihn die
/// Umgebungsvariable liefert. Debug gibt den Schluessel nicht aus.
#[derive(Clone)]
pub struct Schluessel([u8; SCHLUESSEL_LAENGE]);

impl Schluessel {
    /// Parst einen Schluessel aus einem Hex-String
    ///
    /// Schlaegt mit `UngueltigeSchluesselLaenge` fehl wenn die dekodierten
    /// Bytes nicht exakt 32 Bytes ergeben.
    pub fn aus_hex(hex_str: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(hex_str.trim())?;
        Self::aus_bytes(&bytes)
    }

    /// Erstellt einen Schluessel aus rohen Bytes
    pub fn aus_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; SCHLUESSEL_LAENGE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::UngueltigeSchluesselLaenge {
                    erwartet: SCHLUESSEL_LAENGE,
                    erhalten: bytes.len(),
                })?;
        Ok(Self(array))
    }

    fn as_bytes(&self) -> &[u8; SCHLUESSEL_LAENGE] {
        &self.0
    }
}

impl std::fmt::Debug for Schluessel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schluessel([redigiert; {SCHLUESSEL_LAENGE} Bytes])")
    }
}

// ---------------------------------------------------------------------------
// Umschlag
// ---------------------------------------------------------------------------

/// Der persistierte Umschlag: IV und Ciphertext, beide hex-kodiert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Umschlag {
    /// Frischer Nonce dieses Schreibvorgangs (hex, 12 Bytes)
    pub iv: String,
    /// Ciphertext inklusive Auth-Tag (hex)
    pub content: String,
}

// ---------------------------------------------------------------------------
// Codec-Funktionen
// ---------------------------------------------------------------------------

/// Verschluesselt einen Klartext unter dem Schluessel mit frischem IV
pub fn verschluesseln(klartext: &[u8], schluessel: &Schluessel) -> CryptoResult<Umschlag> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(schluessel.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, klartext)
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    Ok(Umschlag {
        iv: hex::encode(nonce),
        content: hex::encode(ciphertext),
    })
}

/// Entschluesselt einen Umschlag und gibt den Klartext zurueck
///
/// Schlaegt fehl bei falschem Schluessel, manipuliertem Ciphertext oder
/// kaputtem Hex – niemals stiller Rueckfall auf einen Default.
pub fn entschluesseln(umschlag: &Umschlag, schluessel: &Schluessel) -> CryptoResult<Vec<u8>> {
    let iv_bytes = hex::decode(&umschlag.iv)?;
    if iv_bytes.len() != IV_LAENGE {
        return Err(CryptoError::UngueltigeIvLaenge {
            erwartet: IV_LAENGE,
            erhalten: iv_bytes.len(),
        });
    }
    let ciphertext = hex::decode(&umschlag.content)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(schluessel.as_bytes()));
    let nonce = Nonce::from_slice(&iv_bytes);

    cipher
        .decrypt(nonce, ciphertext.as_slice())
        .map_err(|e| CryptoError::Entschluesselung(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schluessel() -> Schluessel {
        Schluessel::aus_bytes(&[7u8; 32]).unwrap()
    }

    #[test]
    fn roundtrip() {
        let schluessel = test_schluessel();
        let klartext = br#"{"users":{},"rooms":[]}"#;

        let umschlag = verschluesseln(klartext, &schluessel).unwrap();
        let entschluesselt = entschluesseln(&umschlag, &schluessel).unwrap();

        assert_eq!(entschluesselt, klartext);
    }

    #[test]
    fn frischer_iv_pro_verschluesselung() {
        let schluessel = test_schluessel();
        let klartext = b"identischer Klartext";

        let a = verschluesseln(klartext, &schluessel).unwrap();
        let b = verschluesseln(klartext, &schluessel).unwrap();

        assert_ne!(a.iv, b.iv, "Zwei Schreibvorgaenge muessen frische IVs ziehen");
        assert_ne!(a.content, b.content, "Ciphertext darf nicht verknuepfbar sein");
    }

    #[test]
    fn falscher_schluessel_schlaegt_fehl() {
        let umschlag = verschluesseln(b"geheim", &test_schluessel()).unwrap();
        let anderer = Schluessel::aus_bytes(&[8u8; 32]).unwrap();

        let result = entschluesseln(&umschlag, &anderer);
        assert!(matches!(result, Err(CryptoError::Entschluesselung(_))));
    }

    #[test]
    fn manipulierter_ciphertext_schlaegt_fehl() {
        let schluessel = test_schluessel();
        let mut umschlag = verschluesseln(b"unverfaelscht", &schluessel).unwrap();

        // Erstes Hex-Zeichen kippen
        let ersetzt = if umschlag.content.starts_with('0') { "1" } else { "0" };
        umschlag.content.replace_range(0..1, ersetzt);

        let result = entschluesseln(&umschlag, &schluessel);
        assert!(result.is_err(), "Auth-Tag muss Manipulation erkennen");
    }

    #[test]
    fn schluessel_laenge_wird_geprueft() {
        let result = Schluessel::aus_hex("abcd");
        assert!(matches!(
            result,
            Err(CryptoError::UngueltigeSchluesselLaenge { erwartet: 32, erhalten: 2 })
        ));
    }

    #[test]
    fn schluessel_aus_hex() {
        let hexstr = "00".repeat(32);
        assert!(Schluessel::aus_hex(&hexstr).is_ok());
        assert!(Schluessel::aus_hex("kein-hex").is_err());
    }

    #[test]
    fn kaputter_iv_schlaegt_fehl() {
        let schluessel = test_schluessel();
        let mut umschlag = verschluesseln(b"daten", &schluessel).unwrap();
        umschlag.iv = "0011".to_string();

        let result = entschluesseln(&umschlag, &schluessel);
        assert!(matches!(result, Err(CryptoError::UngueltigeIvLaenge { .. })));
    }

    #[test]
    fn umschlag_serde_format() {
        let umschlag = verschluesseln(b"x", &test_schluessel()).unwrap();
        let json = serde_json::to_value(&umschlag).unwrap();

        assert!(json.get("iv").is_some());
        assert!(json.get("content").is_some());
        assert_eq!(umschlag.iv.len(), IV_LAENGE * 2, "IV ist hex-kodiert");
    }
}
