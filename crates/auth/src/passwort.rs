//! Passwort-Hashing mit Argon2id
//!
//! Jeder Benutzer bekommt ein frisches zufaelliges Salt. Der
//! gespeicherte Wert ist ein PHC-String (Algorithmus, Parameter, Salt
//! und Hash in einem), die Verifikation laeuft konstantzeitig im
//! Verifier.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::AuthError;

/// Argon2id-Parameter gemaess OWASP-Empfehlung
///
/// - Speicher: 19 MiB
/// - Iterationen: 2
/// - Parallelismus: 1
fn argon2_instanz() -> Argon2<'static> {
    let params = Params::new(
        19 * 1024, // m_cost in KiB
        2,         // t_cost
        1,         // p_cost
        None,      // output_len: Standard (32 Bytes)
    )
    .expect("Argon2-Parameter ungueltig");

    Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params)
}

/// PHC-Hash mit denselben Parametern, der zu keinem Passwort passt
///
/// Wird verifiziert wenn der Benutzername unbekannt ist, damit dieser
/// Fall dieselbe Arbeit kostet wie ein falsches Passwort und die
/// Antwortzeit den Benutzernamen nicht verraet.
pub(crate) const PLATZHALTER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hasht ein Passwort mit frischem Salt und gibt den PHC-String zurueck
pub fn passwort_hashen(passwort: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_instanz()
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
///
/// `Ok(false)` bei falschem Passwort; Fehler nur bei kaputtem Hash.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

    match argon2_instanz().verify_password(passwort.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashen_und_verifizieren() {
        let hash = passwort_hashen("sehr-geheim").expect("Hashing fehlgeschlagen");
        assert!(hash.starts_with("$argon2id$"));

        assert!(passwort_verifizieren("sehr-geheim", &hash).unwrap());
        assert!(!passwort_verifizieren("falsch", &hash).unwrap());
    }

    #[test]
    fn gleiche_passwoerter_unterschiedliche_hashes() {
        let a = passwort_hashen("gleich").unwrap();
        let b = passwort_hashen("gleich").unwrap();
        assert_ne!(a, b, "Salz muss pro Benutzer frisch sein");
    }

    #[test]
    fn platzhalter_hash_ist_parsebar_und_passt_nie() {
        // Ein kaputter Platzhalter wuerde den Miss-Fall der Anmeldung
        // zum Fehler statt zu Ok(false) machen
        assert!(!passwort_verifizieren("egal", PLATZHALTER_HASH).unwrap());
        assert!(!passwort_verifizieren("", PLATZHALTER_HASH).unwrap());
    }

    #[test]
    fn kaputtes_hash_format_gibt_fehler() {
        let ergebnis = passwort_verifizieren("egal", "kein-phc-string");
        assert!(matches!(ergebnis, Err(AuthError::PasswortHashing(_))));
    }
}
