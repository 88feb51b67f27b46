//! signalhaus-crypto – Verschluesselung des persistenten Datenbank-Umschlags
//!
//! Kapselt das symmetrische Ver- und Entschluesseln des auf der Platte
//! liegenden JSON-Dokuments. Jeder Schreibvorgang erzeugt einen frischen
//! zufaelligen IV, sodass aufeinanderfolgende Speicherstaende nicht
//! verknuepfbar sind. AES-256-GCM liefert zusaetzlich einen Auth-Tag:
//! manipulierte oder mit falschem Schluessel geschriebene Dateien
//! schlagen beim Entschluesseln fehl statt Muell zu liefern.

pub mod codec;
pub mod error;

pub use codec::{entschluesseln, verschluesseln, Schluessel, Umschlag};
pub use error::{CryptoError, CryptoResult};
