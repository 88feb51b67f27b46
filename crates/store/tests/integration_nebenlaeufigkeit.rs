//! Integrationstest: parallele Mutationen duerfen keine Updates verlieren
//!
//! Der klassische Lost-Update-Fall: zwei Anfragen laufen gleichzeitig
//! durch Laden-Aendern-Speichern. Ohne Schreib-Lock ueberschreibt die
//! spaetere die fruehere; mit `aendern` muessen beide Ergebnisse im
//! Datenbestand landen.

use chrono::Utc;
use signalhaus_crypto::Schluessel;
use signalhaus_store::{BenutzerRecord, DateiStore, StoreError};
use std::sync::Arc;

#[tokio::test]
async fn parallele_registrierungen_gehen_nicht_verloren() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DateiStore::neu(
        dir.path().join("data.json"),
        Schluessel::aus_bytes(&[9u8; 32]).unwrap(),
    ));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store
                .aendern::<_, StoreError, _>(move |db| {
                    db.benutzer.insert(
                        format!("benutzer{i}"),
                        BenutzerRecord {
                            passwort_hash: "hash".into(),
                            erstellt_am: Utc::now(),
                        },
                    );
                    Ok(())
                })
                .await
        }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let db = store.laden().await.unwrap();
    assert_eq!(db.benutzer.len(), 8, "Jede parallele Mutation muss sichtbar sein");
}

#[tokio::test]
async fn speichern_hinterlaesst_keine_temp_datei() {
    let dir = tempfile::tempdir().unwrap();
    let store = DateiStore::neu(
        dir.path().join("data.json"),
        Schluessel::aus_bytes(&[3u8; 32]).unwrap(),
    );

    store
        .aendern::<_, StoreError, _>(|_| Ok(()))
        .await
        .unwrap();

    let eintraege: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(eintraege, vec!["data.json"], "Temp-Datei muss wegbenannt sein");
}
