//! Signalhaus Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use signalhaus_server::{config::ServerKonfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let konfig_pfad =
        std::env::var("SIGNALHAUS_CONFIG").unwrap_or_else(|_| "config.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let konfig = ServerKonfig::laden(&konfig_pfad)?;

    // Logging initialisieren
    logging_initialisieren(&konfig.logging.level, &konfig.logging.format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %konfig_pfad,
        "Signalhaus Server wird initialisiert"
    );

    // Server starten
    let server = Server::neu(konfig);
    server.starten().await?;

    Ok(())
}

/// Initialisiert tracing-subscriber mit dem konfigurierten Level und Format
fn logging_initialisieren(level: &str, format: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}
