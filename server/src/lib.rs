//! signalhaus-server – Bibliotheks-Root
//!
//! Verdrahtet Store, Konto-Service, Raum-Verzeichnis und Signaling-Router
//! zu einem einzelnen Axum-Server mit HTTP-API und WebSocket-Endpunkt.

pub mod config;
pub mod http;
pub mod ws;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use signalhaus_auth::KontoService;
use signalhaus_core::RaumId;
use signalhaus_crypto::Schluessel;
use signalhaus_directory::RaumVerzeichnis;
use signalhaus_signaling::{KatalogError, RaumKatalog, SessionRegistry, SignalingRouter};
use signalhaus_store::DateiStore;

use config::ServerKonfig;

/// Name der Umgebungsvariable mit dem hex-kodierten 32-Byte-Schluessel
pub const SCHLUESSEL_UMGEBUNGSVARIABLE: &str = "SIGNALHAUS_SCHLUESSEL";

/// Geteilter Zustand aller HTTP- und WebSocket-Handler
#[derive(Clone)]
pub struct AppZustand {
    pub konten: Arc<KontoService>,
    pub verzeichnis: Arc<RaumVerzeichnis>,
    pub router: Arc<SignalingRouter<VerzeichnisKatalog>>,
}

/// Bindet das persistierte Raum-Verzeichnis als Katalog an den Router
///
/// Damit sind nur Raeume betretbar die zuvor ueber `/create-room`
/// angelegt wurden.
pub struct VerzeichnisKatalog {
    verzeichnis: Arc<RaumVerzeichnis>,
}

impl VerzeichnisKatalog {
    pub fn neu(verzeichnis: Arc<RaumVerzeichnis>) -> Self {
        Self { verzeichnis }
    }
}

#[async_trait]
impl RaumKatalog for VerzeichnisKatalog {
    async fn existiert(&self, raum_id: &RaumId) -> Result<bool, KatalogError> {
        self.verzeichnis
            .existiert(raum_id.as_str())
            .await
            .map_err(|e| KatalogError(e.to_string()))
    }
}

/// Baut den Axum-Router mit allen Endpunkten
pub fn routen(zustand: AppZustand) -> Router {
    Router::new()
        .route("/register", post(http::register))
        .route("/api/register", post(http::register))
        .route("/login", post(http::login))
        .route("/api/login", post(http::login))
        .route("/create-room", post(http::create_room))
        .route("/rooms", get(http::rooms))
        .route("/ws", get(ws::ws_handler))
        .with_state(zustand)
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub konfig: ServerKonfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(konfig: ServerKonfig) -> Self {
        Self { konfig }
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Schluessel aus der Umgebung lesen
    /// 2. Store und Dienste aufbauen
    /// 3. HTTP-Listener binden und bedienen
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let schluessel_hex = std::env::var(SCHLUESSEL_UMGEBUNGSVARIABLE).with_context(|| {
            format!(
                "{SCHLUESSEL_UMGEBUNGSVARIABLE} ist nicht gesetzt (64 Hex-Zeichen erwartet)"
            )
        })?;
        let schluessel = Schluessel::aus_hex(schluessel_hex.trim())
            .context("Schluessel aus der Umgebung ist unbrauchbar")?;

        let store = Arc::new(DateiStore::neu(&self.konfig.store.pfad, schluessel));
        let konten = Arc::new(KontoService::neu(Arc::clone(&store)));
        let verzeichnis = Arc::new(RaumVerzeichnis::neu(Arc::clone(&store)));
        let katalog = Arc::new(VerzeichnisKatalog::neu(Arc::clone(&verzeichnis)));
        let router = Arc::new(SignalingRouter::neu(SessionRegistry::neu(), katalog));

        let zustand = AppZustand {
            konten,
            verzeichnis,
            router,
        };

        // CORS konfigurieren: entweder spezifische Origins oder Any
        let cors = if self.konfig.netzwerk.cors_origins.is_empty() {
            CorsLayer::permissive()
        } else {
            let origins: Vec<HeaderValue> = self
                .konfig
                .netzwerk
                .cors_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(tower_http::cors::Any)
        };

        let app = routen(zustand)
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        let adresse = self.konfig.http_bind_adresse();
        let listener = tokio::net::TcpListener::bind(&adresse)
            .await
            .with_context(|| format!("Bind auf '{adresse}' fehlgeschlagen"))?;

        tracing::info!(
            server_name = %self.konfig.server.name,
            adresse = %adresse,
            store = %self.konfig.store.pfad,
            "Server gestartet"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server beendet");
        Ok(())
    }
}

/// Wartet auf Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Shutdown-Signal nicht abonnierbar");
    } else {
        tracing::info!("Shutdown-Signal empfangen");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
