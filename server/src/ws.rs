//! WebSocket-Endpunkt fuer das Signaling
//!
//! Jede Verbindung bekommt beim Upgrade eine frische `VerbindungsId`
//! und als erstes Event ihre eigene ID (`assigned_id`). Danach pumpt
//! eine Schleife eingehende JSON-Nachrichten in den Router und die
//! Event-Queue der Registry zurueck auf den Socket.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};

use signalhaus_core::VerbindungsId;
use signalhaus_protocol::{SignalEvent, SignalNachricht};

use crate::AppZustand;

/// GET /ws
pub async fn ws_handler(State(zustand): State<AppZustand>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| verbindung_verarbeiten(socket, zustand))
}

/// Lebenszyklus einer WebSocket-Verbindung
async fn verbindung_verarbeiten(mut socket: WebSocket, zustand: AppZustand) {
    let id = VerbindungsId::neu();
    let registry = zustand.router.registry();
    let mut ereignisse = registry.verbinden(id);
    registry.senden_an(&id, SignalEvent::AssignedId { id });

    tracing::info!(verbindung = %id, "WebSocket verbunden");

    loop {
        tokio::select! {
            eingehend = socket.recv() => match eingehend {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<SignalNachricht>(&text) {
                        Ok(nachricht) => zustand.router.verarbeiten(id, nachricht).await,
                        Err(e) => {
                            tracing::warn!(verbindung = %id, fehler = %e, "Unlesbare Nachricht verworfen");
                        }
                    }
                }
                // Ping/Pong beantwortet Axum selbst, Binaernachrichten kennt
                // das Protokoll nicht
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(verbindung = %id, fehler = %e, "WebSocket-Fehler");
                    break;
                }
            },
            event = ereignisse.recv() => match event {
                Some(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(t) => t,
                        Err(e) => {
                            tracing::error!(verbindung = %id, fehler = %e, "Event nicht serialisierbar");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                // Registry hat die Verbindung entfernt
                None => break,
            },
        }
    }

    zustand.router.trennen(id);
    tracing::info!(verbindung = %id, "WebSocket getrennt");
}
