//! HTTP-Handler fuer Konten und Raum-Verzeichnis
//!
//! Fehlende Felder sind immer 400; ein vergebener Benutzername oder eine
//! vergebene Raum-ID ebenfalls. Interne Fehler (Store, Hashing) werden
//! nie an den Client durchgereicht, nur geloggt.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use signalhaus_auth::AuthError;
use signalhaus_directory::VerzeichnisError;

use crate::AppZustand;

// ---------------------------------------------------------------------------
// Konten
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct KontoBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /register
pub async fn register(State(zustand): State<AppZustand>, Json(body): Json<KontoBody>) -> Response {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad Request" }))).into_response();
    };
    if username.is_empty() || password.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad Request" }))).into_response();
    }

    match zustand.konten.registrieren(&username, &password).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User created successfully" })),
        )
            .into_response(),
        Err(AuthError::BenutzerVergeben(_)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad Request" }))).into_response()
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Registrierung fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

/// POST /login
pub async fn login(State(zustand): State<AppZustand>, Json(body): Json<KontoBody>) -> Response {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad Request" }))).into_response();
    };
    if username.is_empty() || password.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad Request" }))).into_response();
    }

    match zustand.konten.anmelden(&username, &password).await {
        Ok(true) => {
            (StatusCode::OK, Json(json!({ "message": "Login successful" }))).into_response()
        }
        Ok(false) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Anmeldung fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Raum-Verzeichnis
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RaumErstellenBody {
    #[serde(rename = "roomID")]
    pub raum_id: Option<String>,
}

/// POST /create-room
pub async fn create_room(
    State(zustand): State<AppZustand>,
    Json(body): Json<RaumErstellenBody>,
) -> Response {
    let Some(raum_id) = body.raum_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Room ID must not be empty" })),
        )
            .into_response();
    };

    match zustand.verzeichnis.raum_erstellen(&raum_id).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Room created successfully", "roomID": raum_id })),
        )
            .into_response(),
        Err(VerzeichnisError::RaumVergeben(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Room already exists" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(fehler = %e, "Raum anlegen fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

/// GET /rooms
pub async fn rooms(State(zustand): State<AppZustand>) -> Response {
    match zustand.verzeichnis.raeume_auflisten().await {
        Ok(raeume) => (StatusCode::OK, Json(json!({ "rooms": raeume }))).into_response(),
        Err(e) => {
            tracing::error!(fehler = %e, "Raeume auflisten fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}
