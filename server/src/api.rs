//! HTTP-API des Servers
//!
//! Liefert die Status- und Listen-Endpunkte fuer das Frontend:
//! - `GET /api/voip/status`        – Lebenszeichen
//! - `GET /api/voip/rooms`         – alle Zimmer aus dem Verzeichnis
//! - `GET /api/voip/receptionists` – alle Rezeptionisten
//!
//! Der `/health`-Endpunkt kommt aus portier-observability und wird hier
//! in denselben Router gemerged.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use portier_directory::{JsonVerzeichnis, VerzeichnisRepository};
use portier_observability::{health_router, HealthState};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Geteilter Zustand der API-Handler
#[derive(Clone)]
pub struct ApiState {
    pub verzeichnis: JsonVerzeichnis,
    pub health: HealthState,
}

/// Baut den vollstaendigen HTTP-Router (API + Health)
pub fn api_router(state: ApiState, cors_origins: &[String]) -> Router {
    let cors = cors_layer(cors_origins);
    let health = state.health.clone();

    Router::new()
        .route("/api/voip/status", get(status_handler))
        .route("/api/voip/rooms", get(rooms_handler))
        .route("/api/voip/receptionists", get(receptionists_handler))
        .with_state(state)
        .merge(health_router(health))
        .layer(cors)
}

/// CORS-Konfiguration aus der Origin-Liste (leer = alle erlaubt)
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any);
    }
    let erlaubt: Vec<_> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(wert) => Some(wert),
            Err(_) => {
                tracing::warn!(origin = %o, "Ungueltige CORS-Origin ignoriert");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(erlaubt))
        .allow_methods(Any)
}

/// `GET /api/voip/status` – Lebenszeichen im Format des Frontends
async fn status_handler() -> impl IntoResponse {
    Json(json!({
        "message": "VoIP Server is running!",
        "status": "ok"
    }))
}

/// `GET /api/voip/rooms` – alle Zimmer-Datensaetze
async fn rooms_handler(State(state): State<ApiState>) -> impl IntoResponse {
    match state.verzeichnis.alle_zimmer().await {
        Ok(zimmer) => {
            state.health.verzeichnis_status_setzen(true);
            Json(zimmer).into_response()
        }
        Err(e) => verzeichnis_fehler(&state, "Zimmer-Liste nicht lesbar", e),
    }
}

/// `GET /api/voip/receptionists` – alle Rezeptionisten-Datensaetze
async fn receptionists_handler(State(state): State<ApiState>) -> impl IntoResponse {
    match state.verzeichnis.alle_rezeptionisten().await {
        Ok(rezeptionisten) => {
            state.health.verzeichnis_status_setzen(true);
            Json(rezeptionisten).into_response()
        }
        Err(e) => verzeichnis_fehler(&state, "Rezeptionisten-Liste nicht lesbar", e),
    }
}

fn verzeichnis_fehler(
    state: &ApiState,
    meldung: &str,
    fehler: portier_directory::VerzeichnisError,
) -> axum::response::Response {
    tracing::error!(fehler = %fehler, "{meldung}");
    state.health.verzeichnis_status_setzen(false);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": meldung })),
    )
        .into_response()
}
