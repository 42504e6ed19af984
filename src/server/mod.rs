//! HTTP surface consumed by the display firmware and the web dashboard.
//!
//! Endpoints:
//!   GET  /api/tamagotchi                 → poll (decay, save, describe)
//!   POST /api/tamagotchi/feed?type=      → meal | snack
//!   POST /api/tamagotchi/play
//!   POST /api/tamagotchi/clean?type=     → bath | poop
//!   POST /api/tamagotchi/discipline?type= → scold | praise
//!   POST /api/tamagotchi/cure
//!   POST /api/tamagotchi/reset?name=     → replace the pet
//!   GET  /api/tamagotchi/sprite/:state   → raw RGB565 sprite bytes
//!   GET  /api/metrics                    → counter snapshot
//!   GET  /health                         → liveness check

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::metrics;
use crate::pet::sprite;
use crate::pet::{Action, PetError, VisualState};
use crate::service::{random_source, PetService, ServiceSettings};
use crate::storage::{JsonFileStore, PetRepository};

pub type AppState<R> = Arc<PetService<R>>;

#[derive(Debug, Default, Deserialize)]
pub struct SubtypeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

impl PetError {
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for PetError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("api: {}", self);
        } else {
            debug!("api: rejected request: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the application router around `service`.
pub fn router<R>(service: AppState<R>) -> Router
where
    R: PetRepository + 'static,
{
    Router::new()
        .route("/api/tamagotchi", get(status::<R>))
        .route("/api/tamagotchi/feed", post(feed::<R>))
        .route("/api/tamagotchi/play", post(play::<R>))
        .route("/api/tamagotchi/clean", post(clean::<R>))
        .route("/api/tamagotchi/discipline", post(discipline::<R>))
        .route("/api/tamagotchi/cure", post(cure::<R>))
        .route("/api/tamagotchi/reset", post(reset::<R>))
        .route("/api/tamagotchi/sprite/:state", get(sprite_bytes))
        .route("/api/metrics", get(metrics_snapshot))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Open the data directory, bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let store = JsonFileStore::open(&config.storage.data_dir)
        .with_context(|| format!("opening data dir {}", config.storage.data_dir))?;
    let service = PetService::new(
        store,
        random_source(config.simulation.seed),
        ServiceSettings::from_config(config),
    );
    let app = router(Arc::new(service));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("petdash listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received, stopping server");
            }
        })
        .await
        .context("http server error")?;
    Ok(())
}

async fn status<R: PetRepository + 'static>(State(svc): State<AppState<R>>) -> Response {
    match svc.status(Utc::now()).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn perform<R: PetRepository + 'static>(
    svc: &PetService<R>,
    category: &str,
    subtype: Option<&str>,
) -> Response {
    let action = match Action::parse(category, subtype) {
        Ok(action) => action,
        Err(e) => return e.into_response(),
    };
    match svc.act(action, Utc::now()).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn feed<R: PetRepository + 'static>(
    State(svc): State<AppState<R>>,
    Query(q): Query<SubtypeQuery>,
) -> Response {
    perform(&svc, "feed", q.kind.as_deref()).await
}

async fn play<R: PetRepository + 'static>(State(svc): State<AppState<R>>) -> Response {
    perform(&svc, "play", None).await
}

async fn clean<R: PetRepository + 'static>(
    State(svc): State<AppState<R>>,
    Query(q): Query<SubtypeQuery>,
) -> Response {
    perform(&svc, "clean", q.kind.as_deref()).await
}

async fn discipline<R: PetRepository + 'static>(
    State(svc): State<AppState<R>>,
    Query(q): Query<SubtypeQuery>,
) -> Response {
    perform(&svc, "discipline", q.kind.as_deref()).await
}

async fn cure<R: PetRepository + 'static>(State(svc): State<AppState<R>>) -> Response {
    perform(&svc, "cure", None).await
}

async fn reset<R: PetRepository + 'static>(
    State(svc): State<AppState<R>>,
    Query(q): Query<NameQuery>,
) -> Response {
    match svc.reset(q.name.as_deref(), Utc::now()).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn sprite_bytes(Path(label): Path<String>) -> Response {
    match VisualState::from_str(&label) {
        Ok(state) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            sprite::render(state),
        )
            .into_response(),
        Err(()) => {
            warn!("api: sprite requested for unknown state {:?}", label);
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": format!("unknown state: {}", label) })),
            )
                .into_response()
        }
    }
}

async fn metrics_snapshot() -> impl IntoResponse {
    Json(metrics::snapshot())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339(),
    }))
}
