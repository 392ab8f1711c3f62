//! HTTP API server
//!
//! Thin JSON layer over [`Tracker`]. Store work runs on the blocking pool;
//! failures become a generic 500 without internal detail.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use meatbar_core::config::ServerConfig;
use meatbar_core::{EventStore, Tracker};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnFailure, TraceLayer},
};
use tracing::{info, Level};

const MISSING_FIELDS: &str = "Missing required fields: person_name, type, eaten_at";

/// Shared handler state
struct AppState<S> {
    tracker: Arc<Tracker<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tracker: self.tracker.clone(),
        }
    }
}

/// Error returned by handlers
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Internal,
}

impl From<meatbar_core::Error> for ApiError {
    fn from(err: meatbar_core::Error) -> Self {
        if err.is_validation() {
            ApiError::BadRequest(err.to_string())
        } else {
            // Already logged by the tracker
            ApiError::Internal
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// POST body for a new consumption; every field is checked by hand
#[derive(Debug, Deserialize)]
struct CreateConsumption {
    person_name: Option<String>,
    #[serde(rename = "type")]
    bar_type: Option<String>,
    eaten_at: Option<String>,
}

/// Build the API router
fn build_router<S: EventStore + 'static>(tracker: Arc<Tracker<S>>) -> Router {
    let state = AppState { tracker };

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/people", get(list_people_handler::<S>))
        .route(
            "/api/v1/consumptions",
            get(list_consumptions_handler::<S>).post(create_consumption_handler::<S>),
        )
        .route("/api/v1/analytics/streaks", get(streaks_handler::<S>))
        .route(
            "/api/v1/analytics/monthly-most",
            get(monthly_most_handler::<S>),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        // 5xx causes are logged where they are detected
        .layer(
            TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
        )
}

/// Serve the API until Ctrl-C
pub async fn serve<S: EventStore + 'static>(
    tracker: Tracker<S>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let router = build_router(Arc::new(tracker));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;

    let addr = listener.local_addr()?;
    info!("Server is running on http://{}", addr);
    println!("Server is running on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Run a tracker call on the blocking pool
async fn run_blocking<S, T, F>(tracker: Arc<Tracker<S>>, f: F) -> Result<T, ApiError>
where
    S: EventStore + 'static,
    T: Send + 'static,
    F: FnOnce(&Tracker<S>) -> meatbar_core::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&tracker))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Blocking task failed");
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_people_handler<S: EventStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError> {
    let people = run_blocking(state.tracker, |t| t.list_people()).await?;
    Ok(Json(people))
}

async fn list_consumptions_handler<S: EventStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = run_blocking(state.tracker, |t| t.list_events()).await?;
    Ok(Json(events))
}

async fn create_consumption_handler<S: EventStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<CreateConsumption>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::BadRequest(MISSING_FIELDS.to_string()))?;

    let (person_name, bar_type, eaten_at) = match (body.person_name, body.bar_type, body.eaten_at)
    {
        (Some(p), Some(t), Some(e))
            if !p.trim().is_empty() && !t.trim().is_empty() && !e.trim().is_empty() =>
        {
            (p, t, e)
        }
        _ => return Err(ApiError::BadRequest(MISSING_FIELDS.to_string())),
    };

    let created = run_blocking(state.tracker, move |t| {
        t.record_consumption(&person_name, &bar_type, &eaten_at)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn streaks_handler<S: EventStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError> {
    let streaks = run_blocking(state.tracker, |t| t.detect_streaks()).await?;
    Ok(Json(streaks))
}

async fn monthly_most_handler<S: EventStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError> {
    let peaks = run_blocking(state.tracker, |t| t.monthly_most_eaten()).await?;
    Ok(Json(peaks))
}
