//! Draws HTTP API.
//!
//! Serves the persisted snapshot through the core query engine. Every
//! request loads its own copy of the snapshot, so a sync that replaces the
//! file mid-flight never affects a request already in progress.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api` | Endpoint index |
//! | `GET`  | `/api/draws` | Filtered listing (`year`, `category`, `limit`) |
//! | `GET`  | `/api/draws/latest` | Most recent draw |
//! | `GET`  | `/api/draws/stats` | Statistical summary (`year`) |
//! | `GET`  | `/api/draws/{id}` | Draw by round number |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "invalid query input: ..." } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `no_data` (404),
//! `no_snapshot` (404), `internal` (500).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use express_entry_core::models::DrawView;
use express_entry_core::query::{self, DrawList, DrawQuery};
use express_entry_core::stats::{statistics, StatsSummary};
use express_entry_core::store::SnapshotStore;
use express_entry_core::DrawError;

use crate::config::Config;
use crate::draws::load_snapshot;
use crate::storage::FileStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SnapshotStore>,
    upstream_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn SnapshotStore>, upstream_url: impl Into<String>) -> Self {
        Self {
            store,
            upstream_url: upstream_url.into(),
        }
    }
}

/// Starts the HTTP server over the configured snapshot file.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store: Arc<dyn SnapshotStore> = Arc::new(FileStore::from_config(config));
    run_server_with_store(config, store).await
}

/// Starts the HTTP server over an arbitrary snapshot store.
pub async fn run_server_with_store(
    config: &Config,
    store: Arc<dyn SnapshotStore>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(AppState::new(store, config.upstream.url.clone()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "draws API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(handle_index))
        .route("/api/draws", get(handle_list))
        .route("/api/draws/latest", get(handle_latest))
        .route("/api/draws/stats", get(handle_stats))
        .route("/api/draws/{id}", get(handle_get))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DrawError> for AppError {
    fn from(err: DrawError) -> Self {
        let status = match err {
            DrawError::InvalidQueryInput(_) => StatusCode::BAD_REQUEST,
            DrawError::NotFound(_) | DrawError::NoData(_) | DrawError::MissingSnapshot => {
                StatusCode::NOT_FOUND
            }
            DrawError::InvalidUpstreamFormat(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError {
            status,
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DrawError>() {
            Ok(draw_err) => draw_err.into(),
            Err(other) => {
                error!(error = %other, "request failed");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal".to_string(),
                    message: other.to_string(),
                }
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api ============

async fn handle_index(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "IRCC Express Entry Draws API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "RESTful API for Canadian Express Entry draw data",
        "endpoints": {
            "GET /api/draws": {
                "description": "Get all Express Entry draws",
                "parameters": {
                    "year": "Filter by year (e.g., 2025)",
                    "category": "Filter by category (e.g., French, Healthcare, CEC)",
                    "limit": "Limit number of results (positive integer)"
                },
                "example": "/api/draws?year=2025&category=French&limit=10"
            },
            "GET /api/draws/latest": {
                "description": "Get the most recent draw",
                "example": "/api/draws/latest"
            },
            "GET /api/draws/{id}": {
                "description": "Get a specific draw by round number",
                "example": "/api/draws/388"
            },
            "GET /api/draws/stats": {
                "description": "Get statistical summary of all draws",
                "parameters": { "year": "Filter stats by year (optional)" },
                "example": "/api/draws/stats"
            }
        },
        "dataSource": "IRCC Official API",
        "sourceUrl": state.upstream_url,
    }))
}

// ============ GET /api/draws ============

#[derive(Debug, Deserialize)]
struct ListParams {
    year: Option<String>,
    category: Option<String>,
    limit: Option<String>,
}

async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<DrawList>, AppError> {
    let query = DrawQuery::from_params(
        params.year.as_deref(),
        params.category.as_deref(),
        params.limit.as_deref(),
    )?;
    let collection = load_snapshot(state.store.as_ref()).await?;
    Ok(Json(query::list(&collection, &query)))
}

// ============ GET /api/draws/latest ============

async fn handle_latest(State(state): State<AppState>) -> Result<Json<DrawView>, AppError> {
    let collection = load_snapshot(state.store.as_ref()).await?;
    Ok(Json(query::latest(&collection)?.to_view()))
}

// ============ GET /api/draws/{id} ============

async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DrawView>, AppError> {
    let collection = load_snapshot(state.store.as_ref()).await?;
    Ok(Json(query::lookup(&collection, &id)?.to_view()))
}

// ============ GET /api/draws/stats ============

#[derive(Debug, Deserialize)]
struct StatsParams {
    year: Option<String>,
}

async fn handle_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsSummary>, AppError> {
    let collection = load_snapshot(state.store.as_ref()).await?;
    Ok(Json(statistics(&collection, params.year.as_deref())?))
}
