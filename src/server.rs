//! HTTP API server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/upload` | Multipart upload (field `file`) of a `.pdf` deck |
//! | `GET`  | `/analysis/{pitch_id}` | Fetch a stored pitch record |
//! | `GET`  | `/compare?pitch_ids=a,b` | Fetch several records side by side |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Pitch not found" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! Only `[server].frontend_url` is allowed as an origin when set; any origin
//! otherwise.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use pitchlens_core::models::PitchRecord;

use crate::config::{Config, ServerConfig};
use crate::db;
use crate::inference::build_analyzer;
use crate::migrate;
use crate::pipeline::{parse_id_list, Pipeline, PipelineError};
use crate::sqlite_store::SqliteStore;

#[derive(Clone)]
struct AppState {
    pipeline: Pipeline,
}

/// Connect the database, build the model clients, and serve until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;

    let analyzer = build_analyzer(&config.models)?;
    let pipeline = Pipeline::new(Arc::new(SqliteStore::new(pool)), analyzer);
    let app = router(pipeline, &config.server)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(addr = %config.server.bind, "PitchLens API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the API router over an existing pipeline.
pub fn router(pipeline: Pipeline, server: &ServerConfig) -> anyhow::Result<Router> {
    let cors = match &server.frontend_url {
        Some(origin) => CorsLayer::new().allow_origin(
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid server.frontend_url: {}", origin))?,
        ),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(handle_health))
        .route("/upload", post(handle_upload))
        .route("/analysis/{pitch_id}", get(handle_analysis))
        .route("/compare", get(handle_compare))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline }))
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
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

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::UnsupportedFile(_) | PipelineError::Extraction(_) => {
                bad_request(err.to_string())
            }
            PipelineError::NotFound(_) | PipelineError::NoneFound => not_found(err.to_string()),
            PipelineError::Store(e) => {
                error!(error = %e, "store failure");
                internal(format!("Storage error: {}", e))
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /upload ============

/// Reads the multipart `file` field and runs it through the pipeline.
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PitchRecord>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.ends_with(".pdf") {
            return Err(PipelineError::UnsupportedFile(filename).into());
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read upload: {}", e)))?;

        let record = state
            .pipeline
            .process_upload(bytes.to_vec(), &filename)
            .await?;
        return Ok(Json(record));
    }

    Err(bad_request("Missing multipart field: file"))
}

// ============ GET /analysis/{pitch_id} ============

async fn handle_analysis(
    State(state): State<AppState>,
    Path(pitch_id): Path<String>,
) -> Result<Json<PitchRecord>, AppError> {
    Ok(Json(state.pipeline.fetch(&pitch_id).await?))
}

// ============ GET /compare ============

#[derive(Deserialize)]
struct CompareQuery {
    #[serde(default)]
    pitch_ids: String,
}

async fn handle_compare(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<Vec<PitchRecord>>, AppError> {
    let ids = parse_id_list(&query.pitch_ids);
    Ok(Json(state.pipeline.fetch_many(&ids).await?))
}
