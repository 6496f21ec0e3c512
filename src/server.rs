//! HTTP service layer.
//!
//! Thin axum wiring over [`ResumeService`]: multipart upload in, JSON
//! records out. All transport concerns (routing, CORS, status mapping)
//! live here; the pipeline and search policy know nothing about HTTP.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/ingest` | Multipart upload (`file` + optional `name`/`resume_type`/`occupation` parts) |
//! | `POST` | `/search` | Query params `name`/`resume_type`/`occupation` |
//! | `GET`  | `/` | Liveness probe |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one JSON shape:
//!
//! ```json
//! { "error": { "code": "unsupported_format", "message": "..." } }
//! ```
//!
//! Extraction problems are client errors (400); encoding and store
//! failures are server errors (500) with a stage-specific code.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser
//! based upload clients.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::extract::ExtractError;
use crate::ingest::IngestError;
use crate::models::{ResumeFields, ResumeRecord, SearchFilter};
use crate::service::ResumeService;

/// Largest accepted upload (multipart body), in bytes.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
struct AppState {
    service: Arc<ResumeService>,
}

/// Starts the HTTP server on the address configured in `[server].bind`.
///
/// Initializes the [`ResumeService`] (opening both stores) and runs until
/// the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(ResumeService::init(config).await?);
    let state = AppState { service };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/ingest", post(handle_ingest))
        .route("/search", post(handle_search))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state);

    tracing::info!(bind = %config.server.bind, "HTTP server listening");
    println!("resume-dock listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"unsupported_format"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
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

fn bad_request(code: &str, message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: code.to_string(),
        message: message.into(),
    }
}

fn internal(code: &str, message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: code.to_string(),
        message: message.into(),
    }
}

/// Maps an ingestion failure to its HTTP representation. The client can
/// fix a bad document; it cannot fix a failing encoder or store.
fn ingest_error_response(err: IngestError) -> AppError {
    let message = err.to_string();
    match err {
        IngestError::Extraction(ExtractError::UnsupportedFormat(_)) => {
            bad_request("unsupported_format", message)
        }
        IngestError::Extraction(_) => bad_request("extraction_failed", message),
        IngestError::Encoding(_) => internal("encoding_failed", message),
        IngestError::IndexWrite(_) => internal("index_write_failed", message),
        IngestError::StoreWrite(_) => internal("store_write_failed", message),
    }
}

// ============ GET / ============

/// Liveness probe; mirrors the health check without version detail.
async fn handle_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "resume-dock running" }))
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

// ============ POST /ingest ============

/// Handler for `POST /ingest`.
///
/// Accepts a multipart form with a required `file` part (bytes + original
/// filename) and optional `name`, `resume_type`, and `occupation` text
/// parts. Returns `201` with the persisted record.
async fn handle_ingest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut fields = ResumeFields::default();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request("bad_multipart", e.to_string()))?
    {
        let part_name = part.name().unwrap_or_default().to_string();
        match part_name.as_str() {
            "file" => {
                let filename = part.file_name().unwrap_or("upload").to_string();
                let bytes = part
                    .bytes()
                    .await
                    .map_err(|e| bad_request("bad_multipart", e.to_string()))?;
                upload = Some((filename, bytes.to_vec()));
            }
            "name" => {
                fields.name = read_text_part(part).await?;
            }
            "resume_type" => {
                fields.resume_type = read_text_part(part).await?;
            }
            "occupation" => {
                fields.occupation = read_text_part(part).await?;
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| bad_request("missing_file", "multipart part 'file' is required"))?;

    tracing::info!(
        filename,
        name = fields.name.as_deref(),
        resume_type = fields.resume_type.as_deref(),
        occupation = fields.occupation.as_deref(),
        "received upload"
    );

    let record = state
        .service
        .ingest(&filename, &bytes, &fields)
        .await
        .map_err(ingest_error_response)?;

    Ok((StatusCode::CREATED, Json(record)))
}

async fn read_text_part(part: axum::extract::multipart::Field<'_>) -> Result<Option<String>, AppError> {
    let text = part
        .text()
        .await
        .map_err(|e| bad_request("bad_multipart", e.to_string()))?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

// ============ POST /search ============

/// Handler for `POST /search`.
///
/// Filters arrive as query parameters, all optional. An empty result set
/// is a `200` with `[]`, never an error.
async fn handle_search(
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    tracing::info!(
        name = filter.name.as_deref(),
        resume_type = filter.resume_type.as_deref(),
        occupation = filter.occupation.as_deref(),
        "search request"
    );

    let results = state
        .service
        .search(&filter)
        .await
        .map_err(|e| internal("search_failed", e.to_string()))?;

    Ok(Json(results))
}
