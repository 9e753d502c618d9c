// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use upscalex::UploadedFileRef;
use upscalex_api::{
    AddUploadRequest, ApiError, ErrorResponse, JumpRequest, NotificationHub, SessionView,
    SetFieldRequest, SharedDraftStore, StartSessionRequest, WizardConfig, WizardService,
    share_store,
};
use upscalex_persistence::SqliteDraftStore;

/// `UpscaleX` wizard server - HTTP front of the multi-step forms
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` draft database. If not provided, uses an in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Quiet period before edits are saved as a draft, in milliseconds
    #[arg(long, default_value_t = 750)]
    draft_debounce_ms: u64,

    /// Longest wait for the submission backend, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    submission_timeout_ms: u64,

    /// Shortest simulated backend latency, in milliseconds
    #[arg(long, default_value_t = 400)]
    min_latency_ms: u64,

    /// Longest simulated backend latency, in milliseconds
    #[arg(long, default_value_t = 1_200)]
    max_latency_ms: u64,

    /// Probability (0 to 1) that a simulated submission fails
    #[arg(long, default_value_t = 0.0)]
    failure_rate: f64,

    /// Interval between simulated upload progress ticks, in milliseconds
    #[arg(long, default_value_t = 200)]
    upload_tick_ms: u64,
}

impl Args {
    fn wizard_config(&self) -> WizardConfig {
        WizardConfig {
            draft_debounce: Duration::from_millis(self.draft_debounce_ms),
            submission_timeout: Duration::from_millis(self.submission_timeout_ms),
            min_latency: Duration::from_millis(self.min_latency_ms),
            max_latency: Duration::from_millis(self.max_latency_ms),
            failure_rate: self.failure_rate,
            upload_tick: Duration::from_millis(self.upload_tick_ms),
            ..WizardConfig::default()
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The wizard service; it serializes access per session itself.
    service: Arc<WizardService>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The response body.
    body: ErrorResponse,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::SubmissionFailed { .. } => StatusCode::BAD_GATEWAY,
            ApiError::SubmissionTimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            debug!(error = %err, "Request rejected");
        }
        Self {
            status,
            body: ErrorResponse::from(&err),
        }
    }
}

/// Handler for POST `/wizards/{flow}/sessions`.
///
/// Starts a session, resuming its draft when the id has one.
async fn handle_start_session(
    AxumState(app_state): AxumState<AppState>,
    Path(flow): Path<String>,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), HttpError> {
    info!(flow = %flow, session_id = ?req.session_id, "Handling start_session request");
    let view: SessionView = app_state
        .service
        .start_session(&flow, req.session_id, req.hints)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Handler for GET `/sessions/{id}`.
async fn handle_get_session(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, HttpError> {
    Ok(Json(app_state.service.session(&session_id).await?))
}

/// Handler for PUT `/sessions/{id}/fields/{name}`.
async fn handle_set_field(
    AxumState(app_state): AxumState<AppState>,
    Path((session_id, name)): Path<(String, String)>,
    Json(req): Json<SetFieldRequest>,
) -> Result<Json<SessionView>, HttpError> {
    debug!(session_id = %session_id, field = %name, "Handling set_field request");
    Ok(Json(
        app_state
            .service
            .set_field(&session_id, &name, req.value)
            .await?,
    ))
}

/// Handler for DELETE `/sessions/{id}/fields/{name}`.
async fn handle_clear_field(
    AxumState(app_state): AxumState<AppState>,
    Path((session_id, name)): Path<(String, String)>,
) -> Result<Json<SessionView>, HttpError> {
    debug!(session_id = %session_id, field = %name, "Handling clear_field request");
    Ok(Json(
        app_state.service.clear_field(&session_id, &name).await?,
    ))
}

/// Handler for POST `/sessions/{id}/advance`.
async fn handle_advance(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, HttpError> {
    Ok(Json(app_state.service.advance(&session_id).await?))
}

/// Handler for POST `/sessions/{id}/retreat`.
async fn handle_retreat(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, HttpError> {
    Ok(Json(app_state.service.retreat(&session_id).await?))
}

/// Handler for POST `/sessions/{id}/jump`.
async fn handle_jump(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<JumpRequest>,
) -> Result<Json<SessionView>, HttpError> {
    Ok(Json(
        app_state.service.jump_to(&session_id, req.ordinal).await?,
    ))
}

/// Handler for POST `/sessions/{id}/submit`.
///
/// Waits for the backend's answer. A failed attempt leaves the session in
/// its error state; the client may submit again.
async fn handle_submit(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, HttpError> {
    info!(session_id = %session_id, "Handling submit request");
    let view: SessionView = app_state.service.submit(&session_id).await?;
    info!(
        session_id = %session_id,
        reference = ?view.reference,
        "Submission completed"
    );
    Ok(Json(view))
}

/// Handler for DELETE `/sessions/{id}`.
async fn handle_cancel(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    app_state.service.cancel(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/sessions/{id}/uploads`.
async fn handle_add_upload(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<AddUploadRequest>,
) -> Result<(StatusCode, Json<UploadedFileRef>), HttpError> {
    let upload: UploadedFileRef = app_state
        .service
        .add_upload(
            &session_id,
            &req.file_name,
            req.size_bytes,
            req.content_type,
        )
        .await?;
    Ok((StatusCode::ACCEPTED, Json(upload)))
}

/// Handler for DELETE `/sessions/{id}/uploads/{upload_id}`.
async fn handle_remove_upload(
    AxumState(app_state): AxumState<AppState>,
    Path((session_id, upload_id)): Path<(String, String)>,
) -> Result<Json<SessionView>, HttpError> {
    Ok(Json(
        app_state
            .service
            .remove_upload(&session_id, &upload_id)
            .await?,
    ))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/wizards/{flow}/sessions", post(handle_start_session))
        .route("/sessions/{id}", get(handle_get_session))
        .route("/sessions/{id}", delete(handle_cancel))
        .route("/sessions/{id}/fields/{name}", put(handle_set_field))
        .route("/sessions/{id}/fields/{name}", delete(handle_clear_field))
        .route("/sessions/{id}/advance", post(handle_advance))
        .route("/sessions/{id}/retreat", post(handle_retreat))
        .route("/sessions/{id}/jump", post(handle_jump))
        .route("/sessions/{id}/submit", post(handle_submit))
        .route("/sessions/{id}/uploads", post(handle_add_upload))
        .route(
            "/sessions/{id}/uploads/{upload_id}",
            delete(handle_remove_upload),
        )
        .route("/live", get(live::live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing UpscaleX wizard server");

    let config: WizardConfig = args.wizard_config();
    if config.failure_rate > 0.0 {
        warn!(
            failure_rate = config.failure_rate,
            "Simulated submissions will fail at random"
        );
    }

    // Draft storage (in-memory or file-based based on CLI argument)
    let store: SharedDraftStore = if let Some(db_path) = &args.database {
        info!("Using file-based draft database at: {}", db_path);
        share_store(SqliteDraftStore::new_with_file(db_path)?)
    } else {
        info!("Using in-memory draft database");
        share_store(SqliteDraftStore::new_in_memory()?)
    };

    let service: WizardService =
        WizardService::with_simulated_backend(config, store, NotificationHub::new())?;
    let app_state: AppState = AppState {
        service: Arc::new(service),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
