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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use lead_rotation::RetryPolicy;
use lead_rotation_api::{
    AgentInfo, ApiError, ApiResult, AssignLeadRequest, AssignLeadResponse,
    AssignmentCountsResponse, LeadInfo, ListAgentsResponse, ListLeadsResponse, NextUpResponse,
    RecentLogsResponse, SetActiveRequest, SetDutyRequest, SetPositionRequest, SkipAgentRequest,
    SkipAgentResponse, UpsertAgentRequest, assign_next_lead, clear_agent_snooze,
    fetch_eligible_users, fetch_next_up, fetch_recent_logs, get_assignment_counts, get_lead,
    list_agent_leads, list_agents, set_agent_active, set_agent_on_duty, set_agent_position,
    skip_user_once, upsert_agent, validate_default_snooze,
};
use lead_rotation_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Lead Rotation Server - round-robin lead assignment over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "LEAD_ROTATION_DATABASE")]
    database: Option<String>,

    /// IP address to bind the server to, IPv4 or IPv6
    #[arg(short, long, env = "LEAD_ROTATION_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "LEAD_ROTATION_PORT", default_value_t = 3000)]
    port: u16,

    /// Attempts per assignment or skip before reporting the rotation as busy
    #[arg(long, env = "LEAD_ROTATION_MAX_ATTEMPTS", default_value_t = 5)]
    max_attempts: u32,

    /// Base backoff between conflicting attempts, in milliseconds
    #[arg(long, env = "LEAD_ROTATION_BACKOFF_MS", default_value_t = 10)]
    backoff_ms: u64,

    /// Snooze applied by a skip that does not specify one, in minutes
    #[arg(long, env = "LEAD_ROTATION_DEFAULT_SNOOZE_MINUTES", default_value_t = 30)]
    default_snooze_minutes: u32,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer. Calls block, so handlers run them off the
    /// async workers.
    persistence: Arc<Mutex<Persistence>>,
    /// Snooze length for skips that do not carry one.
    default_snooze_minutes: u32,
}

/// Query parameters for the rotation log.
#[derive(Debug, Deserialize)]
struct LogsQuery {
    /// How many entries to return. Defaults to 10.
    limit: Option<usize>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::NoEligibleAgents => StatusCode::CONFLICT,
            ApiError::TransientConflict { .. } => {
                warn!(error = %err, "Rotation busy");
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Runs a blocking API call against the shared persistence layer.
///
/// Assignments and skips may sleep between retries, so every call runs on
/// the blocking pool rather than an async worker.
async fn with_persistence<T, F>(app_state: &AppState, operation: F) -> Result<Json<T>, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&mut Persistence) -> ApiResult<T> + Send + 'static,
{
    let persistence: Arc<Mutex<Persistence>> = Arc::clone(&app_state.persistence);
    let outcome: ApiResult<T> = tokio::task::spawn_blocking(move || {
        let mut guard = persistence.blocking_lock();
        operation(&mut guard)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Persistence task failed");
        HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Internal error: {e}"),
        }
    })?;

    outcome.map(Json).map_err(HttpError::from)
}

/// Handler for GET `/agents` endpoint.
async fn handle_list_agents(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListAgentsResponse>, HttpError> {
    info!("Handling list_agents request");
    with_persistence(&app_state, list_agents).await
}

/// Handler for POST `/agents` endpoint.
///
/// Creates or replaces an agent.
async fn handle_upsert_agent(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpsertAgentRequest>,
) -> Result<Json<AgentInfo>, HttpError> {
    info!(agent_id = %req.agent_id, position = req.position, "Handling upsert_agent request");
    with_persistence(&app_state, move |p| upsert_agent(p, &req)).await
}

/// Handler for POST `/agents/{agent_id}/duty` endpoint.
async fn handle_set_duty(
    AxumState(app_state): AxumState<AppState>,
    Path(agent_id): Path<String>,
    Json(req): Json<SetDutyRequest>,
) -> Result<Json<AgentInfo>, HttpError> {
    info!(agent_id = %agent_id, on_duty = req.on_duty, "Handling set_duty request");
    with_persistence(&app_state, move |p| set_agent_on_duty(p, &agent_id, req)).await
}

/// Handler for POST `/agents/{agent_id}/active` endpoint.
async fn handle_set_active(
    AxumState(app_state): AxumState<AppState>,
    Path(agent_id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<AgentInfo>, HttpError> {
    info!(agent_id = %agent_id, active = req.active, "Handling set_active request");
    with_persistence(&app_state, move |p| set_agent_active(p, &agent_id, req)).await
}

/// Handler for POST `/agents/{agent_id}/position` endpoint.
async fn handle_set_position(
    AxumState(app_state): AxumState<AppState>,
    Path(agent_id): Path<String>,
    Json(req): Json<SetPositionRequest>,
) -> Result<Json<AgentInfo>, HttpError> {
    info!(agent_id = %agent_id, position = req.position, "Handling set_position request");
    with_persistence(&app_state, move |p| set_agent_position(p, &agent_id, req)).await
}

/// Handler for POST `/agents/{agent_id}/snooze/clear` endpoint.
async fn handle_clear_snooze(
    AxumState(app_state): AxumState<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<AgentInfo>, HttpError> {
    info!(agent_id = %agent_id, "Handling clear_snooze request");
    with_persistence(&app_state, move |p| clear_agent_snooze(p, &agent_id)).await
}

/// Handler for GET `/agents/{agent_id}/counts` endpoint.
async fn handle_agent_counts(
    AxumState(app_state): AxumState<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<AssignmentCountsResponse>, HttpError> {
    info!(agent_id = %agent_id, "Handling agent_counts request");
    with_persistence(&app_state, move |p| get_assignment_counts(p, &agent_id)).await
}

/// Handler for GET `/agents/{agent_id}/leads` endpoint.
async fn handle_agent_leads(
    AxumState(app_state): AxumState<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<ListLeadsResponse>, HttpError> {
    info!(agent_id = %agent_id, "Handling agent_leads request");
    with_persistence(&app_state, move |p| list_agent_leads(p, &agent_id)).await
}

/// Handler for GET `/rotation/eligible` endpoint.
async fn handle_eligible(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListAgentsResponse>, HttpError> {
    info!("Handling eligible request");
    with_persistence(&app_state, fetch_eligible_users).await
}

/// Handler for GET `/rotation/next` endpoint.
async fn handle_next_up(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<NextUpResponse>, HttpError> {
    info!("Handling next_up request");
    with_persistence(&app_state, fetch_next_up).await
}

/// Handler for POST `/rotation/assign` endpoint.
///
/// Hands a lead to the next eligible agent.
async fn handle_assign(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AssignLeadRequest>,
) -> Result<Json<AssignLeadResponse>, HttpError> {
    info!(manager_id = %req.manager_id, "Handling assign request");
    with_persistence(&app_state, move |p| assign_next_lead(p, &req)).await
}

/// Handler for POST `/rotation/skip` endpoint.
///
/// Snoozes an agent and moves the pointer past them.
async fn handle_skip(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SkipAgentRequest>,
) -> Result<Json<SkipAgentResponse>, HttpError> {
    info!(
        target_agent_id = %req.target_agent_id,
        manager_id = %req.manager_id,
        "Handling skip request"
    );
    let default_snooze_minutes: u32 = app_state.default_snooze_minutes;
    with_persistence(&app_state, move |p| {
        skip_user_once(p, &req, default_snooze_minutes)
    })
    .await
}

/// Handler for GET `/rotation/logs` endpoint.
async fn handle_logs(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<RecentLogsResponse>, HttpError> {
    info!(limit = ?query.limit, "Handling logs request");
    with_persistence(&app_state, move |p| fetch_recent_logs(p, query.limit)).await
}

/// Handler for GET `/leads/{lead_id}` endpoint.
async fn handle_get_lead(
    AxumState(app_state): AxumState<AppState>,
    Path(lead_id): Path<i64>,
) -> Result<Json<LeadInfo>, HttpError> {
    info!(lead_id, "Handling get_lead request");
    with_persistence(&app_state, move |p| get_lead(p, lead_id)).await
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/agents", get(handle_list_agents).post(handle_upsert_agent))
        .route("/agents/{agent_id}/duty", post(handle_set_duty))
        .route("/agents/{agent_id}/active", post(handle_set_active))
        .route("/agents/{agent_id}/position", post(handle_set_position))
        .route("/agents/{agent_id}/snooze/clear", post(handle_clear_snooze))
        .route("/agents/{agent_id}/counts", get(handle_agent_counts))
        .route("/agents/{agent_id}/leads", get(handle_agent_leads))
        .route("/rotation/eligible", get(handle_eligible))
        .route("/rotation/next", get(handle_next_up))
        .route("/rotation/assign", post(handle_assign))
        .route("/rotation/skip", post(handle_skip))
        .route("/rotation/logs", get(handle_logs))
        .route("/leads/{lead_id}", get(handle_get_lead))
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

    info!("Initializing Lead Rotation Server");

    let default_snooze_minutes: u32 = validate_default_snooze(args.default_snooze_minutes)?;
    let retry_policy: RetryPolicy =
        RetryPolicy::new(args.max_attempts, Duration::from_millis(args.backoff_ms));
    info!(
        max_attempts = retry_policy.max_attempts,
        backoff_ms = args.backoff_ms,
        default_snooze_minutes,
        "Rotation settings"
    );

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    }
    .with_retry_policy(retry_policy);

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        default_snooze_minutes,
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
