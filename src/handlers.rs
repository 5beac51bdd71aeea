use crate::errors::AppError;
use crate::evaluator::Evaluator;
use crate::loader::RosterLoader;
use crate::models::{EmployeeReport, LookupQuery, RefreshOutcome, RosterStatus};
use crate::report::{build_report, format_update_label};
use crate::roster::RosterStore;
use crate::targets::TargetTable;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state injected into handlers.
pub struct AppState {
    /// Current roster snapshot.
    pub store: Arc<RosterStore>,
    /// Loader used by the manual refresh endpoint.
    pub loader: Arc<RosterLoader>,
    pub evaluator: Evaluator,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-indicator-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

async fn lookup(state: &AppState, matricula: &str) -> Result<EmployeeReport, AppError> {
    if matricula.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Por favor, digite uma matrícula.".to_string(),
        ));
    }

    let snapshot = state.store.current().await;
    let record = snapshot.get(matricula).ok_or_else(|| {
        tracing::info!("Matrícula not found: {}", matricula.trim());
        AppError::NotFound("Matrícula não encontrada.".to_string())
    })?;

    Ok(build_report(&state.evaluator, record, snapshot.loaded_at()))
}

/// GET /api/v1/consulta?matricula=...
///
/// Looks up an employee and returns the certification report.
pub async fn consulta(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<EmployeeReport>, AppError> {
    let matricula = params.matricula.unwrap_or_default();
    tracing::info!("GET /consulta - matricula: {}", matricula.trim());

    let report = lookup(&state, &matricula).await?;
    Ok(Json(report))
}

/// GET /api/v1/employees/:id
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeReport>, AppError> {
    tracing::info!("GET /employees/{}", id);

    let report = lookup(&state, &id).await?;
    Ok(Json(report))
}

/// GET /api/v1/roster/status
pub async fn roster_status(State(state): State<Arc<AppState>>) -> Json<RosterStatus> {
    let snapshot = state.store.current().await;

    Json(RosterStatus {
        source: snapshot.source(),
        record_count: snapshot.len(),
        loaded_at: snapshot.loaded_at(),
        updated_label: format_update_label(snapshot.loaded_at()),
    })
}

/// POST /api/v1/roster/refresh
///
/// Reloads the roster now. Always answers 200; the outcome says which tier
/// the roster came from.
pub async fn refresh_roster(State(state): State<Arc<AppState>>) -> Json<RefreshOutcome> {
    tracing::info!("POST /roster/refresh");
    Json(state.loader.refresh().await)
}

/// GET /api/v1/targets
pub async fn get_targets(State(state): State<Arc<AppState>>) -> Json<TargetTable> {
    Json(state.evaluator.targets().clone())
}

/// Lookup and roster routes. Callers may layer rate limiting on top.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/consulta", get(consulta))
        .route("/api/v1/employees/:id", get(get_employee))
        .route("/api/v1/roster/status", get(roster_status))
        .route("/api/v1/roster/refresh", post(refresh_roster))
        .route("/api/v1/targets", get(get_targets))
}

/// Final application: health check plus `api`, with tracing and CORS.
pub fn app(state: Arc<AppState>, api: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
