// 🌐 REST API - thin JSON layer over the engine
//
// Parses request bodies into identities, calls the engine, wraps the
// result. No auth, no persistence, no rate limiting here.

use crate::compatibility::CompatibilityResult;
use crate::engine::NumerologyEngine;
use crate::error::NumerologyError;
use crate::profile::{Identity, NumerologyProfile, PersonalCycles};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<NumerologyEngine>,
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Engine error → HTTP response
struct ApiError(NumerologyError);

impl From<NumerologyError> for ApiError {
    fn from(e: NumerologyError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("numerology request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ApiResponse::<()>::failed(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub current_name: Option<String>,
}

impl PersonRequest {
    fn identity(&self, engine: &NumerologyEngine) -> Result<Identity, NumerologyError> {
        let identity = engine.parse_identity(&self.full_name, &self.birth_date)?;
        match &self.current_name {
            Some(name) => identity.with_current_name(name),
            None => Ok(identity),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(flatten)]
    pub person: PersonRequest,
    pub system: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRequest {
    pub person_a: PersonRequest,
    pub person_b: PersonRequest,
    pub system: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclesRequest {
    #[serde(flatten)]
    pub person: PersonRequest,
    /// Reference date, defaults to today
    pub on: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub name: String,
    pub description: String,
    pub is_default: bool,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/systems - Registered numerology systems
async fn list_systems(State(state): State<AppState>) -> Json<ApiResponse<Vec<SystemInfo>>> {
    let default = state.engine.default_system();
    let systems = state
        .engine
        .systems()
        .all()
        .into_iter()
        .map(|s| SystemInfo {
            name: s.name().to_string(),
            description: s.description().to_string(),
            is_default: s.name() == default,
        })
        .collect();
    Json(ApiResponse::ok(systems))
}

/// POST /api/numerology - Full profile for one person
async fn numerology(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> ApiResult<NumerologyProfile> {
    let identity = req.person.identity(&state.engine)?;
    let profile = state
        .engine
        .compute_profile(&identity, req.system.as_deref())?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// POST /api/compatibility - Score two people
async fn compatibility(
    State(state): State<AppState>,
    Json(req): Json<CompatibilityRequest>,
) -> ApiResult<CompatibilityResult> {
    let a = req.person_a.identity(&state.engine)?;
    let b = req.person_b.identity(&state.engine)?;
    let result = state
        .engine
        .compute_compatibility(&a, &b, req.system.as_deref())?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/cycles - Personal year / month / day
async fn cycles(
    State(state): State<AppState>,
    Json(req): Json<CyclesRequest>,
) -> ApiResult<PersonalCycles> {
    let identity = req.person.identity(&state.engine)?;
    Ok(Json(ApiResponse::ok(
        state.engine.personal_cycles(&identity, req.on),
    )))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(engine: Arc<NumerologyEngine>) -> Router {
    let state = AppState { engine };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/systems", get(list_systems))
        .route("/numerology", post(numerology))
        .route("/compatibility", post(compatibility))
        .route("/cycles", post(cycles))
        .with_state(state);

    info!("API routes mounted under /api");

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
