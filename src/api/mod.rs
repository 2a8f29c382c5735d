use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::models::{
    CompetitionSummary, ErrorDetail, FixtureSummary, NamePrediction, PredictionResult, StandingsTable, TeamSummary,
};
use crate::services::{FallbackStore, FootballDataClient, PredictionEngine, PredictionError, ProviderError};
use crate::utils::validate_team_name;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<PredictionEngine>,
    fallback: FallbackStore,
}

impl AppState {
    pub fn new(engine: PredictionEngine, fallback: FallbackStore) -> Self {
        Self {
            engine: Arc::new(engine),
            fallback,
        }
    }
}

pub async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    let provider = Arc::new(FootballDataClient::new(&config)?);
    let engine = PredictionEngine::new(provider, &config);
    let app = create_router(AppState::new(engine, FallbackStore::new(&config.fallback_dir)));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Quiniela API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/leagues", get(leagues_handler))
        .route("/league/{id}/matches", get(league_matches_handler))
        .route("/league/{id}/teams", get(league_teams_handler))
        .route("/league/{id}/standings", get(league_standings_handler))
        .route("/match/{id}/predict", get(match_predict_handler))
        .route("/predict", get(predict_by_names_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Non-2xx response with a `{"detail": ...}` body.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorDetail { detail: self.message })).into_response()
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        let status = match &err {
            PredictionError::Provider(ProviderError::NotFound(_)) => StatusCode::NOT_FOUND,
            PredictionError::Provider(_) => StatusCode::BAD_GATEWAY,
            PredictionError::Simulation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, format!("Prediction failed: {}", err))
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Serve the live result, else the snapshot, else a 502 naming the provider error.
fn live_or_snapshot<T>(live: Result<T, ProviderError>, snapshot: Option<T>, what: &str) -> ApiResult<T> {
    match live {
        Ok(data) => Ok(Json(data)),
        Err(e) => {
            tracing::error!("Failed to fetch {} ({}): {}", what, e.kind(), e);
            match snapshot {
                Some(data) => {
                    tracing::info!("Serving {} from local fallback", what);
                    Ok(Json(data))
                }
                None => Err(ApiError::new(
                    StatusCode::BAD_GATEWAY,
                    format!("Error fetching {}: {}", what, e),
                )),
            }
        }
    }
}

// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// GET /leagues
async fn leagues_handler(State(state): State<AppState>) -> ApiResult<Vec<CompetitionSummary>> {
    let live = state.engine.provider().fetch_competitions().await;
    let snapshot = match live {
        Ok(_) => None,
        Err(_) => state.fallback.load_leagues().await,
    };
    live_or_snapshot(live, snapshot, "competitions")
}

// GET /league/{id}/matches - scheduled fixtures of a competition
async fn league_matches_handler(
    State(state): State<AppState>,
    Path(competition_id): Path<u64>,
) -> ApiResult<Vec<FixtureSummary>> {
    let live = state
        .engine
        .provider()
        .fetch_competition_matches(competition_id)
        .await
        .map(|matches| matches.iter().map(FixtureSummary::from).collect());
    let snapshot = match live {
        Ok(_) => None,
        Err(_) => state.fallback.load_matches(competition_id).await,
    };
    live_or_snapshot(live, snapshot, &format!("matches for {}", competition_id))
}

// GET /league/{id}/teams
async fn league_teams_handler(
    State(state): State<AppState>,
    Path(competition_id): Path<u64>,
) -> ApiResult<Vec<TeamSummary>> {
    let live = state
        .engine
        .provider()
        .fetch_competition_teams(competition_id)
        .await
        .map(|teams| teams.into_iter().map(TeamSummary::from).collect());
    let snapshot = match live {
        Ok(_) => None,
        Err(_) => state.fallback.load_teams(competition_id).await,
    };
    live_or_snapshot(live, snapshot, &format!("teams for {}", competition_id))
}

// GET /league/{id}/standings - no local snapshot for standings
async fn league_standings_handler(
    State(state): State<AppState>,
    Path(competition_id): Path<u64>,
) -> ApiResult<Vec<StandingsTable>> {
    let live = state.engine.provider().fetch_standings(competition_id).await;
    live_or_snapshot(live, None, &format!("standings for {}", competition_id))
}

// GET /match/{id}/predict
async fn match_predict_handler(
    State(state): State<AppState>,
    Path(match_id): Path<u64>,
) -> ApiResult<PredictionResult> {
    match state.engine.predict_by_match(match_id).await {
        Ok(prediction) => Ok(Json(prediction)),
        Err(e) => {
            tracing::error!("Predict failed for {}: {}", match_id, e);
            Err(e.into())
        }
    }
}

// GET /predict?home=&away=
#[derive(Deserialize)]
struct NamesQuery {
    home: Option<String>,
    away: Option<String>,
}

async fn predict_by_names_handler(
    State(state): State<AppState>,
    Query(params): Query<NamesQuery>,
) -> ApiResult<NamePrediction> {
    let home = params.home.unwrap_or_default();
    let away = params.away.unwrap_or_default();
    if !validate_team_name(&home) || !validate_team_name(&away) {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Both 'home' and 'away' team names are required"));
    }

    let prediction = state.engine.predict_by_names(home.trim(), away.trim())?;
    Ok(Json(prediction))
}
