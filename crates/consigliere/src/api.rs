use std::sync::Arc;

use axum::extract::{FromRequest, Path, State};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use consigliere_agents::{ChatHandler, TeamReport, TradeSimulator, TradeValidator};
use consigliere_models::{
    ChatReply, SimulationResult, TradeAnalysis, TradeProposal, TradeRecommendations,
    ValidationResult,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::ingress::{rate_limit, RateLimiter};

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatHandler>,
    pub validator: Arc<TradeValidator>,
    pub simulator: Arc<TradeSimulator>,
    /// `None` disables ingress limiting.
    pub limiter: Option<Arc<RateLimiter>>,
}

/// JSON body whose rejections render as `{error}` with 400.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTradeRequest {
    pub team1: String,
    pub team2: String,
    pub players1: Vec<String>,
    pub players2: Vec<String>,
}

/// One player from each of two teams.
#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub teams: Vec<String>,
    pub players: Vec<String>,
}

impl TradeRequest {
    /// `(first_team, second_team, first_player, second_player)`.
    fn pair(&self) -> Result<(&String, &String, &String, &String), ApiError> {
        match (self.teams.as_slice(), self.players.as_slice()) {
            ([first_team, second_team], [first_player, second_player]) => {
                Ok((first_team, second_team, first_player, second_player))
            }
            _ => Err(ApiError::BadRequest(
                "Expected exactly two teams and two players".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    pub team: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

pub fn router(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/chat", post(chat))
        .route("/analyze-trade", post(analyze_trade))
        .route("/analyze-playoff-impact", post(analyze_playoff_impact))
        .route("/api/trade", post(trade))
        .route("/api/playoff-impact", post(playoff_impact))
        .route("/api/team", post(team))
        .route("/api/validate-trade", post(validate_trade))
        .route("/api/simulate-trade", post(simulate_trade))
        .route("/api/team/:abbr/recommendations", get(recommendations));

    if let Some(limiter) = &state.limiter {
        api = api.route_layer(middleware::from_fn_with_state(Arc::clone(limiter), rate_limit));
    }

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.validator.store().ping().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            database: "connected",
        }),
        Err(e) => {
            warn!(error = %e, "Health check could not reach the store");
            Json(HealthResponse {
                status: "degraded",
                database: "disconnected",
            })
        }
    }
}

async fn chat(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if req.query.trim().is_empty() {
        return Err(ApiError::BadRequest("Query is required".to_string()));
    }
    Ok(Json(state.chat.process(&req.query).await?))
}

async fn analyze_trade(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnalyzeTradeRequest>,
) -> Result<Json<TradeAnalysis>, ApiError> {
    if req.players1.is_empty() || req.players2.is_empty() {
        return Err(ApiError::BadRequest(
            "Each team must send at least one player".to_string(),
        ));
    }
    let analysis = state
        .chat
        .analyze_trade(&req.team1, &req.team2, &req.players1, &req.players2)
        .await?;
    Ok(Json(analysis))
}

async fn analyze_playoff_impact(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnalyzeTradeRequest>,
) -> Result<Json<TradeAnalysis>, ApiError> {
    if req.players1.is_empty() || req.players2.is_empty() {
        return Err(ApiError::BadRequest(
            "Each team must send at least one player".to_string(),
        ));
    }
    let analysis = state
        .chat
        .playoff_impact(&req.team1, &req.team2, &req.players1, &req.players2)
        .await?;
    Ok(Json(analysis))
}

async fn trade(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TradeRequest>,
) -> Result<Json<TradeAnalysis>, ApiError> {
    let (first_team, second_team, first_player, second_player) = req.pair()?;
    let analysis = state
        .chat
        .analyze_trade(
            first_team,
            second_team,
            std::slice::from_ref(first_player),
            std::slice::from_ref(second_player),
        )
        .await?;
    Ok(Json(analysis))
}

async fn playoff_impact(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TradeRequest>,
) -> Result<Json<TradeAnalysis>, ApiError> {
    let (first_team, second_team, first_player, second_player) = req.pair()?;
    let analysis = state
        .chat
        .playoff_impact(
            first_team,
            second_team,
            std::slice::from_ref(first_player),
            std::slice::from_ref(second_player),
        )
        .await?;
    Ok(Json(analysis))
}

async fn team(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TeamRequest>,
) -> Result<Json<TeamReport>, ApiError> {
    if req.team.trim().is_empty() {
        return Err(ApiError::BadRequest("Team is required".to_string()));
    }
    Ok(Json(state.chat.team_report(&req.team).await?))
}

async fn validate_trade(
    State(state): State<AppState>,
    ApiJson(proposal): ApiJson<TradeProposal>,
) -> Result<Json<ValidationResult>, ApiError> {
    let result = state.validator.validate(&proposal).await?;
    info!(id = %result.id, is_valid = result.is_valid, "Validated trade");
    Ok(Json(result))
}

async fn simulate_trade(
    State(state): State<AppState>,
    ApiJson(proposal): ApiJson<TradeProposal>,
) -> Result<Json<SimulationResult>, ApiError> {
    Ok(Json(state.simulator.simulate(&proposal).await?))
}

async fn recommendations(
    State(state): State<AppState>,
    Path(abbr): Path<String>,
) -> Result<Json<TradeRecommendations>, ApiError> {
    Ok(Json(state.simulator.recommendations(&abbr).await?))
}
