//! HTTP tests against the full router, backed by an in-memory store and a
//! canned generator.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use consigliere::agents::test_support::{StalledStore, StaticGenerator};
use consigliere::models::{ConsigliereConfig, Player, PlayerStats, RateLimitConfig};
use consigliere::store::SqliteStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn player(name: &str, team: &str, position: &str, salary: i64, minutes: f64) -> Player {
    Player {
        name: name.to_string(),
        team: team.to_string(),
        position: Some(position.to_string()),
        salary: Some(salary),
        stats: Some(PlayerStats {
            minutes_per_game: minutes,
            points_per_game: 14.0,
            ..PlayerStats::default()
        }),
    }
}

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert_player(&player("Josh Giddey", "OKC", "G", 6_500_000, 25.1)).unwrap();
    store.insert_player(&player("Cole Anthony", "ORL", "G", 5_500_000, 22.3)).unwrap();
    store.insert_player(&player("Jayson Tatum", "BOS", "F", 32_600_000, 35.7)).unwrap();
    store.insert_player(&player("Wendell Carter Jr.", "ORL", "C", 13_050_000, 25.0)).unwrap();
    store
}

fn config(rate_limit: RateLimitConfig) -> ConsigliereConfig {
    ConsigliereConfig {
        rate_limit,
        ..ConsigliereConfig::default()
    }
}

fn unlimited() -> RateLimitConfig {
    RateLimitConfig {
        enabled: false,
        ..RateLimitConfig::default()
    }
}

fn app_with(rate_limit: RateLimitConfig) -> Router {
    let state = consigliere::build_state_with(
        Arc::new(seeded_store()),
        Arc::new(StaticGenerator::text("Here is the analysis.")),
        &config(rate_limit),
    );
    consigliere::router(state)
}

fn app() -> Router {
    app_with(unlimited())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_database() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "database": "connected"}));
}

#[tokio::test]
async fn chat_answers_player_query() {
    let (status, body) = send(&app(), post("/chat", json!({"query": "Josh Giddey"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query_type"], "player");
    assert_eq!(body["response"], "Here is the analysis.");
    assert_eq!(body["data"]["player"]["name"], "Josh Giddey");
}

#[tokio::test]
async fn chat_rejects_empty_and_malformed_bodies() {
    let app = app();
    let (status, body) = send(&app, post("/chat", json!({"query": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");

    let (status, body) = send(&app, post("/chat", json!({"question": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn chat_unknown_player_is_bad_request() {
    let (status, body) = send(&app(), post("/chat", json!({"query": "Nobody Special"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn validate_trade_returns_verdict() {
    let proposal = json!({
        "teams": ["OKC", "ORL"],
        "playersOut": {
            "OKC": [{"name": "Josh Giddey", "salary": 6500000}],
            "ORL": [{"name": "Cole Anthony", "salary": 5500000}]
        },
        "playersIn": {
            "OKC": [{"name": "Cole Anthony", "salary": 5500000}],
            "ORL": [{"name": "Josh Giddey", "salary": 6500000}]
        }
    });
    let (status, body) = send(&app(), post("/api/validate-trade", proposal)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], true);
    assert_eq!(
        body["details"]["salary_analysis"]["salary_changes"]["ORL"]["net_change"],
        1_000_000
    );
}

#[tokio::test]
async fn malformed_proposal_is_bad_request() {
    let proposal = json!({
        "teams": ["OKC", "ORL"],
        "playersOut": {"OKC": [{"name": "Josh Giddey", "salary": 6500000}]},
        "playersIn": {}
    });
    let (status, body) = send(&app(), post("/api/validate-trade", proposal)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("arrives nowhere"));
}

#[tokio::test]
async fn slow_store_is_service_unavailable() {
    let mut config = config(unlimited());
    config.validator.lookup_timeout_ms = 20;
    let state = consigliere::build_state_with(
        Arc::new(StalledStore {
            delay: Duration::from_millis(500),
        }),
        Arc::new(StaticGenerator::text("unused")),
        &config,
    );
    let app = consigliere::router(state);

    let proposal = json!({
        "teams": ["OKC", "ORL"],
        "playersOut": {"OKC": [{"name": "A"}], "ORL": [{"name": "B"}]},
        "playersIn": {"OKC": [{"name": "B"}], "ORL": [{"name": "A"}]}
    });
    let (status, _) = send(&app, post("/api/validate-trade", proposal)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn trade_endpoints_analyze_named_players() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/trade",
            json!({"teams": ["OKC", "ORL"], "players": ["Josh Giddey", "Cole Anthony"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Here is the analysis.");
    assert_eq!(body["validation"]["is_valid"], true);

    let (status, _) = send(
        &app,
        post(
            "/analyze-trade",
            json!({
                "team1": "OKC",
                "team2": "ORL",
                "players1": ["Josh Giddey"],
                "players2": ["Cole Anthony", "Wendell Carter Jr."]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post("/api/trade", json!({"teams": ["OKC"], "players": ["Josh Giddey"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn playoff_impact_routes_return_verdict() {
    let app = app();
    let (status, body) = send(
        &app,
        post(
            "/api/playoff-impact",
            json!({"teams": ["OKC", "ORL"], "players": ["Josh Giddey", "Cole Anthony"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Here is the analysis.");
    assert_eq!(body["validation"]["is_valid"], true);

    let (status, _) = send(
        &app,
        post(
            "/analyze-playoff-impact",
            json!({
                "team1": "OKC",
                "team2": "ORL",
                "players1": ["Josh Giddey"],
                "players2": ["Cole Anthony"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post("/api/playoff-impact", json!({"teams": ["OKC", "ORL"], "players": ["Josh Giddey"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn team_route_reports_roster() {
    let app = app();
    let (status, body) = send(&app, post("/api/team", json!({"team": "orl"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["abbreviation"], "ORL");
    assert_eq!(body["roster"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_salary"], 18_550_000);

    let (status, body) = send(&app, post("/api/team", json!({"team": "UTA"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn simulate_and_recommend() {
    let app = app();
    let proposal = json!({
        "teams": ["OKC", "ORL"],
        "playersOut": {
            "OKC": [{"name": "Josh Giddey", "salary": 6500000}],
            "ORL": [{"name": "Cole Anthony", "salary": 5500000}]
        },
        "playersIn": {
            "OKC": [{"name": "Cole Anthony", "salary": 5500000}],
            "ORL": [{"name": "Josh Giddey", "salary": 6500000}]
        }
    });
    let (status, body) = send(&app, post("/api/simulate-trade", proposal)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["players"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/api/team/okc/recommendations")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["player"]["name"].as_str().unwrap())
        .collect();
    // OKC lacks a PG, a C and forwards; only the C and F qualify on minutes.
    assert_eq!(names, vec!["Jayson Tatum", "Wendell Carter Jr."]);
}

#[tokio::test]
async fn rate_limit_applies_per_client() {
    let app = app_with(RateLimitConfig {
        enabled: true,
        max_requests: 2,
        window_seconds: 60,
        max_tracked_clients: 100,
    });
    let request = |client: &str| {
        Request::post("/chat")
            .header("content-type", "application/json")
            .header("x-client-id", client)
            .body(Body::from(json!({"query": "Josh Giddey"}).to_string()))
            .unwrap()
    };

    assert_eq!(send(&app, request("scout")).await.0, StatusCode::OK);
    assert_eq!(send(&app, request("scout")).await.0, StatusCode::OK);
    let (status, body) = send(&app, request("scout")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Too many requests"));

    assert_eq!(send(&app, request("coach")).await.0, StatusCode::OK);
    // Health is never limited.
    assert_eq!(send(&app, get("/health")).await.0, StatusCode::OK);
}

#[test]
fn shipped_config_parses() {
    let config: ConsigliereConfig =
        toml::from_str(include_str!("../../../config/consigliere.toml")).unwrap();
    assert_eq!(config, ConsigliereConfig::default());
}
