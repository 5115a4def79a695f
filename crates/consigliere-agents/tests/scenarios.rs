//! Integration tests for trade validation scenarios.
//!
//! Each test seeds an in-memory SQLite store with rosters, builds a proposal
//! and runs the full validator: conservation check, concurrent roster
//! lookups, then the salary, roster and rule stages.

use std::sync::Arc;
use std::time::Duration;

use consigliere_agents::test_support::{BrokenStore, FailingGenerator, StalledStore, StaticGenerator};
use consigliere_agents::{
    AgentError, ChatHandler, KeywordClassifier, TradeSimulator, TradeValidator, ValidationError,
};
use consigliere_models::{
    ApronStatus, CapThresholds, CbaRule, Player, TradePlayer, TradeProposal,
};
use consigliere_store::{DataStore, SqliteStore};

fn player(name: &str, team: &str, salary: Option<i64>) -> Player {
    Player {
        name: name.to_string(),
        team: team.to_string(),
        position: Some("F".to_string()),
        salary,
        stats: None,
    }
}

/// `count` filler players on `team` whose salaries sum to `payroll`.
fn seed_roster(store: &SqliteStore, team: &str, count: usize, payroll: i64) {
    let each = payroll / count as i64;
    let remainder = payroll - each * count as i64;
    for i in 0..count {
        let salary = if i == 0 { each + remainder } else { each };
        store
            .insert_player(&player(&format!("{team} Depth {i}"), team, Some(salary)))
            .unwrap();
    }
}

fn validator_over(store: Arc<dyn DataStore>, timeout: Duration) -> TradeValidator {
    TradeValidator::new(store, CapThresholds::default(), timeout)
}

fn validator(store: SqliteStore) -> TradeValidator {
    validator_over(Arc::new(store), Duration::from_secs(2))
}

fn tp(name: &str, salary: i64) -> TradePlayer {
    TradePlayer::new(name, Some(salary))
}

#[tokio::test]
async fn second_apron_team_cannot_take_back_more() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 12, 185_000_000);
    seed_roster(&store, "MIA", 12, 120_000_000);

    let proposal = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("BOS Depth 1", 5_000_000)],
        vec![tp("MIA Depth 1", 8_000_000)],
    );
    let result = validator(store).validate(&proposal).await.unwrap();

    assert!(!result.is_valid);
    let boston: Vec<_> = result.violations_for("BOS").map(|r| r.rule).collect();
    assert!(boston.contains(&CbaRule::SecondApron));
    assert!(boston.contains(&CbaRule::SalaryMatching));
    assert!(!boston.contains(&CbaRule::FirstApron));
    assert_eq!(result.violations_for("MIA").count(), 0);

    let situation = &result.details.salary_analysis.team_situations["BOS"];
    assert_eq!(situation.apron_status, ApronStatus::SecondApron);
    assert_eq!(
        result.details.salary_analysis.salary_changes["BOS"].new_total_salary,
        188_000_000
    );
}

#[tokio::test]
async fn under_cap_teams_swap_freely() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "OKC", 13, 120_000_000);
    seed_roster(&store, "ORL", 13, 110_000_000);

    let proposal = TradeProposal::two_team(
        "okc",
        "orl",
        vec![tp("Josh Giddey", 6_500_000)],
        vec![tp("Cole Anthony", 5_500_000)],
    );
    let result = validator(store).validate(&proposal).await.unwrap();

    assert!(result.is_valid);
    assert!(result.violations().is_empty());
    assert_eq!(result.details.salary_analysis.salary_changes["ORL"].net_change, 1_000_000);
    assert_eq!(result.details.roster_validation.details["OKC"].new_size, 13);
}

#[tokio::test]
async fn full_roster_can_consolidate() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 15, 15_000_000);
    seed_roster(&store, "MIA", 10, 10_000_000);

    let proposal = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("A", 1_000_000), tp("B", 1_000_000), tp("C", 1_000_000)],
        vec![tp("D", 3_000_000)],
    );
    let result = validator(store).validate(&proposal).await.unwrap();

    assert!(result.is_valid);
    let checks = &result.details.roster_validation.details;
    assert_eq!(checks["BOS"].new_size, 13);
    assert_eq!(checks["MIA"].new_size, 12);
}

#[tokio::test]
async fn full_roster_cannot_grow() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 15, 15_000_000);
    seed_roster(&store, "MIA", 10, 10_000_000);

    let proposal = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("A", 1_000_000)],
        vec![tp("B", 500_000), tp("C", 500_000)],
    );
    let result = validator(store).validate(&proposal).await.unwrap();

    assert!(!result.is_valid);
    assert!(result.violations().is_empty());
    assert_eq!(result.roster_failures(), vec!["BOS"]);
}

#[tokio::test]
async fn missing_salary_counts_as_zero() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert_player(&player("Max Contract", "BOS", Some(140_000_000))).unwrap();
    seed_roster(&store, "MIA", 10, 100_000_000);

    let proposal = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![TradePlayer::new("Unsigned Rookie", None)],
        vec![tp("Minimum Guard", 200_000)],
    );
    let result = validator(store).validate(&proposal).await.unwrap();

    assert!(!result.is_valid);
    let violation = result.violations_for("BOS").next().unwrap();
    assert_eq!(violation.rule, CbaRule::SalaryMatching);
    assert_eq!(result.details.salary_analysis.salary_changes["BOS"].salary_out, 0);
}

#[tokio::test]
async fn three_team_rotation() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 13, 100_000_000);
    seed_roster(&store, "MIA", 13, 100_000_000);
    seed_roster(&store, "OKC", 13, 100_000_000);

    let mut proposal = TradeProposal {
        teams: vec!["BOS".to_string(), "MIA".to_string(), "OKC".to_string()],
        ..TradeProposal::default()
    };
    let moves = [("BOS", "MIA", "A"), ("MIA", "OKC", "B"), ("OKC", "BOS", "C")];
    for (from, to, name) in moves {
        proposal
            .players_out
            .entry(from.to_string())
            .or_default()
            .push(tp(name, 4_000_000));
        proposal
            .players_in
            .entry(to.to_string())
            .or_default()
            .push(tp(name, 4_000_000));
    }

    let result = validator(store).validate(&proposal).await.unwrap();
    assert!(result.is_valid);
    assert_eq!(result.details.salary_analysis.salary_changes.len(), 3);
}

#[tokio::test]
async fn player_arriving_nowhere_is_malformed() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut proposal =
        TradeProposal::two_team("BOS", "MIA", vec![tp("A", 1_000_000)], vec![tp("B", 1_000_000)]);
    proposal.players_in.remove("MIA");

    let err = validator(store).validate(&proposal).await.unwrap_err();
    assert!(matches!(err, ValidationError::MalformedProposal(_)));
}

#[tokio::test]
async fn slow_lookups_are_unavailable() {
    let store = Arc::new(StalledStore {
        delay: Duration::from_millis(500),
    });
    let validator = validator_over(store, Duration::from_millis(50));
    let proposal =
        TradeProposal::two_team("BOS", "MIA", vec![tp("A", 1_000_000)], vec![tp("B", 1_000_000)]);

    let err = validator.validate(&proposal).await.unwrap_err();
    assert!(matches!(err, ValidationError::Unavailable(_)));
}

#[tokio::test]
async fn store_failure_aborts_validation() {
    let validator = validator_over(Arc::new(BrokenStore), Duration::from_secs(1));
    let proposal =
        TradeProposal::two_team("BOS", "MIA", vec![tp("A", 1_000_000)], vec![tp("B", 1_000_000)]);

    let err = validator.validate(&proposal).await.unwrap_err();
    assert!(matches!(err, ValidationError::Store(_)));
}

#[tokio::test]
async fn simulation_of_illegal_trade_has_no_impact() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 12, 185_000_000);
    seed_roster(&store, "MIA", 12, 120_000_000);

    let simulator = TradeSimulator::new(Arc::new(validator(store)));
    let proposal = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("BOS Depth 1", 5_000_000)],
        vec![tp("MIA Depth 1", 8_000_000)],
    );
    let result = simulator.simulate(&proposal).await.unwrap();
    assert!(!result.success);
    assert!(result.impact.is_none());
    assert!(result.salary_impact.is_empty());
}

#[tokio::test]
async fn chat_surfaces_generator_failure() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert_player(&player("Josh Giddey", "OKC", Some(6_587_040))).unwrap();

    let chat = ChatHandler::new(
        Arc::new(KeywordClassifier::new()),
        Arc::new(FailingGenerator),
        Arc::new(validator(store)),
    );
    let err = chat.process("Josh Giddey").await.unwrap_err();
    assert!(matches!(err, AgentError::Generator(_)));
}

#[tokio::test]
async fn chat_trade_over_second_apron_is_reported_illegal() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 12, 195_000_000);
    store.insert_player(&player("Wing Target", "MIA", Some(8_000_000))).unwrap();
    seed_roster(&store, "MIA", 11, 112_000_000);

    let generator = Arc::new(StaticGenerator::text("Not happening."));
    let chat = ChatHandler::new(
        Arc::new(KeywordClassifier::new()),
        generator.clone(),
        Arc::new(validator(store)),
    );

    let reply = chat.process("BOS Depth 1 for Wing Target").await.unwrap();
    assert_eq!(reply.response, "Not happening.");
    assert_eq!(reply.data["validation"]["is_valid"], false);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("NOT LEGAL"));
    assert!(prompt.contains("Second Apron rule violated"));
}

#[tokio::test]
async fn negative_salary_cannot_mask_first_apron() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 12, 175_000_000);
    seed_roster(&store, "MIA", 12, 120_000_000);
    let validator = validator(store);

    let plain = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("BOS Depth 1", 10_000_000)],
        vec![tp("MIA Depth 1", 12_000_000)],
    );
    let result = validator.validate(&plain).await.unwrap();
    assert!(!result.is_valid);
    assert!(result
        .violations_for("BOS")
        .any(|r| r.rule == CbaRule::FirstApron));

    let ghosted = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("BOS Depth 1", 10_000_000)],
        vec![tp("MIA Depth 1", 12_000_000), tp("Ghost", -3_000_000)],
    );
    let err = validator.validate(&ghosted).await.unwrap_err();
    assert!(matches!(err, ValidationError::MalformedProposal(_)));
}

#[tokio::test]
async fn enormous_salaries_are_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 12, 150_000_000);
    seed_roster(&store, "MIA", 12, 120_000_000);

    let huge = i64::MAX / 2 + 1;
    let proposal = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("BOS Depth 1", huge), tp("BOS Depth 2", huge)],
        vec![tp("MIA Depth 1", 1_000_000)],
    );
    let err = validator(store).validate(&proposal).await.unwrap_err();
    assert!(matches!(err, ValidationError::MalformedProposal(_)));
}

#[tokio::test]
async fn player_priced_differently_on_each_leg_is_malformed() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_roster(&store, "BOS", 12, 150_000_000);
    seed_roster(&store, "MIA", 12, 120_000_000);

    let mut proposal = TradeProposal::two_team(
        "BOS",
        "MIA",
        vec![tp("BOS Depth 1", 1_000_000)],
        vec![tp("MIA Depth 1", 1_000_000)],
    );
    proposal
        .players_in
        .insert("MIA".to_string(), vec![tp("BOS Depth 1", 30_000_000)]);

    let err = validator(store).validate(&proposal).await.unwrap_err();
    assert!(matches!(err, ValidationError::MalformedProposal(_)));
}
