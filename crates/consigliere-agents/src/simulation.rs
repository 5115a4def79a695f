use std::sync::Arc;

use chrono::Utc;
use consigliere_models::{
    normalize_abbreviation, Player, PlayoffImpact, SimulatedPlayer, SimulationResult,
    StatisticalImpact, TeamSalaryImpact, TradeImpact, TradeProposal, TradeRecommendations,
};
use consigliere_store::StoreError;
use tracing::info;

use crate::error::ValidationError;
use crate::needs::recommend_trades;
use crate::roster::team_payroll;
use crate::salary_cap::{format_salary, team_salary_situation};
use crate::validator::TradeValidator;

/// Validates a trade and, when legal, reports who moves and what it does to
/// each team's cap position.
pub struct TradeSimulator {
    validator: Arc<TradeValidator>,
}

impl TradeSimulator {
    pub fn new(validator: Arc<TradeValidator>) -> Self {
        Self { validator }
    }

    pub async fn simulate(&self, proposal: &TradeProposal) -> Result<SimulationResult, ValidationError> {
        let validation = self.validator.validate(proposal).await?;
        if !validation.is_valid {
            info!(violations = validation.violations().len(), "Simulated trade is not legal");
            return Ok(SimulationResult {
                success: false,
                proposal: proposal.clone(),
                validation,
                players: Vec::new(),
                impact: None,
                salary_impact: Vec::new(),
            });
        }

        let store = self.validator.store().as_ref();
        let thresholds = self.validator.thresholds();

        let mut players = Vec::new();
        for (team, outgoing) in &proposal.players_out {
            for trade_player in outgoing {
                // Partial-name matches could describe someone else; only an
                // exact record is shown, priced at the traded salary.
                let player = match store.find_player(&trade_player.name).await? {
                    Some(player) if player.name.eq_ignore_ascii_case(trade_player.name.trim()) => {
                        Player {
                            salary: trade_player.salary,
                            ..player
                        }
                    }
                    _ => Player {
                        name: trade_player.name.clone(),
                        team: normalize_abbreviation(team),
                        position: None,
                        salary: trade_player.salary,
                        stats: None,
                    },
                };
                players.push(SimulatedPlayer {
                    salary_formatted: format_salary(trade_player.salary_or_zero()),
                    player,
                });
            }
        }

        let mut salary_impact = Vec::with_capacity(proposal.teams.len());
        for team in &proposal.teams {
            let team = normalize_abbreviation(team);
            let payroll = team_payroll(store, &team).await?;
            let net_change = validation
                .details
                .salary_analysis
                .salary_changes
                .get(&team)
                .map_or(0, |c| c.net_change);
            salary_impact.push(TeamSalaryImpact {
                before_trade: team_salary_situation(payroll, thresholds),
                after_trade: team_salary_situation(payroll + net_change, thresholds),
                team,
            });
        }

        Ok(SimulationResult {
            success: true,
            proposal: proposal.clone(),
            validation,
            players,
            impact: Some(trade_impact()),
            salary_impact,
        })
    }

    pub async fn recommendations(&self, team: &str) -> Result<TradeRecommendations, StoreError> {
        recommend_trades(
            self.validator.store().as_ref(),
            team,
            self.validator.thresholds(),
        )
        .await
    }
}

// Statistical and playoff impact are not modelled yet; callers get zeros.
fn trade_impact() -> TradeImpact {
    TradeImpact {
        statistical_impact: StatisticalImpact::default(),
        playoff_impact: PlayoffImpact::default(),
        computed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use consigliere_models::{CapThresholds, Team, TradePlayer};
    use consigliere_store::{DataStore, SqliteStore};

    fn player(name: &str, team: &str, salary: i64) -> Player {
        Player {
            name: name.to_string(),
            team: team.to_string(),
            position: Some("G".to_string()),
            salary: Some(salary),
            stats: None,
        }
    }

    fn simulator(store: SqliteStore) -> TradeSimulator {
        let store: Arc<dyn DataStore> = Arc::new(store);
        TradeSimulator::new(Arc::new(TradeValidator::new(
            store,
            CapThresholds::default(),
            Duration::from_secs(1),
        )))
    }

    #[tokio::test]
    async fn legal_trade_reports_players_and_salary_impact() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_player(&player("Josh Giddey", "OKC", 6_500_000)).unwrap();
        store.insert_player(&player("Cole Anthony", "ORL", 5_500_000)).unwrap();
        store
            .insert_team(&Team {
                abbreviation: "OKC".to_string(),
                name: "Oklahoma City Thunder".to_string(),
                total_payroll: Some(140_000_000),
                luxury_tax_status: None,
            })
            .unwrap();

        let proposal = TradeProposal::two_team(
            "OKC",
            "ORL",
            vec![TradePlayer::new("Josh Giddey", Some(6_500_000))],
            vec![TradePlayer::new("Cole Anthony", Some(5_500_000))],
        );

        let result = simulator(store).simulate(&proposal).await.unwrap();
        assert!(result.success);
        assert_eq!(result.players.len(), 2);
        assert!(result.players.iter().any(|p| p.salary_formatted == "$6.5M"));
        assert!(result.impact.is_some());

        let okc = result.salary_impact.iter().find(|s| s.team == "OKC").unwrap();
        assert_eq!(okc.before_trade.total_salary, 140_000_000);
        assert_eq!(okc.after_trade.total_salary, 139_000_000);
        let orl = result.salary_impact.iter().find(|s| s.team == "ORL").unwrap();
        assert_eq!(orl.after_trade.total_salary, 6_500_000);
    }

    #[tokio::test]
    async fn simulated_players_are_the_ones_priced() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_player(&player("Josh Giddey", "OKC", 6_500_000)).unwrap();
        store.insert_player(&player("Cole Anthony Sr.", "LAL", 20_000_000)).unwrap();

        let proposal = TradeProposal::two_team(
            "OKC",
            "ORL",
            vec![TradePlayer::new("Josh Giddey", Some(6_500_000))],
            vec![TradePlayer::new("Cole Anthony", Some(5_500_000))],
        );

        let result = simulator(store).simulate(&proposal).await.unwrap();
        assert!(result.success);
        let anthony = result
            .players
            .iter()
            .find(|p| p.player.name.starts_with("Cole"))
            .unwrap();
        assert_eq!(anthony.player.name, "Cole Anthony");
        assert_eq!(anthony.player.team, "ORL");
        assert_eq!(anthony.salary_formatted, "$5.5M");

        let giddey = result
            .players
            .iter()
            .find(|p| p.player.name == "Josh Giddey")
            .unwrap();
        assert_eq!(giddey.player.position.as_deref(), Some("G"));
    }

    #[tokio::test]
    async fn illegal_trade_returns_only_validation() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 0..15 {
            store.insert_player(&player(&format!("BOS {i}"), "BOS", 1_000_000)).unwrap();
        }
        store.insert_player(&player("Incoming", "MIA", 1_000_000)).unwrap();

        let proposal = TradeProposal::two_team(
            "BOS",
            "MIA",
            vec![],
            vec![TradePlayer::new("Incoming", Some(1_000_000))],
        );

        let result = simulator(store).simulate(&proposal).await.unwrap();
        assert!(!result.success);
        assert!(result.players.is_empty());
        assert!(result.impact.is_none());
        assert_eq!(result.validation.roster_failures(), vec!["BOS"]);
    }
}
