use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cba::TeamSalarySituation;
use crate::player::Player;
use crate::team::Team;
use crate::trade_input::TradeProposal;
use crate::trade_validation::ValidationResult;

/// Positional and statistical gaps found in a roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamNeeds {
    pub positions: Vec<String>,
    pub stats: Vec<String>,
    pub priority: String,
}

impl TeamNeeds {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.stats.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub player: Player,
    pub salary: i64,
    pub salary_formatted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecommendations {
    pub team: Option<Team>,
    pub needs: TeamNeeds,
    pub salary_situation: TeamSalarySituation,
    pub recommendations: Vec<Recommendation>,
}

/// A player involved in a simulated trade, with a display salary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatedPlayer {
    #[serde(flatten)]
    pub player: Player,
    pub salary_formatted: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatisticalImpact {
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayoffImpact {
    pub win_probability_change: f64,
    pub series_impact: Vec<String>,
    pub key_matchups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeImpact {
    pub statistical_impact: StatisticalImpact,
    pub playoff_impact: PlayoffImpact,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSalaryImpact {
    pub team: String,
    pub before_trade: TeamSalarySituation,
    pub after_trade: TeamSalarySituation,
}

/// Composite result of simulating a trade.
///
/// When the trade is illegal only `validation` is populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub success: bool,
    pub proposal: TradeProposal,
    pub validation: ValidationResult,
    pub players: Vec<SimulatedPlayer>,
    pub impact: Option<TradeImpact>,
    pub salary_impact: Vec<TeamSalaryImpact>,
}
