pub mod analysis;
pub mod cba;
pub mod chat;
pub mod config;
pub mod player;
pub mod store_schema;
pub mod team;
pub mod trade_input;
pub mod trade_validation;

pub use analysis::{
    PlayoffImpact, Recommendation, SimulatedPlayer, SimulationResult, StatisticalImpact,
    TeamNeeds, TeamSalaryImpact, TradeImpact, TradeRecommendations,
};
pub use cba::{
    ApronBand, ApronStatus, CapThresholds, SalaryMatchResult, TeamSalarySituation,
    MAX_ROSTER_SIZE,
};
pub use chat::{ChatReply, Intent, QueryKind, TradeAnalysis};
pub use config::{
    ConsigliereConfig, GeneratorConfig, RateLimitConfig, ServerConfig, StoreConfig,
    ValidatorConfig,
};
pub use player::{Player, PlayerStats};
pub use team::{normalize_abbreviation, PlayoffSeries, SeriesTeam, Team};
pub use trade_input::{TradePlayer, TradeProposal};
pub use trade_validation::{
    CbaRule, RosterCheck, RosterValidation, RuleOutcome, RuleStatus, RuleValidation,
    SalaryAnalysis, SalaryChange, ValidationDetails, ValidationResult,
};
