use std::sync::Arc;
use std::time::Instant;

use consigliere_models::{
    normalize_abbreviation, ChatReply, Player, PlayoffSeries, QueryKind, Team, TeamNeeds,
    TeamSalarySituation, TradeAnalysis, TradePlayer, TradeProposal, ValidationResult,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::IntentClassifier;
use crate::error::AgentError;
use crate::generator::TextGenerator;
use crate::needs::analyze_team_needs;
use crate::prompts;
use crate::roster::{lookup_roster, team_payroll};
use crate::salary_cap::team_salary_situation;
use crate::validator::TradeValidator;

/// Players within this many dollars of a player's salary count as similarly paid.
pub const SIMILAR_SALARY_WINDOW: i64 = 500_000;
const MAX_SIMILAR_PLAYERS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerReport {
    pub player: Player,
    pub similar_players: Vec<Player>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamReport {
    pub abbreviation: String,
    pub team: Option<Team>,
    pub roster: Vec<Player>,
    pub total_salary: i64,
    pub salary_situation: TeamSalarySituation,
    pub needs: TeamNeeds,
    pub playoff_series: Vec<PlayoffSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeReport {
    pub players: Vec<Player>,
    pub proposal: TradeProposal,
    pub validation: ValidationResult,
}

struct NamedTrade {
    first_team: String,
    second_team: String,
    query: String,
    players: Vec<Player>,
    validation: ValidationResult,
}

/// Answers free-text questions: classify, gather data, prompt, generate.
pub struct ChatHandler {
    classifier: Arc<dyn IntentClassifier>,
    generator: Arc<dyn TextGenerator>,
    validator: Arc<TradeValidator>,
}

impl ChatHandler {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        generator: Arc<dyn TextGenerator>,
        validator: Arc<TradeValidator>,
    ) -> Self {
        Self {
            classifier,
            generator,
            validator,
        }
    }

    pub async fn process(&self, query: &str) -> Result<ChatReply, AgentError> {
        let start = Instant::now();
        let query = query.trim();
        if query.is_empty() {
            return Err(AgentError::Input("Query is required".to_string()));
        }

        let intent = self.classifier.classify(query);
        info!(kind = ?intent.kind, teams = ?intent.teams, players = ?intent.players, "Classified query");

        let (prompt, data) = match intent.kind {
            QueryKind::Player => {
                let name = intent.players.first().map_or(query, String::as_str);
                let report = self.player_report(name).await?;
                (
                    prompts::player_prompt(query, &report.player, &report.similar_players),
                    serde_json::to_value(&report)?,
                )
            }
            QueryKind::Team => {
                let team = intent
                    .teams
                    .first()
                    .ok_or_else(|| AgentError::Input(format!("No team found in \"{query}\"")))?;
                let report = self.team_report(team).await?;
                (prompts::team_prompt(query, &report), serde_json::to_value(&report)?)
            }
            QueryKind::Trade => {
                let report = self.trade_report(&intent.players).await?;
                (
                    prompts::trade_prompt(query, &report.players, &report.validation),
                    serde_json::to_value(&report)?,
                )
            }
        };

        let response = self.generator.generate(&prompt).await?.into_response();
        info!(
            kind = ?intent.kind,
            elapsed_ms = start.elapsed().as_millis(),
            "Chat query answered"
        );

        Ok(ChatReply {
            response,
            query_type: intent.kind,
            data,
        })
    }

    /// A player and up to five others paid within $500,000 of them.
    pub async fn player_report(&self, name: &str) -> Result<PlayerReport, AgentError> {
        let store = self.validator.store();
        let player = store
            .find_player(name)
            .await?
            .ok_or_else(|| AgentError::Input(format!("Player \"{name}\" not found.")))?;

        let similar_players = match player.salary {
            Some(salary) if salary > 0 => {
                store
                    .find_players_in_salary_range(
                        salary - SIMILAR_SALARY_WINDOW,
                        salary + SIMILAR_SALARY_WINDOW,
                        &player.name,
                        MAX_SIMILAR_PLAYERS,
                    )
                    .await?
            }
            _ => Vec::new(),
        };

        Ok(PlayerReport {
            player,
            similar_players,
        })
    }

    pub async fn team_report(&self, team: &str) -> Result<TeamReport, AgentError> {
        let store = self.validator.store().as_ref();
        let roster = lookup_roster(store, team).await?;
        if roster.players.is_empty() {
            return Err(AgentError::Input(format!(
                "Team \"{}\" not found or has no players.",
                roster.team
            )));
        }

        let payroll = team_payroll(store, &roster.team).await?;
        Ok(TeamReport {
            team: store.find_team(&roster.team).await?,
            playoff_series: store.find_playoff_series(&roster.team).await?,
            needs: analyze_team_needs(&roster.players),
            salary_situation: team_salary_situation(payroll, self.validator.thresholds()),
            total_salary: roster.total_salary,
            abbreviation: roster.team,
            roster: roster.players,
        })
    }

    /// Two named players swap teams.
    async fn trade_report(&self, names: &[String]) -> Result<TradeReport, AgentError> {
        let [first, second] = names else {
            return Err(AgentError::Input(
                "Name two players to trade, e.g. \"LeBron James for Luka Doncic\".".to_string(),
            ));
        };

        let first = self.resolve_player(first).await?;
        let second = self.resolve_player(second).await?;
        if first.team == second.team {
            return Err(AgentError::Input(format!(
                "{} and {} both play for {}.",
                first.name, second.name, first.team
            )));
        }

        let proposal = TradeProposal::two_team(
            &first.team,
            &second.team,
            vec![TradePlayer::from(&first)],
            vec![TradePlayer::from(&second)],
        );
        let validation = self.validator.validate(&proposal).await?;

        Ok(TradeReport {
            players: vec![first, second],
            proposal,
            validation,
        })
    }

    /// Validate and narrate a two-team trade of named players. Each player
    /// must currently play for the team that sends them.
    pub async fn analyze_trade(
        &self,
        first_team: &str,
        second_team: &str,
        from_first: &[String],
        from_second: &[String],
    ) -> Result<TradeAnalysis, AgentError> {
        let trade = self
            .named_trade(first_team, second_team, from_first, from_second)
            .await?;
        let prompt = prompts::trade_prompt(&trade.query, &trade.players, &trade.validation);
        self.narrate(&prompt, trade.validation).await
    }

    /// Like [`analyze_trade`](Self::analyze_trade), but the narration covers
    /// each team's playoff outlook, grounded on its recorded series.
    pub async fn playoff_impact(
        &self,
        first_team: &str,
        second_team: &str,
        from_first: &[String],
        from_second: &[String],
    ) -> Result<TradeAnalysis, AgentError> {
        let trade = self
            .named_trade(first_team, second_team, from_first, from_second)
            .await?;

        let store = self.validator.store();
        let mut outlooks = Vec::with_capacity(2);
        for team in [trade.first_team.as_str(), trade.second_team.as_str()] {
            outlooks.push((team, store.find_playoff_series(team).await?));
        }
        info!(
            first = %trade.first_team,
            second = %trade.second_team,
            series = outlooks.iter().map(|(_, s)| s.len()).sum::<usize>(),
            "Playoff impact context gathered"
        );

        let prompt =
            prompts::playoff_impact_prompt(&trade.query, &trade.players, &trade.validation, &outlooks);
        self.narrate(&prompt, trade.validation).await
    }

    async fn named_trade(
        &self,
        first_team: &str,
        second_team: &str,
        from_first: &[String],
        from_second: &[String],
    ) -> Result<NamedTrade, AgentError> {
        let first_team = normalize_abbreviation(first_team);
        let second_team = normalize_abbreviation(second_team);

        let mut players = Vec::with_capacity(from_first.len() + from_second.len());
        let mut outgoing = [Vec::new(), Vec::new()];
        for (side, (team, names)) in [(&first_team, from_first), (&second_team, from_second)]
            .into_iter()
            .enumerate()
        {
            for name in names {
                let player = self.resolve_player(name).await?;
                if normalize_abbreviation(&player.team) != *team {
                    return Err(AgentError::Input(format!(
                        "{} does not play for {team}.",
                        player.name
                    )));
                }
                outgoing[side].push(TradePlayer::from(&player));
                players.push(player);
            }
        }

        let [send_first, send_second] = outgoing;
        let proposal = TradeProposal::two_team(&first_team, &second_team, send_first, send_second);
        let validation = self.validator.validate(&proposal).await?;

        let query = format!(
            "Trade {} ({first_team}) for {} ({second_team})",
            from_first.join(", "),
            from_second.join(", ")
        );
        Ok(NamedTrade {
            first_team,
            second_team,
            query,
            players,
            validation,
        })
    }

    async fn narrate(
        &self,
        prompt: &str,
        validation: ValidationResult,
    ) -> Result<TradeAnalysis, AgentError> {
        let response = self.generator.generate(prompt).await?.into_response();
        Ok(TradeAnalysis {
            response,
            validation,
        })
    }

    async fn resolve_player(&self, name: &str) -> Result<Player, AgentError> {
        match self.validator.store().find_player(name).await? {
            Some(player) => Ok(player),
            None => {
                warn!(player = %name, "Player not found");
                Err(AgentError::Input(format!("Player \"{name}\" not found.")))
            }
        }
    }
}
