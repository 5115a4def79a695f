use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use consigliere_models::{
    normalize_abbreviation, CapThresholds, CbaRule, RosterCheck, RosterValidation, RuleOutcome,
    RuleStatus, RuleValidation, SalaryAnalysis, SalaryChange, TradePlayer, TradeProposal,
    ValidationDetails, ValidationResult, MAX_ROSTER_SIZE,
};
use consigliere_store::DataStore;
use rust_decimal::Decimal;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::roster::{lookup_roster, RosterSnapshot};
use crate::salary_cap::{max_incoming_salary, team_salary_situation, whole_dollars};

/// Decides whether a multi-team trade is legal under the cap rules.
///
/// Each call is independent: rosters are fetched fresh, the four stages run
/// as pure functions over the fetched data, and nothing is retained.
pub struct TradeValidator {
    store: Arc<dyn DataStore>,
    thresholds: CapThresholds,
    lookup_timeout: Duration,
}

impl TradeValidator {
    pub fn new(store: Arc<dyn DataStore>, thresholds: CapThresholds, lookup_timeout: Duration) -> Self {
        Self {
            store,
            thresholds,
            lookup_timeout,
        }
    }

    pub fn thresholds(&self) -> &CapThresholds {
        &self.thresholds
    }

    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// Validate a proposal. Rule violations come back as `is_valid: false`;
    /// errors mean no verdict could be reached.
    pub async fn validate(&self, proposal: &TradeProposal) -> Result<ValidationResult, ValidationError> {
        let start = Instant::now();
        let proposal = normalize_proposal(proposal);
        check_conservation(&proposal)?;
        check_salaries(&proposal, &self.thresholds)?;
        info!(teams = ?proposal.teams, "Starting trade validation");

        let rosters = self.fetch_rosters(&proposal.teams).await?;

        let salary_analysis = analyze_salaries(&proposal, &rosters, &self.thresholds)?;
        let roster_validation = validate_roster_sizes(&proposal, &rosters);
        let rule_validation = enforce_cba_rules(&salary_analysis, &self.thresholds);
        let result = aggregate(salary_analysis, roster_validation, rule_validation, start.elapsed());

        info!(
            teams = ?proposal.teams,
            is_valid = result.is_valid,
            violations = result.violations().len(),
            elapsed_ms = result.processing_time_ms,
            "Trade validation complete"
        );

        Ok(result)
    }

    /// Fan out one roster lookup per team and join them all, bounded by the
    /// lookup timeout. Any failure aborts the whole validation.
    async fn fetch_rosters(
        &self,
        teams: &[String],
    ) -> Result<BTreeMap<String, RosterSnapshot>, ValidationError> {
        let mut lookups = JoinSet::new();
        for team in teams {
            let store = Arc::clone(&self.store);
            let team = team.clone();
            lookups.spawn(async move { lookup_roster(store.as_ref(), &team).await });
        }

        let joined = async {
            let mut rosters = BTreeMap::new();
            while let Some(outcome) = lookups.join_next().await {
                let snapshot = outcome.map_err(|e| {
                    ValidationError::Unavailable(format!("Roster lookup task failed: {e}"))
                })??;
                rosters.insert(snapshot.team.clone(), snapshot);
            }
            Ok::<_, ValidationError>(rosters)
        };

        match tokio::time::timeout(self.lookup_timeout, joined).await {
            Ok(rosters) => rosters,
            Err(_) => {
                warn!(
                    teams = ?teams,
                    timeout_ms = self.lookup_timeout.as_millis(),
                    "Roster lookups timed out"
                );
                Err(ValidationError::Unavailable(format!(
                    "Roster lookups did not finish within {}ms",
                    self.lookup_timeout.as_millis()
                )))
            }
        }
    }
}

/// Canonical team keys: upper-case abbreviations throughout.
fn normalize_proposal(proposal: &TradeProposal) -> TradeProposal {
    fn normalize_side(
        side: &BTreeMap<String, Vec<TradePlayer>>,
    ) -> BTreeMap<String, Vec<TradePlayer>> {
        let mut out: BTreeMap<String, Vec<TradePlayer>> = BTreeMap::new();
        for (team, players) in side {
            out.entry(normalize_abbreviation(team))
                .or_default()
                .extend(players.iter().cloned());
        }
        out
    }

    TradeProposal {
        teams: proposal.teams.iter().map(|t| normalize_abbreviation(t)).collect(),
        players_out: normalize_side(&proposal.players_out),
        players_in: normalize_side(&proposal.players_in),
    }
}

fn player_key(player: &TradePlayer) -> String {
    player.name.trim().to_lowercase()
}

/// Stage 0: every player who leaves a team must arrive at exactly one other
/// participating team, and vice versa.
pub fn check_conservation(proposal: &TradeProposal) -> Result<(), ValidationError> {
    let malformed = |msg: String| Err(ValidationError::MalformedProposal(msg));

    if proposal.teams.len() < 2 {
        return malformed(format!(
            "A trade needs at least two teams, got {}",
            proposal.teams.len()
        ));
    }

    let mut seen = HashSet::new();
    for team in &proposal.teams {
        if team.is_empty() {
            return malformed("Empty team abbreviation".to_string());
        }
        if !seen.insert(team.as_str()) {
            return malformed(format!("Team {team} is listed more than once"));
        }
    }

    for team in proposal.players_out.keys().chain(proposal.players_in.keys()) {
        if !seen.contains(team.as_str()) {
            return malformed(format!("Team {team} moves players but is not part of the trade"));
        }
    }

    let mut departures: HashMap<String, &str> = HashMap::new();
    for (team, players) in &proposal.players_out {
        for player in players {
            if let Some(previous) = departures.insert(player_key(player), team) {
                return malformed(format!(
                    "{} leaves both {previous} and {team}",
                    player.name
                ));
            }
        }
    }

    let mut arrivals: HashMap<String, &str> = HashMap::new();
    for (team, players) in &proposal.players_in {
        for player in players {
            if let Some(previous) = arrivals.insert(player_key(player), team) {
                return malformed(format!(
                    "{} arrives at both {previous} and {team}",
                    player.name
                ));
            }
        }
    }

    for (team, players) in &proposal.players_out {
        for player in players {
            match arrivals.get(&player_key(player)) {
                None => {
                    return malformed(format!("{} leaves {team} but arrives nowhere", player.name))
                }
                Some(dest) if *dest == team.as_str() => {
                    return malformed(format!("{} leaves and arrives at {team}", player.name))
                }
                Some(_) => {}
            }
        }
    }

    for (team, players) in &proposal.players_in {
        for player in players {
            if !departures.contains_key(&player_key(player)) {
                return malformed(format!(
                    "{} arrives at {team} but leaves no other team",
                    player.name
                ));
            }
        }
    }

    Ok(())
}

/// Stage 0, continued: salaries must be plausible single contracts and a
/// player carries the same salary on both legs of the move.
pub fn check_salaries(
    proposal: &TradeProposal,
    thresholds: &CapThresholds,
) -> Result<(), ValidationError> {
    let sides = proposal.players_out.values().chain(proposal.players_in.values());
    for player in sides.flatten() {
        match player.salary {
            Some(salary) if salary < 0 => {
                return Err(ValidationError::MalformedProposal(format!(
                    "{} has a negative salary",
                    player.name
                )))
            }
            Some(salary) if salary > thresholds.salary_cap => {
                return Err(ValidationError::MalformedProposal(format!(
                    "{} has a salary above the salary cap",
                    player.name
                )))
            }
            _ => {}
        }
    }

    let arriving: HashMap<String, i64> = proposal
        .players_in
        .values()
        .flatten()
        .map(|p| (player_key(p), p.salary_or_zero()))
        .collect();
    for player in proposal.players_out.values().flatten() {
        if arriving.get(&player_key(player)) != Some(&player.salary_or_zero()) {
            return Err(ValidationError::MalformedProposal(format!(
                "{} is listed with different salaries leaving and arriving",
                player.name
            )));
        }
    }

    Ok(())
}

fn total_salary(players: &[TradePlayer]) -> Option<i64> {
    players
        .iter()
        .try_fold(0i64, |sum, p| sum.checked_add(p.salary_or_zero()))
}

fn overflow(team: &str) -> ValidationError {
    ValidationError::MalformedProposal(format!("Salary totals for {team} are out of range"))
}

/// Stage A: pre-trade cap position and salary movement per team.
pub fn analyze_salaries(
    proposal: &TradeProposal,
    rosters: &BTreeMap<String, RosterSnapshot>,
    thresholds: &CapThresholds,
) -> Result<SalaryAnalysis, ValidationError> {
    let mut analysis = SalaryAnalysis::default();

    for team in &proposal.teams {
        let (payroll, size) = rosters
            .get(team)
            .map_or((0, 0), |r| (r.total_salary, r.size()));
        let salary_out = total_salary(proposal.outgoing(team)).ok_or_else(|| overflow(team))?;
        let salary_in = total_salary(proposal.incoming(team)).ok_or_else(|| overflow(team))?;
        let net_change = salary_in.checked_sub(salary_out).ok_or_else(|| overflow(team))?;
        let new_total_salary = payroll.checked_add(net_change).ok_or_else(|| overflow(team))?;

        debug!(team = %team, payroll, salary_out, salary_in, "Salary analysis");

        analysis
            .team_situations
            .insert(team.clone(), team_salary_situation(payroll, thresholds));
        analysis.roster_sizes.insert(team.clone(), size);
        analysis.salary_changes.insert(
            team.clone(),
            SalaryChange {
                salary_out,
                salary_in,
                net_change,
                new_total_salary,
            },
        );
    }

    Ok(analysis)
}

/// Stage B: every post-trade roster must hold between 0 and 15 players.
pub fn validate_roster_sizes(
    proposal: &TradeProposal,
    rosters: &BTreeMap<String, RosterSnapshot>,
) -> RosterValidation {
    let mut validation = RosterValidation {
        is_valid: true,
        details: BTreeMap::new(),
    };

    for team in &proposal.teams {
        let current_size = rosters.get(team).map_or(0, RosterSnapshot::size);
        let players_out = proposal.outgoing(team).len() as i64;
        let players_in = proposal.incoming(team).len() as i64;
        let new_size = current_size - players_out + players_in;
        let is_valid = (0..=MAX_ROSTER_SIZE).contains(&new_size);

        validation.is_valid &= is_valid;
        validation.details.insert(
            team.clone(),
            RosterCheck {
                current_size,
                players_out,
                players_in,
                new_size,
                is_valid,
            },
        );
    }

    validation
}

/// Stage C: apron and salary-matching rules against post-trade payroll.
/// All comparisons are strict.
pub fn enforce_cba_rules(analysis: &SalaryAnalysis, thresholds: &CapThresholds) -> RuleValidation {
    let mut rules = Vec::new();

    for (team, change) in &analysis.salary_changes {
        let Some(situation) = analysis.team_situations.get(team) else {
            warn!(team = %team, "No salary situation for team");
            continue;
        };

        let violation = |rule: CbaRule, message: String| RuleOutcome {
            team: team.clone(),
            rule,
            status: RuleStatus::Violated,
            message,
        };

        if change.new_total_salary > thresholds.second_apron {
            rules.push(violation(
                CbaRule::SecondApron,
                "Team cannot aggregate salaries over Second Apron".to_string(),
            ));
        } else if change.new_total_salary > thresholds.first_apron
            && change.salary_in > change.salary_out
        {
            rules.push(violation(
                CbaRule::FirstApron,
                "Team cannot take back more salary than sent out".to_string(),
            ));
        }

        if situation.is_over_cap {
            let max_in = max_incoming_salary(change.salary_out, thresholds);
            if Decimal::from(change.salary_in) > max_in {
                rules.push(violation(
                    CbaRule::SalaryMatching,
                    format!("Team can only take back {} in salary", whole_dollars(max_in)),
                ));
            }
        }
    }

    RuleValidation {
        is_valid: rules.is_empty(),
        rules,
    }
}

/// Stage D: combine the stage outputs into a verdict.
pub fn aggregate(
    salary_analysis: SalaryAnalysis,
    roster_validation: RosterValidation,
    rule_validation: RuleValidation,
    elapsed: Duration,
) -> ValidationResult {
    ValidationResult {
        id: Uuid::new_v4(),
        is_valid: roster_validation.is_valid && rule_validation.is_valid,
        details: ValidationDetails {
            salary_analysis,
            roster_validation,
            rule_validation,
        },
        validated_at: Utc::now(),
        processing_time_ms: elapsed.as_millis() as u64,
    }
}
