use consigliere_models::{normalize_abbreviation, Player};
use consigliere_store::{DataStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A team's current roster and the sum of its salaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterSnapshot {
    pub team: String,
    pub players: Vec<Player>,
    /// Missing salaries count as zero.
    pub total_salary: i64,
}

impl RosterSnapshot {
    pub fn size(&self) -> i64 {
        self.players.len() as i64
    }
}

/// Fetch a roster from the store. An unknown team yields an empty snapshot.
pub async fn lookup_roster(store: &dyn DataStore, team: &str) -> Result<RosterSnapshot, StoreError> {
    let team = normalize_abbreviation(team);
    let players = store.find_roster(&team).await?;
    if players.is_empty() {
        warn!(team = %team, "No players found for team");
    }
    let total_salary = players.iter().map(Player::salary_or_zero).sum();
    debug!(team = %team, size = players.len(), total_salary, "Roster lookup");
    Ok(RosterSnapshot {
        team,
        players,
        total_salary,
    })
}

/// Team payroll: the recorded figure when present and non-zero, else the roster sum.
pub async fn team_payroll(store: &dyn DataStore, team: &str) -> Result<i64, StoreError> {
    let team = normalize_abbreviation(team);
    match store.find_team_payroll(&team).await? {
        Some(payroll) if payroll != 0 => Ok(payroll),
        _ => Ok(lookup_roster(store, &team).await?.total_salary),
    }
}
