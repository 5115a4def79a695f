use async_trait::async_trait;
use consigliere_models::{Player, PlayoffSeries, Team};

use crate::error::StoreError;

/// Read-only access to players, teams and playoff series. Mockable for testing.
///
/// Team abbreviations are matched case-insensitively. An unknown team yields
/// an empty roster, not an error.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn find_roster(&self, team: &str) -> Result<Vec<Player>, StoreError>;

    /// Recorded payroll for a team, if the store tracks one.
    async fn find_team_payroll(&self, team: &str) -> Result<Option<i64>, StoreError>;

    async fn find_team(&self, abbreviation: &str) -> Result<Option<Team>, StoreError>;

    /// Exact (case-insensitive) name match, falling back to a partial match.
    async fn find_player(&self, name: &str) -> Result<Option<Player>, StoreError>;

    /// Players whose salary lies in `[min, max]`, excluding `exclude_name`,
    /// ordered by distance from the midpoint.
    async fn find_players_in_salary_range(
        &self,
        min: i64,
        max: i64,
        exclude_name: &str,
        limit: usize,
    ) -> Result<Vec<Player>, StoreError>;

    /// Players at any of `positions` who are not on `exclude_team`.
    async fn find_players_by_positions(
        &self,
        positions: &[String],
        exclude_team: &str,
    ) -> Result<Vec<Player>, StoreError>;

    async fn find_playoff_series(&self, team: &str) -> Result<Vec<PlayoffSeries>, StoreError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}
