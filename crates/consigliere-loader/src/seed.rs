use std::path::Path;

use consigliere_agents::salary_cap::{format_salary, salary_in_bounds};
use consigliere_models::{CapThresholds, Player, PlayoffSeries, Team};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::writer::SqliteWriter;

/// What one load wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub players: usize,
    pub teams: usize,
    pub playoff_series: usize,
    /// Player rows whose salary lies outside the league minimum/maximum.
    pub salary_warnings: usize,
}

/// Read a JSON array of records.
pub fn read_seed<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoaderError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| LoaderError::Seed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Count (and log) players whose salary is outside the league bounds.
/// Players without a salary are not flagged.
pub fn check_salaries(players: &[Player], thresholds: &CapThresholds) -> usize {
    let mut flagged = 0;
    for player in players {
        let Some(salary) = player.salary else {
            continue;
        };
        if !salary_in_bounds(salary, thresholds) {
            warn!(
                player = %player.name,
                team = %player.team,
                salary = %format_salary(salary),
                "Salary outside league bounds"
            );
            flagged += 1;
        }
    }
    flagged
}

/// Load every configured seed file into the store.
pub fn load_seeds(config: &LoaderConfig, writer: &mut SqliteWriter) -> Result<LoadSummary, LoaderError> {
    let mut summary = LoadSummary::default();

    if let Some(path) = &config.seeds.teams {
        let teams: Vec<Team> = read_seed(Path::new(path))?;
        writer.upsert_teams(&teams)?;
        summary.teams = teams.len();
        info!(path = %path, count = teams.len(), "Loaded teams");
    }

    if let Some(path) = &config.seeds.players {
        let players: Vec<Player> = read_seed(Path::new(path))?;
        summary.salary_warnings = check_salaries(&players, &config.cba);
        writer.upsert_players(&players)?;
        summary.players = players.len();
        info!(
            path = %path,
            count = players.len(),
            salary_warnings = summary.salary_warnings,
            "Loaded players"
        );
    }

    if let Some(path) = &config.seeds.playoff_series {
        let series: Vec<PlayoffSeries> = read_seed(Path::new(path))?;
        writer.upsert_series(&series)?;
        summary.playoff_series = series.len();
        info!(path = %path, count = series.len(), "Loaded playoff series");
    }

    Ok(summary)
}
