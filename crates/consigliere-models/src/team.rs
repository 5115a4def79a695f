use serde::{Deserialize, Serialize};

/// Canonical form of a team abbreviation ("bos " -> "BOS").
pub fn normalize_abbreviation(abbreviation: &str) -> String {
    abbreviation.trim().to_ascii_uppercase()
}

/// Team reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub abbreviation: String,
    pub name: String,
    /// Recorded payroll when the source tracks it separately from the roster.
    #[serde(default)]
    pub total_payroll: Option<i64>,
    #[serde(default)]
    pub luxury_tax_status: Option<String>,
}

/// One side of a playoff series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesTeam {
    pub abbreviation: String,
    pub seed: Option<u32>,
    pub games_won: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayoffSeries {
    pub series_id: String,
    pub season: String,
    /// "First Round", "Conference Semifinals", "Conference Finals" or "NBA Finals".
    pub round: String,
    pub conference: Option<String>,
    pub team1: SeriesTeam,
    pub team2: SeriesTeam,
    /// Abbreviation of the series winner.
    pub winner: String,
}

impl PlayoffSeries {
    pub fn involves(&self, team: &str) -> bool {
        self.team1.abbreviation == team || self.team2.abbreviation == team
    }

    pub fn is_sweep(&self) -> bool {
        self.team1.games_won.min(self.team2.games_won) == 0
    }
}
