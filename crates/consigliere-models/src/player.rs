use serde::{Deserialize, Serialize};

/// Per-game averages for the tracked season.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerStats {
    pub games_played: f64,
    pub minutes_per_game: f64,
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
    pub steals_per_game: f64,
    pub blocks_per_game: f64,
    pub turnovers_per_game: f64,
    pub field_goal_percentage: f64,
    pub three_point_percentage: f64,
    pub free_throw_percentage: f64,
}

/// A player record as held by the data store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    /// Unique within a season.
    pub name: String,
    /// Team abbreviation (e.g., "BOS").
    pub team: String,
    #[serde(default)]
    pub position: Option<String>,
    /// Season salary in dollars. None when the source had no contract figure.
    #[serde(default, alias = "salary_2023_2024")]
    pub salary: Option<i64>,
    #[serde(default, alias = "stats_2023_2024")]
    pub stats: Option<PlayerStats>,
}

impl Player {
    /// Salary with the permissive fallback: a missing figure counts as zero.
    pub fn salary_or_zero(&self) -> i64 {
        self.salary.unwrap_or(0)
    }

    pub fn minutes_per_game(&self) -> f64 {
        self.stats.as_ref().map_or(0.0, |s| s.minutes_per_game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_without_salary_or_stats() {
        let json = r#"{"name": "Two-Way Guy", "team": "OKC"}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.salary, None);
        assert_eq!(player.salary_or_zero(), 0);
        assert_eq!(player.minutes_per_game(), 0.0);
    }

    #[test]
    fn player_accepts_seasonal_field_names() {
        let json = r#"{
            "name": "Josh Giddey",
            "team": "OKC",
            "position": "G",
            "salary_2023_2024": 6587040,
            "stats_2023_2024": {"minutes_per_game": 25.1, "points_per_game": 12.3}
        }"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.salary, Some(6_587_040));
        let stats = player.stats.unwrap();
        assert_eq!(stats.points_per_game, 12.3);
        assert_eq!(stats.rebounds_per_game, 0.0);
    }
}
