use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use consigliere_models::store_schema::{CURRENT_SEASON, STORE_DDL};
use consigliere_models::{
    normalize_abbreviation, Player, PlayerStats, PlayoffSeries, SeriesTeam, Team,
};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::store::DataStore;

const PLAYER_COLUMNS: &str = "name, team, position, salary, stats_json";

/// A player row before its stats JSON is decoded.
struct PlayerRow {
    name: String,
    team: String,
    position: Option<String>,
    salary: Option<i64>,
    stats_json: Option<String>,
}

impl PlayerRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            team: row.get(1)?,
            position: row.get(2)?,
            salary: row.get(3)?,
            stats_json: row.get(4)?,
        })
    }

    fn into_player(self) -> Result<Player, StoreError> {
        let stats = match self.stats_json {
            Some(json) => Some(serde_json::from_str::<PlayerStats>(&json)?),
            None => None,
        };
        Ok(Player {
            name: self.name,
            team: self.team,
            position: self.position,
            salary: self.salary,
            stats,
        })
    }
}

/// SQLite-backed document store.
///
/// The database is written by the loader and read here. Access is
/// synchronized via `Mutex` since `rusqlite::Connection` is not `Sync`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a read-only connection to the store database.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database with the schema created.
    /// The in-memory DB is writable so tests can seed data.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(STORE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("SQLite mutex poisoned: {e}")))
    }

    fn query_players<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<Player>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt
            .query_map(params, PlayerRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(PlayerRow::into_player).collect()
    }

    /// All players currently on a team.
    pub fn roster(&self, team: &str) -> Result<Vec<Player>, StoreError> {
        let team = normalize_abbreviation(team);
        let players = self.query_players(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE team = ?1 ORDER BY name"),
            rusqlite::params![team],
        )?;
        debug!(team = %team, count = players.len(), "Roster query");
        Ok(players)
    }

    pub fn team_payroll(&self, team: &str) -> Result<Option<i64>, StoreError> {
        let conn = self.conn()?;
        let payroll: Option<Option<i64>> = conn
            .query_row(
                "SELECT total_payroll FROM teams WHERE abbreviation = ?1",
                rusqlite::params![normalize_abbreviation(team)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payroll.flatten())
    }

    pub fn team(&self, abbreviation: &str) -> Result<Option<Team>, StoreError> {
        let conn = self.conn()?;
        let team = conn
            .query_row(
                "SELECT abbreviation, name, total_payroll, luxury_tax_status \
                 FROM teams WHERE abbreviation = ?1",
                rusqlite::params![normalize_abbreviation(abbreviation)],
                |row| {
                    Ok(Team {
                        abbreviation: row.get(0)?,
                        name: row.get(1)?,
                        total_payroll: row.get(2)?,
                        luxury_tax_status: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(team)
    }

    pub fn player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let exact = self.query_players(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1 COLLATE NOCASE LIMIT 1"),
            rusqlite::params![name],
        )?;
        if let Some(player) = exact.into_iter().next() {
            return Ok(Some(player));
        }

        let partial = self.query_players(
            &format!(
                "SELECT {PLAYER_COLUMNS} FROM players WHERE name LIKE ?1 \
                 ORDER BY salary DESC LIMIT 1"
            ),
            rusqlite::params![format!("%{name}%")],
        )?;
        Ok(partial.into_iter().next())
    }

    pub fn players_in_salary_range(
        &self,
        min: i64,
        max: i64,
        exclude_name: &str,
        limit: usize,
    ) -> Result<Vec<Player>, StoreError> {
        let midpoint = min + (max - min) / 2;
        self.query_players(
            &format!(
                "SELECT {PLAYER_COLUMNS} FROM players \
                 WHERE salary BETWEEN ?1 AND ?2 AND name <> ?3 COLLATE NOCASE \
                 ORDER BY ABS(salary - ?4), name LIMIT ?5"
            ),
            rusqlite::params![min, max, exclude_name, midpoint, limit as i64],
        )
    }

    pub fn players_by_positions(
        &self,
        positions: &[String],
        exclude_team: &str,
    ) -> Result<Vec<Player>, StoreError> {
        if positions.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = (0..positions.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {PLAYER_COLUMNS} FROM players \
             WHERE team <> ?1 AND position IN ({placeholders}) ORDER BY name"
        );
        let values = std::iter::once(normalize_abbreviation(exclude_team))
            .chain(positions.iter().cloned())
            .collect::<Vec<_>>();
        self.query_players(&sql, rusqlite::params_from_iter(values))
    }

    pub fn playoff_series(&self, team: &str) -> Result<Vec<PlayoffSeries>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT series_id, season, round, conference, team1, team1_seed, team1_wins, \
             team2, team2_seed, team2_wins, winner \
             FROM playoff_series WHERE team1 = ?1 OR team2 = ?1 ORDER BY series_id",
        )?;
        let series = stmt
            .query_map(rusqlite::params![normalize_abbreviation(team)], |row| {
                Ok(PlayoffSeries {
                    series_id: row.get(0)?,
                    season: row.get(1)?,
                    round: row.get(2)?,
                    conference: row.get(3)?,
                    team1: SeriesTeam {
                        abbreviation: row.get(4)?,
                        seed: row.get(5)?,
                        games_won: row.get(6)?,
                    },
                    team2: SeriesTeam {
                        abbreviation: row.get(7)?,
                        seed: row.get(8)?,
                        games_won: row.get(9)?,
                    },
                    winner: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(series)
    }

    /// Insert a player. In production the loader writes the database directly;
    /// this is available for tests.
    pub fn insert_player(&self, player: &Player) -> Result<(), StoreError> {
        let stats_json = player
            .stats
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO players \
             (name, team, position, salary, stats_json, season, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                player.name,
                normalize_abbreviation(&player.team),
                player.position,
                player.salary,
                stats_json,
                CURRENT_SEASON,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_team(&self, team: &Team) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO teams \
             (abbreviation, name, total_payroll, luxury_tax_status, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                normalize_abbreviation(&team.abbreviation),
                team.name,
                team.total_payroll,
                team.luxury_tax_status,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn insert_series(&self, series: &PlayoffSeries) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO playoff_series \
             (series_id, season, round, conference, team1, team1_seed, team1_wins, \
              team2, team2_seed, team2_wins, winner) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                series.series_id,
                series.season,
                series.round,
                series.conference,
                normalize_abbreviation(&series.team1.abbreviation),
                series.team1.seed,
                series.team1.games_won,
                normalize_abbreviation(&series.team2.abbreviation),
                series.team2.seed,
                series.team2.games_won,
                normalize_abbreviation(&series.winner),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn find_roster(&self, team: &str) -> Result<Vec<Player>, StoreError> {
        self.roster(team)
    }

    async fn find_team_payroll(&self, team: &str) -> Result<Option<i64>, StoreError> {
        self.team_payroll(team)
    }

    async fn find_team(&self, abbreviation: &str) -> Result<Option<Team>, StoreError> {
        self.team(abbreviation)
    }

    async fn find_player(&self, name: &str) -> Result<Option<Player>, StoreError> {
        self.player(name)
    }

    async fn find_players_in_salary_range(
        &self,
        min: i64,
        max: i64,
        exclude_name: &str,
        limit: usize,
    ) -> Result<Vec<Player>, StoreError> {
        self.players_in_salary_range(min, max, exclude_name, limit)
    }

    async fn find_players_by_positions(
        &self,
        positions: &[String],
        exclude_team: &str,
    ) -> Result<Vec<Player>, StoreError> {
        self.players_by_positions(positions, exclude_team)
    }

    async fn find_playoff_series(&self, team: &str) -> Result<Vec<PlayoffSeries>, StoreError> {
        self.playoff_series(team)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}
