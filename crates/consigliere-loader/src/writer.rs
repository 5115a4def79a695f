use chrono::Utc;
use consigliere_models::store_schema::{CURRENT_SEASON, STORE_DDL};
use consigliere_models::{normalize_abbreviation, Player, PlayoffSeries, Team};
use rusqlite::{params, Connection};

use crate::error::LoaderError;

const UPSERT_PLAYER: &str = "INSERT OR REPLACE INTO players \
     (name, team, position, salary, stats_json, season, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const UPSERT_TEAM: &str = "INSERT OR REPLACE INTO teams \
     (abbreviation, name, total_payroll, luxury_tax_status, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?5)";

const UPSERT_SERIES: &str = "INSERT OR REPLACE INTO playoff_series \
     (series_id, season, round, conference, team1, team1_seed, team1_wins, \
      team2, team2_seed, team2_wins, winner) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

/// Writable connection to the store database.
///
/// Opens in read-write mode with the WAL journal so the server can keep
/// reading while a load runs. Each batch is one transaction; readers see
/// either all of it or none of it.
pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open (creating if needed) the database, create the schema and enable WAL.
    pub fn open(path: &str) -> Result<Self, LoaderError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(STORE_DDL)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, LoaderError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(STORE_DDL)?;
        Ok(Self { conn })
    }

    pub fn upsert_players(&mut self, players: &[Player]) -> Result<(), LoaderError> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_PLAYER)?;
            for player in players {
                let stats_json = player
                    .stats
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?;
                stmt.execute(params![
                    player.name.trim(),
                    normalize_abbreviation(&player.team),
                    player.position,
                    player.salary,
                    stats_json,
                    CURRENT_SEASON,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn upsert_teams(&mut self, teams: &[Team]) -> Result<(), LoaderError> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_TEAM)?;
            for team in teams {
                stmt.execute(params![
                    normalize_abbreviation(&team.abbreviation),
                    team.name,
                    team.total_payroll,
                    team.luxury_tax_status,
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn upsert_series(&mut self, series: &[PlayoffSeries]) -> Result<(), LoaderError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SERIES)?;
            for s in series {
                stmt.execute(params![
                    s.series_id,
                    s.season,
                    s.round,
                    s.conference,
                    normalize_abbreviation(&s.team1.abbreviation),
                    s.team1.seed,
                    s.team1.games_won,
                    normalize_abbreviation(&s.team2.abbreviation),
                    s.team2.seed,
                    s.team2.games_won,
                    normalize_abbreviation(&s.winner),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn player_count(&self) -> Result<usize, LoaderError> {
        self.count("SELECT COUNT(*) FROM players")
    }

    pub fn team_count(&self) -> Result<usize, LoaderError> {
        self.count("SELECT COUNT(*) FROM teams")
    }

    pub fn series_count(&self) -> Result<usize, LoaderError> {
        self.count("SELECT COUNT(*) FROM playoff_series")
    }

    fn count(&self, sql: &str) -> Result<usize, LoaderError> {
        let count: usize = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count)
    }
}
