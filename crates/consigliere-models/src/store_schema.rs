/// The SQLite schema the loader writes and the store reads.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS players (
///     name        TEXT PRIMARY KEY,
///     team        TEXT NOT NULL,
///     position    TEXT,
///     salary      INTEGER,
///     stats_json  TEXT,
///     season      TEXT NOT NULL,
///     updated_at  TEXT NOT NULL
/// );
/// ```
///
/// Team abbreviations are stored upper-case. `salary` and `stats_json` are
/// nullable; readers treat a missing salary as zero.
pub const STORE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS players (
    name        TEXT PRIMARY KEY,
    team        TEXT NOT NULL,
    position    TEXT,
    salary      INTEGER,
    stats_json  TEXT,
    season      TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_players_team ON players(team);
CREATE INDEX IF NOT EXISTS idx_players_salary ON players(salary);
CREATE INDEX IF NOT EXISTS idx_players_position ON players(position);

CREATE TABLE IF NOT EXISTS teams (
    abbreviation       TEXT PRIMARY KEY,
    name               TEXT NOT NULL,
    total_payroll      INTEGER,
    luxury_tax_status  TEXT,
    updated_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS playoff_series (
    series_id    TEXT PRIMARY KEY,
    season       TEXT NOT NULL,
    round        TEXT NOT NULL,
    conference   TEXT,
    team1        TEXT NOT NULL,
    team1_seed   INTEGER,
    team1_wins   INTEGER NOT NULL,
    team2        TEXT NOT NULL,
    team2_seed   INTEGER,
    team2_wins   INTEGER NOT NULL,
    winner       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_series_team1 ON playoff_series(team1);
CREATE INDEX IF NOT EXISTS idx_series_team2 ON playoff_series(team2);
";

/// Season label written with every player row.
pub const CURRENT_SEASON: &str = "2023-24";
