use consigliere_models::CapThresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub store: LoaderStoreConfig,
    #[serde(default)]
    pub seeds: SeedConfig,
    /// Salary bounds used to flag suspicious player rows.
    #[serde(default)]
    pub cba: CapThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderStoreConfig {
    /// Path to the SQLite file the server reads.
    pub sqlite_path: String,
}

/// JSON seed files, each an array of records. Omitted files are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    pub players: Option<String>,
    pub teams: Option<String>,
    pub playoff_series: Option<String>,
}
