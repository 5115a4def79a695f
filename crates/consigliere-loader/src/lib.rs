//! Loads JSON seed data (players, teams, playoff series) into the SQLite
//! database the Consigliere server reads.

pub mod config;
pub mod error;
pub mod seed;
pub mod writer;

pub use config::LoaderConfig;
pub use error::LoaderError;
pub use seed::{load_seeds, LoadSummary};
pub use writer::SqliteWriter;
