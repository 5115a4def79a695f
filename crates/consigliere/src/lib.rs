//! NBA Trade Consigliere
//!
//! A trade assistant for the 2023-24 NBA season. Free-text questions about
//! players, teams and trades are answered by a text generator grounded on
//! stored data; trades are checked against the salary-cap rules first.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use consigliere::models::{ConsigliereConfig, TradePlayer, TradeProposal};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConsigliereConfig::default();
//! let state = consigliere::build_state(&config)?;
//! let proposal = TradeProposal::two_team(
//!     "OKC",
//!     "ORL",
//!     vec![TradePlayer::new("Josh Giddey", Some(6_587_040))],
//!     vec![TradePlayer::new("Cole Anthony", Some(5_539_771))],
//! );
//! let result = state.validator.validate(&proposal).await?;
//! println!("legal: {}", result.is_valid);
//! # Ok(())
//! # }
//! ```

pub use consigliere_agents as agents;
pub use consigliere_models as models;
pub use consigliere_store as store;

pub mod api;
pub mod error;
pub mod ingress;

use std::sync::Arc;
use std::time::Duration;

use consigliere_agents::{
    ChatHandler, CommandGenerator, KeywordClassifier, TextGenerator, TradeSimulator,
    TradeValidator,
};
use consigliere_models::ConsigliereConfig;
use consigliere_store::{DataStore, SqliteStore};

pub use api::{router, AppState};
pub use error::ApiError;
pub use ingress::RateLimiter;

/// Build the service graph from configuration: the SQLite store written by
/// the loader and the configured generator command.
pub fn build_state(config: &ConsigliereConfig) -> Result<AppState, anyhow::Error> {
    let store = SqliteStore::open(&config.store.sqlite_path)?;
    let generator = CommandGenerator::new(config.generator.clone());
    Ok(build_state_with(Arc::new(store), Arc::new(generator), config))
}

/// Build the service graph around an existing store and generator.
pub fn build_state_with(
    store: Arc<dyn DataStore>,
    generator: Arc<dyn TextGenerator>,
    config: &ConsigliereConfig,
) -> AppState {
    let validator = Arc::new(TradeValidator::new(
        store,
        config.cba.clone(),
        Duration::from_millis(config.validator.lookup_timeout_ms),
    ));

    AppState {
        chat: Arc::new(ChatHandler::new(
            Arc::new(KeywordClassifier::new()),
            generator,
            Arc::clone(&validator),
        )),
        simulator: Arc::new(TradeSimulator::new(Arc::clone(&validator))),
        limiter: config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit))),
        validator,
    }
}
