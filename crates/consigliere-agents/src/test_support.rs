//! Test doubles for the generator and store seams.
//!
//! `StaticGenerator` answers every prompt with the same canned generation and
//! remembers the prompts it saw. `StalledStore` and `BrokenStore` wrap the
//! failure modes a validator must survive: lookups that never finish and
//! lookups that fail outright.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use consigliere_models::{Player, PlayoffSeries, Team};
use consigliere_store::{DataStore, StoreError};

use crate::error::AgentError;
use crate::generator::{Generation, TextGenerator};

pub struct StaticGenerator {
    generation: Generation,
    prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
    pub fn new(generation: Generation) -> Self {
        Self {
            generation,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(Generation::Text(text.to_string()))
    }

    pub fn blocked(reason: &str) -> Self {
        Self::new(Generation::Blocked {
            reason: Some(reason.to_string()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts().pop()
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation, AgentError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.generation.clone())
    }
}

/// Always fails, like a generator whose command is missing.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Generation, AgentError> {
        Err(AgentError::Generator("generator offline".to_string()))
    }
}

/// Every roster lookup sleeps for `delay` before answering with nothing.
pub struct StalledStore {
    pub delay: Duration,
}

/// Every call fails with `StoreError::Unavailable`.
pub struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Unavailable("database is locked".to_string())
}

#[async_trait]
impl DataStore for StalledStore {
    async fn find_roster(&self, _team: &str) -> Result<Vec<Player>, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn find_team_payroll(&self, _team: &str) -> Result<Option<i64>, StoreError> {
        Ok(None)
    }

    async fn find_team(&self, _abbreviation: &str) -> Result<Option<Team>, StoreError> {
        Ok(None)
    }

    async fn find_player(&self, _name: &str) -> Result<Option<Player>, StoreError> {
        Ok(None)
    }

    async fn find_players_in_salary_range(
        &self,
        _min: i64,
        _max: i64,
        _exclude_name: &str,
        _limit: usize,
    ) -> Result<Vec<Player>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_players_by_positions(
        &self,
        _positions: &[String],
        _exclude_team: &str,
    ) -> Result<Vec<Player>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_playoff_series(&self, _team: &str) -> Result<Vec<PlayoffSeries>, StoreError> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl DataStore for BrokenStore {
    async fn find_roster(&self, _team: &str) -> Result<Vec<Player>, StoreError> {
        Err(broken())
    }

    async fn find_team_payroll(&self, _team: &str) -> Result<Option<i64>, StoreError> {
        Err(broken())
    }

    async fn find_team(&self, _abbreviation: &str) -> Result<Option<Team>, StoreError> {
        Err(broken())
    }

    async fn find_player(&self, _name: &str) -> Result<Option<Player>, StoreError> {
        Err(broken())
    }

    async fn find_players_in_salary_range(
        &self,
        _min: i64,
        _max: i64,
        _exclude_name: &str,
        _limit: usize,
    ) -> Result<Vec<Player>, StoreError> {
        Err(broken())
    }

    async fn find_players_by_positions(
        &self,
        _positions: &[String],
        _exclude_team: &str,
    ) -> Result<Vec<Player>, StoreError> {
        Err(broken())
    }

    async fn find_playoff_series(&self, _team: &str) -> Result<Vec<PlayoffSeries>, StoreError> {
        Err(broken())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(broken())
    }
}
