use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cba::TeamSalarySituation;

/// Salary movement for one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalaryChange {
    pub salary_out: i64,
    pub salary_in: i64,
    pub net_change: i64,
    pub new_total_salary: i64,
}

/// Salary analysis stage output. Produces numbers only, no verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalaryAnalysis {
    /// Pre-trade cap position per team.
    pub team_situations: BTreeMap<String, TeamSalarySituation>,
    /// Pre-trade roster size per team.
    pub roster_sizes: BTreeMap<String, i64>,
    pub salary_changes: BTreeMap<String, SalaryChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterCheck {
    pub current_size: i64,
    pub players_out: i64,
    pub players_in: i64,
    pub new_size: i64,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RosterValidation {
    pub is_valid: bool,
    pub details: BTreeMap<String, RosterCheck>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CbaRule {
    #[serde(rename = "Second Apron")]
    SecondApron,
    #[serde(rename = "First Apron")]
    FirstApron,
    #[serde(rename = "Salary Matching")]
    SalaryMatching,
}

impl fmt::Display for CbaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SecondApron => "Second Apron",
            Self::FirstApron => "First Apron",
            Self::SalaryMatching => "Salary Matching",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Violated,
}

/// An itemized rule violation for one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleOutcome {
    pub team: String,
    pub rule: CbaRule,
    pub status: RuleStatus,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleValidation {
    pub is_valid: bool,
    pub rules: Vec<RuleOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationDetails {
    pub salary_analysis: SalaryAnalysis,
    pub roster_validation: RosterValidation,
    pub rule_validation: RuleValidation,
}

/// Legality verdict for a trade proposal. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub id: Uuid,
    pub is_valid: bool,
    pub details: ValidationDetails,
    pub validated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

impl ValidationResult {
    pub fn violations(&self) -> &[RuleOutcome] {
        &self.details.rule_validation.rules
    }

    pub fn violations_for<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a RuleOutcome> {
        self.violations().iter().filter(move |r| r.team == team)
    }

    /// Teams whose post-trade roster size falls outside the allowed range.
    pub fn roster_failures(&self) -> Vec<&str> {
        self.details
            .roster_validation
            .details
            .iter()
            .filter(|(_, check)| !check.is_valid)
            .map(|(team, _)| team.as_str())
            .collect()
    }
}
