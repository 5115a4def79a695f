use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hard ceiling on roster size after a trade.
pub const MAX_ROSTER_SIZE: i64 = 15;

/// League salary thresholds for one season.
///
/// `Default` is the 2023-24 season. Values are fixed for the lifetime of a
/// process; a deployment may override them through config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CapThresholds {
    pub salary_cap: i64,
    pub luxury_tax: i64,
    pub first_apron: i64,
    pub second_apron: i64,
    pub minimum_salary: i64,
    pub maximum_salary: i64,
    /// Incoming salary allowed per dollar sent out by an over-cap team.
    pub matching_ratio: Decimal,
    /// Flat allowance added on top of the ratio.
    pub matching_cushion: i64,
}

impl Default for CapThresholds {
    fn default() -> Self {
        Self {
            salary_cap: 136_021_000,
            luxury_tax: 165_294_000,
            first_apron: 172_346_000,
            second_apron: 182_794_000,
            minimum_salary: 953_859,
            maximum_salary: 47_600_000,
            matching_ratio: Decimal::new(125, 2),
            matching_cushion: 100_000,
        }
    }
}

/// Single-value classification of a payroll; highest tier wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApronStatus {
    #[serde(rename = "Under Cap")]
    UnderCap,
    #[serde(rename = "Over Cap")]
    OverCap,
    #[serde(rename = "Luxury Tax")]
    LuxuryTax,
    #[serde(rename = "First Apron")]
    FirstApron,
    #[serde(rename = "Second Apron")]
    SecondApron,
}

impl fmt::Display for ApronStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnderCap => "Under Cap",
            Self::OverCap => "Over Cap",
            Self::LuxuryTax => "Luxury Tax",
            Self::FirstApron => "First Apron",
            Self::SecondApron => "Second Apron",
        };
        f.write_str(label)
    }
}

/// Apron band used by the single-exchange matching check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApronBand {
    #[serde(rename = "Below Apron")]
    BelowApron,
    #[serde(rename = "First Apron")]
    FirstApron,
    #[serde(rename = "Second Apron")]
    SecondApron,
}

/// Point-in-time cap position of a payroll. Recomputed on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSalarySituation {
    pub total_salary: i64,
    pub is_over_cap: bool,
    pub is_in_luxury_tax: bool,
    pub is_first_apron: bool,
    pub is_second_apron: bool,
    pub cap_space: i64,
    pub luxury_tax_amount: i64,
    pub first_apron_amount: i64,
    pub second_apron_amount: i64,
    pub apron_status: ApronStatus,
}

/// Outcome of checking one team's salary-in vs salary-out exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalaryMatchResult {
    pub is_valid: bool,
    pub violations: Vec<String>,
    pub salary_difference: i64,
    pub team_apron_status: ApronBand,
    pub rule: String,
}
