//! Salary-cap arithmetic. Pure functions over a payroll and the season's
//! [`CapThresholds`]; nothing here touches the store.

use consigliere_models::{
    ApronBand, ApronStatus, CapThresholds, SalaryMatchResult, TeamSalarySituation,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Cap position of a team with the given total payroll.
///
/// Tier flags use `>` for the cap and tax lines and `>=` for both aprons.
/// All amounts are clamped at zero.
pub fn team_salary_situation(total_payroll: i64, thresholds: &CapThresholds) -> TeamSalarySituation {
    let is_over_cap = total_payroll > thresholds.salary_cap;
    let is_in_luxury_tax = total_payroll > thresholds.luxury_tax;
    let is_first_apron = total_payroll >= thresholds.first_apron;
    let is_second_apron = total_payroll >= thresholds.second_apron;

    let apron_status = if is_second_apron {
        ApronStatus::SecondApron
    } else if is_first_apron {
        ApronStatus::FirstApron
    } else if is_in_luxury_tax {
        ApronStatus::LuxuryTax
    } else if is_over_cap {
        ApronStatus::OverCap
    } else {
        ApronStatus::UnderCap
    };

    TeamSalarySituation {
        total_salary: total_payroll,
        is_over_cap,
        is_in_luxury_tax,
        is_first_apron,
        is_second_apron,
        cap_space: (thresholds.salary_cap - total_payroll).max(0),
        luxury_tax_amount: (total_payroll - thresholds.luxury_tax).max(0),
        first_apron_amount: (total_payroll - thresholds.first_apron).max(0),
        second_apron_amount: (total_payroll - thresholds.second_apron).max(0),
        apron_status,
    }
}

/// Single-team salary-matching check.
///
/// Apron teams may not take back more than they send. Below the First Apron
/// the exchange is symmetric: `|out - in|` may not exceed
/// `max(out, in) * (ratio - 1) + cushion`.
pub fn validate_salary_matching(
    salary_out: i64,
    salary_in: i64,
    team_payroll: i64,
    thresholds: &CapThresholds,
) -> SalaryMatchResult {
    let is_first_apron =
        team_payroll >= thresholds.first_apron && team_payroll < thresholds.second_apron;
    let is_second_apron = team_payroll >= thresholds.second_apron;
    let salary_difference = (salary_out - salary_in).abs();

    let mut violations = Vec::new();

    if is_first_apron && salary_in > salary_out {
        violations
            .push("First Apron teams cannot take back more salary than they send out".to_string());
    }

    if is_second_apron && salary_in > salary_out {
        violations.push("Second Apron teams have severe trade restrictions".to_string());
    }

    if !is_first_apron && !is_second_apron {
        let allowed = Decimal::from(salary_out.max(salary_in)) * (thresholds.matching_ratio - Decimal::ONE)
            + Decimal::from(thresholds.matching_cushion);
        if Decimal::from(salary_difference) > allowed {
            violations.push(format!(
                "Salary matching: difference exceeds {}% + {} rule",
                percent(thresholds.matching_ratio),
                format_salary(thresholds.matching_cushion)
            ));
        }
    }

    let (team_apron_status, rule) = if is_second_apron {
        (ApronBand::SecondApron, "Second Apron restrictions".to_string())
    } else if is_first_apron {
        (ApronBand::FirstApron, "First Apron restrictions".to_string())
    } else {
        (
            ApronBand::BelowApron,
            format!(
                "Standard {}% + {} rule",
                percent(thresholds.matching_ratio),
                format_salary(thresholds.matching_cushion)
            ),
        )
    };

    SalaryMatchResult {
        is_valid: violations.is_empty(),
        violations,
        salary_difference,
        team_apron_status,
        rule,
    }
}

/// Most incoming salary an over-cap team may take back for `salary_out`.
pub fn max_incoming_salary(salary_out: i64, thresholds: &CapThresholds) -> Decimal {
    Decimal::from(salary_out) * thresholds.matching_ratio + Decimal::from(thresholds.matching_cushion)
}

/// Display form of a salary: `$32.6M`, `$850K`, `$500`.
pub fn format_salary(amount: i64) -> String {
    if amount >= 1_000_000 {
        format!("${:.1}M", amount as f64 / 1_000_000.0)
    } else if amount >= 1_000 {
        format!("${:.0}K", amount as f64 / 1_000.0)
    } else {
        format!("${}", with_thousands(amount))
    }
}

/// Whether an individual salary lies within the league minimum and maximum.
pub fn salary_in_bounds(amount: i64, thresholds: &CapThresholds) -> bool {
    (thresholds.minimum_salary..=thresholds.maximum_salary).contains(&amount)
}

/// `1234567` -> `"1,234,567"`.
pub fn with_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar form of a decimal amount, for messages.
pub(crate) fn whole_dollars(amount: Decimal) -> String {
    with_thousands(amount.round().to_i64().unwrap_or(i64::MAX))
}

fn percent(ratio: Decimal) -> String {
    (ratio * Decimal::ONE_HUNDRED).normalize().to_string()
}
