//! Prompt builders for the text generator. Each prompt carries the data the
//! answer must be based on, then the user's question.

use std::fmt::Write;

use consigliere_models::{Player, PlayerStats, PlayoffSeries, ValidationResult};

use crate::chat::TeamReport;
use crate::salary_cap::format_salary;

fn stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{v:.1}"),
        _ => "N/A".to_string(),
    }
}

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{:.1}%", if v <= 1.0 { v * 100.0 } else { v }),
        _ => "N/A".to_string(),
    }
}

fn with_query(system: String, query: &str) -> String {
    format!(
        "{system}\n\nUser Query: \"{query}\"\n\nPlease provide a helpful response based on the data above."
    )
}

pub fn player_prompt(query: &str, player: &Player, similar: &[Player]) -> String {
    let stats = player.stats.as_ref();
    let field = |f: fn(&PlayerStats) -> f64| stats.map(f);

    let mut similar_lines = String::new();
    for p in similar {
        let _ = writeln!(similar_lines, "- {} ({}): {}", p.name, p.team, format_salary(p.salary_or_zero()));
    }
    if similar_lines.is_empty() {
        similar_lines.push_str("- None found.\n");
    }

    let system = format!(
        "You are a concise NBA stats provider. Your context is ONLY the 2023-24 NBA season.\n\
         Do not write a narrative. Provide a scannable, data-focused summary.\n\n\
         PLAYER: {name} ({team})\n\
         POSITION: {position}\n\
         SALARY: {salary}\n\n\
         2023-24 STATS:\n\
         - Games: {games}\n\
         - Minutes: {minutes}\n\
         - Points: {points}\n\
         - Rebounds: {rebounds}\n\
         - Assists: {assists}\n\
         - Steals: {steals}\n\
         - Blocks: {blocks}\n\
         - Field Goal Percentage: {fg}\n\
         - Three-Point Percentage: {three}\n\n\
         SIMILARLY PAID PLAYERS:\n\
         {similar_lines}\n\
         YOUR TASK:\n\
         1. State the player's salary.\n\
         2. Present their key stats.\n\
         3. List the similarly paid players.\n\
         Keep the entire response brief and use bullet points.",
        name = player.name,
        team = player.team,
        position = player.position.as_deref().unwrap_or("N/A"),
        salary = format_salary(player.salary_or_zero()),
        games = stat(field(|s| s.games_played)),
        minutes = stat(field(|s| s.minutes_per_game)),
        points = stat(field(|s| s.points_per_game)),
        rebounds = stat(field(|s| s.rebounds_per_game)),
        assists = stat(field(|s| s.assists_per_game)),
        steals = stat(field(|s| s.steals_per_game)),
        blocks = stat(field(|s| s.blocks_per_game)),
        fg = pct(field(|s| s.field_goal_percentage)),
        three = pct(field(|s| s.three_point_percentage)),
    );

    with_query(system, query)
}

fn series_line(series: &PlayoffSeries) -> String {
    format!(
        "- {} {}: {} {} - {} {} (winner {})",
        series.season,
        series.round,
        series.team1.abbreviation,
        series.team1.games_won,
        series.team2.games_won,
        series.team2.abbreviation,
        series.winner
    )
}

pub fn team_prompt(query: &str, report: &TeamReport) -> String {
    let mut top_paid: Vec<&Player> = report.roster.iter().collect();
    top_paid.sort_by_key(|p| std::cmp::Reverse(p.salary_or_zero()));

    let mut players = String::new();
    for p in top_paid.iter().take(5) {
        let _ = writeln!(players, "  - {}: {}", p.name, format_salary(p.salary_or_zero()));
    }

    let mut playoffs = String::new();
    for series in &report.playoff_series {
        let _ = writeln!(playoffs, "{}", series_line(series));
    }
    if playoffs.is_empty() {
        playoffs.push_str("- No playoff series recorded.\n");
    }

    let needs = if report.needs.is_empty() {
        "none identified".to_string()
    } else {
        report
            .needs
            .positions
            .iter()
            .chain(report.needs.stats.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let situation = &report.salary_situation;
    let system = format!(
        "You are a concise NBA analyst. Provide a brief, scannable summary. \
         Do not use conversational filler.\n\n\
         TEAM DATA:\n\
         - Team: {name} ({abbreviation})\n\
         - Total Salary: {total}\n\
         - Cap Status: {status}\n\
         - Cap Space: {space}\n\
         - Roster Size: {size}\n\
         - Top Paid Players:\n\
         {players}\
         - Roster Needs: {needs}\n\n\
         PLAYOFFS:\n\
         {playoffs}\n\
         YOUR TASK:\n\
         1. Briefly state the team's total salary and cap status.\n\
         2. Recommend 3 specific and realistic players the team could trade for, \
         given its needs and cap position. Keep each recommendation brief \
         (e.g., \"Player Name (Team)\").",
        name = report.team.as_ref().map_or(report.abbreviation.as_str(), |t| t.name.as_str()),
        abbreviation = report.abbreviation,
        total = format_salary(situation.total_salary),
        status = situation.apron_status,
        space = format_salary(situation.cap_space),
        size = report.roster.len(),
    );

    with_query(system, query)
}

fn player_lines(players: &[Player]) -> String {
    let mut comparison = String::new();
    for p in players {
        let stats = p.stats.as_ref();
        let _ = writeln!(
            comparison,
            "- {} ({}):\n  - Salary: {}\n  - PTS: {}\n  - REB: {}\n  - AST: {}",
            p.name,
            p.team,
            format_salary(p.salary_or_zero()),
            stat(stats.map(|s| s.points_per_game)),
            stat(stats.map(|s| s.rebounds_per_game)),
            stat(stats.map(|s| s.assists_per_game)),
        );
    }
    comparison
}

fn verdict_lines(validation: &ValidationResult) -> String {
    let mut verdict = if validation.is_valid {
        "LEGAL under the 2023-24 salary cap rules.\n".to_string()
    } else {
        "NOT LEGAL under the 2023-24 salary cap rules.\n".to_string()
    };
    for rule in validation.violations() {
        let _ = writeln!(verdict, "- {}: {} rule violated. {}", rule.team, rule.rule, rule.message);
    }
    for team in validation.roster_failures() {
        let _ = writeln!(verdict, "- {team}: roster would fall outside 0-15 players.");
    }
    for (team, change) in &validation.details.salary_analysis.salary_changes {
        let _ = writeln!(
            verdict,
            "- {team}: sends {}, receives {}, payroll after trade {}",
            format_salary(change.salary_out),
            format_salary(change.salary_in),
            format_salary(change.new_total_salary)
        );
    }
    verdict
}

pub fn trade_prompt(query: &str, players: &[Player], validation: &ValidationResult) -> String {
    let comparison = player_lines(players);
    let verdict = verdict_lines(validation);

    let system = format!(
        "You are an NBA trade analyst. Base your analysis strictly on the 2023-24 data below. \
         Do not analyze defense; it is not in the data.\n\n\
         PLAYERS:\n\
         {comparison}\n\
         CAP VALIDATION:\n\
         {verdict}\n\
         YOUR TASK:\n\
         1. Player Comparison: briefly compare the stats and salaries of the players involved.\n\
         2. Salary Cap Analysis: explain the validation result above. Do not contradict it.\n\
         3. Offensive Fit: how would each player fit their new team's offense?\n\
         Keep the analysis concise."
    );

    with_query(system, query)
}

/// Trade plus each team's recorded 2023-24 playoff run.
pub fn playoff_impact_prompt(
    query: &str,
    players: &[Player],
    validation: &ValidationResult,
    outlooks: &[(&str, Vec<PlayoffSeries>)],
) -> String {
    let mut playoffs = String::new();
    for (team, series) in outlooks {
        let _ = writeln!(playoffs, "{team}:");
        if series.is_empty() {
            let _ = writeln!(playoffs, "- No playoff series recorded.");
        }
        for s in series {
            let _ = writeln!(playoffs, "{}", series_line(s));
        }
    }

    let system = format!(
        "You are an NBA expert analyzing how a trade would impact the 2023-24 playoffs. \
         Base your analysis strictly on the data below.\n\n\
         PLAYERS:\n\
         {players}\n\
         CAP VALIDATION:\n\
         {verdict}\n\
         PLAYOFF SERIES:\n\
         {playoffs}\n\
         YOUR TASK:\n\
         1. Finals Odds Change: Significantly Better, Better, Neutral or Worse for each team.\n\
         2. Matchup Impact: how the trade changes the series each team played.\n\
         3. Rotation Changes: key lineup adjustments.\n\
         4. Quick Impact Score: 1-10 per team, 10 being most positive.\n\
         If the trade is not legal, say so first. Keep the analysis concise.",
        players = player_lines(players),
        verdict = verdict_lines(validation),
    );

    with_query(system, query)
}
