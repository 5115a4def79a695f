use std::collections::HashMap;

use consigliere_models::{
    normalize_abbreviation, CapThresholds, Player, Recommendation, TeamNeeds, TradeRecommendations,
};
use consigliere_store::{DataStore, StoreError};
use tracing::info;

use crate::roster::{lookup_roster, team_payroll};
use crate::salary_cap::{format_salary, team_salary_situation};

const MIN_POINT_GUARDS: usize = 2;
const MIN_CENTERS: usize = 1;
const MIN_FORWARDS: usize = 3;
const MIN_TEAM_POINTS: f64 = 110.0;
const MIN_TEAM_REBOUNDS: f64 = 45.0;
const MIN_TEAM_ASSISTS: f64 = 25.0;

/// Rotation players only.
const MIN_TARGET_MINUTES: f64 = 20.0;
const MAX_RECOMMENDATIONS: usize = 5;

/// Positional and statistical gaps in a roster. Pure function of the roster.
pub fn analyze_team_needs(roster: &[Player]) -> TeamNeeds {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let (mut points, mut rebounds, mut assists) = (0.0, 0.0, 0.0);

    for player in roster {
        let position = player.position.as_deref().unwrap_or("Unknown");
        *positions.entry(position).or_default() += 1;
        if let Some(stats) = &player.stats {
            points += stats.points_per_game;
            rebounds += stats.rebounds_per_game;
            assists += stats.assists_per_game;
        }
    }

    let count = |pos: &str| positions.get(pos).copied().unwrap_or(0);
    let mut needs = TeamNeeds {
        priority: "medium".to_string(),
        ..TeamNeeds::default()
    };

    if count("PG") < MIN_POINT_GUARDS {
        needs.positions.push("PG".to_string());
    }
    if count("C") < MIN_CENTERS {
        needs.positions.push("C".to_string());
    }
    if count("F") < MIN_FORWARDS {
        needs.positions.push("F".to_string());
    }

    if points < MIN_TEAM_POINTS {
        needs.stats.push("scoring".to_string());
    }
    if rebounds < MIN_TEAM_REBOUNDS {
        needs.stats.push("rebounding".to_string());
    }
    if assists < MIN_TEAM_ASSISTS {
        needs.stats.push("playmaking".to_string());
    }

    needs
}

/// Needs, cap position and up to five rotation players from other teams who
/// fill a needed position.
pub async fn recommend_trades(
    store: &dyn DataStore,
    team: &str,
    thresholds: &CapThresholds,
) -> Result<TradeRecommendations, StoreError> {
    let team = normalize_abbreviation(team);
    let roster = lookup_roster(store, &team).await?;
    let needs = analyze_team_needs(&roster.players);
    let payroll = team_payroll(store, &team).await?;

    let mut targets: Vec<Player> = store
        .find_players_by_positions(&needs.positions, &team)
        .await?
        .into_iter()
        .filter(|p| p.minutes_per_game() > MIN_TARGET_MINUTES && p.salary_or_zero() > 0)
        .collect();
    targets.sort_by(|a, b| b.minutes_per_game().total_cmp(&a.minutes_per_game()));
    targets.truncate(MAX_RECOMMENDATIONS);

    info!(
        team = %team,
        needs = ?needs.positions,
        recommendations = targets.len(),
        "Trade recommendations built"
    );

    Ok(TradeRecommendations {
        team: store.find_team(&team).await?,
        needs,
        salary_situation: team_salary_situation(payroll, thresholds),
        recommendations: targets
            .into_iter()
            .map(|player| {
                let salary = player.salary_or_zero();
                Recommendation {
                    player,
                    salary,
                    salary_formatted: format_salary(salary),
                }
            })
            .collect(),
    })
}
