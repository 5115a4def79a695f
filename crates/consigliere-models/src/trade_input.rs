use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A player as named in a trade proposal. Only name and salary matter here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradePlayer {
    pub name: String,
    /// Missing salary counts as zero.
    #[serde(default, alias = "salary_2023_2024")]
    pub salary: Option<i64>,
}

impl TradePlayer {
    pub fn new(name: impl Into<String>, salary: Option<i64>) -> Self {
        Self {
            name: name.into(),
            salary,
        }
    }

    pub fn salary_or_zero(&self) -> i64 {
        self.salary.unwrap_or(0)
    }
}

impl From<&crate::Player> for TradePlayer {
    fn from(player: &crate::Player) -> Self {
        Self {
            name: player.name.clone(),
            salary: player.salary,
        }
    }
}

/// A proposed multi-team trade.
///
/// `players_out[team]` leave that team, `players_in[team]` arrive at it.
/// A team absent from either map moves no players in that direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TradeProposal {
    pub teams: Vec<String>,
    #[serde(default, alias = "playersOut")]
    pub players_out: BTreeMap<String, Vec<TradePlayer>>,
    #[serde(default, alias = "playersIn")]
    pub players_in: BTreeMap<String, Vec<TradePlayer>>,
}

impl TradeProposal {
    pub fn outgoing(&self, team: &str) -> &[TradePlayer] {
        self.players_out.get(team).map_or(&[], Vec::as_slice)
    }

    pub fn incoming(&self, team: &str) -> &[TradePlayer] {
        self.players_in.get(team).map_or(&[], Vec::as_slice)
    }

    /// Two-team swap: `from_first` moves to `second`, `from_second` moves to `first`.
    pub fn two_team(
        first: &str,
        second: &str,
        from_first: Vec<TradePlayer>,
        from_second: Vec<TradePlayer>,
    ) -> Self {
        let mut players_out = BTreeMap::new();
        let mut players_in = BTreeMap::new();
        players_out.insert(first.to_string(), from_first.clone());
        players_out.insert(second.to_string(), from_second.clone());
        players_in.insert(first.to_string(), from_second);
        players_in.insert(second.to_string(), from_first);
        Self {
            teams: vec![first.to_string(), second.to_string()],
            players_out,
            players_in,
        }
    }
}
