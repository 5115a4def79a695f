use consigliere_models::{Intent, QueryKind};

/// Turns a free-text query into an [`Intent`]. Mockable for testing.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, query: &str) -> Intent;
}

const TRADE_KEYWORDS: &[&str] = &["for", "trade", "swap", "exchange", "deal"];

/// Words dropped when pulling a player name out of a lookup query.
const FILLER_WORDS: &[&str] = &["show", "get", "find", "player", "stats", "for", "about"];

/// Nicknames and full names, lower-case, to team abbreviations.
const TEAM_NAMES: &[(&str, &str)] = &[
    ("hawks", "ATL"),
    ("atlanta hawks", "ATL"),
    ("celtics", "BOS"),
    ("boston celtics", "BOS"),
    ("nets", "BKN"),
    ("brooklyn nets", "BKN"),
    ("hornets", "CHA"),
    ("charlotte hornets", "CHA"),
    ("bulls", "CHI"),
    ("chicago bulls", "CHI"),
    ("cavaliers", "CLE"),
    ("cleveland cavaliers", "CLE"),
    ("cavs", "CLE"),
    ("mavericks", "DAL"),
    ("dallas mavericks", "DAL"),
    ("mavs", "DAL"),
    ("nuggets", "DEN"),
    ("denver nuggets", "DEN"),
    ("pistons", "DET"),
    ("detroit pistons", "DET"),
    ("warriors", "GSW"),
    ("golden state warriors", "GSW"),
    ("rockets", "HOU"),
    ("houston rockets", "HOU"),
    ("pacers", "IND"),
    ("indiana pacers", "IND"),
    ("clippers", "LAC"),
    ("los angeles clippers", "LAC"),
    ("la clippers", "LAC"),
    ("lakers", "LAL"),
    ("los angeles lakers", "LAL"),
    ("grizzlies", "MEM"),
    ("memphis grizzlies", "MEM"),
    ("heat", "MIA"),
    ("miami heat", "MIA"),
    ("bucks", "MIL"),
    ("milwaukee bucks", "MIL"),
    ("timberwolves", "MIN"),
    ("minnesota timberwolves", "MIN"),
    ("twolves", "MIN"),
    ("pelicans", "NOP"),
    ("new orleans pelicans", "NOP"),
    ("pels", "NOP"),
    ("knicks", "NYK"),
    ("new york knicks", "NYK"),
    ("thunder", "OKC"),
    ("oklahoma city thunder", "OKC"),
    ("magic", "ORL"),
    ("orlando magic", "ORL"),
    ("76ers", "PHI"),
    ("philadelphia 76ers", "PHI"),
    ("sixers", "PHI"),
    ("suns", "PHX"),
    ("phoenix suns", "PHX"),
    ("blazers", "POR"),
    ("trail blazers", "POR"),
    ("portland trail blazers", "POR"),
    ("kings", "SAC"),
    ("sacramento kings", "SAC"),
    ("spurs", "SAS"),
    ("san antonio spurs", "SAS"),
    ("raptors", "TOR"),
    ("toronto raptors", "TOR"),
    ("jazz", "UTA"),
    ("utah jazz", "UTA"),
    ("wizards", "WAS"),
    ("washington wizards", "WAS"),
];

/// Rule-based classifier: trade keywords first, then team names, else a
/// player lookup. Keywords and team names match whole words only.
pub struct KeywordClassifier {
    /// Longest name first so "los angeles lakers" wins over "lakers".
    team_names: Vec<(&'static str, &'static str)>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        let mut team_names = TEAM_NAMES.to_vec();
        team_names.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { team_names }
    }
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Team abbreviations in order of first mention.
    pub fn find_teams(&self, query: &str) -> Vec<String> {
        let padded = format!(" {} ", words(query).join(" "));
        let mut claimed = vec![false; padded.len()];
        let mut found: Vec<(usize, &str)> = Vec::new();

        for &(name, abbreviation) in &self.team_names {
            let needle = format!(" {name} ");
            let Some(pos) = padded.find(&needle) else {
                continue;
            };
            // Skip "lakers" inside an already matched "los angeles lakers".
            if claimed[pos + 1..pos + needle.len() - 1].iter().any(|c| *c) {
                continue;
            }
            claimed[pos + 1..pos + needle.len() - 1].fill(true);
            if !found.iter().any(|(_, a)| *a == abbreviation) {
                found.push((pos, abbreviation));
            }
        }

        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, a)| a.to_string()).collect()
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, query: &str) -> Intent {
        let query = query.trim();
        let teams = self.find_teams(query);

        if is_trade_query(query) {
            return Intent {
                kind: QueryKind::Trade,
                teams,
                players: extract_trade_players(query),
            };
        }

        if !teams.is_empty() {
            return Intent {
                kind: QueryKind::Team,
                teams,
                players: Vec::new(),
            };
        }

        Intent {
            kind: QueryKind::Player,
            teams,
            players: vec![extract_player_name(query)],
        }
    }
}

/// Lower-case alphanumeric words.
fn words(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub fn is_trade_query(query: &str) -> bool {
    words(query)
        .iter()
        .any(|w| TRADE_KEYWORDS.contains(&w.as_str()))
}

fn clean_name(name: &str) -> String {
    name.trim()
        .trim_end_matches(|c: char| c == '?' || c == '.' || c == '!')
        .trim()
        .to_string()
}

fn strip_leading_verb(name: &str) -> &str {
    for verb in ["trade ", "swap "] {
        if name.get(..verb.len()).is_some_and(|p| p.eq_ignore_ascii_case(verb)) {
            return &name[verb.len()..];
        }
    }
    name
}

/// Player names from "A for B", "A trade for B", "trade A and B" or "trade A".
pub fn extract_trade_players(query: &str) -> Vec<String> {
    // ASCII lowering keeps byte offsets aligned with `query`.
    let lower = query.to_ascii_lowercase();

    for separator in [" trade for ", " for "] {
        if let Some(idx) = lower.find(separator) {
            let first = clean_name(strip_leading_verb(&query[..idx]));
            let second = clean_name(&query[idx + separator.len()..]);
            if !first.is_empty() && !second.is_empty() {
                return vec![first, second];
            }
        }
    }

    if lower.starts_with("trade ") {
        let rest = &query["trade ".len()..];
        let lower_rest = &lower["trade ".len()..];
        if let Some(idx) = lower_rest.find(" and ") {
            let first = clean_name(&rest[..idx]);
            let second = clean_name(&rest[idx + " and ".len()..]);
            if !first.is_empty() && !second.is_empty() {
                return vec![first, second];
            }
        }
        let only = clean_name(rest);
        if !only.is_empty() {
            return vec![only];
        }
    }

    Vec::new()
}

/// Drop filler words; fall back to the whole query when nothing is left.
pub fn extract_player_name(query: &str) -> String {
    let kept: Vec<&str> = query
        .split_whitespace()
        .filter(|w| !FILLER_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    let name = clean_name(&kept.join(" "));
    if name.is_empty() {
        clean_name(query)
    } else {
        name
    }
}
