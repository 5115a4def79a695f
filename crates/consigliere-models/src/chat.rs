use serde::{Deserialize, Serialize};

use crate::trade_validation::ValidationResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Player,
    Team,
    Trade,
}

/// Classifier output for a free-text query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Intent {
    pub kind: QueryKind,
    /// Team abbreviations mentioned in the query.
    pub teams: Vec<String>,
    /// Player names extracted from the query.
    pub players: Vec<String>,
}

/// Answer returned to a chat caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub query_type: QueryKind,
    /// The supporting data the answer was generated from.
    pub data: serde_json::Value,
}

/// Narrative verdict on a named-player trade, with the validation behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeAnalysis {
    pub response: String,
    pub validation: ValidationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_kind_serialization() {
        assert_eq!(serde_json::to_string(&QueryKind::Trade).unwrap(), "\"trade\"");
        let kind: QueryKind = serde_json::from_str("\"team\"").unwrap();
        assert_eq!(kind, QueryKind::Team);
    }
}
