use thiserror::Error;

/// Failure of a trade validation. Rule violations are not errors; they are
/// reported inside a `ValidationResult`.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The proposal is inconsistent (e.g., a player leaves a team but arrives nowhere).
    #[error("Malformed trade proposal: {0}")]
    MalformedProposal(String),

    /// A roster lookup did not finish in time.
    #[error("Data store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Store(#[from] consigliere_store::StoreError),
}

#[derive(Error, Debug)]
pub enum AgentError {
    /// Bad caller input: unknown player or team, unparseable trade query.
    #[error("{0}")]
    Input(String),

    #[error("Text generator error: {0}")]
    Generator(String),

    #[error("Text generator timed out after {0} seconds")]
    Timeout(u64),

    #[error("Generator response parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] consigliere_store::StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
