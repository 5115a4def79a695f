use std::time::Duration;

use async_trait::async_trait;
use consigliere_models::GeneratorConfig;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::parser::extract_json;

/// Outcome of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    /// The model declined to answer (e.g., a safety filter).
    Blocked { reason: Option<String> },
}

impl Generation {
    /// Text to show the user. A blocked generation becomes an explanation,
    /// not an error.
    pub fn into_response(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Blocked { reason } => format!(
                "My AI response was blocked. This can happen due to safety filters. \
                 Please try rephrasing your query. (Reason: {})",
                reason.as_deref().unwrap_or("Unknown")
            ),
        }
    }
}

/// Produces natural-language text from a prompt. Mockable for testing.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, AgentError>;
}

/// What the generator command prints on stdout.
#[derive(Debug, Deserialize)]
struct CommandOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    block_reason: Option<String>,
}

/// Parse the generator command's stdout, tolerating text around the JSON.
pub fn parse_generation(raw: &str) -> Result<Generation, AgentError> {
    let json_str = extract_json(raw)?;
    let output: CommandOutput = serde_json::from_str(&json_str)
        .map_err(|e| AgentError::Parse(format!("Failed to parse generator output: {e}")))?;

    match (output.text, output.block_reason) {
        (_, Some(reason)) => Ok(Generation::Blocked {
            reason: Some(reason),
        }),
        (Some(text), None) if !text.trim().is_empty() => Ok(Generation::Text(text)),
        _ => Ok(Generation::Blocked { reason: None }),
    }
}

/// Runs an external command once per prompt.
///
/// Invoked as `<program> --model <model> --max-output-tokens <n> -p <prompt>`
/// and expected to print `{"text": ..., "block_reason": ...}`.
pub struct CommandGenerator {
    config: GeneratorConfig,
}

impl CommandGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation, AgentError> {
        debug!(program = %self.config.program, model = %self.config.model, "Invoking generator");

        let max_tokens = self.config.max_output_tokens.to_string();
        let output = tokio::time::timeout(self.timeout(), async {
            Command::new(&self.config.program)
                .args([
                    "--model",
                    &self.config.model,
                    "--max-output-tokens",
                    &max_tokens,
                    "-p",
                    prompt,
                ])
                .kill_on_drop(true)
                .output()
                .await
        })
        .await
        .map_err(|_| AgentError::Timeout(self.config.timeout_seconds))?
        .map_err(|e| {
            AgentError::Generator(format!("Failed to spawn {}: {e}", self.config.program))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr, "Generator command failed");
            return Err(AgentError::Generator(format!(
                "{} exited {}: {}",
                self.config.program, output.status, stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(AgentError::Generator(
                "Generator returned empty output".to_string(),
            ));
        }

        let generation = parse_generation(&stdout)?;
        if let Generation::Blocked { reason } = &generation {
            warn!(reason = ?reason, "Generation was blocked");
        }
        Ok(generation)
    }
}

/// Whether the generator program is installed and answers `--version`.
pub async fn check_generator_available(program: &str) -> bool {
    match Command::new(program).arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
