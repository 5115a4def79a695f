//! Integration tests that invoke a real generator command.
//!
//! These tests are `#[ignore]` by default. They need a generator on PATH
//! (named by `CONSIGLIERE_GENERATOR`, default the configured `llm`) that
//! prints `{"text": ..., "block_reason": ...}` for a prompt.
//!
//! Run explicitly with:
//! ```bash
//! cargo test -p consigliere-agents --test cli_integration -- --ignored
//! ```

use consigliere_agents::generator::{check_generator_available, CommandGenerator, Generation};
use consigliere_agents::TextGenerator;
use consigliere_models::GeneratorConfig;

fn config() -> GeneratorConfig {
    GeneratorConfig {
        program: std::env::var("CONSIGLIERE_GENERATOR")
            .unwrap_or_else(|_| GeneratorConfig::default().program),
        timeout_seconds: 60,
        ..GeneratorConfig::default()
    }
}

#[tokio::test]
#[ignore]
async fn generator_is_available() {
    let program = config().program;
    assert!(
        check_generator_available(&program).await,
        "{program} not found on PATH"
    );
}

/// Catches changes in the generator's output format that would otherwise
/// only surface in production.
#[tokio::test]
#[ignore]
async fn generator_output_is_parseable() {
    let config = config();
    if !check_generator_available(&config.program).await {
        eprintln!("Skipping: {} not available", config.program);
        return;
    }

    let generation = CommandGenerator::new(config)
        .generate("In one sentence, what is the NBA salary cap?")
        .await
        .expect("generator call failed");

    match generation {
        Generation::Text(text) => assert!(!text.trim().is_empty()),
        Generation::Blocked { reason } => panic!("unexpected block: {reason:?}"),
    }
}
