use serde::{Deserialize, Serialize};

use crate::cba::CapThresholds;

/// Top-level configuration for the trade assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsigliereConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub validator: ValidatorConfig,
    pub cba: CapThresholds,
    pub generator: GeneratorConfig,
    pub rate_limit: RateLimitConfig,
}

/// Configuration for the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite file written by the loader.
    pub sqlite_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "data/consigliere.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Upper bound on the per-team roster fan-out of one validation.
    pub lookup_timeout_ms: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 5_000,
        }
    }
}

/// Configuration for the external text-generation command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Executable invoked once per prompt.
    pub program: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_output_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "llm".to_string(),
            model: "gemini-1.5-pro-latest".to_string(),
            timeout_seconds: 45,
            max_output_tokens: 800,
        }
    }
}

/// Fixed-window ingress limit per caller identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_seconds: u64,
    /// Upper bound on identities tracked at once.
    pub max_tracked_clients: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 5,
            window_seconds: 60,
            max_tracked_clients: 10_000,
        }
    }
}
