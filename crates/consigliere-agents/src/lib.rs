pub mod chat;
pub mod classifier;
pub mod error;
pub mod generator;
pub mod needs;
pub mod parser;
pub mod prompts;
pub mod roster;
pub mod salary_cap;
pub mod simulation;
pub mod validator;

pub mod test_support;

pub use chat::{ChatHandler, PlayerReport, TeamReport, TradeReport};
pub use classifier::{IntentClassifier, KeywordClassifier};
pub use error::{AgentError, ValidationError};
pub use generator::{CommandGenerator, Generation, TextGenerator};
pub use simulation::TradeSimulator;
pub use validator::TradeValidator;
