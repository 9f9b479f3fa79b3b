use thiserror::Error;

use crate::agent::AgentId;

/// Errors raised by the behavior engine.
///
/// Nothing on the tick path returns these; `MissingCollaborator` is built
/// only so it can be logged with a consistent message.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("agent {agent} has no attack strategy bound")]
    MissingCollaborator { agent: AgentId },

    #[error("archetype '{name}' is invalid: {reason}")]
    InvalidArchetype { name: String, reason: String },

    #[error("unknown archetype '{0}'")]
    UnknownArchetype(String),

    #[error("duplicate archetype '{0}'")]
    DuplicateArchetype(String),

    #[error("archetype '{name}' has an invalid attack: {source}")]
    InvalidAttack {
        name: String,
        #[source]
        source: StrategyConfigError,
    },

    #[error("failed to parse archetype catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A strategy config value outside what the strategy can run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyConfigError {
    #[error("{strategy} {field} must be positive, got {value}")]
    NotPositive {
        strategy: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("{strategy} {field} must not be negative, got {value}")]
    Negative {
        strategy: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("{strategy} {field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        strategy: &'static str,
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{strategy} {earlier} ({first}) must not come after {later} ({second})")]
    OutOfOrder {
        strategy: &'static str,
        earlier: &'static str,
        first: f32,
        later: &'static str,
        second: f32,
    },
}
