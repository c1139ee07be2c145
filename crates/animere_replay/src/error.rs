//! Error types for animere_replay

use animere_core::ConfigError;
use thiserror::Error;

/// Errors raised while loading or replaying a scenario
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// The scenario file could not be read
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    /// The scenario file is not valid JSON for the scenario format
    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    /// The scenario's engine options failed validation
    #[error("invalid engine options: {0}")]
    Config(#[from] ConfigError),

    /// Two elements share an id
    #[error("duplicate element id `{0}`")]
    DuplicateId(String),

    /// A step or parent reference names an element that does not exist
    #[error("unknown element `{0}`")]
    UnknownElement(String),
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
