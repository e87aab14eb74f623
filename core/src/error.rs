use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Precondition violated: {reason}")]
    PreconditionViolation { reason: String },

    #[error("Scenario {scenario_id} rejected: {reason}")]
    InvalidScenario { scenario_id: u32, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GameError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionViolation { reason: reason.into() }
    }
}

pub type GameResult<T> = Result<T, GameError>;
