use thiserror::Error;

/// Errors raised while reading clues, building a model, or enumerating secrets.
///
/// Running out of secrets is not an error: the enumerator simply ends.
#[derive(Debug, Error)]
pub enum CodebreakerError {
    /// The clue set cannot be turned into a model.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The backend failed for a reason other than infeasibility.
    #[error("solver error: {0}")]
    Solver(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CodebreakerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CodebreakerError::InvalidInput(message.into())
    }

    pub fn solver(message: impl Into<String>) -> Self {
        CodebreakerError::Solver(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CodebreakerError::InvalidInput(_))
    }

    pub fn is_solver_error(&self) -> bool {
        matches!(self, CodebreakerError::Solver(_))
    }
}

pub type Result<T> = std::result::Result<T, CodebreakerError>;
