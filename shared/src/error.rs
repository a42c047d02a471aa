//! Errors raised while evaluating forecasts and status payloads

use chrono::NaiveDate;

/// Evaluation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("no hourly data available")]
    NoData,

    #[error("forecast not available for {0}")]
    DateNotAvailable(NaiveDate),

    #[error("invalid hour of day: {0:?}")]
    InvalidHour(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl EvaluationError {
    /// Message shown to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            EvaluationError::NoData => "No hi ha dades disponibles",
            EvaluationError::DateNotAvailable(_) => "La previsió per aquesta data no està disponible",
            EvaluationError::InvalidHour(_) => "L'hora ha de tenir el format HH (00-23)",
            EvaluationError::InvalidPayload(_) => "Resposta amb format incorrecte",
        }
    }
}

impl From<serde_json::Error> for EvaluationError {
    fn from(err: serde_json::Error) -> Self {
        EvaluationError::InvalidPayload(err.to_string())
    }
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;
