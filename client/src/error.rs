//! Error handling for the Meteo Events client
//!
//! Every error carries a stable code and the Catalan message shown to the
//! user, matching the messages of the backend and desktop front end.

use serde::Serialize;
use shared::EvaluationError;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Backend session errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token not provided")]
    TokenMissing,

    #[error("Access denied")]
    AccessDenied,

    #[error("Credentials are not configured")]
    MissingCredentials,

    // Lookup errors
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("No forecast available for the date of event {0}")]
    NoForecastForEventDate(String),

    #[error("Unknown municipality: {0}")]
    UnknownMunicipality(String),

    // Remote service errors
    #[error("AEMET error: {0}")]
    Aemet(String),

    #[error("Backend server error")]
    ServerError,

    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    // Input and evaluation errors
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Serializable error summary
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    pub user_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Map a non-success backend status code.
    ///
    /// 404 means different things per endpoint, so the caller supplies it.
    pub fn from_status(status: u16, not_found: AppError) -> AppError {
        match status {
            400 => AppError::TokenMissing,
            401 => AppError::InvalidCredentials,
            403 => AppError::AccessDenied,
            404 => not_found,
            500 => AppError::ServerError,
            other => AppError::UnexpectedStatus(other),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::AccessDenied => "ACCESS_DENIED",
            AppError::MissingCredentials => "MISSING_CREDENTIALS",
            AppError::EventNotFound(_) => "EVENT_NOT_FOUND",
            AppError::NoForecastForEventDate(_) => "NO_FORECAST_FOR_EVENT_DATE",
            AppError::UnknownMunicipality(_) => "UNKNOWN_MUNICIPALITY",
            AppError::Aemet(_) => "AEMET_ERROR",
            AppError::ServerError => "SERVER_ERROR",
            AppError::UnexpectedStatus(_) => "UNKNOWN_ERROR",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Json(_) => "MALFORMED_RESPONSE",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Evaluation(EvaluationError::NoData) => "NO_DATA",
            AppError::Evaluation(EvaluationError::DateNotAvailable(_)) => "DATE_NOT_AVAILABLE",
            AppError::Evaluation(_) => "EVALUATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Message shown to the end user
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Credencials incorrectes".to_string(),
            AppError::TokenMissing => "Token no proporcionat".to_string(),
            AppError::AccessDenied => "Accés denegat".to_string(),
            AppError::MissingCredentials => {
                "Cal configurar l'usuari i la contrasenya (METEO_CREDENTIALS__USERNAME, METEO_CREDENTIALS__PASSWORD)".to_string()
            }
            AppError::EventNotFound(_) => "Esdeveniment no trobat".to_string(),
            AppError::NoForecastForEventDate(_) => {
                "No hi ha previsió meteorològica per la data de l'esdeveniment".to_string()
            }
            AppError::UnknownMunicipality(_) => "El municipi introduït no existeix".to_string(),
            AppError::Aemet(_) => "Error en la resposta de la Aemet".to_string(),
            AppError::ServerError => "Error en el servidor".to_string(),
            AppError::UnexpectedStatus(code) => format!("Error desconegut. Code: {}", code),
            AppError::Http(_) => "No s'ha pogut connectar amb el servidor".to_string(),
            AppError::Json(_) => "Resposta amb format incorrecte".to_string(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::Evaluation(err) => err.user_message().to_string(),
            AppError::Configuration(_) => "Error en la configuració".to_string(),
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code(),
            message: self.to_string(),
            user_message: self.user_message(),
            field: match self {
                AppError::Validation { field, .. } => Some(field.clone()),
                _ => None,
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let first = field_errors.iter().min_by_key(|(field, _)| **field);
        match first {
            Some((field, errs)) => AppError::Validation {
                field: field.to_string(),
                message: errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Valor incorrecte per {}", field)),
            },
            None => AppError::Validation {
                field: String::new(),
                message: errors.to_string(),
            },
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
