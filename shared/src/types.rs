//! Query types accepted from users

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{EvaluationError, EvaluationResult};
use crate::models::HourOfDay;
use crate::validation::{date_field, event_id_field, hour_field, municipality_code_field, parse_date};

/// Hourly forecast query for a municipality
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForecastQuery {
    #[validate(custom = "municipality_code_field")]
    pub municipality: String,

    #[validate(custom = "date_field")]
    pub date: String,

    #[validate(custom = "hour_field")]
    pub hour: String,
}

impl ForecastQuery {
    pub fn new(municipality: impl Into<String>, date: impl Into<String>, hour: impl Into<String>) -> Self {
        Self {
            municipality: municipality.into(),
            date: date.into(),
            hour: hour.into(),
        }
    }

    pub fn parsed_date(&self) -> EvaluationResult<NaiveDate> {
        parse_date(&self.date).map_err(|msg| EvaluationError::InvalidPayload(msg.to_string()))
    }

    pub fn parsed_hour(&self) -> EvaluationResult<HourOfDay> {
        self.hour.parse()
    }
}

/// Backend login credentials
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Has d'introduir el nom d'usuari"))]
    pub username: String,

    #[validate(length(min = 1, message = "Has d'introduir la contrasenya"))]
    pub password: String,
}

/// Event lookup / status query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventQuery {
    #[validate(custom = "event_id_field")]
    pub event_id: String,
}
