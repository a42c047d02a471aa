//! Validation rules for user input
//!
//! Plain rule functions return a static message, like the rest of the crate.
//! The `*_field` wrappers adapt them to `validator` custom rules used by the
//! query types in [`crate::types`].

use chrono::NaiveDate;
use std::borrow::Cow;
use validator::ValidationError;

use crate::models::HourOfDay;

/// Date format accepted on input and used for AEMET day lookup
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Rules
// ============================================================================

/// Validate an INE municipality code (5 digits, e.g. 08019)
pub fn validate_municipality_code(code: &str) -> Result<(), &'static str> {
    if code.len() != 5 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err("El codi de municipi ha de tenir 5 dígits");
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| "La data ha de tenir el format AAAA-MM-DD")
}

/// Validate a `YYYY-MM-DD` date
pub fn validate_date(date: &str) -> Result<(), &'static str> {
    parse_date(date).map(|_| ())
}

/// Validate an hour of day, `00` to `23`
pub fn validate_hour(hour: &str) -> Result<(), &'static str> {
    hour.parse::<HourOfDay>()
        .map(|_| ())
        .map_err(|_| "L'hora ha de tenir el format HH (00-23)")
}

/// Validate an event identifier (non-empty, digits only)
pub fn validate_event_id(id: &str) -> Result<(), &'static str> {
    if id.is_empty() {
        return Err("Has d'introduir l'identificador de l'esdeveniment.");
    }
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return Err("L'identificador de l'esdeveniment ha de ser numèric");
    }
    Ok(())
}

// ============================================================================
// validator adapters
// ============================================================================

fn to_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn municipality_code_field(code: &str) -> Result<(), ValidationError> {
    validate_municipality_code(code).map_err(|msg| to_validation_error("municipality_code", msg))
}

pub fn date_field(date: &str) -> Result<(), ValidationError> {
    validate_date(date).map_err(|msg| to_validation_error("date", msg))
}

pub fn hour_field(hour: &str) -> Result<(), ValidationError> {
    validate_hour(hour).map_err(|msg| to_validation_error("hour", msg))
}

pub fn event_id_field(id: &str) -> Result<(), ValidationError> {
    validate_event_id(id).map_err(|msg| to_validation_error("event_id", msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_municipality_code() {
        assert!(validate_municipality_code("08019").is_ok());
        assert!(validate_municipality_code("8019").is_err());
        assert!(validate_municipality_code("080190").is_err());
        assert!(validate_municipality_code("08a19").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-12-16").is_ok());
        assert!(validate_date("2024-02-30").is_err());
        assert!(validate_date("16/12/2024").is_err());
    }

    #[test]
    fn test_validate_hour() {
        assert!(validate_hour("00").is_ok());
        assert!(validate_hour("23").is_ok());
        assert!(validate_hour("24").is_err());
        assert!(validate_hour("7").is_err());
    }

    #[test]
    fn test_validate_event_id() {
        assert!(validate_event_id("42").is_ok());
        assert!(validate_event_id("").is_err());
        assert!(validate_event_id("4a").is_err());
    }

    #[test]
    fn test_field_adapter_keeps_message() {
        let err = hour_field("99").unwrap_err();
        assert_eq!(err.code, "hour");
        assert!(err.message.is_some());
    }
}
