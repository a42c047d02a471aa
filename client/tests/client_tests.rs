//! Tests for backend status mapping, error reporting and AEMET handling

use meteo_events_client::external::aemet::{resolve_data_url, AemetClient};
use meteo_events_client::external::meteo_api::{event_path, event_status_path, MeteoApiClient};
use meteo_events_client::AppError;
use proptest::prelude::*;
use shared::{AemetEnvelope, EvaluationError};

fn not_found() -> AppError {
    AppError::NoForecastForEventDate("7".to_string())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_status_fetch_404_is_missing_forecast() {
        let err = AppError::from_status(404, not_found());
        assert_eq!(err.code(), "NO_FORECAST_FOR_EVENT_DATE");
        assert_eq!(
            err.user_message(),
            "No hi ha previsió meteorològica per la data de l'esdeveniment"
        );
    }

    #[test]
    fn test_known_status_messages() {
        let cases = [
            (400, "Token no proporcionat"),
            (401, "Credencials incorrectes"),
            (403, "Accés denegat"),
            (500, "Error en el servidor"),
        ];
        for (status, message) in cases {
            assert_eq!(AppError::from_status(status, not_found()).user_message(), message);
        }
    }

    #[test]
    fn test_unknown_status_message_keeps_code() {
        let err = AppError::from_status(418, not_found());
        assert_eq!(err.user_message(), "Error desconegut. Code: 418");
        assert_eq!(err.code(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_evaluation_errors_surface_their_message() {
        let date = shared::parse_date("2024-12-16").unwrap();
        let err = AppError::from(EvaluationError::DateNotAvailable(date));
        assert_eq!(err.code(), "DATE_NOT_AVAILABLE");
        assert_eq!(err.user_message(), "La previsió per aquesta data no està disponible");
    }

    #[test]
    fn test_error_detail_json() {
        let detail = AppError::UnknownMunicipality("99999".into()).detail();
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["code"], "UNKNOWN_MUNICIPALITY");
        assert_eq!(json["user_message"], "El municipi introduït no existeix");
        assert!(json.get("field").is_none());
    }

    #[test]
    fn test_aemet_unknown_municipality() {
        let envelope: AemetEnvelope = serde_json::from_str(
            r#"{"descripcion": "Error al obtener los datos", "estado": 404}"#,
        )
        .unwrap();
        let err = resolve_data_url(&envelope, "00000").unwrap_err();
        assert_eq!(err.user_message(), "El municipi introduït no existeix");
    }

    #[test]
    fn test_endpoint_urls() {
        let api = MeteoApiClient::with_base_url("http://localhost:8080".into());
        assert_eq!(api.url(&event_path("3")), "http://localhost:8080/api/esdeveniments/3");
        assert_eq!(api.url(&event_status_path("3")), "http://localhost:8080/api/esdeveniments/3/estat");

        let aemet = AemetClient::with_base_url("k".into(), "https://opendata.aemet.es/opendata/api".into());
        assert_eq!(
            aemet.hourly_metadata_url("08019"),
            "https://opendata.aemet.es/opendata/api/prediccion/especifica/municipio/horaria/08019/"
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// HTTP error statuses the backend does not document
    fn undocumented_status_strategy() -> impl Strategy<Value = u16> {
        (100u16..600).prop_filter("documented status", |s| ![400, 401, 403, 404, 500].contains(s))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_undocumented_status_is_unknown(status in undocumented_status_strategy()) {
            let err = AppError::from_status(status, not_found());
            prop_assert!(matches!(err, AppError::UnexpectedStatus(s) if s == status));
            prop_assert!(err.user_message().starts_with("Error desconegut"));
        }

        #[test]
        fn prop_404_uses_caller_error(id in "[0-9]{1,6}") {
            let err = AppError::from_status(404, AppError::EventNotFound(id.clone()));
            prop_assert!(matches!(err, AppError::EventNotFound(ref found) if *found == id));
        }
    }
}
