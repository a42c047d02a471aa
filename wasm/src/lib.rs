//! WebAssembly module for Meteo Events
//!
//! Exposes the shared evaluation to the browser front end:
//! - Per-quantity alert classification
//! - Hour to AEMET period bucket mapping
//! - Hourly forecast evaluation
//! - Event status reduction
//!
//! Structured results cross the boundary as JSON strings.

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    classify_high_temperature, classify_low_temperature, classify_rain, classify_snow,
    classify_wind_average, classify_wind_gust, evaluate_forecast, parse_date, reduce_hourly_data,
    status_label, AemetForecast, AlertLevel, EventStatusAggregate, HourOfDay, StatusPayload,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("meteo-events wasm loaded"));
}

fn js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

/// Quantity accepted by [`classify_quantity`]
fn classify_named(quantity: &str, value: f64) -> Result<AlertLevel, String> {
    let whole = value.round() as i32;
    let amount = || Decimal::try_from(value).map_err(|e| format!("invalid amount {}: {}", value, e));
    let level = match quantity {
        "wind_average" => classify_wind_average(whole),
        "wind_gust" => classify_wind_gust(whole),
        "rain" => classify_rain(amount()?),
        "snow" => classify_snow(amount()?),
        "high_temperature" => classify_high_temperature(whole),
        "low_temperature" => classify_low_temperature(whole),
        other => return Err(format!("unknown quantity: {}", other)),
    };
    Ok(level)
}

/// Classify one quantity; integral quantities are rounded to the nearest unit
#[wasm_bindgen]
pub fn classify_quantity(quantity: &str, value: f64) -> Result<u8, JsValue> {
    classify_named(quantity, value)
        .map(AlertLevel::value)
        .map_err(js_error)
}

/// Label of an alert level, or `undefined` outside 1-5
#[wasm_bindgen]
pub fn alert_label(level: i32) -> Option<String> {
    status_label(i64::from(level)).map(str::to_string)
}

fn bucket_for(hour: &str) -> Result<String, String> {
    let hour: HourOfDay = hour.parse().map_err(|e: shared::EvaluationError| e.to_string())?;
    Ok(hour.bucket().code().to_string())
}

/// AEMET period bucket (`0107`, `0713`, `1319`, `1901`) of an hour `HH`
#[wasm_bindgen]
pub fn period_bucket(hour: &str) -> Result<String, JsValue> {
    bucket_for(hour).map_err(js_error)
}

#[derive(Serialize)]
struct StatusResult<'a> {
    no_data: bool,
    status_label: Option<&'static str>,
    participants: &'a [String],
    aggregate: &'a EventStatusAggregate,
}

fn status_json(payload_json: &str) -> Result<String, String> {
    let payload = StatusPayload::from_json(payload_json).map_err(|e| e.to_string())?;
    let outcome = reduce_hourly_data(&payload);
    let aggregate = outcome.aggregate();
    let result = StatusResult {
        no_data: outcome.is_no_data(),
        status_label: if outcome.is_no_data() {
            None
        } else {
            aggregate.status_label()
        },
        participants: &payload.participants,
        aggregate,
    };
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

/// Reduce a status payload; returns the aggregate as JSON
#[wasm_bindgen]
pub fn evaluate_event_status(payload_json: &str) -> Result<String, JsValue> {
    status_json(payload_json).map_err(js_error)
}

fn forecast_json(forecast_json: &str, date: &str, hour: &str) -> Result<String, String> {
    let forecasts: Vec<AemetForecast> =
        serde_json::from_str(forecast_json).map_err(|e| format!("invalid forecast JSON: {}", e))?;
    let date = parse_date(date).map_err(str::to_string)?;
    let hour: HourOfDay = hour.parse().map_err(|e: shared::EvaluationError| e.to_string())?;
    let evaluation = evaluate_forecast(&forecasts, date, hour).map_err(|e| e.to_string())?;
    serde_json::to_string(&evaluation).map_err(|e| e.to_string())
}

/// Evaluate one hour of an AEMET hourly forecast; returns JSON
#[wasm_bindgen]
pub fn evaluate_forecast_hour(forecast_json: &str, date: &str, hour: &str) -> Result<String, JsValue> {
    self::forecast_json(forecast_json, date, hour).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_quantity() {
        assert_eq!(classify_quantity("wind_average", 12.0).unwrap(), 2);
        assert_eq!(classify_quantity("wind_gust", 40.0).unwrap(), 5);
        assert_eq!(classify_quantity("rain", 0.49).unwrap(), 2);
        assert_eq!(classify_quantity("snow", 0.0).unwrap(), 1);
        assert_eq!(classify_quantity("high_temperature", 31.0).unwrap(), 4);
        assert_eq!(classify_quantity("low_temperature", -6.0).unwrap(), 5);
        assert!(classify_named("pressure", 1013.0).is_err());
    }

    #[test]
    fn test_alert_label() {
        assert_eq!(alert_label(1).as_deref(), Some("SEGUR"));
        assert_eq!(alert_label(5).as_deref(), Some("CANCEL·LAT"));
        assert_eq!(alert_label(0), None);
    }

    #[test]
    fn test_period_bucket() {
        assert_eq!(period_bucket("00").unwrap(), "1901");
        assert_eq!(period_bucket("06").unwrap(), "0107");
        assert_eq!(period_bucket("12").unwrap(), "0713");
        assert_eq!(period_bucket("18").unwrap(), "1319");
        assert!(bucket_for("24").is_err());
    }

    #[test]
    fn test_evaluate_event_status() {
        let json = evaluate_event_status(
            r#"{"Usuaris participants": ["anna"], "08": {"AlertaPluja": 2, "Mesures": {"1": "Evacuar zona"}}}"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status_label"], "PRECAUCIÓ");
        assert_eq!(value["aggregate"]["alertaMaxima"], 2);
        assert_eq!(value["aggregate"]["measures"][0], "Evacuar zona");
        assert_eq!(value["participants"][0], "anna");
    }

    #[test]
    fn test_evaluate_empty_status() {
        let value: serde_json::Value =
            serde_json::from_str(&evaluate_event_status("{}").unwrap()).unwrap();
        assert_eq!(value["no_data"], true);
        assert!(value["status_label"].is_null());
    }

    #[test]
    fn test_evaluate_forecast_hour() {
        let forecast = r#"[{"nombre": "Girona", "provincia": "Girona", "prediccion": {"dia": [{
            "fecha": "2024-12-16T00:00:00",
            "temperatura": [{"value": "29", "periodo": "16"}],
            "probPrecipitacion": [{"value": "40", "periodo": "1319"}]
        }]}}]"#;
        let json = evaluate_forecast_hour(forecast, "2024-12-16", "16").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["bucket"], "1319");
        assert_eq!(value["hour"], "16");
        assert_eq!(value["sample"]["rain_probability"], 40);
        assert_eq!(value["alerts"]["high_temperature"], 3);
        assert!(forecast_json(forecast, "2024-12-17", "16").is_err());
    }
}
