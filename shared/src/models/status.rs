//! Event status payloads and their reduction to an event-level aggregate
//!
//! The backend answers a status query with one JSON object keyed by hour.
//! Every hour maps field names (`Temperatura`, `AlertaPluja`, ...) to a
//! number, or to a nested map whose values are prevention measures. The
//! payload is decoded once into [`StatusField`] values and folded into an
//! [`EventStatusAggregate`] holding the worst case over the whole event.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{EvaluationError, EvaluationResult};
use crate::models::alert::status_label;

/// Top-level key carrying the event participants
pub const PARTICIPANTS_KEY: &str = "Usuaris participants";

// ============================================================================
// Decoded fields
// ============================================================================

/// One recognized entry of an hourly record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusField {
    WindAverage(i64),
    WindAverageAlert(i64),
    WindGust(i64),
    WindGustAlert(i64),
    RainProbability(i64),
    RainAmount(Decimal),
    RainAlert(i64),
    StormProbability(i64),
    SnowAmount(Decimal),
    SnowAlert(i64),
    SnowProbability(i64),
    Temperature(i64),
    HighTemperatureAlert(i64),
    LowTemperatureAlert(i64),
    RelativeHumidity(i64),
    /// Prevention measures, in map order
    Measures(Vec<String>),
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64()
}

fn as_amount(value: &Value) -> Option<Decimal> {
    let Value::Number(n) = value else {
        return None;
    };
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn measure_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl StatusField {
    /// Decode a single `key: value` entry.
    ///
    /// Nested maps always decode to [`StatusField::Measures`]. Unknown keys
    /// and recognized keys with the wrong JSON type yield `None`.
    pub fn decode(key: &str, value: &Value) -> Option<Self> {
        if let Value::Object(map) = value {
            return Some(StatusField::Measures(map.values().map(measure_text).collect()));
        }

        let field = match key {
            "VelocitatMitjaVent" => StatusField::WindAverage(as_integer(value)?),
            "AlertaVentMitja" => StatusField::WindAverageAlert(as_integer(value)?),
            "RatxaMaximaVent" => StatusField::WindGust(as_integer(value)?),
            "AlertaRatxaMaxima" => StatusField::WindGustAlert(as_integer(value)?),
            "ProbabilitatPluja" => StatusField::RainProbability(as_integer(value)?),
            "Precipitacio" => StatusField::RainAmount(as_amount(value)?),
            "AlertaPluja" => StatusField::RainAlert(as_integer(value)?),
            "ProbabilitatTempesta" => StatusField::StormProbability(as_integer(value)?),
            "Neu" => StatusField::SnowAmount(as_amount(value)?),
            "AlertaNeu" => StatusField::SnowAlert(as_integer(value)?),
            "ProbabilitatNevada" => StatusField::SnowProbability(as_integer(value)?),
            "Temperatura" => StatusField::Temperature(as_integer(value)?),
            "AlertaAltaTemperatura" => StatusField::HighTemperatureAlert(as_integer(value)?),
            "AlertaBaixaTemperatura" => StatusField::LowTemperatureAlert(as_integer(value)?),
            "HumitatRelativa" => StatusField::RelativeHumidity(as_integer(value)?),
            _ => return None,
        };
        Some(field)
    }

    /// Alert value carried by this field, if it is one of the six alert keys
    pub fn alert_value(&self) -> Option<i64> {
        match self {
            StatusField::WindAverageAlert(v)
            | StatusField::WindGustAlert(v)
            | StatusField::RainAlert(v)
            | StatusField::SnowAlert(v)
            | StatusField::HighTemperatureAlert(v)
            | StatusField::LowTemperatureAlert(v) => Some(*v),
            _ => None,
        }
    }
}

// ============================================================================
// Payload
// ============================================================================

/// Fields reported for one hour of the event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub hour: String,
    pub fields: Vec<StatusField>,
}

/// Decoded status response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusPayload {
    pub participants: Vec<String>,
    pub hourly_data: Vec<HourlyRecord>,
}

impl StatusPayload {
    pub fn from_json(body: &str) -> EvaluationResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> EvaluationResult<Self> {
        let Value::Object(root) = value else {
            return Err(EvaluationError::InvalidPayload(
                "status response is not a JSON object".to_string(),
            ));
        };

        let mut payload = StatusPayload::default();
        for (key, entry) in root {
            if key == PARTICIPANTS_KEY {
                payload.participants = decode_participants(entry);
                continue;
            }
            match entry {
                Value::Object(fields) => payload.hourly_data.push(HourlyRecord {
                    hour: key.clone(),
                    fields: decode_record(key, fields),
                }),
                other => {
                    tracing::debug!(hour = %key, value = %other, "skipping non-object hourly entry");
                }
            }
        }
        Ok(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.hourly_data.is_empty()
    }
}

fn decode_participants(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(measure_text).collect(),
        _ => Vec::new(),
    }
}

fn decode_record(hour: &str, fields: &Map<String, Value>) -> Vec<StatusField> {
    fields
        .iter()
        .filter_map(|(key, value)| {
            let decoded = StatusField::decode(key, value);
            if decoded.is_none() {
                tracing::debug!(hour, field = %key, "ignoring status field");
            }
            decoded
        })
        .collect()
}

// ============================================================================
// Aggregate
// ============================================================================

/// Worst-case values over every hour of an event.
///
/// Starts at zero; every fold keeps the maximum of the current and the new
/// value, so no field ever decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventStatusAggregate {
    wind_average: i64,
    wind_gust: i64,
    rain_probability: i64,
    rain_amount: Decimal,
    storm_probability: i64,
    snow_amount: Decimal,
    snow_probability: i64,
    temperature: i64,
    relative_humidity: i64,
    wind_average_alert: i64,
    wind_gust_alert: i64,
    rain_alert: i64,
    snow_alert: i64,
    high_temperature_alert: i64,
    low_temperature_alert: i64,
    #[serde(rename = "alertaMaxima")]
    max_alert: i64,
    measures: Vec<String>,
}

fn raise<T: Ord + Copy>(slot: &mut T, value: T) {
    if value > *slot {
        *slot = value;
    }
}

impl EventStatusAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded field into the aggregate
    pub fn fold(&mut self, field: &StatusField) {
        match field {
            StatusField::WindAverage(v) => raise(&mut self.wind_average, *v),
            StatusField::WindAverageAlert(v) => raise(&mut self.wind_average_alert, *v),
            StatusField::WindGust(v) => raise(&mut self.wind_gust, *v),
            StatusField::WindGustAlert(v) => raise(&mut self.wind_gust_alert, *v),
            StatusField::RainProbability(v) => raise(&mut self.rain_probability, *v),
            StatusField::RainAmount(v) => raise(&mut self.rain_amount, *v),
            StatusField::RainAlert(v) => raise(&mut self.rain_alert, *v),
            StatusField::StormProbability(v) => raise(&mut self.storm_probability, *v),
            StatusField::SnowAmount(v) => raise(&mut self.snow_amount, *v),
            StatusField::SnowAlert(v) => raise(&mut self.snow_alert, *v),
            StatusField::SnowProbability(v) => raise(&mut self.snow_probability, *v),
            StatusField::Temperature(v) => raise(&mut self.temperature, *v),
            StatusField::HighTemperatureAlert(v) => raise(&mut self.high_temperature_alert, *v),
            StatusField::LowTemperatureAlert(v) => raise(&mut self.low_temperature_alert, *v),
            StatusField::RelativeHumidity(v) => raise(&mut self.relative_humidity, *v),
            StatusField::Measures(items) => {
                for item in items {
                    self.add_measure(item);
                }
            }
        }
        if let Some(alert) = field.alert_value() {
            raise(&mut self.max_alert, alert);
        }
    }

    fn add_measure(&mut self, measure: &str) {
        if !self.measures.iter().any(|m| m == measure) {
            self.measures.push(measure.to_string());
        }
    }

    pub fn wind_average(&self) -> i64 {
        self.wind_average
    }

    pub fn wind_gust(&self) -> i64 {
        self.wind_gust
    }

    pub fn rain_probability(&self) -> i64 {
        self.rain_probability
    }

    pub fn rain_amount(&self) -> Decimal {
        self.rain_amount
    }

    pub fn storm_probability(&self) -> i64 {
        self.storm_probability
    }

    pub fn snow_amount(&self) -> Decimal {
        self.snow_amount
    }

    pub fn snow_probability(&self) -> i64 {
        self.snow_probability
    }

    pub fn temperature(&self) -> i64 {
        self.temperature
    }

    pub fn relative_humidity(&self) -> i64 {
        self.relative_humidity
    }

    pub fn wind_average_alert(&self) -> i64 {
        self.wind_average_alert
    }

    pub fn wind_gust_alert(&self) -> i64 {
        self.wind_gust_alert
    }

    pub fn rain_alert(&self) -> i64 {
        self.rain_alert
    }

    pub fn snow_alert(&self) -> i64 {
        self.snow_alert
    }

    pub fn high_temperature_alert(&self) -> i64 {
        self.high_temperature_alert
    }

    pub fn low_temperature_alert(&self) -> i64 {
        self.low_temperature_alert
    }

    /// Overall maximum alert (`alertaMaxima`)
    pub fn max_alert(&self) -> i64 {
        self.max_alert
    }

    /// The six per-quantity alerts
    pub fn alerts(&self) -> [i64; 6] {
        [
            self.wind_average_alert,
            self.wind_gust_alert,
            self.rain_alert,
            self.snow_alert,
            self.high_temperature_alert,
            self.low_temperature_alert,
        ]
    }

    /// Deduplicated prevention measures, first-seen order
    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    /// Label of the overall alert; warns when it falls outside 1-5
    pub fn status_label(&self) -> Option<&'static str> {
        let label = status_label(self.max_alert);
        if label.is_none() {
            tracing::warn!(alerta_maxima = self.max_alert, "alert level has no status label");
        }
        label
    }
}

/// Result of reducing a status payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    Evaluated(EventStatusAggregate),
    /// The payload had no hourly records; carries the empty aggregate
    NoData(EventStatusAggregate),
}

impl StatusOutcome {
    pub fn aggregate(&self) -> &EventStatusAggregate {
        match self {
            StatusOutcome::Evaluated(aggregate) | StatusOutcome::NoData(aggregate) => aggregate,
        }
    }

    pub fn into_aggregate(self) -> EventStatusAggregate {
        match self {
            StatusOutcome::Evaluated(aggregate) | StatusOutcome::NoData(aggregate) => aggregate,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, StatusOutcome::NoData(_))
    }

    /// `Err(NoData)` for an empty payload
    pub fn into_result(self) -> EvaluationResult<EventStatusAggregate> {
        match self {
            StatusOutcome::Evaluated(aggregate) => Ok(aggregate),
            StatusOutcome::NoData(_) => Err(EvaluationError::NoData),
        }
    }
}

/// Fold every hourly record of `payload` into a fresh aggregate
pub fn reduce_hourly_data(payload: &StatusPayload) -> StatusOutcome {
    let mut aggregate = EventStatusAggregate::new();
    if payload.is_empty() {
        tracing::info!("status payload has no hourly data");
        return StatusOutcome::NoData(aggregate);
    }

    for record in &payload.hourly_data {
        for field in &record.fields {
            aggregate.fold(field);
        }
    }

    tracing::debug!(
        hours = payload.hourly_data.len(),
        alerta_maxima = aggregate.max_alert(),
        measures = aggregate.measures().len(),
        "reduced status payload"
    );
    StatusOutcome::Evaluated(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_map_is_measures_whatever_the_key() {
        let field = StatusField::decode("Temperatura", &json!({"a": "Hidratar", "b": 3}));
        assert_eq!(
            field,
            Some(StatusField::Measures(vec!["Hidratar".to_string(), "3".to_string()]))
        );
    }

    #[test]
    fn test_wrong_type_is_skipped() {
        assert_eq!(StatusField::decode("AlertaPluja", &json!("4")), None);
        assert_eq!(StatusField::decode("Temperatura", &json!(21.5)), None);
        assert_eq!(StatusField::decode("Desconegut", &json!(1)), None);
    }

    #[test]
    fn test_amount_accepts_integers() {
        assert_eq!(
            StatusField::decode("Precipitacio", &json!(2)),
            Some(StatusField::RainAmount(Decimal::from(2)))
        );
    }

    #[test]
    fn test_non_object_payload() {
        assert!(StatusPayload::from_value(&json!([1, 2])).is_err());
        assert!(StatusPayload::from_json("not json").is_err());
    }
}
