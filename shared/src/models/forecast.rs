//! AEMET hourly forecast models and the per-hour alert evaluation
//!
//! AEMET publishes instantaneous quantities (wind, precipitation, snow,
//! temperature, thermal sensation, humidity) once per hour, tagged with the
//! hour of day (`"08"`), and probabilities once per 6-hour window, tagged
//! with the window code (`"0713"`). [`evaluate_hour`] picks the matching
//! entries for one hour and classifies them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{EvaluationError, EvaluationResult};
use crate::models::alert::{
    classify_high_temperature, classify_low_temperature, classify_rain, classify_snow,
    classify_wind_average, classify_wind_gust, AlertLevel,
};

/// Precipitation sentinel AEMET uses for trace amounts
pub const TRACE_PRECIPITATION: &str = "Ip";

// ============================================================================
// Hours and period buckets
// ============================================================================

/// An hour of the day, 00-23
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HourOfDay(u8);

impl HourOfDay {
    pub fn new(hour: u8) -> Option<Self> {
        (hour < 24).then_some(Self(hour))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Two-digit tag used by AEMET for hourly entries
    pub fn tag(self) -> String {
        format!("{:02}", self.0)
    }

    /// The 6-hour window this hour belongs to
    pub fn bucket(self) -> PeriodBucket {
        PeriodBucket::from_hour(self)
    }
}

impl FromStr for HourOfDay {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EvaluationError::InvalidHour(s.to_string());
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u8>().ok().and_then(Self::new).ok_or_else(invalid)
    }
}

impl TryFrom<String> for HourOfDay {
    type Error = EvaluationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HourOfDay> for String {
    fn from(hour: HourOfDay) -> Self {
        hour.tag()
    }
}

impl std::fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// 6-hour window used by AEMET for probability fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodBucket {
    /// 19:00 to 01:00, wrapping midnight
    #[serde(rename = "1901")]
    Evening,
    /// 01:00 to 07:00
    #[serde(rename = "0107")]
    Night,
    /// 07:00 to 13:00
    #[serde(rename = "0713")]
    Morning,
    /// 13:00 to 19:00
    #[serde(rename = "1319")]
    Afternoon,
}

impl PeriodBucket {
    pub fn from_hour(hour: HourOfDay) -> Self {
        match hour.value() {
            1..=6 => PeriodBucket::Night,
            7..=12 => PeriodBucket::Morning,
            13..=18 => PeriodBucket::Afternoon,
            _ => PeriodBucket::Evening,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            PeriodBucket::Evening => "1901",
            PeriodBucket::Night => "0107",
            PeriodBucket::Morning => "0713",
            PeriodBucket::Afternoon => "1319",
        }
    }
}

impl std::fmt::Display for PeriodBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// AEMET response
// ============================================================================

/// Metadata envelope returned by the first AEMET request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AemetEnvelope {
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub estado: Option<u16>,
    /// URL of the actual forecast document
    #[serde(default)]
    pub datos: Option<String>,
}

impl AemetEnvelope {
    /// Description AEMET returns for an unknown municipality
    pub const DATA_ERROR: &'static str = "Error al obtener los datos";

    /// URL of the forecast document, if AEMET accepted the request
    pub fn data_url(&self) -> Option<&str> {
        if self.descripcion == Self::DATA_ERROR {
            return None;
        }
        self.datos.as_deref().filter(|url| !url.is_empty())
    }
}

/// Hourly forecast for one municipality (one element of the AEMET array)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AemetForecast {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub provincia: String,
    #[serde(default)]
    pub elaborado: Option<String>,
    pub prediccion: Prediction,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Prediction {
    #[serde(default)]
    pub dia: Vec<ForecastDay>,
}

/// A day of hourly predictions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// `YYYY-MM-DDT00:00:00`
    pub fecha: String,
    pub viento_and_racha_max: Option<Vec<WindEntry>>,
    pub prob_precipitacion: Option<Vec<PeriodValue>>,
    pub precipitacion: Option<Vec<PeriodValue>>,
    pub prob_tormenta: Option<Vec<PeriodValue>>,
    pub nieve: Option<Vec<PeriodValue>>,
    pub prob_nieve: Option<Vec<PeriodValue>>,
    pub temperatura: Option<Vec<PeriodValue>>,
    pub sens_termica: Option<Vec<PeriodValue>>,
    pub humedad_relativa: Option<Vec<PeriodValue>>,
}

impl ForecastDay {
    /// Calendar date of this day, if `fecha` is well formed
    pub fn date(&self) -> Option<NaiveDate> {
        let day = self.fecha.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// A single value tagged with the hour or window it applies to
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PeriodValue {
    #[serde(default)]
    pub periodo: String,
    #[serde(default)]
    pub value: Option<Value>,
}

/// Wind entry: either average speed/direction or the maximum gust
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WindEntry {
    #[serde(default)]
    pub periodo: String,
    #[serde(default)]
    pub direccion: Vec<String>,
    #[serde(default)]
    pub velocidad: Vec<String>,
    /// Maximum gust, km/h
    #[serde(default)]
    pub value: Option<Value>,
}

/// Find the prediction for `date` in the first forecast of the response
pub fn find_forecast_day(forecasts: &[AemetForecast], date: NaiveDate) -> Option<&ForecastDay> {
    forecasts
        .first()?
        .prediccion
        .dia
        .iter()
        .find(|day| day.date() == Some(date))
}

// ============================================================================
// Sample and evaluation
// ============================================================================

/// Forecast values for one hour; absent fields had no forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeatherSample {
    pub wind_average_kmh: Option<i32>,
    pub wind_gust_kmh: Option<i32>,
    pub rain_probability: Option<i32>,
    pub rain_amount_mm: Option<Decimal>,
    pub storm_probability: Option<i32>,
    pub snow_amount_mm: Option<Decimal>,
    pub snow_probability: Option<i32>,
    pub temperature_celsius: Option<i32>,
    pub thermal_sensation_celsius: Option<i32>,
    pub relative_humidity: Option<i32>,
}

/// Alert levels computed for one sample; `None` where the field was absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SampleAlerts {
    pub wind_average: Option<AlertLevel>,
    pub wind_gust: Option<AlertLevel>,
    pub rain: Option<AlertLevel>,
    pub snow: Option<AlertLevel>,
    pub high_temperature: Option<AlertLevel>,
    pub low_temperature: Option<AlertLevel>,
}

impl SampleAlerts {
    pub fn levels(&self) -> impl Iterator<Item = AlertLevel> {
        [
            self.wind_average,
            self.wind_gust,
            self.rain,
            self.snow,
            self.high_temperature,
            self.low_temperature,
        ]
        .into_iter()
        .flatten()
    }

    /// Most severe level computed, if any field was present
    pub fn max(&self) -> Option<AlertLevel> {
        self.levels().max()
    }
}

/// Result of evaluating one hour of a forecast day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyEvaluation {
    pub date: NaiveDate,
    pub hour: HourOfDay,
    pub bucket: PeriodBucket,
    pub sample: WeatherSample,
    pub alerts: SampleAlerts,
}

impl HourlyEvaluation {
    pub fn max_alert(&self) -> Option<AlertLevel> {
        self.alerts.max()
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse an amount in mm; the trace sentinel reads as zero
pub(crate) fn parse_amount(value: &Value) -> Option<Decimal> {
    let text = value_text(value)?;
    if text == TRACE_PRECIPITATION {
        return Some(Decimal::ZERO);
    }
    let text = text.replace(',', ".");
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn matching<'a>(entries: &'a Option<Vec<PeriodValue>>, tag: &'a str) -> Option<&'a Value> {
    entries
        .iter()
        .flatten()
        .filter(|entry| entry.periodo == tag)
        .last()
        .and_then(|entry| entry.value.as_ref())
}

fn logged<T>(parsed: Option<T>, raw: &dyn std::fmt::Display, tag: &str, name: &str) -> Option<T> {
    if parsed.is_none() {
        tracing::debug!(field = name, period = tag, value = %raw, "skipping unparseable value");
    }
    parsed
}

fn int_field(entries: &Option<Vec<PeriodValue>>, tag: &str, name: &str) -> Option<i32> {
    let raw = matching(entries, tag)?;
    logged(parse_int(raw), raw, tag, name)
}

fn amount_field(entries: &Option<Vec<PeriodValue>>, tag: &str, name: &str) -> Option<Decimal> {
    let raw = matching(entries, tag)?;
    logged(parse_amount(raw), raw, tag, name)
}

/// Extract and classify the forecast values of `day` at `hour`
pub fn evaluate_hour(day: &ForecastDay, hour: HourOfDay) -> EvaluationResult<HourlyEvaluation> {
    let date = day
        .date()
        .ok_or_else(|| EvaluationError::InvalidPayload(format!("bad forecast date: {}", day.fecha)))?;
    let tag = hour.tag();
    let bucket = hour.bucket();

    // Later entries for the same period override earlier ones
    let wind = day.viento_and_racha_max.iter().flatten().filter(|w| w.periodo == tag);
    let mut wind_average_kmh = None;
    let mut wind_gust_kmh = None;
    for entry in wind {
        if let Some(raw) = entry.velocidad.first() {
            let parsed = logged(raw.trim().parse::<i32>().ok(), raw, &tag, "velocidad");
            wind_average_kmh = parsed.or(wind_average_kmh);
        }
        if let Some(raw) = entry.value.as_ref() {
            let parsed = logged(parse_int(raw), raw, &tag, "rachaMax");
            wind_gust_kmh = parsed.or(wind_gust_kmh);
        }
    }

    let sample = WeatherSample {
        wind_average_kmh,
        wind_gust_kmh,
        rain_probability: int_field(&day.prob_precipitacion, bucket.code(), "probPrecipitacion"),
        rain_amount_mm: amount_field(&day.precipitacion, &tag, "precipitacion"),
        storm_probability: int_field(&day.prob_tormenta, bucket.code(), "probTormenta"),
        snow_amount_mm: amount_field(&day.nieve, &tag, "nieve"),
        snow_probability: int_field(&day.prob_nieve, bucket.code(), "probNieve"),
        temperature_celsius: int_field(&day.temperatura, &tag, "temperatura"),
        thermal_sensation_celsius: int_field(&day.sens_termica, &tag, "sensTermica"),
        relative_humidity: int_field(&day.humedad_relativa, &tag, "humedadRelativa"),
    };

    let alerts = SampleAlerts {
        wind_average: sample.wind_average_kmh.map(classify_wind_average),
        wind_gust: sample.wind_gust_kmh.map(classify_wind_gust),
        rain: sample.rain_amount_mm.map(classify_rain),
        snow: sample.snow_amount_mm.map(classify_snow),
        high_temperature: sample.temperature_celsius.map(classify_high_temperature),
        low_temperature: sample.temperature_celsius.map(classify_low_temperature),
    };

    tracing::debug!(%date, hour = %hour, bucket = %bucket, max_alert = ?alerts.max(), "evaluated forecast hour");

    Ok(HourlyEvaluation {
        date,
        hour,
        bucket,
        sample,
        alerts,
    })
}

/// Locate `date` in the forecast and evaluate `hour`
pub fn evaluate_forecast(
    forecasts: &[AemetForecast],
    date: NaiveDate,
    hour: HourOfDay,
) -> EvaluationResult<HourlyEvaluation> {
    let day = find_forecast_day(forecasts, date).ok_or(EvaluationError::DateNotAvailable(date))?;
    evaluate_hour(day, hour)
}
