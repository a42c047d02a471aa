//! Plain-text rendering of evaluation results

use std::fmt::{self, Display, Formatter};

use crate::error::EvaluationError;
use crate::models::{AlertLevel, HourlyEvaluation, StatusOutcome};

const RULE: &str = "---------------------------------------------------";

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Report for one forecast hour
pub struct ForecastReport<'a>(pub &'a HourlyEvaluation);

impl Display for ForecastReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let eval = self.0;
        let sample = &eval.sample;
        let alerts = &eval.alerts;
        let level = |l: Option<AlertLevel>| opt(l.map(AlertLevel::value));

        writeln!(f, "Dades per la data: {} {}:00", eval.date, eval.hour)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Velocitat mitja de vent: {}", opt(sample.wind_average_kmh))?;
        writeln!(f, "Nivell d'alerta per vent: {}", level(alerts.wind_average))?;
        writeln!(f, "Ratxa màxima de vent: {}", opt(sample.wind_gust_kmh))?;
        writeln!(f, "Nivell d'alerta per ratxa màxima: {}", level(alerts.wind_gust))?;
        writeln!(f, "Probabilitat de pluja: {}", opt(sample.rain_probability))?;
        writeln!(f, "Precipitació: {}", opt(sample.rain_amount_mm))?;
        writeln!(f, "Nivell d'alerta per pluja: {}", level(alerts.rain))?;
        writeln!(f, "Probabilitat de tempesta: {}", opt(sample.storm_probability))?;
        writeln!(f, "Neu: {}", opt(sample.snow_amount_mm))?;
        writeln!(f, "Nivell d'alerta per neu: {}", level(alerts.snow))?;
        writeln!(f, "Probabilitat de nevada: {}", opt(sample.snow_probability))?;
        writeln!(f, "Temperatura: {}", opt(sample.temperature_celsius))?;
        writeln!(f, "Nivell d'alerta per alta temperatura: {}", level(alerts.high_temperature))?;
        writeln!(f, "Nivell d'alerta per baixa temperatura: {}", level(alerts.low_temperature))?;
        writeln!(f, "Sensació tèrmica: {}", opt(sample.thermal_sensation_celsius))?;
        writeln!(f, "Humitat relativa: {}", opt(sample.relative_humidity))?;
        match eval.max_alert() {
            Some(max) => write!(f, "Alerta màxima: {} ({})", max.value(), max.label()),
            None => write!(f, "Alerta màxima: -"),
        }
    }
}

/// Report for an event status query
pub struct StatusReport<'a>(pub &'a StatusOutcome);

impl Display for StatusReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_no_data() {
            return write!(f, "{}", EvaluationError::NoData.user_message());
        }
        let agg = self.0.aggregate();

        writeln!(f, "Estat: {}", agg.status_label().unwrap_or("-"))?;
        writeln!(f, "Alerta màxima: {}", agg.max_alert())?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Velocitat mitja de vent: {}", agg.wind_average())?;
        writeln!(f, "Nivell d'alerta per vent: {}", agg.wind_average_alert())?;
        writeln!(f, "Ratxa màxima de vent: {}", agg.wind_gust())?;
        writeln!(f, "Nivell d'alerta per ratxa màxima: {}", agg.wind_gust_alert())?;
        writeln!(f, "Probabilitat de pluja: {}", agg.rain_probability())?;
        writeln!(f, "Precipitació: {}", agg.rain_amount())?;
        writeln!(f, "Nivell d'alerta per pluja: {}", agg.rain_alert())?;
        writeln!(f, "Probabilitat de tempesta: {}", agg.storm_probability())?;
        writeln!(f, "Neu: {}", agg.snow_amount())?;
        writeln!(f, "Nivell d'alerta per neu: {}", agg.snow_alert())?;
        writeln!(f, "Probabilitat de nevada: {}", agg.snow_probability())?;
        writeln!(f, "Temperatura: {}", agg.temperature())?;
        writeln!(f, "Nivell d'alerta per alta temperatura: {}", agg.high_temperature_alert())?;
        writeln!(f, "Nivell d'alerta per baixa temperatura: {}", agg.low_temperature_alert())?;
        writeln!(f, "Humitat relativa: {}", agg.relative_humidity())?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Mesures de prevenció:")?;
        write!(f, "{}", agg.measures().join("\n"))
    }
}
