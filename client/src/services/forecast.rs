//! Hourly forecast evaluation for a municipality

use shared::{evaluate_forecast, ForecastQuery, HourlyEvaluation};
use validator::Validate;

use crate::error::AppResult;
use crate::external::AemetClient;

/// Forecast service: AEMET fetch plus hourly evaluation
#[derive(Clone)]
pub struct ForecastService {
    aemet: AemetClient,
}

impl ForecastService {
    pub fn new(aemet: AemetClient) -> Self {
        Self { aemet }
    }

    /// Evaluate the alert levels forecast for one hour
    pub async fn evaluate(&self, query: &ForecastQuery) -> AppResult<HourlyEvaluation> {
        query.validate()?;
        let date = query.parsed_date()?;
        let hour = query.parsed_hour()?;

        tracing::info!(municipality = %query.municipality, %date, %hour, "evaluating forecast");
        let forecasts = self.aemet.fetch_hourly_forecast(&query.municipality).await?;
        let evaluation = evaluate_forecast(&forecasts, date, hour)?;

        tracing::info!(
            municipality = %query.municipality,
            max_alert = ?evaluation.max_alert().map(|l| l.value()),
            "forecast evaluated"
        );
        Ok(evaluation)
    }
}
