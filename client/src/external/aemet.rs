//! AEMET open data client
//!
//! Forecasts are served in two hops: a metadata request that returns the URL
//! of the data document (`datos`), then a request for the document itself.

use reqwest::Client;
use shared::{AemetEnvelope, AemetForecast};
use std::time::Duration;

use crate::config::AemetConfig;
use crate::error::{AppError, AppResult};

/// AEMET API client
#[derive(Clone)]
pub struct AemetClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AemetClient {
    /// Create a client from configuration
    pub fn new(config: &AemetConfig) -> AppResult<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::Configuration(
                "aemet.api_key is not set (METEO_AEMET__API_KEY)".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Metadata URL of the hourly forecast for a municipality
    pub fn hourly_metadata_url(&self, municipality: &str) -> String {
        format!(
            "{}/prediccion/especifica/municipio/horaria/{}/",
            self.base_url.trim_end_matches('/'),
            municipality
        )
    }

    /// First hop: metadata describing where the forecast document lives
    pub async fn fetch_envelope(&self, municipality: &str) -> AppResult<AemetEnvelope> {
        let url = self.hourly_metadata_url(municipality);
        tracing::debug!(%url, "requesting AEMET metadata");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Aemet(format!("metadata request returned {}", status)));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the hourly forecast document for a municipality
    pub async fn fetch_hourly_forecast(&self, municipality: &str) -> AppResult<Vec<AemetForecast>> {
        let envelope = self.fetch_envelope(municipality).await?;
        let data_url = resolve_data_url(&envelope, municipality)?;
        tracing::debug!(url = %data_url, "requesting AEMET forecast data");

        let response = self.client.get(data_url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Aemet(format!("data request returned {}", status)));
        }

        // AEMET declares ISO-8859-15; text() decodes by charset
        let body = response.text().await?;
        let forecasts: Vec<AemetForecast> = serde_json::from_str(&body)?;
        tracing::info!(
            municipality,
            days = forecasts.first().map(|f| f.prediccion.dia.len()).unwrap_or(0),
            "AEMET forecast received"
        );
        Ok(forecasts)
    }
}

/// URL of the forecast document, or the unknown-municipality error
pub fn resolve_data_url<'a>(envelope: &'a AemetEnvelope, municipality: &str) -> AppResult<&'a str> {
    envelope.data_url().ok_or_else(|| {
        tracing::warn!(municipality, descripcion = %envelope.descripcion, "AEMET rejected municipality");
        AppError::UnknownMunicipality(municipality.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> AemetEnvelope {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_metadata_url() {
        let client = AemetClient::with_base_url("key".into(), "https://example.test/api/".into());
        assert_eq!(
            client.hourly_metadata_url("08019"),
            "https://example.test/api/prediccion/especifica/municipio/horaria/08019/"
        );
    }

    #[test]
    fn test_resolve_data_url() {
        let ok = envelope(r#"{"descripcion": "exito", "estado": 200, "datos": "https://example.test/sh/1"}"#);
        assert_eq!(resolve_data_url(&ok, "08019").unwrap(), "https://example.test/sh/1");

        let unknown = envelope(r#"{"descripcion": "Error al obtener los datos", "estado": 404}"#);
        assert!(matches!(
            resolve_data_url(&unknown, "99999"),
            Err(AppError::UnknownMunicipality(code)) if code == "99999"
        ));

        let missing = envelope(r#"{"descripcion": "exito", "estado": 200}"#);
        assert!(resolve_data_url(&missing, "08019").is_err());
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = AemetConfig {
            base_url: "https://example.test".into(),
            api_key: String::new(),
            timeout_secs: 5,
        };
        assert!(matches!(AemetClient::new(&config), Err(AppError::Configuration(_))));
    }
}
