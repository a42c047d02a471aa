//! Meteo Events backend client

use reqwest::{Client, Response};
use shared::{Credentials, Event, EventEnvelope, LoginResponse, Session, StatusPayload};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

pub const LOGIN_PATH: &str = "/api/usuaris/login";
pub const LOGOUT_PATH: &str = "/api/usuaris/logout";

/// Backend REST client
#[derive(Clone)]
pub struct MeteoApiClient {
    client: Client,
    base_url: String,
}

pub fn event_path(id: &str) -> String {
    format!("/api/esdeveniments/{}", id)
}

pub fn event_status_path(id: &str) -> String {
    format!("/api/esdeveniments/{}/estat", id)
}

impl MeteoApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Log in and open a session
    pub async fn login(&self, credentials: &Credentials) -> AppResult<Session> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .form(&[
                ("nomUsuari", credentials.username.as_str()),
                ("contrasenya", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let response = check_status(response, AppError::UnexpectedStatus(404))?;
        let login: LoginResponse = serde_json::from_str(&response.text().await?)?;
        let session = Session::from(login);
        tracing::info!(user = %credentials.username, role = %session.role, "logged in");
        Ok(session)
    }

    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        let response = self
            .client
            .post(self.url(LOGOUT_PATH))
            .bearer_auth(&session.token)
            .send()
            .await?;
        check_status(response, AppError::UnexpectedStatus(404))?;
        tracing::debug!("logged out");
        Ok(())
    }

    /// Look up an event by id
    pub async fn get_event(&self, session: &Session, id: &str) -> AppResult<Event> {
        let response = self
            .client
            .get(self.url(&event_path(id)))
            .bearer_auth(&session.token)
            .send()
            .await?;

        let response = check_status(response, AppError::EventNotFound(id.to_string()))?;
        let envelope: EventEnvelope = serde_json::from_str(&response.text().await?)?;
        Ok(envelope.body)
    }

    /// Fetch the hourly status payload of an event
    pub async fn get_status(&self, session: &Session, id: &str) -> AppResult<StatusPayload> {
        let response = self
            .client
            .get(self.url(&event_status_path(id)))
            .bearer_auth(&session.token)
            .send()
            .await?;

        let response = check_status(response, AppError::NoForecastForEventDate(id.to_string()))?;
        let body = response.text().await?;
        Ok(StatusPayload::from_json(&body)?)
    }
}

fn check_status(response: Response, not_found: AppError) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::debug!(url = %response.url(), %status, "backend returned an error status");
    Err(AppError::from_status(status.as_u16(), not_found))
}
