//! Event lookup and weather status reduction
//!
//! Each command opens its own backend session and closes it before
//! returning, whatever the outcome.

use serde::Serialize;
use shared::{
    reduce_hourly_data, Credentials, Event, EventQuery, EventStatusAggregate, Session,
    StatusOutcome,
};
use validator::Validate;

use crate::error::AppResult;
use crate::external::MeteoApiClient;

/// Status of one event
#[derive(Debug, Clone)]
pub struct EventStatus {
    pub event: Event,
    pub participants: Vec<String>,
    pub outcome: StatusOutcome,
}

/// JSON view of [`EventStatus`]
#[derive(Debug, Serialize)]
pub struct EventStatusView<'a> {
    pub event: &'a Event,
    pub participants: &'a [String],
    pub no_data: bool,
    pub status_label: Option<&'static str>,
    pub aggregate: &'a EventStatusAggregate,
}

impl EventStatus {
    pub fn view(&self) -> EventStatusView<'_> {
        let aggregate = self.outcome.aggregate();
        EventStatusView {
            event: &self.event,
            participants: &self.participants,
            no_data: self.outcome.is_no_data(),
            status_label: if self.outcome.is_no_data() {
                None
            } else {
                aggregate.status_label()
            },
            aggregate,
        }
    }
}

/// Status service over the backend API
#[derive(Clone)]
pub struct StatusService {
    api: MeteoApiClient,
    credentials: Credentials,
}

impl StatusService {
    pub fn new(api: MeteoApiClient, credentials: Credentials) -> Self {
        Self { api, credentials }
    }

    async fn open_session(&self) -> AppResult<Session> {
        self.credentials.validate()?;
        self.api.login(&self.credentials).await
    }

    async fn close_session(&self, session: &Session) {
        if let Err(err) = self.api.logout(session).await {
            tracing::warn!(error = %err, "logout failed");
        }
    }

    /// Verify the configured credentials
    pub async fn check_login(&self) -> AppResult<Session> {
        let session = self.open_session().await?;
        self.close_session(&session).await;
        Ok(session)
    }

    /// Event details
    pub async fn event_details(&self, query: &EventQuery) -> AppResult<Event> {
        query.validate()?;
        let session = self.open_session().await?;
        let result = self.api.get_event(&session, &query.event_id).await;
        self.close_session(&session).await;
        result
    }

    /// Fetch and reduce the weather status of an event
    pub async fn event_status(&self, query: &EventQuery) -> AppResult<EventStatus> {
        query.validate()?;
        let session = self.open_session().await?;
        let result = self.fetch_status(&session, &query.event_id).await;
        self.close_session(&session).await;
        result
    }

    async fn fetch_status(&self, session: &Session, event_id: &str) -> AppResult<EventStatus> {
        let event = self.api.get_event(session, event_id).await?;
        let payload = self.api.get_status(session, event_id).await?;
        let outcome = reduce_hourly_data(&payload);

        tracing::info!(
            event_id,
            hours = payload.hourly_data.len(),
            alerta_maxima = outcome.aggregate().max_alert(),
            no_data = outcome.is_no_data(),
            "event status evaluated"
        );
        Ok(EventStatus {
            event,
            participants: payload.participants,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::StatusPayload;

    #[test]
    fn test_view_of_empty_status() {
        let status = EventStatus {
            event: Event::default(),
            participants: vec!["anna".into()],
            outcome: reduce_hourly_data(&StatusPayload::default()),
        };
        let view = status.view();
        assert!(view.no_data);
        assert_eq!(view.status_label, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["aggregate"]["alertaMaxima"], 0);
        assert_eq!(json["participants"][0], "anna");
    }

    #[test]
    fn test_invalid_event_id_fails_before_network() {
        let service = StatusService::new(
            MeteoApiClient::with_base_url("http://127.0.0.1:9".into()),
            Credentials {
                username: "anna".into(),
                password: "secret".into(),
            },
        );
        let query = EventQuery {
            event_id: "abc".into(),
        };
        let result = tokio_test::block_on(service.event_status(&query));
        assert!(matches!(result, Err(crate::error::AppError::Validation { .. })));
    }
}
