//! Scheduled events

use serde::{Deserialize, Serialize};

/// An event as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Event {
    pub id: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "descripcio")]
    pub description: String,
    #[serde(rename = "organitzador")]
    pub organizer: String,
    #[serde(rename = "direccio")]
    pub address: String,
    #[serde(rename = "codi_postal")]
    pub postal_code: String,
    #[serde(rename = "poblacio")]
    pub town: String,
    #[serde(rename = "aforament")]
    pub capacity: i32,
    #[serde(rename = "hora_inici")]
    pub start_time: String,
    #[serde(rename = "hora_fi")]
    pub end_time: String,
    /// Event date as sent by the backend
    #[serde(rename = "data_esde")]
    pub date: String,
}

/// Envelope of the event lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub body: Event,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_names() {
        let body = r#"{"body": {"id": "7", "nom": "Cursa", "codi_postal": "08001",
            "aforament": 300, "hora_inici": "10:00", "hora_fi": "13:00",
            "data_esde": "2024-12-16"}}"#;
        let envelope: EventEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.body.name, "Cursa");
        assert_eq!(envelope.body.capacity, 300);
        assert_eq!(envelope.body.postal_code, "08001");
        assert!(envelope.body.description.is_empty());
    }
}
