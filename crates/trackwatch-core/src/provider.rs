use crate::error::{Result, TrackError};
use serde::Deserialize;
use std::time::Duration;

/// How long one lookup may take before the item is skipped for this tick.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// One tracking event from the provider. Only the description is
/// consumed; other provider fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingEvent {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    #[serde(default)]
    events: Vec<TrackingEvent>,
}

/// External lookup collaborator: tracking code in, ordered event list
/// out (most recent first).
pub trait TrackingProvider {
    fn lookup(&self, code: &str) -> Result<Vec<TrackingEvent>>;
}

/// Client for the Wonca Labs tracking endpoint.
pub struct WoncaClient {
    http: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl WoncaClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    /// Connectivity self-test: one lookup against `code`, reporting
    /// the failure detail instead of an event list.
    pub fn probe(&self, code: &str) -> std::result::Result<(), String> {
        match self.lookup(code) {
            Ok(_) => Ok(()),
            Err(TrackError::Provider { status }) => Err(format!("provider error {status}")),
            Err(e) => Err(format!("connection failed: {e}")),
        }
    }
}

impl TrackingProvider for WoncaClient {
    fn lookup(&self, code: &str) -> Result<Vec<TrackingEvent>> {
        let res = self
            .http
            .post(&self.url)
            .header("Authorization", format!("Apikey {}", self.api_key))
            .json(&serde_json::json!({ "code": code }))
            .send()?;

        let status = res.status();
        if !status.is_success() {
            return Err(TrackError::Provider {
                status: status.as_u16(),
            });
        }
        let body: TrackResponse = res.json()?;
        Ok(body.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::ServerGuard) -> WoncaClient {
        WoncaClient::new(format!("{}/track", server.url()), "test-key").unwrap()
    }

    #[test]
    fn lookup_returns_events_in_order() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/track")
            .match_header("authorization", "Apikey test-key")
            .match_body(mockito::Matcher::Json(serde_json::json!({"code": "X1"})))
            .with_status(200)
            .with_body(
                r#"{"events":[{"description":"In transit"},{"description":"Posted"}]}"#,
            )
            .create();

        let events = client(&server).lookup("X1").unwrap();
        mock.assert();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, "In transit");
    }

    #[test]
    fn empty_event_list_is_success() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/track")
            .with_status(200)
            .with_body(r#"{"events":[]}"#)
            .create();

        let events = client(&server).lookup("X1").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn non_success_status_is_provider_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/track")
            .with_status(429)
            .with_body("quota exceeded")
            .create();

        let err = client(&server).lookup("X1").unwrap_err();
        assert!(matches!(err, TrackError::Provider { status: 429 }));
    }

    #[test]
    fn probe_reports_provider_failure_detail() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/track").with_status(401).create();

        let msg = client(&server).probe("X1").unwrap_err();
        assert!(msg.contains("401"));
    }
}
