//! Typed HTTP client for the events API.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::models::{ApiResponse, Event};
use crate::validation::CreateEventRequest;

const FALLBACK_ERROR: &str = "Something went wrong";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct EventsClient {
    http: reqwest::Client,
    base_url: String,
}

impl EventsClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn events_url(&self) -> String {
        format!("{}/api/events", self.base_url)
    }

    pub async fn fetch_events(
        &self,
        location: Option<&str>,
    ) -> Result<ApiResponse<Vec<Event>>, ClientError> {
        let mut request = self.http.get(self.events_url());
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            request = request.query(&[("location", location)]);
        }

        handle_response(request.send().await?).await
    }

    pub async fn fetch_event(&self, id: &str) -> Result<ApiResponse<Event>, ClientError> {
        let url = format!("{}/{}", self.events_url(), id);
        handle_response(self.http.get(url).send().await?).await
    }

    pub async fn create_event(
        &self,
        event: &CreateEventRequest,
    ) -> Result<ApiResponse<Event>, ClientError> {
        let response = self.http.post(self.events_url()).json(event).send().await?;
        handle_response(response).await
    }
}

// Non-2xx responses surface the envelope's message when there is one.
async fn handle_response<T: DeserializeOwned>(
    response: Response,
) -> Result<ApiResponse<T>, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| FALLBACK_ERROR.to_string());
        return Err(ClientError::Api { status, message });
    }

    Ok(serde_json::from_slice(&body)?)
}
