use crate::api::models::request::{
    PeopleRequest, PinRequest, RgbRequest, TimerAddConfigRequest, TimerSetRequest, TriggerRequest,
};
use crate::api::models::snapshot::Snapshot;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Transport/status failure. The message is what the operator sees: the raw
/// error body for reads, the parsed `error` field (else `HTTP <status>`) for
/// writes.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RequestError {
    pub message: String,
}

impl RequestError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Parse a POST response body, treating anything that is not JSON as an
/// empty record rather than a failure.
pub(crate) fn tolerant_parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

/// User-facing message for a failed write: the body's `error` field when
/// present, else a generic status line.
pub(crate) fn failure_message(status: StatusCode, parsed: &Value) -> String {
    parsed
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_json(&self, path: &str) -> Result<Snapshot, RequestError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        let contents = response.text().await?;
        if !status.is_success() {
            return Err(RequestError::new(contents));
        }
        serde_json::from_str(&contents).map_err(|e| {
            RequestError::new(format!(
                "Unable to deserialize response. Body was: \"{}\": {}",
                contents, e
            ))
        })
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, RequestError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let contents = response.text().await?;
        let parsed = tolerant_parse(&contents);
        if !status.is_success() {
            return Err(RequestError::new(failure_message(status, &parsed)));
        }
        Ok(parsed)
    }
}

pub trait SecurityApi {
    fn get_state(
        &self,
    ) -> impl std::future::Future<Output = Result<Snapshot, RequestError>> + Send;
    fn arm(&self, pin: &str) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn disarm(&self, pin: &str)
        -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn stop_alarm(
        &self,
        pin: &str,
    ) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn trigger(
        &self,
        reason: &str,
    ) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn adjust_people(
        &self,
        delta: i64,
    ) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn set_timer(
        &self,
        seconds: i64,
    ) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn extend_timer(&self) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn set_timer_increment(
        &self,
        n_seconds: i64,
    ) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
    fn set_rgb(
        &self,
        request: &RgbRequest,
    ) -> impl std::future::Future<Output = Result<(), RequestError>> + Send;
}

impl SecurityApi for ApiClient {
    async fn get_state(&self) -> Result<Snapshot, RequestError> {
        self.fetch_json("/api/state").await
    }

    async fn arm(&self, pin: &str) -> Result<(), RequestError> {
        self.post_json("/api/alarm/arm", &PinRequest { pin: pin.to_string() })
            .await
            .map(drop)
    }

    async fn disarm(&self, pin: &str) -> Result<(), RequestError> {
        self.post_json("/api/alarm/disarm", &PinRequest { pin: pin.to_string() })
            .await
            .map(drop)
    }

    async fn stop_alarm(&self, pin: &str) -> Result<(), RequestError> {
        self.post_json("/api/alarm/stop", &PinRequest { pin: pin.to_string() })
            .await
            .map(drop)
    }

    async fn trigger(&self, reason: &str) -> Result<(), RequestError> {
        self.post_json(
            "/api/alarm/trigger",
            &TriggerRequest {
                reason: reason.to_string(),
            },
        )
        .await
        .map(drop)
    }

    async fn adjust_people(&self, delta: i64) -> Result<(), RequestError> {
        self.post_json("/api/people", &PeopleRequest { delta })
            .await
            .map(drop)
    }

    async fn set_timer(&self, seconds: i64) -> Result<(), RequestError> {
        self.post_json("/api/timer/set", &TimerSetRequest { seconds })
            .await
            .map(drop)
    }

    async fn extend_timer(&self) -> Result<(), RequestError> {
        self.post_json("/api/timer/add", &serde_json::json!({}))
            .await
            .map(drop)
    }

    async fn set_timer_increment(&self, n_seconds: i64) -> Result<(), RequestError> {
        self.post_json("/api/timer/add_config", &TimerAddConfigRequest { n_seconds })
            .await
            .map(drop)
    }

    async fn set_rgb(&self, request: &RgbRequest) -> Result<(), RequestError> {
        self.post_json("/api/rgb", request).await.map(drop)
    }
}

impl<T> SecurityApi for Arc<T>
where
    T: SecurityApi + Send + Sync,
{
    async fn get_state(&self) -> Result<Snapshot, RequestError> {
        self.as_ref().get_state().await
    }

    async fn arm(&self, pin: &str) -> Result<(), RequestError> {
        self.as_ref().arm(pin).await
    }

    async fn disarm(&self, pin: &str) -> Result<(), RequestError> {
        self.as_ref().disarm(pin).await
    }

    async fn stop_alarm(&self, pin: &str) -> Result<(), RequestError> {
        self.as_ref().stop_alarm(pin).await
    }

    async fn trigger(&self, reason: &str) -> Result<(), RequestError> {
        self.as_ref().trigger(reason).await
    }

    async fn adjust_people(&self, delta: i64) -> Result<(), RequestError> {
        self.as_ref().adjust_people(delta).await
    }

    async fn set_timer(&self, seconds: i64) -> Result<(), RequestError> {
        self.as_ref().set_timer(seconds).await
    }

    async fn extend_timer(&self) -> Result<(), RequestError> {
        self.as_ref().extend_timer().await
    }

    async fn set_timer_increment(&self, n_seconds: i64) -> Result<(), RequestError> {
        self.as_ref().set_timer_increment(n_seconds).await
    }

    async fn set_rgb(&self, request: &RgbRequest) -> Result<(), RequestError> {
        self.as_ref().set_rgb(request).await
    }
}
