//! HTTP client for the prediction backend: one POST per submission, no
//! retries, errors folded into a small taxonomy the renderer can display.

use crate::config::join;
use crate::payload::FeaturePayload;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use thiserror::Error;

/// Response field names checked for the predicted value, in priority order.
/// Backend versions have disagreed on the name; the client accepts all of
/// them rather than guessing which is canonical.
const PREDICTION_FIELDS: [&str; 3] = ["prediction", "price", "predicted_price"];

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("malformed response: no usable prediction value")]
    MalformedResponse,
}

/// Wire shape of a prediction request. The feature mapping is wrapped under
/// a `features` key; that is the one body shape this client sends.
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: &'a FeaturePayload,
}

/// Backend health probe response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

pub struct PredictClient {
    client: Client,
    base: String,
}

impl PredictClient {
    /// The base URL is injected once at construction; see `config` for how
    /// it is resolved.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// POSTs one payload to `/predict` and interprets the response. A failed
    /// submission is surfaced as-is; the caller decides whether to submit
    /// again.
    pub async fn predict(&self, payload: &FeaturePayload) -> Result<f64, PredictError> {
        let url = join(&self.base, "/predict");
        debug!(url = %url, fields = payload.len(), "Sending prediction request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&PredictRequest { features: payload })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Prediction request did not complete");
                if e.is_connect() {
                    PredictError::Network("unable to reach the backend".to_string())
                } else if e.is_timeout() {
                    PredictError::Network("the backend took too long to respond".to_string())
                } else {
                    PredictError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        // An unparsable or missing body is treated as an empty object; the
        // field checks below then decide the outcome.
        let body: Value = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_else(|| Value::Object(Default::default()));

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(|s| s.to_string())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            warn!(status = status.as_u16(), message = %message, "Backend rejected the request");
            return Err(PredictError::Api {
                status: status.as_u16(),
                message,
            });
        }

        extract_prediction(&body).ok_or(PredictError::MalformedResponse)
    }

    /// GETs the backend's `/health` endpoint. Used for deployment checks,
    /// not part of the submission flow.
    pub async fn health(&self) -> Result<HealthStatus, PredictError> {
        let url = join(&self.base, "/health");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PredictError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("health check failed")
                    .to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|_| PredictError::MalformedResponse)
    }
}

/// Checks the candidate fields in priority order and returns the first one
/// that carries a finite number, accepting numeric strings too.
fn extract_prediction(body: &Value) -> Option<f64> {
    for field in PREDICTION_FIELDS {
        if let Some(value) = body.get(field) {
            if let Some(n) = value_as_finite(value) {
                return Some(n);
            }
        }
    }
    None
}

fn value_as_finite(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormData;
    use crate::payload::build_payload;
    use serde_json::json;

    fn payload(fields: &[(&str, &str)]) -> FeaturePayload {
        let pairs = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        build_payload(&FormData::from_pairs(pairs))
    }

    #[test]
    fn prediction_field_priority_order() {
        let body = json!({"price": 2.0, "prediction": 1.0, "predicted_price": 3.0});
        assert_eq!(extract_prediction(&body), Some(1.0));

        let body = json!({"predicted_price": 3.0, "price": 2.0});
        assert_eq!(extract_prediction(&body), Some(2.0));

        let body = json!({"predicted_price": 3.0});
        assert_eq!(extract_prediction(&body), Some(3.0));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        assert_eq!(extract_prediction(&json!({"prediction": "15000"})), Some(15000.0));
        assert_eq!(extract_prediction(&json!({"prediction": "abc"})), None);
    }

    #[test]
    fn non_numeric_candidates_fall_through() {
        let body = json!({"prediction": null, "price": 2.5});
        assert_eq!(extract_prediction(&body), Some(2.5));
        assert_eq!(extract_prediction(&json!({})), None);
    }

    #[tokio::test]
    async fn successful_prediction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"prediction": 15000}"#)
            .create_async()
            .await;

        let client = PredictClient::new(server.url());
        let result = client.predict(&payload(&[("year", "2020")])).await;
        assert_eq!(result.unwrap(), 15000.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn wrapped_request_body_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_body(mockito::Matcher::Json(json!({
                "features": {"year": 2020, "mileage": 30000}
            })))
            .with_status(200)
            .with_body(r#"{"price": 12345}"#)
            .create_async()
            .await;

        let client = PredictClient::new(server.url());
        let result = client
            .predict(&payload(&[("year", "2020"), ("mileage", "30000")]))
            .await;
        assert_eq!(result.unwrap(), 12345.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_error_carries_backend_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(400)
            .with_body(r#"{"error": "bad input"}"#)
            .create_async()
            .await;

        let client = PredictClient::new(server.url());
        let err = client.predict(&payload(&[("year", "x")])).await.unwrap_err();
        match err {
            PredictError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad input");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn api_error_without_body_falls_back_to_status_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(500)
            .with_body("not json")
            .create_async()
            .await;

        let client = PredictClient::new(server.url());
        let err = client.predict(&payload(&[])).await.unwrap_err();
        match err {
            PredictError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_is_malformed_not_a_crash() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = PredictClient::new(server.url());
        let err = client.predict(&payload(&[])).await.unwrap_err();
        assert!(matches!(err, PredictError::MalformedResponse));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        // Grab a port that nothing is listening on.
        let server = mockito::Server::new_async().await;
        let url = server.url();
        drop(server);

        let client = PredictClient::new(url);
        let err = client.predict(&payload(&[])).await.unwrap_err();
        assert!(matches!(err, PredictError::Network(_)));
    }

    #[tokio::test]
    async fn health_probe() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "ok", "model": "model.joblib"}"#)
            .create_async()
            .await;

        let client = PredictClient::new(server.url());
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.model.as_deref(), Some("model.joblib"));
    }
}
