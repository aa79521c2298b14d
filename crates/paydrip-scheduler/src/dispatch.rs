//! Submit endpoint client — resubmits one payment token per call.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use paydrip_core::{PaydripError, Result};

/// Fixed amount carried on every cron resubmission.
const SUBMIT_AMOUNT: u32 = 1;
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// The processing endpoint seam.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Resubmit one payment. Success returns the endpoint's response
    /// payload; failure carries any response body for diagnostics.
    async fn submit(&self, record_id: &str) -> Result<serde_json::Value>;
}

/// Wire body for the submit endpoint.
#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    #[serde(rename = "paymentToken")]
    payment_token: &'a str,
    amount: u32,
    #[serde(rename = "fromCron")]
    from_cron: bool,
}

/// HTTP implementation posting to the configured submit URL.
pub struct HttpDispatcher {
    client: reqwest::Client,
    submit_url: String,
}

impl HttpDispatcher {
    pub fn new(submit_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            submit_url: submit_url.to_string(),
        }
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn submit(&self, record_id: &str) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(&self.submit_url)
            .json(&SubmitRequest {
                payment_token: record_id,
                amount: SUBMIT_AMOUNT,
                from_cron: true,
            })
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await
            .map_err(|e| PaydripError::Dispatch {
                reason: format!("submit request failed: {e}"),
                body: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.ok();
            return Err(PaydripError::Dispatch {
                reason: format!("submit rejected ({status})"),
                body,
            });
        }

        resp.json().await.map_err(|e| PaydripError::Dispatch {
            reason: format!("malformed submit response: {e}"),
            body: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_body_has_the_exact_wire_shape() {
        let body = serde_json::to_value(SubmitRequest {
            payment_token: "abc123",
            amount: SUBMIT_AMOUNT,
            from_cron: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"paymentToken": "abc123", "amount": 1, "fromCron": true})
        );
    }
}
