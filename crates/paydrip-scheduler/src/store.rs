//! Record store client — PocketBase collection API over HTTP.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use paydrip_core::{PaydripConfig, PaydripError, Result};

use crate::records::PaymentRecord;

/// Read access to the payment collection. The engine only ever needs the
/// filtered, created-ascending list of paid records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_paid(&self) -> Result<Vec<PaymentRecord>>;
}

const PER_PAGE: usize = 500;
const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// PocketBase-backed record store.
pub struct PocketBaseStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    identity: String,
    password: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// One page of a collection list response.
#[derive(Debug, Deserialize)]
struct ListPage {
    items: Vec<PaymentRecord>,
}

impl PocketBaseStore {
    pub fn new(config: &PaydripConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.store_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            identity: config.store_email.clone(),
            password: config.store_password.clone(),
            token: None,
        }
    }

    /// Superuser auth handshake. On success the token is attached to every
    /// later query. A failure here is not fatal to the process: list
    /// queries fail visibly on their own when the token is missing.
    pub async fn authenticate(&mut self) -> Result<()> {
        let url = format!(
            "{}/api/collections/_superusers/auth-with-password",
            self.base_url
        );
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "identity": self.identity,
                "password": self.password,
            }))
            .timeout(STORE_TIMEOUT)
            .send()
            .await
            .map_err(|e| PaydripError::Store(format!("auth request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PaydripError::Store(format!("auth rejected ({status}): {body}")));
        }

        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|e| PaydripError::Store(format!("malformed auth response: {e}")))?;
        self.token = Some(auth.token);
        tracing::info!("🔑 Authenticated with record store");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PocketBaseStore {
    /// Full list of paid records, created-ascending, paginating until the
    /// store returns a short page.
    async fn fetch_paid(&self) -> Result<Vec<PaymentRecord>> {
        let url = format!(
            "{}/api/collections/{}/records",
            self.base_url, self.collection
        );
        let mut records = Vec::new();
        let mut page = 1usize;
        loop {
            let mut req = self
                .client
                .get(&url)
                .query(&[
                    ("filter", r#"status="paid""#.to_string()),
                    ("sort", "created".to_string()),
                    ("perPage", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ])
                .timeout(STORE_TIMEOUT);
            if let Some(token) = &self.token {
                req = req.header("Authorization", token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| PaydripError::Store(format!("list request failed: {e}")))?;
            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(PaydripError::Store(format!("list rejected ({status}): {body}")));
            }

            let list: ListPage = resp
                .json()
                .await
                .map_err(|e| PaydripError::Store(format!("malformed list response: {e}")))?;
            let fetched = list.items.len();
            records.extend(list.items);
            if fetched < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PaymentStatus;

    #[test]
    fn parses_a_list_page() {
        let list: ListPage = serde_json::from_str(
            r#"{
                "page": 1,
                "perPage": 500,
                "totalItems": 2,
                "items": [
                    {"id": "a", "status": "paid", "created": "2026-08-01 09:00:00.000Z"},
                    {"id": "b", "status": "paid", "distancing": true,
                     "nextSubmitDate": "2026-08-09 12:00:00.000Z",
                     "created": "2026-08-02 09:00:00.000Z"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].status, PaymentStatus::Paid);
        assert!(list.items[1].distancing);
        assert!(list.items[0].created < list.items[1].created);
    }

    #[test]
    fn parses_an_auth_response() {
        let auth: AuthResponse =
            serde_json::from_str(r#"{"token": "jwt-here", "record": {"id": "su1"}}"#).unwrap();
        assert_eq!(auth.token, "jwt-here");
    }
}
