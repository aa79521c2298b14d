//! Paydrip configuration.
//!
//! Everything comes from `PAYDRIP_*` environment variables; there is no
//! config file and no CLI surface beyond logging verbosity.

use serde::{Deserialize, Serialize};

use crate::error::{PaydripError, Result};

/// Runtime configuration for the dispatcher.
#[derive(Clone, Serialize, Deserialize)]
pub struct PaydripConfig {
    /// Base URL of the record store.
    pub store_url: String,
    /// Superuser identity for the store auth handshake.
    pub store_email: String,
    /// Superuser password for the store auth handshake.
    pub store_password: String,
    /// Collection holding the payment records.
    pub collection: String,
    /// Processing endpoint that payments are resubmitted to.
    pub submit_url: String,
}

impl PaydripConfig {
    /// Read configuration from the environment.
    ///
    /// Store credentials are required; everything else falls back to a
    /// local-development default.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            store_url: env_or("PAYDRIP_STORE_URL", "http://127.0.0.1:8090"),
            store_email: env_required("PAYDRIP_STORE_EMAIL")?,
            store_password: env_required("PAYDRIP_STORE_PASSWORD")?,
            collection: env_or("PAYDRIP_COLLECTION", "payments"),
            submit_url: env_or("PAYDRIP_SUBMIT_URL", "http://localhost:5173/submit"),
        })
    }
}

// Manual Debug: the password must not end up in logs.
impl std::fmt::Debug for PaydripConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaydripConfig")
            .field("store_url", &self.store_url)
            .field("store_email", &self.store_email)
            .field("store_password", &"<redacted>")
            .field("collection", &self.collection)
            .field("submit_url", &self.submit_url)
            .finish()
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| PaydripError::Config(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_requires_credentials_and_applies_defaults() {
        unsafe {
            std::env::remove_var("PAYDRIP_STORE_URL");
            std::env::remove_var("PAYDRIP_STORE_EMAIL");
            std::env::remove_var("PAYDRIP_STORE_PASSWORD");
            std::env::remove_var("PAYDRIP_COLLECTION");
            std::env::remove_var("PAYDRIP_SUBMIT_URL");
        }
        assert!(PaydripConfig::from_env().is_err());

        unsafe {
            std::env::set_var("PAYDRIP_STORE_EMAIL", "admin@example.com");
            std::env::set_var("PAYDRIP_STORE_PASSWORD", "hunter2");
        }
        let config = PaydripConfig::from_env().unwrap();
        assert_eq!(config.store_email, "admin@example.com");
        assert_eq!(config.store_url, "http://127.0.0.1:8090");
        assert_eq!(config.collection, "payments");
        assert_eq!(config.submit_url, "http://localhost:5173/submit");
    }

    #[test]
    fn debug_redacts_password() {
        let config = PaydripConfig {
            store_url: "http://127.0.0.1:8090".into(),
            store_email: "admin@example.com".into(),
            store_password: "hunter2".into(),
            collection: "payments".into(),
            submit_url: "http://localhost:5173/submit".into(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
