//! Outbound signup notification
//!
//! Best-effort webhook fired after a successful registration. Delivery is
//! at-most-once with no retry; every failure is absorbed and logged.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt::Debug;
use std::time::Duration;

use crate::domain::user::User;
use crate::domain::DomainError;
use tracing::{debug, warn};

/// Default request timeout for the webhook call
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Payload posted to the configured webhook URL
#[derive(Debug, Clone, Serialize)]
pub struct SignupPayload {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl SignupPayload {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            username: user.username().to_string(),
        }
    }
}

/// Trait for signup notification dispatch
#[async_trait]
pub trait SignupNotifier: Send + Sync + Debug {
    /// Notify an external system of a new user
    ///
    /// Infallible by contract: failures must never propagate to the
    /// registration flow.
    async fn notify_signup(&self, payload: SignupPayload);
}

/// Webhook-backed notifier
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url` with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SignupNotifier for WebhookNotifier {
    async fn notify_signup(&self, payload: SignupPayload) {
        let result = self.client.post(&self.url).json(&payload).send().await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(user_id = %payload.id, "Signup notification delivered");
            }
            Ok(response) => {
                warn!(
                    user_id = %payload.id,
                    status = response.status().as_u16(),
                    "Signup notification rejected by receiver"
                );
            }
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    "Request timed out".to_string()
                } else if e.is_connect() {
                    "Connection failed".to_string()
                } else {
                    format!("Request failed: {}", e)
                };

                warn!(user_id = %payload.id, error = %error_msg, "Signup notification failed");
            }
        }
    }
}

/// Notifier used when no webhook URL is configured
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl SignupNotifier for NoopNotifier {
    async fn notify_signup(&self, _payload: SignupPayload) {}
}
