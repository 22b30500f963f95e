//! Pluggable OTP mail delivery
//!
//! - `Mailer` trait: the delivery interface
//! - `MailClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Implementations: `HttpMailer` (HTTP mail relay), `MockMailer` (tests)
//!
//! # Configuration
//!
//! Environment variables:
//! - `FINSIGHT_MAIL_HOST`: Base URL of the mail relay (required)
//! - `FINSIGHT_MAIL_FROM`: Sender address (default: no-reply@finsight.app)
//! - `FINSIGHT_MAIL_TOKEN`: Bearer token for the relay (optional)

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Environment variable naming the mail relay host
pub const MAIL_HOST_ENV: &str = "FINSIGHT_MAIL_HOST";
/// Environment variable naming the sender address
pub const MAIL_FROM_ENV: &str = "FINSIGHT_MAIL_FROM";
/// Environment variable carrying the relay bearer token
pub const MAIL_TOKEN_ENV: &str = "FINSIGHT_MAIL_TOKEN";

const DEFAULT_FROM: &str = "no-reply@finsight.app";

/// Trait defining the interface for OTP delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a verification code to an email address
    async fn send_otp(&self, to: &str, code: &str) -> Result<()>;
}

/// Concrete mail client wrapper
#[derive(Clone)]
pub enum MailClient {
    Http(HttpMailer),
    Mock(std::sync::Arc<MockMailer>),
}

impl MailClient {
    /// Create a client from the environment, None when unconfigured
    pub fn from_env() -> Option<Self> {
        let host = std::env::var(MAIL_HOST_ENV).ok()?;
        let from = std::env::var(MAIL_FROM_ENV).unwrap_or_else(|_| DEFAULT_FROM.to_string());
        let token = std::env::var(MAIL_TOKEN_ENV).ok();
        Some(Self::Http(HttpMailer::new(&host, &from, token)))
    }
}

#[async_trait]
impl Mailer for MailClient {
    async fn send_otp(&self, to: &str, code: &str) -> Result<()> {
        match self {
            Self::Http(mailer) => mailer.send_otp(to, code).await,
            Self::Mock(mailer) => mailer.send_otp(to, code).await,
        }
    }
}

#[derive(Serialize)]
struct OutboundMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Mailer that POSTs to an HTTP mail relay
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    host: String,
    from: String,
    token: Option<String>,
}

impl HttpMailer {
    pub fn new(host: &str, from: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            from: from.to_string(),
            token,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<()> {
        let body = OutboundMail {
            from: &self.from,
            to,
            subject: "Your FinSight verification code",
            text: format!(
                "Your OTP code: {}\n\n\
                 This code is valid for the next 10 minutes, so please enter it soon \
                 to complete your sign in.\n\n\
                 If you didn't request this code, you can ignore this email.\n\n\
                 The FinSight Team",
                code
            ),
        };

        let mut request = self.client.post(format!("{}/send", self.host)).json(&body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "Mail relay rejected OTP email");
            return Err(Error::Delivery(format!(
                "Mail relay returned {}",
                response.status()
            )));
        }

        debug!(to, "OTP email accepted by relay");
        Ok(())
    }
}

/// Mock mailer for testing
///
/// Records every delivered (to, code) pair, and can be switched to fail
/// so callers can exercise the delivery-error path.
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<(String, String)>>,
    fail: std::sync::atomic::AtomicBool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Everything delivered so far, oldest first
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The most recent code delivered to an address
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|(addr, _)| addr == to)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<()> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Error::Delivery("mock mailer set to fail".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((to.to_string(), code.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_mailer_records_sends() {
        let mailer = MockMailer::new();
        mailer.send_otp("a@example.com", "123456").await.unwrap();
        mailer.send_otp("a@example.com", "654321").await.unwrap();

        assert_eq!(mailer.sent().len(), 2);
        assert_eq!(
            mailer.last_code_for("a@example.com"),
            Some("654321".to_string())
        );
        assert_eq!(mailer.last_code_for("b@example.com"), None);
    }

    #[tokio::test]
    async fn test_mock_mailer_failure_mode() {
        let mailer = MockMailer::new();
        mailer.set_failing(true);
        let err = mailer.send_otp("a@example.com", "123456").await.unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
        assert!(mailer.sent().is_empty());
    }
}
