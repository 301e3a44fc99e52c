//! Booking submission backends.
//!
//! `SimulatedSubmitter` waits a fixed delay and confirms, standing in for a
//! real request. `HttpSubmitter` posts to a booking endpoint and retries
//! transient failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::models::{BookingRequest, Confirmation};

/// Why a submission did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("booking service unavailable: {0}")]
    Transient(String),

    #[error("booking request rejected: {0}")]
    Rejected(String),
}

/// Something that can deliver a frozen booking request
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(&self, request: &BookingRequest) -> Result<Confirmation, SubmissionError>;
}

/// Pretends to send the request. Always succeeds after `delay`.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl BookingSubmitter for SimulatedSubmitter {
    async fn submit(&self, request: &BookingRequest) -> Result<Confirmation, SubmissionError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "Simulating booking submission");
        tokio::time::sleep(self.delay).await;
        Ok(Confirmation::for_request(request))
    }
}

/// Body the booking endpoint may answer with
#[derive(Debug, Deserialize)]
struct ReceiptBody {
    reference: Option<Uuid>,
}

enum Attempt {
    Retry(String),
    Fail(SubmissionError),
}

/// Posts booking requests as JSON to a remote endpoint.
///
/// Connection errors, timeouts, 429 and 5xx responses are retried with
/// exponential backoff; any other 4xx is final.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
    max_attempts: u32,
    backoff: Duration,
}

impl HttpSubmitter {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            max_attempts: max_attempts.max(1),
            backoff: Duration::from_millis(250),
        })
    }

    /// Override the first retry delay (doubles on each further attempt)
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn attempt(&self, request: &BookingRequest) -> Result<Confirmation, Attempt> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Attempt::Retry(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let mut confirmation = Confirmation::for_request(request);
            if let Ok(receipt) = response.json::<ReceiptBody>().await {
                if let Some(reference) = receipt.reference {
                    confirmation.reference = reference;
                }
            }
            return Ok(confirmation);
        }

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Attempt::Retry(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await.unwrap_or_default();
        Err(Attempt::Fail(SubmissionError::Rejected(format!(
            "HTTP {} {}",
            status.as_u16(),
            body.trim()
        ))))
    }
}

#[async_trait]
impl BookingSubmitter for HttpSubmitter {
    async fn submit(&self, request: &BookingRequest) -> Result<Confirmation, SubmissionError> {
        let mut attempt = 1;
        loop {
            match self.attempt(request).await {
                Ok(confirmation) => {
                    info!(
                        reference = %confirmation.reference,
                        attempt,
                        "Booking request delivered"
                    );
                    return Ok(confirmation);
                }
                Err(Attempt::Fail(e)) => return Err(e),
                Err(Attempt::Retry(reason)) if attempt < self.max_attempts => {
                    let delay = self.backoff * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Booking submission failed ({}), retrying",
                        reason
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(Attempt::Retry(reason)) => return Err(SubmissionError::Transient(reason)),
            }
        }
    }
}
