// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The submission pipeline.
//!
//! A submission hands the complete form to a [`SubmissionBackend`] and waits
//! a bounded time for its answer. The pipeline itself never retries; a
//! failed submission leaves the session in an error state from which the
//! user may submit again.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use upscalex_domain::{FormState, RoleProfile};

use crate::flows::FlowKind;

/// What is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    /// The flow name.
    pub flow: String,
    /// The submitting session.
    pub session_id: String,
    /// The full form.
    pub fields: FormState,
    /// Entry hints the session started with (selected service, event, role).
    pub hints: BTreeMap<String, String>,
    /// The typed signup profile, for flows that carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<RoleProfile>,
}

/// The backend's answer to an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// The backend's reference for the created record.
    pub reference: String,
    /// A message for the user.
    pub message: Option<String>,
}

/// Submission failures. All of them may be retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The backend refused the form.
    #[error("The submission was rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or failed.
    #[error("The submission service is unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer in time.
    #[error("No answer from the submission service after {} ms", .0.as_millis())]
    TimedOut(Duration),
}

/// Port to the system that receives completed forms.
#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    /// Submits one form.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the form or fails.
    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Bounded-time submission in front of a backend.
#[derive(Clone)]
pub struct SubmissionPipeline {
    backend: Arc<dyn SubmissionBackend>,
    timeout: Duration,
}

impl SubmissionPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(backend: Arc<dyn SubmissionBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Submits a form, waiting at most the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, or `TimedOut` if it does not answer in
    /// time. A timed-out call is abandoned.
    pub async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(
            flow = %request.flow,
            session_id = %request.session_id,
            fields = request.fields.len(),
            "Submitting form"
        );
        match tokio::time::timeout(self.timeout, self.backend.submit(request)).await {
            Ok(Ok(receipt)) => {
                info!(
                    flow = %request.flow,
                    session_id = %request.session_id,
                    reference = %receipt.reference,
                    "Submission accepted"
                );
                Ok(receipt)
            }
            Ok(Err(e)) => {
                warn!(
                    flow = %request.flow,
                    session_id = %request.session_id,
                    error = %e,
                    "Submission failed"
                );
                Err(e)
            }
            Err(_) => {
                warn!(
                    flow = %request.flow,
                    session_id = %request.session_id,
                    timeout_ms = self.timeout.as_millis(),
                    "Submission timed out"
                );
                Err(SubmissionError::TimedOut(self.timeout))
            }
        }
    }
}

/// A stand-in backend with configurable latency and failure rate.
pub struct SimulatedBackend {
    min_latency: Duration,
    max_latency: Duration,
    failure_rate: f64,
    sequence: AtomicU64,
}

impl SimulatedBackend {
    /// Creates a backend whose latency is drawn uniformly from
    /// `min_latency..=max_latency` and which fails with probability
    /// `failure_rate`.
    #[must_use]
    pub const fn new(min_latency: Duration, max_latency: Duration, failure_rate: f64) -> Self {
        Self {
            min_latency,
            max_latency,
            failure_rate,
            sequence: AtomicU64::new(1),
        }
    }

    fn sample_latency(&self) -> Duration {
        if self.max_latency <= self.min_latency {
            return self.min_latency;
        }
        let min: u64 = u64::try_from(self.min_latency.as_millis()).unwrap_or(u64::MAX);
        let max: u64 = u64::try_from(self.max_latency.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::random_range(min..=max))
    }
}

#[async_trait]
impl SubmissionBackend for SimulatedBackend {
    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        tokio::time::sleep(self.sample_latency()).await;

        if rand::random::<f64>() < self.failure_rate {
            return Err(SubmissionError::Unavailable(String::from(
                "please try again in a moment",
            )));
        }

        let flow: Option<FlowKind> = request.flow.parse().ok();
        let prefix: &str = flow.map_or("SUB", |f| f.reference_prefix());
        let number: u64 = self.sequence.fetch_add(1, Ordering::SeqCst);
        let message: String = match flow {
            Some(FlowKind::Signup) => String::from("Welcome to UpscaleX! Your account is ready."),
            Some(FlowKind::Apply) => {
                String::from("Application received. We will be in touch shortly.")
            }
            Some(FlowKind::EventRegistration) => {
                String::from("You are registered. See you at the event!")
            }
            None => String::from("Submission received."),
        };

        Ok(SubmissionReceipt {
            reference: format!("{prefix}-{number:06}"),
            message: Some(message),
        })
    }
}
