// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use crate::error::ApiError;

/// Runtime settings of the wizard service.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardConfig {
    /// Quiet period before a burst of edits is written as one draft.
    pub draft_debounce: Duration,
    /// Longest wait for the submission backend.
    pub submission_timeout: Duration,
    /// Shortest simulated backend latency.
    pub min_latency: Duration,
    /// Longest simulated backend latency.
    pub max_latency: Duration,
    /// Probability in `[0, 1]` that the simulated backend fails.
    pub failure_rate: f64,
    /// Interval between simulated upload progress ticks.
    pub upload_tick: Duration,
    /// Smallest progress step of a simulated upload, in percent.
    pub min_upload_increment: u8,
    /// Largest progress step of a simulated upload, in percent.
    pub max_upload_increment: u8,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            draft_debounce: Duration::from_millis(750),
            submission_timeout: Duration::from_secs(10),
            min_latency: Duration::from_millis(400),
            max_latency: Duration::from_millis(1_200),
            failure_rate: 0.0,
            upload_tick: Duration::from_millis(200),
            min_upload_increment: 8,
            max_upload_increment: 25,
        }
    }
}

impl WizardConfig {
    /// Checks that the ranges and rates are usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first setting that is out of range.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(invalid(
                "failure_rate",
                format!("must be between 0 and 1, got {}", self.failure_rate),
            ));
        }
        if self.min_latency > self.max_latency {
            return Err(invalid(
                "min_latency",
                String::from("must not exceed max_latency"),
            ));
        }
        if self.min_upload_increment == 0 || self.min_upload_increment > self.max_upload_increment
        {
            return Err(invalid(
                "min_upload_increment",
                String::from("must be at least 1 and not exceed max_upload_increment"),
            ));
        }
        if self.max_upload_increment > 100 {
            return Err(invalid(
                "max_upload_increment",
                String::from("must not exceed 100"),
            ));
        }
        if self.upload_tick.is_zero() || self.submission_timeout.is_zero() {
            return Err(invalid(
                "upload_tick",
                String::from("intervals and timeouts must be positive"),
            ));
        }
        Ok(())
    }

    /// Draws one upload progress step.
    #[must_use]
    pub fn sample_upload_increment(&self) -> u8 {
        if self.max_upload_increment <= self.min_upload_increment {
            return self.min_upload_increment;
        }
        rand::random_range(self.min_upload_increment..=self.max_upload_increment)
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message,
    }
}
