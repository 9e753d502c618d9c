// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::pipeline::SubmissionError;
use upscalex::{ConfigurationError, CoreError, FieldIssue};

/// API-level errors.
///
/// These are distinct from core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// One or more fields failed validation.
    ValidationFailed {
        /// A summary of the failure.
        message: String,
        /// Every failing field, in declaration order.
        issues: Vec<FieldIssue>,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The session's state does not allow the operation.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The submission backend rejected the form or was unreachable.
    SubmissionFailed {
        /// A human-readable description of the failure.
        message: String,
    },
    /// The submission backend did not answer in time.
    SubmissionTimedOut {
        /// A human-readable description of the timeout.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed { message, .. } => write!(f, "Validation failed: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::SubmissionFailed { message } => write!(f, "Submission failed: {message}"),
            Self::SubmissionTimedOut { message } => write!(f, "Submission timed out: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns the machine-readable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "validation_failed",
            Self::InvalidInput { .. } => "invalid_input",
            Self::ResourceNotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::SubmissionFailed { .. } => "submission_failed",
            Self::SubmissionTimedOut { .. } => "submission_timed_out",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::TimedOut(_) => Self::SubmissionTimedOut {
                message: err.to_string(),
            },
            SubmissionError::Rejected(_) | SubmissionError::Unavailable(_) => {
                Self::SubmissionFailed {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(err: ConfigurationError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::StepIncomplete { issues, .. } => ApiError::ValidationFailed { message, issues },
        CoreError::OrdinalOutOfRange { .. } => ApiError::InvalidInput {
            field: String::from("ordinal"),
            message,
        },
        CoreError::UnknownField(field) | CoreError::FieldKindMismatch { field, .. } => {
            ApiError::InvalidInput { field, message }
        }
        CoreError::AtFirstStep
        | CoreError::AtFinalStep
        | CoreError::NotAtFinalStep { .. }
        | CoreError::SubmissionInFlight
        | CoreError::AlreadySubmitted
        | CoreError::InvalidSubmissionTransition { .. } => ApiError::Conflict { message },
    }
}
