// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use upscalex::FieldIssue;
use upscalex_domain::FieldValue;

use crate::error::ApiError;

/// Request to start (or resume) a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StartSessionRequest {
    /// A client-chosen session id. Reusing an id resumes its draft.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Entry hints, such as `service` or `event`.
    #[serde(default)]
    pub hints: BTreeMap<String, String>,
}

/// Request to set one field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetFieldRequest {
    pub value: FieldValue,
}

/// Request to jump to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JumpRequest {
    /// The 1-based step ordinal.
    pub ordinal: usize,
}

/// Request to start an upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddUploadRequest {
    pub file_name: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A stable, machine-readable error kind.
    pub error: String,
    /// A human-readable description.
    pub message: String,
    /// Field-level problems, when the error is a validation failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let issues: Vec<FieldIssue> = match err {
            ApiError::ValidationFailed { issues, .. } => issues.clone(),
            _ => Vec::new(),
        };
        Self {
            error: String::from(err.kind()),
            message: err.to_string(),
            issues,
        }
    }
}
