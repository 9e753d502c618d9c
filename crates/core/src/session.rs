// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::definition::{FIRST_ORDINAL, WizardDefinition};
use crate::effect::Effect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use upscalex_domain::FormState;

/// Where a session stands with respect to submission.
///
/// Transitions: `Idle → Pending → Success | Error`, and `Error → Idle` on
/// retry. `Success` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl SubmissionStatus {
    /// Returns the status name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// The state of one in-progress wizard flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSession {
    /// The session identifier.
    pub id: String,
    /// The flow this session runs.
    pub flow: String,
    /// The 1-based ordinal of the step the user is on.
    pub current_ordinal: usize,
    /// The answers given so far.
    pub form: FormState,
    /// Per-field messages from the last rejected transition.
    pub validation_errors: BTreeMap<String, String>,
    /// Submission status.
    pub submission: SubmissionStatus,
    /// Number of submissions that failed; each one may be retried.
    pub failed_attempts: u32,
    /// The message of the most recent failed submission.
    pub last_error: Option<String>,
    /// The receipt reference returned by a successful submission.
    pub reference: Option<String>,
}

impl WizardSession {
    /// Creates a fresh session on the first step of a wizard.
    #[must_use]
    pub fn new(definition: &WizardDefinition, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            flow: definition.flow().to_string(),
            current_ordinal: FIRST_ORDINAL,
            form: FormState::new(),
            validation_errors: BTreeMap::new(),
            submission: SubmissionStatus::Idle,
            failed_attempts: 0,
            last_error: None,
            reference: None,
        }
    }
}

/// The result of a successful transition.
///
/// Transitions are atomic: either the whole new session is returned with
/// the side effects to perform, or an error is returned and the old session
/// stands unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The session after the transition.
    pub session: WizardSession,
    /// Side effects for the host to carry out, in order.
    pub effects: Vec<Effect>,
}
