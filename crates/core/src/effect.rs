// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use upscalex_domain::FormState;

/// How long an informational message stays on screen.
pub const INFO_DISMISS_MS: u64 = 3_000;
/// How long a success message stays on screen.
pub const SUCCESS_DISMISS_MS: u64 = 4_000;
/// How long an error message stays on screen.
pub const ERROR_DISMISS_MS: u64 = 6_000;

/// Severity of a transient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A transient, auto-dismissing message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The session the message concerns.
    pub session_id: String,
    /// Message severity.
    pub severity: Severity,
    /// The text to display.
    pub message: String,
    /// How long to show the message, in milliseconds.
    pub auto_dismiss_ms: u64,
}

impl Notification {
    /// An informational message.
    #[must_use]
    pub fn info(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(session_id, Severity::Info, message, INFO_DISMISS_MS)
    }

    /// A success message.
    #[must_use]
    pub fn success(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(session_id, Severity::Success, message, SUCCESS_DISMISS_MS)
    }

    /// An error message.
    #[must_use]
    pub fn error(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(session_id, Severity::Error, message, ERROR_DISMISS_MS)
    }

    fn new(
        session_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        auto_dismiss_ms: u64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            severity,
            message: message.into(),
            auto_dismiss_ms,
        }
    }
}

/// A side effect requested by a transition.
///
/// The engine is pure; the host performs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Schedule a (debounced) draft write of this snapshot.
    PersistDraft {
        /// The form to save.
        form: FormState,
        /// The step the user is on.
        ordinal: usize,
    },
    /// Delete the session's draft.
    ClearDraft,
    /// Show a transient message.
    Notify(Notification),
    /// Hand the form to the submission pipeline.
    InvokeSubmission {
        /// The form to submit.
        form: FormState,
    },
}
