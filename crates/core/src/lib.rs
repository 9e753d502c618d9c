// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! The wizard engine.
//!
//! A wizard is an ordered list of steps, each guarding its exit with a gate
//! over the accumulated form. Sessions move through the wizard only via
//! [`apply`], a pure function that returns the next session together with
//! the side effects (draft writes, notifications, submission) for the host
//! to carry out.

mod apply;
mod command;
mod definition;
mod effect;
mod error;
mod session;
mod step;
mod upload;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{DEFAULT_SUCCESS_MESSAGE, apply, apply_rejection};
pub use command::{Command, SubmissionOutcome};
pub use definition::{FIRST_ORDINAL, WizardDefinition};
pub use effect::{
    ERROR_DISMISS_MS, Effect, INFO_DISMISS_MS, Notification, SUCCESS_DISMISS_MS, Severity,
};
pub use error::{ConfigurationError, CoreError};
pub use session::{SubmissionStatus, TransitionResult, WizardSession};
pub use step::{FieldIssue, StepDefinition};
pub use upload::{COMPLETE_PROGRESS, UploadStatus, UploadTracker, UploadedFileRef};
