// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;
use upscalex_domain::{FieldValue, FormState};

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set one field.
    SetField {
        /// The field name.
        name: String,
        /// The new value.
        value: FieldValue,
    },
    /// Remove one field's value.
    ClearField {
        /// The field name.
        name: String,
    },
    /// Pre-fill fields from entry hints (e.g. a chosen service or event).
    /// Hints that map to no field are ignored.
    Seed {
        /// Hint key to value.
        hints: BTreeMap<String, String>,
    },
    /// Restore a previously saved draft.
    Restore {
        /// The saved form.
        form: FormState,
        /// The saved ordinal.
        ordinal: usize,
    },
    /// Move to the next step if the current one is complete.
    Advance,
    /// Move to the previous step.
    Retreat,
    /// Move to any step whose predecessors are all complete.
    JumpTo {
        /// The target ordinal.
        ordinal: usize,
    },
    /// Start a submission from the final step.
    BeginSubmit,
    /// Record the outcome of the in-flight submission.
    CompleteSubmit {
        /// What the backend answered.
        outcome: SubmissionOutcome,
    },
    /// Clear a failed submission so it can be attempted again.
    Retry,
}

/// The answer of the submission backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The backend accepted the form.
    Accepted {
        /// The backend's reference for the created record.
        reference: String,
        /// An optional message to show the user.
        message: Option<String>,
    },
    /// The submission failed or timed out.
    Failed {
        /// Why it failed.
        message: String,
    },
}
