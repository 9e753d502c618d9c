// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::session::SubmissionStatus;
use crate::step::FieldIssue;
use upscalex_domain::FieldKind;

/// Errors that can occur during wizard transitions.
///
/// A rejected transition never changes the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A step's gate is closed; the listed fields failed validation.
    StepIncomplete {
        /// Ordinal of the step that failed.
        ordinal: usize,
        /// Identifier of the step that failed.
        step_id: String,
        /// Every failing field, in declaration order.
        issues: Vec<FieldIssue>,
    },
    /// Retreat was requested on the first step.
    AtFirstStep,
    /// Advance was requested on the final step.
    AtFinalStep,
    /// Submission was requested before reaching the final step.
    NotAtFinalStep {
        /// The current ordinal.
        ordinal: usize,
        /// The final ordinal of the wizard.
        final_ordinal: usize,
    },
    /// A jump targeted an ordinal the wizard does not have.
    OrdinalOutOfRange {
        /// The requested ordinal.
        ordinal: usize,
        /// The final ordinal of the wizard.
        max: usize,
    },
    /// The field is not declared by any step.
    UnknownField(String),
    /// The value has the wrong kind for the field.
    FieldKindMismatch {
        /// The field name.
        field: String,
        /// The declared kind.
        expected: FieldKind,
        /// The kind that was supplied.
        found: FieldKind,
    },
    /// A submission is in flight; the session is read-only until it resolves.
    SubmissionInFlight,
    /// The session was submitted successfully and is closed.
    AlreadySubmitted,
    /// The submission status does not allow the requested change.
    InvalidSubmissionTransition {
        /// Current status.
        from: SubmissionStatus,
        /// Requested status.
        to: SubmissionStatus,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepIncomplete {
                ordinal,
                step_id,
                issues,
            } => {
                let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
                write!(
                    f,
                    "Step {ordinal} ('{step_id}') is incomplete: {}",
                    fields.join(", ")
                )
            }
            Self::AtFirstStep => write!(f, "Already at the first step"),
            Self::AtFinalStep => write!(f, "Already at the final step"),
            Self::NotAtFinalStep {
                ordinal,
                final_ordinal,
            } => write!(
                f,
                "Submission is only possible from step {final_ordinal}, currently at step {ordinal}"
            ),
            Self::OrdinalOutOfRange { ordinal, max } => write!(
                f,
                "Step {ordinal} does not exist; steps run from 1 to {max}"
            ),
            Self::UnknownField(field) => write!(f, "Unknown field '{field}'"),
            Self::FieldKindMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Field '{field}' expects a {} value, got {}",
                expected.as_str(),
                found.as_str()
            ),
            Self::SubmissionInFlight => write!(f, "A submission is already in progress"),
            Self::AlreadySubmitted => write!(f, "This form has already been submitted"),
            Self::InvalidSubmissionTransition { from, to } => write!(
                f,
                "Cannot move submission from {} to {}",
                from.as_str(),
                to.as_str()
            ),
        }
    }
}

impl std::error::Error for CoreError {}

/// Programmer errors in a wizard definition.
///
/// These are raised when a definition is built and should never be seen by
/// a user: a server refuses to start with a broken definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The wizard declares no steps.
    EmptyWizard {
        /// The flow name.
        flow: String,
    },
    /// Two steps share an identifier.
    DuplicateStepId {
        /// The flow name.
        flow: String,
        /// The repeated step identifier.
        step_id: String,
    },
    /// A field is declared more than once.
    DuplicateField {
        /// The flow name.
        flow: String,
        /// The repeated field name.
        field: String,
    },
    /// A field reads another field that no step declares.
    UnknownFieldReference {
        /// The flow name.
        flow: String,
        /// The step declaring the field.
        step_id: String,
        /// The declaring field.
        field: String,
        /// The undeclared field it refers to.
        referenced: String,
    },
    /// An entry hint targets an undeclared or non-text field.
    InvalidHintTarget {
        /// The flow name.
        flow: String,
        /// The hint key.
        hint: String,
        /// The target field.
        field: String,
    },
    /// The upload field is undeclared or does not hold files.
    InvalidUploadField {
        /// The flow name.
        flow: String,
        /// The configured field.
        field: String,
    },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWizard { flow } => write!(f, "Wizard '{flow}' declares no steps"),
            Self::DuplicateStepId { flow, step_id } => {
                write!(f, "Wizard '{flow}' declares step '{step_id}' twice")
            }
            Self::DuplicateField { flow, field } => {
                write!(f, "Wizard '{flow}' declares field '{field}' twice")
            }
            Self::UnknownFieldReference {
                flow,
                step_id,
                field,
                referenced,
            } => write!(
                f,
                "Wizard '{flow}': field '{field}' in step '{step_id}' refers to undeclared field '{referenced}'"
            ),
            Self::InvalidHintTarget { flow, hint, field } => write!(
                f,
                "Wizard '{flow}': hint '{hint}' targets '{field}', which is not a declared text field"
            ),
            Self::InvalidUploadField { flow, field } => write!(
                f,
                "Wizard '{flow}': upload field '{field}' is not a declared files field"
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}
