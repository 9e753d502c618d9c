// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read models returned to clients.

use serde::Serialize;
use std::collections::BTreeMap;
use upscalex::{
    FIRST_ORDINAL, StepDefinition, SubmissionStatus, UploadedFileRef, WizardDefinition,
    WizardSession,
};
use upscalex_domain::{FieldKind, FormState};

/// One field of the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Whether the field must currently be filled.
    pub required: bool,
}

/// Progress summary of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub id: String,
    pub ordinal: usize,
    pub title: String,
    /// Whether the step's gate is currently open.
    pub complete: bool,
}

/// Everything a client needs to render a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub flow: String,
    pub current_ordinal: usize,
    pub step_count: usize,
    pub steps: Vec<StepSummary>,
    /// Fields of the current step.
    pub fields: Vec<FieldView>,
    pub form: FormState,
    pub validation_errors: BTreeMap<String, String>,
    pub submission: SubmissionStatus,
    pub failed_attempts: u32,
    pub last_error: Option<String>,
    pub reference: Option<String>,
    pub can_retreat: bool,
    pub can_advance: bool,
    pub is_final_step: bool,
    pub uploads: Vec<UploadedFileRef>,
}

impl SessionView {
    /// Builds the view of a session.
    #[must_use]
    pub fn new(
        definition: &WizardDefinition,
        session: &WizardSession,
        uploads: &[UploadedFileRef],
    ) -> Self {
        let current: Option<&StepDefinition> = definition.step(session.current_ordinal);
        let is_final_step: bool = definition.is_final(session.current_ordinal);
        let editable: bool = matches!(
            session.submission,
            SubmissionStatus::Idle | SubmissionStatus::Error
        );

        Self {
            session_id: session.id.clone(),
            flow: session.flow.clone(),
            current_ordinal: session.current_ordinal,
            step_count: definition.step_count(),
            steps: definition
                .steps()
                .iter()
                .map(|step| StepSummary {
                    id: step.id().to_string(),
                    ordinal: step.ordinal(),
                    title: step.title().to_string(),
                    complete: step.is_complete(&session.form),
                })
                .collect(),
            fields: current
                .map(|step| {
                    step.fields()
                        .iter()
                        .map(|spec| FieldView {
                            name: spec.name.clone(),
                            label: spec.label.clone(),
                            kind: spec.kind,
                            required: spec.requirement.is_active(&session.form),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            form: session.form.clone(),
            validation_errors: session.validation_errors.clone(),
            submission: session.submission,
            failed_attempts: session.failed_attempts,
            last_error: session.last_error.clone(),
            reference: session.reference.clone(),
            can_retreat: editable && session.current_ordinal > FIRST_ORDINAL,
            can_advance: editable
                && !is_final_step
                && current.is_some_and(|step| step.is_complete(&session.form)),
            is_final_step,
            uploads: uploads.to_vec(),
        }
    }
}
