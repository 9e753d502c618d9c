// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, SubmissionOutcome};
use crate::definition::{FIRST_ORDINAL, WizardDefinition};
use crate::effect::{Effect, Notification};
use crate::error::CoreError;
use crate::session::{SubmissionStatus, TransitionResult, WizardSession};
use crate::step::{FieldIssue, StepDefinition};
use std::collections::BTreeMap;
use upscalex_domain::{FieldSpec, FieldValue, FormState, validate_field};

/// Shown when a submission succeeds without a backend message.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Your submission was received";

/// Applies a command to a session, producing a new session and the side
/// effects the host must perform.
///
/// This function is pure: it does not perform I/O and does not mutate its
/// inputs.
///
/// # Arguments
///
/// * `definition` - The wizard the session runs
/// * `session` - The current session (immutable)
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new session and its effects
/// * `Err(CoreError)` if the command is rejected; the session is unchanged
///
/// # Errors
///
/// Returns an error if:
/// - The current step's gate is closed (`Advance`, `JumpTo`, `BeginSubmit`)
/// - The requested move leaves the wizard's range
/// - The field is unknown or the value has the wrong kind
/// - A submission is in flight or already succeeded
/// - The submission status does not allow the transition
pub fn apply(
    definition: &WizardDefinition,
    session: &WizardSession,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::SetField { name, value } => set_field(definition, session, name, value),
        Command::ClearField { name } => clear_field(definition, session, &name),
        Command::Seed { hints } => seed(definition, session, &hints),
        Command::Restore { form, ordinal } => restore(definition, session, form, ordinal),
        Command::Advance => advance(definition, session),
        Command::Retreat => retreat(session),
        Command::JumpTo { ordinal } => jump_to(definition, session, ordinal),
        Command::BeginSubmit => begin_submit(definition, session),
        Command::CompleteSubmit { outcome } => complete_submit(session, outcome),
        Command::Retry => retry(session),
    }
}

/// Records a rejected transition on the session.
///
/// The ordinal and form never change. A closed gate replaces the
/// per-field messages with the failing fields; every rejection emits an
/// error notification. Applying the same rejection twice yields the same
/// session.
#[must_use]
pub fn apply_rejection(session: &WizardSession, error: &CoreError) -> TransitionResult {
    let mut new_session: WizardSession = session.clone();

    let message: String = match error {
        CoreError::StepIncomplete { issues, .. } => {
            new_session.validation_errors = issues
                .iter()
                .map(|issue| (issue.field.clone(), issue.message.clone()))
                .collect();
            match issues.as_slice() {
                [only] => only.message.clone(),
                _ => format!("{} fields need your attention", issues.len()),
            }
        }
        other => other.to_string(),
    };

    TransitionResult {
        session: new_session,
        effects: vec![Effect::Notify(Notification::error(&session.id, message))],
    }
}

/// Rejects changes while a submission is in flight or after it succeeded.
const fn ensure_editable(session: &WizardSession) -> Result<(), CoreError> {
    match session.submission {
        SubmissionStatus::Pending => Err(CoreError::SubmissionInFlight),
        SubmissionStatus::Success => Err(CoreError::AlreadySubmitted),
        SubmissionStatus::Idle | SubmissionStatus::Error => Ok(()),
    }
}

fn declared_field<'a>(
    definition: &'a WizardDefinition,
    name: &str,
) -> Result<&'a FieldSpec, CoreError> {
    definition
        .field(name)
        .ok_or_else(|| CoreError::UnknownField(name.to_string()))
}

fn persist(session: &WizardSession) -> Effect {
    Effect::PersistDraft {
        form: session.form.clone(),
        ordinal: session.current_ordinal,
    }
}

fn step_incomplete(step: &StepDefinition, issues: Vec<FieldIssue>) -> CoreError {
    CoreError::StepIncomplete {
        ordinal: step.ordinal(),
        step_id: step.id().to_string(),
        issues,
    }
}

/// Re-checks every field that currently shows a message, so a fix clears
/// its message as soon as it is made. Fields without a message stay quiet
/// until the next gate check.
fn refresh_errors(definition: &WizardDefinition, session: &mut WizardSession) {
    let refreshed: BTreeMap<String, String> = session
        .validation_errors
        .keys()
        .filter_map(|name| {
            let spec: &FieldSpec = definition.field(name)?;
            let result = validate_field(spec, &session.form);
            if result.valid {
                None
            } else {
                Some((
                    name.clone(),
                    result
                        .message
                        .unwrap_or_else(|| format!("{} is invalid", spec.label)),
                ))
            }
        })
        .collect();
    session.validation_errors = refreshed;
}

fn set_field(
    definition: &WizardDefinition,
    session: &WizardSession,
    name: String,
    value: FieldValue,
) -> Result<TransitionResult, CoreError> {
    ensure_editable(session)?;
    let spec: &FieldSpec = declared_field(definition, &name)?;
    if value.kind() != spec.kind {
        return Err(CoreError::FieldKindMismatch {
            field: name,
            expected: spec.kind,
            found: value.kind(),
        });
    }

    let mut new_session: WizardSession = session.clone();
    new_session.form.set(name, value);
    refresh_errors(definition, &mut new_session);

    let effects: Vec<Effect> = vec![persist(&new_session)];
    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn clear_field(
    definition: &WizardDefinition,
    session: &WizardSession,
    name: &str,
) -> Result<TransitionResult, CoreError> {
    ensure_editable(session)?;
    declared_field(definition, name)?;

    let mut new_session: WizardSession = session.clone();
    new_session.form.remove(name);
    refresh_errors(definition, &mut new_session);

    let effects: Vec<Effect> = vec![persist(&new_session)];
    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn seed(
    definition: &WizardDefinition,
    session: &WizardSession,
    hints: &BTreeMap<String, String>,
) -> Result<TransitionResult, CoreError> {
    ensure_editable(session)?;

    let mut new_session: WizardSession = session.clone();
    let mut changed: bool = false;
    for (hint, value) in hints {
        let Some(field) = definition.hint_field(hint) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        let value: FieldValue = FieldValue::text(value.trim());
        if new_session.form.get(field) != Some(&value) {
            new_session.form.set(field, value);
            changed = true;
        }
    }

    let effects: Vec<Effect> = if changed {
        vec![persist(&new_session)]
    } else {
        Vec::new()
    };
    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn restore(
    definition: &WizardDefinition,
    session: &WizardSession,
    form: FormState,
    ordinal: usize,
) -> Result<TransitionResult, CoreError> {
    ensure_editable(session)?;

    // Drafts may predate a definition change; keep only what still fits.
    let form: FormState = form
        .iter()
        .filter(|(name, value)| {
            definition
                .field(name)
                .is_some_and(|spec| spec.kind == value.kind())
        })
        .map(|(name, value)| (name, value.clone()))
        .collect();

    let mut new_session: WizardSession = session.clone();
    new_session.current_ordinal = definition.furthest_reachable(ordinal, &form);
    new_session.form = form;
    new_session.validation_errors.clear();

    Ok(TransitionResult {
        session: new_session,
        effects: Vec::new(),
    })
}

fn advance(
    definition: &WizardDefinition,
    session: &WizardSession,
) -> Result<TransitionResult, CoreError> {
    ensure_editable(session)?;
    if definition.is_final(session.current_ordinal) {
        return Err(CoreError::AtFinalStep);
    }
    let step: &StepDefinition =
        definition
            .step(session.current_ordinal)
            .ok_or(CoreError::OrdinalOutOfRange {
                ordinal: session.current_ordinal,
                max: definition.final_ordinal(),
            })?;

    let issues: Vec<FieldIssue> = step.issues(&session.form);
    if !issues.is_empty() {
        return Err(step_incomplete(step, issues));
    }

    let mut new_session: WizardSession = session.clone();
    new_session.current_ordinal += 1;
    new_session.validation_errors.clear();

    let effects: Vec<Effect> = vec![persist(&new_session)];
    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn retreat(session: &WizardSession) -> Result<TransitionResult, CoreError> {
    ensure_editable(session)?;
    if session.current_ordinal <= FIRST_ORDINAL {
        return Err(CoreError::AtFirstStep);
    }

    let mut new_session: WizardSession = session.clone();
    new_session.current_ordinal -= 1;
    new_session.validation_errors.clear();

    let effects: Vec<Effect> = vec![persist(&new_session)];
    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn jump_to(
    definition: &WizardDefinition,
    session: &WizardSession,
    ordinal: usize,
) -> Result<TransitionResult, CoreError> {
    ensure_editable(session)?;
    if definition.step(ordinal).is_none() {
        return Err(CoreError::OrdinalOutOfRange {
            ordinal,
            max: definition.final_ordinal(),
        });
    }
    if let Some(step) = definition.first_incomplete_before(ordinal, &session.form) {
        return Err(step_incomplete(step, step.issues(&session.form)));
    }

    let mut new_session: WizardSession = session.clone();
    new_session.current_ordinal = ordinal;
    new_session.validation_errors.clear();

    let effects: Vec<Effect> = if ordinal == session.current_ordinal {
        Vec::new()
    } else {
        vec![persist(&new_session)]
    };
    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn begin_submit(
    definition: &WizardDefinition,
    session: &WizardSession,
) -> Result<TransitionResult, CoreError> {
    match session.submission {
        SubmissionStatus::Idle => {}
        SubmissionStatus::Pending => return Err(CoreError::SubmissionInFlight),
        SubmissionStatus::Success => return Err(CoreError::AlreadySubmitted),
        SubmissionStatus::Error => {
            return Err(CoreError::InvalidSubmissionTransition {
                from: SubmissionStatus::Error,
                to: SubmissionStatus::Pending,
            });
        }
    }

    let final_ordinal: usize = definition.final_ordinal();
    if session.current_ordinal != final_ordinal {
        return Err(CoreError::NotAtFinalStep {
            ordinal: session.current_ordinal,
            final_ordinal,
        });
    }
    // Every step, the final one included, must pass before anything leaves.
    if let Some(step) = definition.first_incomplete_before(final_ordinal + 1, &session.form) {
        return Err(step_incomplete(step, step.issues(&session.form)));
    }

    let mut new_session: WizardSession = session.clone();
    new_session.submission = SubmissionStatus::Pending;
    new_session.validation_errors.clear();

    let effects: Vec<Effect> = vec![Effect::InvokeSubmission {
        form: new_session.form.clone(),
    }];
    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn complete_submit(
    session: &WizardSession,
    outcome: SubmissionOutcome,
) -> Result<TransitionResult, CoreError> {
    if session.submission != SubmissionStatus::Pending {
        let to: SubmissionStatus = match outcome {
            SubmissionOutcome::Accepted { .. } => SubmissionStatus::Success,
            SubmissionOutcome::Failed { .. } => SubmissionStatus::Error,
        };
        return Err(CoreError::InvalidSubmissionTransition {
            from: session.submission,
            to,
        });
    }

    let mut new_session: WizardSession = session.clone();
    let effects: Vec<Effect> = match outcome {
        SubmissionOutcome::Accepted { reference, message } => {
            new_session.submission = SubmissionStatus::Success;
            new_session.reference = Some(reference);
            new_session.last_error = None;
            new_session.validation_errors.clear();
            vec![
                Effect::ClearDraft,
                Effect::Notify(Notification::success(
                    &session.id,
                    message.unwrap_or_else(|| String::from(DEFAULT_SUCCESS_MESSAGE)),
                )),
            ]
        }
        SubmissionOutcome::Failed { message } => {
            new_session.submission = SubmissionStatus::Error;
            new_session.failed_attempts = new_session.failed_attempts.saturating_add(1);
            new_session.last_error = Some(message.clone());
            vec![Effect::Notify(Notification::error(&session.id, message))]
        }
    };

    Ok(TransitionResult {
        session: new_session,
        effects,
    })
}

fn retry(session: &WizardSession) -> Result<TransitionResult, CoreError> {
    if session.submission != SubmissionStatus::Error {
        return Err(CoreError::InvalidSubmissionTransition {
            from: session.submission,
            to: SubmissionStatus::Idle,
        });
    }

    let mut new_session: WizardSession = session.clone();
    new_session.submission = SubmissionStatus::Idle;

    Ok(TransitionResult {
        session: new_session,
        effects: Vec::new(),
    })
}
