// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Command, CoreError, Effect, StepDefinition, TransitionResult, WizardDefinition, WizardSession,
    apply,
};
use upscalex_domain::{FieldSpec, FieldValue, Rule};

/// A three step wizard: contact details, a password pair, and a final
/// confirmation with optional attachments.
pub fn create_test_definition() -> WizardDefinition {
    WizardDefinition::new(
        "test",
        vec![
            StepDefinition::new("contact", "Contact")
                .field(FieldSpec::text("name", "Name").required())
                .field(
                    FieldSpec::text("email", "Email")
                        .required()
                        .rule(Rule::Email),
                )
                .field(FieldSpec::text("phone", "Phone").rule(Rule::Phone)),
            StepDefinition::new("security", "Security")
                .field(
                    FieldSpec::text("password", "Password")
                        .required()
                        .rule(Rule::MinLength(6)),
                )
                .field(
                    FieldSpec::text("confirmPassword", "Confirm password")
                        .required()
                        .rule(Rule::MatchesField(String::from("password"))),
                ),
            StepDefinition::new("confirm", "Confirm")
                .field(FieldSpec::files("attachments", "Attachments"))
                .field(
                    FieldSpec::flag("acceptTerms", "Terms")
                        .required()
                        .rule(Rule::Accepted),
                ),
        ],
    )
    .unwrap()
    .with_hint("name", "name")
    .unwrap()
    .with_upload_field("attachments")
    .unwrap()
}

pub fn create_test_session(definition: &WizardDefinition) -> WizardSession {
    WizardSession::new(definition, "session-1")
}

pub fn set_text(name: &str, value: &str) -> Command {
    Command::SetField {
        name: String::from(name),
        value: FieldValue::text(value),
    }
}

/// Applies a command that is expected to succeed and returns the new session.
pub fn step(
    definition: &WizardDefinition,
    session: &WizardSession,
    command: Command,
) -> WizardSession {
    let result: Result<TransitionResult, CoreError> = apply(definition, session, command);
    result.unwrap().session
}

/// A session sitting on the final step with every gate open.
pub fn create_ready_session(definition: &WizardDefinition) -> WizardSession {
    let commands: Vec<Command> = vec![
        set_text("name", "Ada Lovelace"),
        set_text("email", "ada@example.com"),
        Command::Advance,
        set_text("password", "engine42"),
        set_text("confirmPassword", "engine42"),
        Command::Advance,
        Command::SetField {
            name: String::from("acceptTerms"),
            value: FieldValue::Flag(true),
        },
    ];
    commands
        .into_iter()
        .fold(create_test_session(definition), |session, command| {
            step(definition, &session, command)
        })
}

pub fn has_persist_effect(effects: &[Effect]) -> bool {
    effects
        .iter()
        .any(|effect| matches!(effect, Effect::PersistDraft { .. }))
}
