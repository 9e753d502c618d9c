// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::create_test_definition;
use crate::{ConfigurationError, FIRST_ORDINAL, StepDefinition, WizardDefinition};
use upscalex_domain::{FieldSpec, FieldValue, FormState, Rule};

#[test]
fn test_ordinals_are_assigned_in_declaration_order() {
    let definition: WizardDefinition = create_test_definition();

    let ordinals: Vec<usize> = definition
        .steps()
        .iter()
        .map(StepDefinition::ordinal)
        .collect();

    assert_eq!(ordinals, vec![1, 2, 3]);
    assert_eq!(definition.final_ordinal(), 3);
    assert_eq!(definition.step(FIRST_ORDINAL).unwrap().id(), "contact");
    assert!(definition.step(0).is_none());
    assert!(definition.step(4).is_none());
}

#[test]
fn test_empty_wizard_is_rejected() {
    let result: Result<WizardDefinition, ConfigurationError> =
        WizardDefinition::new("empty", Vec::new());

    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::EmptyWizard {
            flow: String::from("empty")
        }
    );
}

#[test]
fn test_duplicate_step_id_is_rejected() {
    let result: Result<WizardDefinition, ConfigurationError> = WizardDefinition::new(
        "dup",
        vec![
            StepDefinition::new("one", "One"),
            StepDefinition::new("one", "Again"),
        ],
    );

    assert!(matches!(
        result,
        Err(ConfigurationError::DuplicateStepId { step_id, .. }) if step_id == "one"
    ));
}

#[test]
fn test_field_declared_on_two_steps_is_rejected() {
    let result: Result<WizardDefinition, ConfigurationError> = WizardDefinition::new(
        "dup",
        vec![
            StepDefinition::new("one", "One").field(FieldSpec::text("email", "Email")),
            StepDefinition::new("two", "Two").field(FieldSpec::text("email", "Email")),
        ],
    );

    assert!(matches!(
        result,
        Err(ConfigurationError::DuplicateField { field, .. }) if field == "email"
    ));
}

#[test]
fn test_reference_to_undeclared_field_is_rejected() {
    let result: Result<WizardDefinition, ConfigurationError> = WizardDefinition::new(
        "refs",
        vec![StepDefinition::new("one", "One").field(
            FieldSpec::text("confirm", "Confirm").rule(Rule::MatchesField(String::from("secret"))),
        )],
    );

    assert!(matches!(
        result,
        Err(ConfigurationError::UnknownFieldReference { referenced, .. }) if referenced == "secret"
    ));
}

#[test]
fn test_conditional_requirement_must_reference_declared_field() {
    let result: Result<WizardDefinition, ConfigurationError> = WizardDefinition::new(
        "refs",
        vec![
            StepDefinition::new("one", "One").field(
                FieldSpec::text("university", "University").required_when("role", "student"),
            ),
        ],
    );

    assert!(matches!(
        result,
        Err(ConfigurationError::UnknownFieldReference { referenced, .. }) if referenced == "role"
    ));
}

#[test]
fn test_hint_must_target_text_field() {
    let definition: WizardDefinition = create_test_definition();

    let unknown: Result<WizardDefinition, ConfigurationError> =
        definition.clone().with_hint("service", "serviceId");
    let wrong_kind: Result<WizardDefinition, ConfigurationError> =
        definition.with_hint("terms", "acceptTerms");

    assert!(matches!(
        unknown,
        Err(ConfigurationError::InvalidHintTarget { .. })
    ));
    assert!(matches!(
        wrong_kind,
        Err(ConfigurationError::InvalidHintTarget { .. })
    ));
}

#[test]
fn test_upload_field_must_hold_files() {
    let definition: WizardDefinition = create_test_definition();

    let result: Result<WizardDefinition, ConfigurationError> =
        definition.with_upload_field("email");

    assert!(matches!(
        result,
        Err(ConfigurationError::InvalidUploadField { field, .. }) if field == "email"
    ));
}

#[test]
fn test_step_without_fields_is_complete() {
    let step: StepDefinition = StepDefinition::new("review", "Review");

    assert!(step.is_complete(&FormState::new()));
    assert!(step.issues(&FormState::new()).is_empty());
}

#[test]
fn test_gate_is_true_iff_every_field_validates() {
    let definition: WizardDefinition = create_test_definition();
    let contact: &StepDefinition = definition.step(1).unwrap();
    let mut form: FormState = FormState::new();

    assert!(!contact.is_complete(&form));
    assert_eq!(contact.missing_fields(&form), vec!["name", "email"]);

    form.set("name", FieldValue::text("Ada"));
    form.set("email", FieldValue::text("not-an-email"));
    assert!(!contact.is_complete(&form));
    assert!(contact.missing_fields(&form).is_empty());

    form.set("email", FieldValue::text("ada@example.com"));
    assert!(contact.is_complete(&form));

    // A filled optional field must still be well formed.
    form.set("phone", FieldValue::text("12"));
    assert!(!contact.is_complete(&form));
    assert_eq!(contact.issues(&form)[0].field, "phone");
}

#[test]
fn test_furthest_reachable_stops_at_first_closed_gate() {
    let definition: WizardDefinition = create_test_definition();
    let form: FormState = [
        ("name", FieldValue::text("Ada")),
        ("email", FieldValue::text("ada@example.com")),
    ]
    .into_iter()
    .collect();

    assert_eq!(definition.furthest_reachable(3, &form), 2);
    assert_eq!(definition.furthest_reachable(99, &form), 2);
    assert_eq!(definition.furthest_reachable(0, &form), 1);
    assert_eq!(definition.furthest_reachable(3, &FormState::new()), 1);
}

#[test]
fn test_without_dormant_fields_drops_inactive_conditional_answers() {
    let definition: WizardDefinition = WizardDefinition::new(
        "roles",
        vec![
            StepDefinition::new("role", "Role")
                .field(FieldSpec::text("role", "Role").required())
                .field(
                    FieldSpec::text("university", "University").required_when("role", "student"),
                )
                .field(
                    FieldSpec::text("expertise", "Expertise").required_when("role", "mentor"),
                ),
        ],
    )
    .unwrap();

    let form: FormState = [
        ("role", FieldValue::text("mentor")),
        ("university", FieldValue::text("IIT Delhi")),
        ("expertise", FieldValue::text("Fundraising")),
        ("referrer", FieldValue::text("newsletter")),
    ]
    .into_iter()
    .collect();

    let kept: FormState = definition.without_dormant_fields(&form);

    assert!(!kept.contains("university"));
    assert_eq!(kept.text("expertise"), Some("Fundraising"));
    assert_eq!(kept.text("role"), Some("mentor"));
    assert_eq!(kept.text("referrer"), Some("newsletter"));
    assert!(definition.step(FIRST_ORDINAL).unwrap().is_complete(&form));
}
