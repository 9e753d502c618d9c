// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use upscalex::WizardDefinition;
use upscalex_domain::{FieldValue, FormState, RoleProfile};

use crate::{ATTACHMENTS_FIELD, ApiError, FlowKind};

#[test]
fn test_every_flow_definition_is_consistent() {
    for flow in FlowKind::ALL {
        let definition: WizardDefinition = flow.definition().unwrap();
        assert_eq!(definition.flow(), flow.as_str());
        assert!(definition.step_count() >= 3);
    }
}

#[test]
fn test_flow_names_round_trip_through_parse() {
    for flow in FlowKind::ALL {
        let parsed: FlowKind = flow.as_str().parse().unwrap();
        assert_eq!(parsed, flow);
    }
}

#[test]
fn test_unknown_flow_is_not_found() {
    let result: Result<FlowKind, ApiError> = "newsletter".parse();
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_only_apply_flow_takes_uploads() {
    let apply: WizardDefinition = FlowKind::Apply.definition().unwrap();
    assert_eq!(apply.upload_field(), Some(ATTACHMENTS_FIELD));
    assert!(
        FlowKind::Signup
            .definition()
            .unwrap()
            .upload_field()
            .is_none()
    );
    assert!(
        FlowKind::EventRegistration
            .definition()
            .unwrap()
            .upload_field()
            .is_none()
    );
}

#[test]
fn test_apply_hints_target_service_and_role() {
    let apply: WizardDefinition = FlowKind::Apply.definition().unwrap();
    assert_eq!(apply.hint_field("service"), Some("serviceId"));
    assert_eq!(apply.hint_field("role"), Some("applicantRole"));
    assert_eq!(apply.hint_field("event"), None);
}

#[test]
fn test_student_fields_are_required_only_for_students() {
    let signup: WizardDefinition = FlowKind::Signup.definition().unwrap();
    let role_step = signup.step(2).unwrap();

    let student: FormState = [("role", FieldValue::text("student"))].into_iter().collect();
    let missing: Vec<&str> = role_step.missing_fields(&student);
    assert!(missing.contains(&"university"));
    assert!(missing.contains(&"graduationYear"));
    assert!(!missing.contains(&"companyName"));

    let mentor: FormState = [("role", FieldValue::text("mentor"))].into_iter().collect();
    let missing: Vec<&str> = role_step.missing_fields(&mentor);
    assert!(missing.contains(&"expertise"));
    assert!(!missing.contains(&"university"));
}

#[test]
fn test_signup_carries_role_profile() {
    let form: FormState = [
        ("role", FieldValue::text("freelancer")),
        ("skills", FieldValue::text("Rust, SQL")),
        ("hourlyRate", FieldValue::text("85")),
    ]
    .into_iter()
    .collect();

    let profile: Option<RoleProfile> = FlowKind::Signup.profile(&form).unwrap();
    assert!(profile.is_some());
    assert!(FlowKind::Apply.profile(&form).unwrap().is_none());
}

#[test]
fn test_signup_profile_without_role_is_invalid_input() {
    let result: Result<Option<RoleProfile>, ApiError> = FlowKind::Signup.profile(&FormState::new());
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}
