// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use upscalex::{Notification, Severity};
use upscalex_domain::FieldValue;
use upscalex_persistence::DraftRecord;

use crate::{ApiError, NotificationHub, SessionView, SharedDraftStore, WizardService, share_store};

use super::helpers::{
    FailingDraftStore, ScriptedBackend, create_test_config, create_test_service,
    create_test_store, fill_contact, hints, load_draft, no_hints, set_text,
};

fn create_default_service(store: SharedDraftStore) -> WizardService {
    create_test_service(store, Arc::new(ScriptedBackend::accepting(Duration::ZERO)))
}

// ============================================================================
// Starting sessions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_start_session_begins_on_first_step() {
    let service: WizardService = create_default_service(create_test_store());

    let view: SessionView = service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();

    assert_eq!(view.session_id, "s-1");
    assert_eq!(view.flow, "signup");
    assert_eq!(view.current_ordinal, 1);
    assert_eq!(view.step_count, 4);
    assert!(view.form.is_empty());
    assert!(!view.can_retreat);
    assert!(!view.can_advance);
    assert_eq!(service.session_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_generated_session_ids_are_unique() {
    let service: WizardService = create_default_service(create_test_store());

    let first: SessionView = service
        .start_session("apply", None, no_hints())
        .await
        .unwrap();
    let second: SessionView = service
        .start_session("apply", None, no_hints())
        .await
        .unwrap();

    assert!(first.session_id.starts_with("apply-"));
    assert_ne!(first.session_id, second.session_id);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_flow_is_not_found() {
    let service: WizardService = create_default_service(create_test_store());
    let result: Result<SessionView, ApiError> =
        service.start_session("newsletter", None, no_hints()).await;
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_session_id_is_rejected() {
    let service: WizardService = create_default_service(create_test_store());
    let result: Result<SessionView, ApiError> = service
        .start_session("signup", Some(String::from("has space")), no_hints())
        .await;
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "session_id"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_starting_live_session_again_returns_it() {
    let service: WizardService = create_default_service(create_test_store());
    service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    set_text(&service, "s-1", "fullName", "Ada Lovelace").await;

    let again: SessionView = service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    assert_eq!(again.form.text("fullName"), Some("Ada Lovelace"));

    let other_flow: Result<SessionView, ApiError> = service
        .start_session("apply", Some(String::from("s-1")), no_hints())
        .await;
    assert!(matches!(other_flow, Err(ApiError::Conflict { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_entry_hints_prefill_fields() {
    let service: WizardService = create_default_service(create_test_store());

    let view: SessionView = service
        .start_session(
            "apply",
            None,
            hints(&[
                ("service", " legal "),
                ("role", "mentor"),
                ("utm", "mail"),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(view.form.text("serviceId"), Some("legal"));
    assert_eq!(view.form.text("applicantRole"), Some("mentor"));
    assert_eq!(view.form.len(), 2);
    assert!(view.can_advance);
}

// ============================================================================
// Drafts
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_edits_are_saved_as_draft_after_quiet_period() {
    let store: SharedDraftStore = create_test_store();
    let service: WizardService = create_default_service(store.clone());
    service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();

    fill_contact(&service, "s-1").await;
    assert!(load_draft(&store, "signup", "s-1").await.is_none());

    tokio::time::sleep(Duration::from_secs(1)).await;
    let draft: DraftRecord = load_draft(&store, "signup", "s-1").await.unwrap();
    assert_eq!(draft.revision, 1);
    assert_eq!(draft.form.text("email"), Some("ada@example.com"));
}

#[tokio::test(start_paused = true)]
async fn test_draft_resumes_form_and_step() {
    let store: SharedDraftStore = create_test_store();
    let first: WizardService = create_default_service(store.clone());
    first
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    fill_contact(&first, "s-1").await;
    first.advance("s-1").await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let second: WizardService = create_default_service(store);
    let resumed: SessionView = second
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();

    assert_eq!(resumed.current_ordinal, 2);
    assert_eq!(resumed.form.text("fullName"), Some("Ada Lovelace"));
    assert!(resumed.validation_errors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unreadable_draft_store_starts_fresh_session() {
    let service: WizardService = WizardService::new(
        create_test_config(),
        share_store(FailingDraftStore),
        Arc::new(ScriptedBackend::accepting(Duration::ZERO)),
        NotificationHub::new(),
    )
    .unwrap();

    let view: SessionView = service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    assert_eq!(view.current_ordinal, 1);
    assert!(view.form.is_empty());

    // Failed draft writes never surface to the user.
    set_text(&service, "s-1", "fullName", "Ada Lovelace").await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    let view: SessionView = service.session("s-1").await.unwrap();
    assert_eq!(view.form.text("fullName"), Some("Ada Lovelace"));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_removes_session_and_draft() {
    let store: SharedDraftStore = create_test_store();
    let service: WizardService = create_default_service(store.clone());
    service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    fill_contact(&service, "s-1").await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(load_draft(&store, "signup", "s-1").await.is_some());

    service.cancel("s-1").await.unwrap();

    assert!(load_draft(&store, "signup", "s-1").await.is_none());
    assert!(matches!(
        service.session("s-1").await,
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(service.cancel("s-1").await.is_err());
}

// ============================================================================
// Editing and navigation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_unknown_field_is_invalid_input() {
    let service: WizardService = create_default_service(create_test_store());
    service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();

    let result: Result<SessionView, ApiError> = service
        .set_field("s-1", "favouriteColour", FieldValue::text("green"))
        .await;
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "favouriteColour"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_email_blocks_advance_and_notifies() {
    let service: WizardService = create_default_service(create_test_store());
    let mut notifications: broadcast::Receiver<Notification> = service.hub().subscribe();
    service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    set_text(&service, "s-1", "fullName", "Ada Lovelace").await;
    set_text(&service, "s-1", "email", "not-an-email").await;
    set_text(&service, "s-1", "phone", "5551234567").await;

    let result: Result<SessionView, ApiError> = service.advance("s-1").await;
    let Err(ApiError::ValidationFailed { issues, .. }) = result else {
        panic!("expected a validation failure");
    };
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field, "email");
    assert_eq!(issues[0].message, "Email must be a valid email address");

    let view: SessionView = service.session("s-1").await.unwrap();
    assert_eq!(view.current_ordinal, 1);
    assert_eq!(
        view.validation_errors.get("email").map(String::as_str),
        Some("Email must be a valid email address")
    );

    let notification: Notification = notifications.try_recv().unwrap();
    assert_eq!(notification.session_id, "s-1");
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Email must be a valid email address");

    // Correcting the field clears its error.
    let view: SessionView = service
        .set_field("s-1", "email", FieldValue::text("ada@example.com"))
        .await
        .unwrap();
    assert!(view.validation_errors.is_empty());
    assert!(view.can_advance);
}

#[tokio::test(start_paused = true)]
async fn test_mismatched_passwords_block_security_step() {
    let service: WizardService = create_default_service(create_test_store());
    service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    fill_contact(&service, "s-1").await;
    service.advance("s-1").await.unwrap();
    set_text(&service, "s-1", "role", "mentor").await;
    set_text(&service, "s-1", "expertise", "Go-to-market").await;
    set_text(&service, "s-1", "yearsExperience", "12").await;
    service.advance("s-1").await.unwrap();

    set_text(&service, "s-1", "password", "Secret12").await;
    set_text(&service, "s-1", "confirmPassword", "Secret13").await;
    let result: Result<SessionView, ApiError> = service.advance("s-1").await;

    let Err(ApiError::ValidationFailed { issues, .. }) = result else {
        panic!("expected a validation failure");
    };
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field, "confirmPassword");
    assert_eq!(
        issues[0].message,
        "Confirm password does not match password"
    );
    assert_eq!(service.session("s-1").await.unwrap().current_ordinal, 3);
}

#[tokio::test(start_paused = true)]
async fn test_role_specific_fields_gate_role_step() {
    let service: WizardService = create_default_service(create_test_store());
    service
        .start_session("signup", Some(String::from("s-1")), no_hints())
        .await
        .unwrap();
    fill_contact(&service, "s-1").await;
    service.advance("s-1").await.unwrap();

    set_text(&service, "s-1", "role", "student").await;
    set_text(&service, "s-1", "university", "State University").await;
    set_text(&service, "s-1", "graduationYear", "next year").await;
    let result: Result<SessionView, ApiError> = service.advance("s-1").await;

    let Err(ApiError::ValidationFailed { issues, .. }) = result else {
        panic!("expected a validation failure");
    };
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field, "graduationYear");
}

#[tokio::test(start_paused = true)]
async fn test_retreat_and_jump_navigation() {
    let service: WizardService = create_default_service(create_test_store());
    service
        .start_session("event-registration", Some(String::from("e-1")), no_hints())
        .await
        .unwrap();

    assert!(matches!(
        service.retreat("e-1").await,
        Err(ApiError::Conflict { .. })
    ));

    set_text(&service, "e-1", "eventId", "demo-day").await;
    set_text(&service, "e-1", "ticketType", "student").await;

    let view: SessionView = service.jump_to("e-1", 2).await.unwrap();
    assert_eq!(view.current_ordinal, 2);
    assert!(view.can_retreat);

    // The attendee step is still empty.
    let result: Result<SessionView, ApiError> = service.jump_to("e-1", 3).await;
    assert!(matches!(result, Err(ApiError::ValidationFailed { .. })));

    let result: Result<SessionView, ApiError> = service.jump_to("e-1", 9).await;
    assert!(matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "ordinal"));

    let view: SessionView = service.retreat("e-1").await.unwrap();
    assert_eq!(view.current_ordinal, 1);
    assert_eq!(view.form.text("ticketType"), Some("student"));
}

#[tokio::test(start_paused = true)]
async fn test_view_lists_step_progress() {
    let service: WizardService = create_default_service(create_test_store());
    service
        .start_session("event-registration", Some(String::from("e-1")), no_hints())
        .await
        .unwrap();
    set_text(&service, "e-1", "eventId", "demo-day").await;
    let view: SessionView = service
        .set_field("e-1", "ticketType", FieldValue::text("general"))
        .await
        .unwrap();

    let complete: Vec<bool> = view.steps.iter().map(|s| s.complete).collect();
    assert_eq!(complete, vec![true, false, false]);
    assert_eq!(view.fields.len(), 2);
    assert!(view.fields.iter().all(|f| f.required));
}
