// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use upscalex_domain::{FieldValue, FormState};
use upscalex_persistence::{
    DraftKey, DraftRecord, DraftStore, InMemoryDraftStore, PersistenceError,
};

use crate::{
    NotificationHub, SessionView, SharedDraftStore, SubmissionBackend, SubmissionError,
    SubmissionReceipt, SubmissionRequest, WizardConfig, WizardService, share_store,
};

/// A backend that answers from a script and records every call.
pub struct ScriptedBackend {
    delay: Duration,
    outcomes: Mutex<VecDeque<Result<SubmissionReceipt, SubmissionError>>>,
    requests: Mutex<Vec<SubmissionRequest>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    /// A backend that accepts everything after `delay`.
    pub fn accepting(delay: Duration) -> Self {
        Self::scripted(delay, Vec::new())
    }

    /// A backend that answers with `outcomes` in order, then accepts.
    pub fn scripted(
        delay: Duration,
        outcomes: Vec<Result<SubmissionReceipt, SubmissionError>>,
    ) -> Self {
        Self {
            delay,
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionBackend for ScriptedBackend {
    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let call: usize = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(self.delay).await;
        let scripted: Option<Result<SubmissionReceipt, SubmissionError>> =
            self.outcomes.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(SubmissionReceipt {
                reference: format!("REF-{call}"),
                message: Some(String::from("Thanks!")),
            })
        })
    }
}

/// A store whose every operation fails.
pub struct FailingDraftStore;

impl DraftStore for FailingDraftStore {
    fn save(
        &mut self,
        _key: &DraftKey,
        _form: &FormState,
        _current_ordinal: usize,
    ) -> Result<DraftRecord, PersistenceError> {
        Err(PersistenceError::QueryFailed(String::from("disk full")))
    }

    fn load(&mut self, _key: &DraftKey) -> Result<Option<DraftRecord>, PersistenceError> {
        Err(PersistenceError::QueryFailed(String::from("disk unreadable")))
    }

    fn clear(&mut self, _key: &DraftKey) -> Result<(), PersistenceError> {
        Err(PersistenceError::QueryFailed(String::from("disk full")))
    }
}

/// Settings with deterministic upload progress: four ticks to completion.
pub fn create_test_config() -> WizardConfig {
    WizardConfig {
        min_upload_increment: 25,
        max_upload_increment: 25,
        ..WizardConfig::default()
    }
}

pub fn create_test_store() -> SharedDraftStore {
    share_store(InMemoryDraftStore::new())
}

pub fn create_test_service(
    store: SharedDraftStore,
    backend: Arc<ScriptedBackend>,
) -> WizardService {
    WizardService::new(create_test_config(), store, backend, NotificationHub::new())
        .expect("test configuration is valid")
}

pub fn no_hints() -> BTreeMap<String, String> {
    BTreeMap::new()
}

pub fn hints(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (String::from(*k), String::from(*v)))
        .collect()
}

pub async fn set_text(service: &WizardService, session_id: &str, name: &str, value: &str) {
    service
        .set_field(session_id, name, FieldValue::text(value))
        .await
        .unwrap_or_else(|e| panic!("setting {name} failed: {e}"));
}

pub async fn set_flag(service: &WizardService, session_id: &str, name: &str) {
    service
        .set_field(session_id, name, FieldValue::Flag(true))
        .await
        .unwrap_or_else(|e| panic!("setting {name} failed: {e}"));
}

pub async fn fill_contact(service: &WizardService, session_id: &str) {
    set_text(service, session_id, "fullName", "Ada Lovelace").await;
    set_text(service, session_id, "email", "ada@example.com").await;
    set_text(service, session_id, "phone", "+1 (555) 123-4567").await;
}

/// Drives a signup session to its final step as a student.
pub async fn fill_signup_to_terms(service: &WizardService, session_id: &str) -> SessionView {
    fill_contact(service, session_id).await;
    service.advance(session_id).await.unwrap();

    set_text(service, session_id, "role", "student").await;
    set_text(service, session_id, "university", "State University").await;
    set_text(service, session_id, "graduationYear", "2027").await;
    service.advance(session_id).await.unwrap();

    set_text(service, session_id, "password", "Secret12").await;
    set_text(service, session_id, "confirmPassword", "Secret12").await;
    service.advance(session_id).await.unwrap();

    set_flag(service, session_id, "acceptTerms").await;
    service.session(session_id).await.unwrap()
}

/// Drives an event registration session to its final step.
pub async fn fill_event_to_preferences(service: &WizardService, session_id: &str) -> SessionView {
    set_text(service, session_id, "eventId", "demo-day").await;
    set_text(service, session_id, "ticketType", "vip").await;
    service.advance(session_id).await.unwrap();

    fill_contact(service, session_id).await;
    service.advance(session_id).await.unwrap();

    set_flag(service, session_id, "agreeToCodeOfConduct").await;
    service.session(session_id).await.unwrap()
}

pub async fn load_draft(
    store: &SharedDraftStore,
    flow: &str,
    session_id: &str,
) -> Option<DraftRecord> {
    let key: DraftKey = DraftKey::new(flow, session_id).unwrap();
    store.lock().await.load(&key).unwrap()
}
