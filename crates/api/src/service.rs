// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The wizard service.
//!
//! Owns the live sessions, interprets the effects the engine asks for
//! (draft writes, notifications, submissions) and drives simulated uploads.
//! Every session sits behind its own lock; the lock is never held across a
//! call to the submission backend.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use upscalex::{
    Command, CoreError, Effect, Notification, SubmissionOutcome, SubmissionStatus, UploadStatus,
    UploadTracker, UploadedFileRef, WizardDefinition, WizardSession, apply, apply_rejection,
};
use upscalex_domain::{FieldValue, FileRef, FormState};
use upscalex_persistence::{DraftKey, DraftRecord};

use crate::config::WizardConfig;
use crate::drafts::{DraftWriter, SharedDraftStore};
use crate::error::{ApiError, translate_core_error};
use crate::flows::FlowKind;
use crate::notify::NotificationHub;
use crate::pipeline::{
    SimulatedBackend, SubmissionBackend, SubmissionPipeline, SubmissionReceipt, SubmissionRequest,
};
use crate::view::SessionView;

/// Largest file accepted for upload.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Longest client-chosen session id.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Submitted sessions remembered after they close, oldest forgotten first.
pub const MAX_SUBMITTED_SESSIONS: usize = 1024;

struct LiveSession {
    session: WizardSession,
    uploads: UploadTracker,
    upload_tasks: HashMap<String, JoinHandle<()>>,
}

struct SessionHandle {
    flow: FlowKind,
    definition: Arc<WizardDefinition>,
    hints: BTreeMap<String, String>,
    key: DraftKey,
    drafts: DraftWriter,
    state: Mutex<LiveSession>,
}

impl SessionHandle {
    /// Applies a command and carries out its effects.
    ///
    /// A rejected command still updates the session (field errors) and
    /// publishes the rejection notice.
    ///
    /// # Returns
    ///
    /// The form to submit, if the command started a submission.
    fn run(
        &self,
        live: &mut LiveSession,
        command: Command,
        hub: &NotificationHub,
    ) -> Result<Option<FormState>, ApiError> {
        match apply(&self.definition, &live.session, command) {
            Ok(result) => {
                live.session = result.session;
                Ok(self.perform(result.effects, hub))
            }
            Err(err) => {
                debug!(session_id = %live.session.id, error = %err, "Command rejected");
                let rejection = apply_rejection(&live.session, &err);
                live.session = rejection.session;
                self.perform(rejection.effects, hub);
                Err(translate_core_error(err))
            }
        }
    }

    fn perform(&self, effects: Vec<Effect>, hub: &NotificationHub) -> Option<FormState> {
        let mut submission: Option<FormState> = None;
        for effect in effects {
            match effect {
                Effect::PersistDraft { form, ordinal } => self.drafts.save(form, ordinal),
                Effect::ClearDraft => self.drafts.clear(),
                Effect::Notify(notification) => hub.publish(notification),
                Effect::InvokeSubmission { form } => submission = Some(form),
            }
        }
        submission
    }

    /// Mirrors the completed uploads into the flow's upload field.
    ///
    /// Attached files that no upload tracks, such as those restored from a
    /// draft, stay ahead of the uploaded ones unless `detach` names them.
    fn sync_attachments(
        &self,
        live: &mut LiveSession,
        hub: &NotificationHub,
        detach: Option<&str>,
    ) -> Result<(), ApiError> {
        let Some(field) = self.definition.upload_field() else {
            return Ok(());
        };
        let mut files: Vec<FileRef> = Vec::new();
        for file in live.session.form.files(field) {
            let untracked: bool = live.uploads.get(&file.id).is_none();
            if untracked && detach != Some(file.id.as_str()) {
                files.push(file.clone());
            }
        }
        files.extend(live.uploads.completed_files());
        let command: Command = if files.is_empty() {
            Command::ClearField {
                name: field.to_string(),
            }
        } else {
            Command::SetField {
                name: field.to_string(),
                value: FieldValue::Files(files),
            }
        };
        self.run(live, command, hub).map(|_| ())
    }

    fn is_attached(&self, live: &LiveSession, file_id: &str) -> bool {
        let Some(field) = self.definition.upload_field() else {
            return false;
        };
        live.session
            .form
            .files(field)
            .iter()
            .any(|file| file.id == file_id)
    }

    fn view(&self, live: &LiveSession) -> SessionView {
        SessionView::new(&self.definition, &live.session, live.uploads.uploads())
    }
}

/// Runs the wizards.
pub struct WizardService {
    config: WizardConfig,
    definitions: HashMap<FlowKind, Arc<WizardDefinition>>,
    sessions: Mutex<HashMap<String, Arc<SessionHandle>>>,
    /// Closed sessions and their submission references, newest last.
    submitted: Mutex<VecDeque<(String, String)>>,
    store: SharedDraftStore,
    pipeline: SubmissionPipeline,
    hub: NotificationHub,
}

impl WizardService {
    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range or a flow
    /// definition is inconsistent.
    pub fn new(
        config: WizardConfig,
        store: SharedDraftStore,
        backend: Arc<dyn SubmissionBackend>,
        hub: NotificationHub,
    ) -> Result<Self, ApiError> {
        config.validate()?;

        let mut definitions: HashMap<FlowKind, Arc<WizardDefinition>> = HashMap::new();
        for flow in FlowKind::ALL {
            definitions.insert(flow, Arc::new(flow.definition()?));
        }

        let pipeline: SubmissionPipeline =
            SubmissionPipeline::new(backend, config.submission_timeout);

        Ok(Self {
            config,
            definitions,
            sessions: Mutex::new(HashMap::new()),
            submitted: Mutex::new(VecDeque::new()),
            store,
            pipeline,
            hub,
        })
    }

    /// Creates a service in front of a [`SimulatedBackend`] tuned by the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Same as [`WizardService::new`].
    pub fn with_simulated_backend(
        config: WizardConfig,
        store: SharedDraftStore,
        hub: NotificationHub,
    ) -> Result<Self, ApiError> {
        let backend: Arc<dyn SubmissionBackend> = Arc::new(SimulatedBackend::new(
            config.min_latency,
            config.max_latency,
            config.failure_rate,
        ));
        Self::new(config, store, backend, hub)
    }

    /// The notification hub sessions publish to.
    #[must_use]
    pub const fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Starts a session, or returns it if it is already live.
    ///
    /// A saved draft for the same flow and session id is restored first,
    /// then the entry hints are seeded on top of it. A draft that cannot be
    /// read is ignored and the session starts fresh.
    ///
    /// # Arguments
    ///
    /// * `flow` - The flow name
    /// * `session_id` - A client-chosen id, or `None` to generate one
    /// * `hints` - Entry hints, such as the selected service
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is unknown, the id is malformed, or the
    /// id is live in a different flow.
    pub async fn start_session(
        &self,
        flow: &str,
        session_id: Option<String>,
        hints: BTreeMap<String, String>,
    ) -> Result<SessionView, ApiError> {
        let flow: FlowKind = flow.parse()?;
        let session_id: String = match session_id {
            Some(id) => validate_session_id(id)?,
            None => format!("{}-{:016x}", flow.as_str(), rand::random::<u64>()),
        };

        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(&session_id) {
            if existing.flow != flow {
                return Err(ApiError::Conflict {
                    message: format!(
                        "Session '{session_id}' is already running the {} flow",
                        existing.flow
                    ),
                });
            }
            let live = existing.state.lock().await;
            return Ok(existing.view(&live));
        }

        let definition: Arc<WizardDefinition> = self.definition(flow)?;
        let key: DraftKey =
            DraftKey::new(flow.as_str(), &session_id).map_err(|e| ApiError::InvalidInput {
                field: String::from("session_id"),
                message: e.to_string(),
            })?;
        let draft: Option<DraftRecord> = self.load_draft(&key).await;

        let handle: Arc<SessionHandle> = Arc::new(SessionHandle {
            flow,
            definition: Arc::clone(&definition),
            hints: hints.clone(),
            drafts: DraftWriter::spawn(
                Arc::clone(&self.store),
                key.clone(),
                self.config.draft_debounce,
            ),
            key,
            state: Mutex::new(LiveSession {
                session: WizardSession::new(&definition, session_id.clone()),
                uploads: UploadTracker::new(),
                upload_tasks: HashMap::new(),
            }),
        });

        let view: SessionView = {
            let mut live = handle.state.lock().await;
            if let Some(record) = draft {
                debug!(
                    session_id = %session_id,
                    revision = record.revision,
                    "Restoring draft"
                );
                handle.run(
                    &mut live,
                    Command::Restore {
                        form: record.form,
                        ordinal: record.current_ordinal,
                    },
                    &self.hub,
                )?;
            }
            if !hints.is_empty() {
                handle.run(&mut live, Command::Seed { hints }, &self.hub)?;
            }
            handle.view(&live)
        };

        info!(flow = %flow, session_id = %session_id, "Session started");
        self.submitted
            .lock()
            .await
            .retain(|(id, _)| *id != session_id);
        sessions.insert(session_id, handle);
        Ok(view)
    }

    /// Returns the current view of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist.
    pub async fn session(&self, session_id: &str) -> Result<SessionView, ApiError> {
        let handle: Arc<SessionHandle> = self.handle(session_id).await?;
        let live = handle.state.lock().await;
        Ok(handle.view(&live))
    }

    /// Sets one field.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist, the field is unknown
    /// or of another kind, or the session no longer accepts edits.
    pub async fn set_field(
        &self,
        session_id: &str,
        name: &str,
        value: FieldValue,
    ) -> Result<SessionView, ApiError> {
        self.command(
            session_id,
            Command::SetField {
                name: name.to_string(),
                value,
            },
        )
        .await
    }

    /// Clears one field.
    ///
    /// # Errors
    ///
    /// Same as [`WizardService::set_field`].
    pub async fn clear_field(&self, session_id: &str, name: &str) -> Result<SessionView, ApiError> {
        self.command(
            session_id,
            Command::ClearField {
                name: name.to_string(),
            },
        )
        .await
    }

    /// Moves to the next step.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` with every failing field if the current
    /// step is incomplete, or an error if there is no next step.
    pub async fn advance(&self, session_id: &str) -> Result<SessionView, ApiError> {
        self.command(session_id, Command::Advance).await
    }

    /// Moves to the previous step.
    ///
    /// # Errors
    ///
    /// Returns an error on the first step.
    pub async fn retreat(&self, session_id: &str) -> Result<SessionView, ApiError> {
        self.command(session_id, Command::Retreat).await
    }

    /// Jumps to a step. Forward jumps require every earlier step to be
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the ordinal is out of range or an earlier step
    /// is incomplete.
    pub async fn jump_to(&self, session_id: &str, ordinal: usize) -> Result<SessionView, ApiError> {
        self.command(session_id, Command::JumpTo { ordinal }).await
    }

    /// Submits the session's form.
    ///
    /// Only one submission per session is ever in flight; a second call
    /// made while the first is pending is refused without reaching the
    /// backend. A session whose previous submission failed is submitted
    /// again with its form unchanged. An accepted submission closes the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is incomplete, an upload is still in
    /// progress, a submission is already pending or accepted, or the
    /// backend refuses, fails or times out.
    pub async fn submit(&self, session_id: &str) -> Result<SessionView, ApiError> {
        let handle: Arc<SessionHandle> = self.handle(session_id).await?;

        let request: SubmissionRequest = {
            let mut live = handle.state.lock().await;
            let uploading: Vec<String> = live
                .uploads
                .active()
                .map(|upload| upload.file.file_name.clone())
                .collect();
            if !uploading.is_empty() {
                let message: String =
                    format!("Wait for uploads to finish: {}", uploading.join(", "));
                self.hub
                    .publish(Notification::error(session_id, message.clone()));
                return Err(ApiError::Conflict { message });
            }
            if live.session.submission == SubmissionStatus::Error {
                handle.run(&mut live, Command::Retry, &self.hub)?;
            }
            let form: FormState = handle
                .run(&mut live, Command::BeginSubmit, &self.hub)?
                .ok_or_else(|| ApiError::Internal {
                    message: String::from("Submission started without a form"),
                })?;

            let profile = match handle.flow.profile(&form) {
                Ok(profile) => profile,
                Err(e) => {
                    handle.run(
                        &mut live,
                        Command::CompleteSubmit {
                            outcome: SubmissionOutcome::Failed {
                                message: e.to_string(),
                            },
                        },
                        &self.hub,
                    )?;
                    return Err(e);
                }
            };

            SubmissionRequest {
                flow: handle.flow.as_str().to_string(),
                session_id: session_id.to_string(),
                fields: handle
                    .definition
                    .without_dormant_fields(&form)
                    .without_file_handles(),
                hints: handle.hints.clone(),
                profile,
            }
        };

        let result: Result<SubmissionReceipt, _> = self.pipeline.submit(&request).await;

        let mut live = handle.state.lock().await;
        let outcome: SubmissionOutcome = match &result {
            Ok(receipt) => SubmissionOutcome::Accepted {
                reference: receipt.reference.clone(),
                message: receipt.message.clone(),
            },
            Err(e) => SubmissionOutcome::Failed {
                message: e.to_string(),
            },
        };
        handle.run(&mut live, Command::CompleteSubmit { outcome }, &self.hub)?;
        let view: SessionView = handle.view(&live);
        drop(live);

        match result {
            Ok(receipt) => {
                self.retire(handle, session_id, &receipt.reference).await;
                Ok(view)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Abandons a session and deletes its draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist.
    pub async fn cancel(&self, session_id: &str) -> Result<(), ApiError> {
        let handle: Arc<SessionHandle> = self
            .sessions
            .lock()
            .await
            .remove(session_id)
            .ok_or_else(|| session_not_found(session_id))?;

        {
            let mut live = handle.state.lock().await;
            for (_, task) in live.upload_tasks.drain() {
                task.abort();
            }
        }
        // Discard any pending snapshot, then delete synchronously so the
        // draft is gone when this returns.
        handle.drafts.clear();
        if let Err(e) = self.store.lock().await.clear(&handle.key) {
            warn!(draft_key = %handle.key, error = %e, "Failed to clear draft");
        }

        info!(session_id, "Session cancelled");
        Ok(())
    }

    /// Starts a simulated upload into the flow's upload field.
    ///
    /// The file is attached to the form once the upload completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow takes no uploads, the file is empty or
    /// too large, or the session no longer accepts edits.
    pub async fn add_upload(
        &self,
        session_id: &str,
        file_name: &str,
        size_bytes: u64,
        content_type: Option<String>,
    ) -> Result<UploadedFileRef, ApiError> {
        let handle: Arc<SessionHandle> = self.handle(session_id).await?;
        if handle.definition.upload_field().is_none() {
            return Err(ApiError::InvalidInput {
                field: String::from("upload"),
                message: format!("The {} flow does not accept uploads", handle.flow),
            });
        }
        let file_name: &str = file_name.trim();
        if file_name.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("file_name"),
                message: String::from("File name must not be empty"),
            });
        }
        if size_bytes == 0 || size_bytes > MAX_UPLOAD_BYTES {
            return Err(ApiError::InvalidInput {
                field: String::from("size_bytes"),
                message: format!("File size must be between 1 and {MAX_UPLOAD_BYTES} bytes"),
            });
        }

        let mut live = handle.state.lock().await;
        ensure_accepts_edits(&live.session)?;

        let id: String = format!("upl-{:016x}", rand::random::<u64>());
        let mut file: FileRef =
            FileRef::new(id.clone(), file_name, size_bytes).with_handle(format!("sim://{id}"));
        if let Some(content_type) = content_type {
            file = file.with_content_type(content_type);
        }
        let upload: UploadedFileRef = live.uploads.add_file(file);

        let task: JoinHandle<()> = tokio::spawn(drive_upload(
            Arc::clone(&handle),
            id.clone(),
            self.config.clone(),
            self.hub.clone(),
        ));
        if let Some(previous) = live.upload_tasks.insert(id.clone(), task) {
            previous.abort();
        }

        debug!(session_id, upload_id = %id, file_name, size_bytes, "Upload started");
        Ok(upload)
    }

    /// Removes an upload, in progress or completed, and detaches its file.
    /// Files restored from a draft are removed by their file id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session or upload does not exist, or the
    /// session no longer accepts edits.
    pub async fn remove_upload(
        &self,
        session_id: &str,
        upload_id: &str,
    ) -> Result<SessionView, ApiError> {
        let handle: Arc<SessionHandle> = self.handle(session_id).await?;
        let mut live = handle.state.lock().await;
        ensure_accepts_edits(&live.session)?;

        let attached: bool = handle.is_attached(&live, upload_id);
        let tracked: Option<UploadedFileRef> = live.uploads.remove_file(upload_id);
        if tracked.is_none() && !attached {
            return Err(ApiError::ResourceNotFound {
                resource_type: String::from("Upload"),
                message: format!("Upload '{upload_id}' not found"),
            });
        }
        if let Some(task) = live.upload_tasks.remove(upload_id) {
            task.abort();
        }
        if attached {
            handle.sync_attachments(&mut live, &self.hub, Some(upload_id))?;
        }

        debug!(session_id, upload_id, "Upload removed");
        Ok(handle.view(&live))
    }

    async fn command(&self, session_id: &str, command: Command) -> Result<SessionView, ApiError> {
        let handle: Arc<SessionHandle> = self.handle(session_id).await?;
        let mut live = handle.state.lock().await;
        handle.run(&mut live, command, &self.hub)?;
        Ok(handle.view(&live))
    }

    async fn handle(&self, session_id: &str) -> Result<Arc<SessionHandle>, ApiError> {
        let sessions = self.sessions.lock().await;
        if let Some(handle) = sessions.get(session_id) {
            return Ok(Arc::clone(handle));
        }
        drop(sessions);

        let submitted = self.submitted.lock().await;
        let reference: Option<&String> = submitted
            .iter()
            .rev()
            .find(|(id, _)| id == session_id)
            .map(|(_, reference)| reference);
        Err(reference.map_or_else(
            || session_not_found(session_id),
            |reference| ApiError::Conflict {
                message: format!("Session '{session_id}' was submitted as {reference}"),
            },
        ))
    }

    /// Closes a session whose submission was accepted.
    ///
    /// The draft writer is flushed and stopped here unless another request
    /// still holds the session, in which case it stops once that request
    /// lets go.
    async fn retire(&self, handle: Arc<SessionHandle>, session_id: &str, reference: &str) {
        {
            let mut sessions = self.sessions.lock().await;
            let current: bool = sessions
                .get(session_id)
                .is_some_and(|live| Arc::ptr_eq(live, &handle));
            if !current {
                return;
            }
            sessions.remove(session_id);

            let mut submitted = self.submitted.lock().await;
            submitted.push_back((session_id.to_string(), reference.to_string()));
            while submitted.len() > MAX_SUBMITTED_SESSIONS {
                submitted.pop_front();
            }
        }

        {
            let mut live = handle.state.lock().await;
            for (_, task) in live.upload_tasks.drain() {
                task.abort();
            }
        }
        match Arc::try_unwrap(handle) {
            Ok(handle) => handle.drafts.close().await,
            Err(_) => debug!(session_id, "Session still referenced elsewhere"),
        }
        info!(session_id, reference, "Session submitted and closed");
    }

    fn definition(&self, flow: FlowKind) -> Result<Arc<WizardDefinition>, ApiError> {
        self.definitions
            .get(&flow)
            .cloned()
            .ok_or_else(|| ApiError::Internal {
                message: format!("No definition loaded for the {flow} flow"),
            })
    }

    async fn load_draft(&self, key: &DraftKey) -> Option<DraftRecord> {
        match self.store.lock().await.load(key) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(draft_key = %key, error = %e, "Ignoring unreadable draft");
                None
            }
        }
    }
}

/// Advances one upload until it completes, fails or is removed.
async fn drive_upload(
    handle: Arc<SessionHandle>,
    upload_id: String,
    config: WizardConfig,
    hub: NotificationHub,
) {
    let mut ticker = tokio::time::interval(config.upload_tick);
    // The first tick of an interval fires immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let mut live = handle.state.lock().await;
        let status: Option<UploadStatus> = live
            .uploads
            .advance(&upload_id, config.sample_upload_increment())
            .map(|upload| upload.status);

        match status {
            Some(UploadStatus::Completed) => {
                live.upload_tasks.remove(&upload_id);
                if let Err(e) = handle.sync_attachments(&mut live, &hub, None) {
                    warn!(upload_id = %upload_id, error = %e, "Could not attach upload");
                    live.uploads.fail(&upload_id, e.to_string());
                }
                return;
            }
            Some(UploadStatus::Pending | UploadStatus::Uploading) => {}
            Some(UploadStatus::Error) | None => {
                live.upload_tasks.remove(&upload_id);
                return;
            }
        }
    }
}

fn ensure_accepts_edits(session: &WizardSession) -> Result<(), ApiError> {
    match session.submission {
        SubmissionStatus::Pending => Err(translate_core_error(CoreError::SubmissionInFlight)),
        SubmissionStatus::Success => Err(translate_core_error(CoreError::AlreadySubmitted)),
        SubmissionStatus::Idle | SubmissionStatus::Error => Ok(()),
    }
}

fn validate_session_id(id: String) -> Result<String, ApiError> {
    let valid: bool = !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id.chars().all(is_session_id_char);
    if valid {
        Ok(id)
    } else {
        Err(ApiError::InvalidInput {
            field: String::from("session_id"),
            message: format!(
                "Session ids are 1 to {MAX_SESSION_ID_LEN} characters of letters, digits, \
                 '-', '_' or '.'"
            ),
        })
    }
}

const fn is_session_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn session_not_found(session_id: &str) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Session"),
        message: format!("Session '{session_id}' not found"),
    }
}
