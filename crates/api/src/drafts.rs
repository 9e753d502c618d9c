// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Debounced draft writing.
//!
//! Every session owns one writer task. Edits arrive on a `watch` channel,
//! which keeps only the latest snapshot, and the task writes once the
//! channel has been quiet for the debounce period. Clears are written
//! immediately and discard any snapshot still waiting. Store failures are
//! logged and swallowed; drafts are a convenience, never a gate.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use upscalex_domain::FormState;
use upscalex_persistence::{DraftKey, DraftStore};

/// A draft store shared between sessions.
pub type SharedDraftStore = Arc<Mutex<Box<dyn DraftStore>>>;

/// Wraps a store for sharing.
#[must_use]
pub fn share_store(store: impl DraftStore + 'static) -> SharedDraftStore {
    Arc::new(Mutex::new(Box::new(store)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DraftRequest {
    Idle,
    Save { form: FormState, ordinal: usize },
    Clear,
}

/// Fire-and-forget draft writer for one session.
pub struct DraftWriter {
    tx: watch::Sender<DraftRequest>,
    task: JoinHandle<()>,
}

impl DraftWriter {
    /// Spawns the writer task for a key.
    #[must_use]
    pub fn spawn(store: SharedDraftStore, key: DraftKey, debounce: Duration) -> Self {
        let (tx, rx) = watch::channel(DraftRequest::Idle);
        let task: JoinHandle<()> = tokio::spawn(run(rx, store, key, debounce));
        Self { tx, task }
    }

    /// Schedules a snapshot. Only the latest snapshot of a burst is written.
    pub fn save(&self, form: FormState, ordinal: usize) {
        self.tx.send_replace(DraftRequest::Save { form, ordinal });
    }

    /// Deletes the draft as soon as possible.
    pub fn clear(&self) {
        self.tx.send_replace(DraftRequest::Clear);
    }

    /// Stops the writer after it has performed any outstanding request.
    pub async fn close(self) {
        let Self { tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            warn!(error = %e, "Draft writer task ended abnormally");
        }
    }
}

async fn run(
    mut rx: watch::Receiver<DraftRequest>,
    store: SharedDraftStore,
    key: DraftKey,
    debounce: Duration,
) {
    while rx.changed().await.is_ok() {
        let mut latest: DraftRequest = rx.borrow_and_update().clone();

        if matches!(latest, DraftRequest::Save { .. }) {
            // Restart the quiet period on every new snapshot.
            loop {
                match tokio::time::timeout(debounce, rx.changed()).await {
                    Ok(Ok(())) => {
                        latest = rx.borrow_and_update().clone();
                        if latest == DraftRequest::Clear {
                            break;
                        }
                    }
                    // Quiet period elapsed, or the session is closing: write now.
                    Ok(Err(_)) | Err(_) => break,
                }
            }
        }

        perform(&store, &key, latest).await;
    }
    debug!(draft_key = %key, "Draft writer stopped");
}

async fn perform(store: &SharedDraftStore, key: &DraftKey, request: DraftRequest) {
    let mut store = store.lock().await;
    match request {
        DraftRequest::Save { form, ordinal } => match store.save(key, &form, ordinal) {
            Ok(record) => debug!(draft_key = %key, revision = record.revision, "Draft saved"),
            Err(e) => warn!(draft_key = %key, error = %e, "Failed to save draft"),
        },
        DraftRequest::Clear => match store.clear(key) {
            Ok(()) => debug!(draft_key = %key, "Draft cleared"),
            Err(e) => warn!(draft_key = %key, error = %e, "Failed to clear draft"),
        },
        DraftRequest::Idle => {}
    }
}
