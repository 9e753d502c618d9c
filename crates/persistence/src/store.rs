// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use std::str::FromStr;
use time::OffsetDateTime;
use upscalex_domain::FormState;

use crate::error::PersistenceError;

/// Identifies a draft: `<flow>:<session>`.
///
/// The flow name never contains a colon; the session part may.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftKey {
    flow: String,
    session_id: String,
}

impl DraftKey {
    /// Creates a key.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is empty or the flow contains `:`.
    pub fn new(
        flow: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Result<Self, PersistenceError> {
        let flow: String = flow.into();
        let session_id: String = session_id.into();
        if flow.is_empty() || session_id.is_empty() || flow.contains(':') {
            return Err(PersistenceError::InvalidDraftKey(format!(
                "{flow}:{session_id}"
            )));
        }
        Ok(Self { flow, session_id })
    }

    /// Returns the flow part.
    #[must_use]
    pub fn flow(&self) -> &str {
        &self.flow
    }

    /// Returns the session part.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl std::fmt::Display for DraftKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.flow, self.session_id)
    }
}

impl FromStr for DraftKey {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (flow, session_id) = s
            .split_once(':')
            .ok_or_else(|| PersistenceError::InvalidDraftKey(s.to_string()))?;
        Self::new(flow, session_id)
    }
}

/// A saved snapshot of an in-progress session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRecord {
    /// The draft key.
    pub key: DraftKey,
    /// The saved answers. File handles are never stored.
    pub form: FormState,
    /// The step the user was on.
    pub current_ordinal: usize,
    /// Number of saves made under this key, starting at 1.
    pub revision: u64,
    /// When the snapshot was saved.
    pub saved_at: OffsetDateTime,
}

/// Storage port for drafts.
///
/// Saves under the same key overwrite each other: the last save wins and
/// bumps the revision.
pub trait DraftStore: Send {
    /// Saves a snapshot and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(
        &mut self,
        key: &DraftKey,
        form: &FormState,
        current_ordinal: usize,
    ) -> Result<DraftRecord, PersistenceError>;

    /// Loads the snapshot for a key, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the draft is corrupt.
    fn load(&mut self, key: &DraftKey) -> Result<Option<DraftRecord>, PersistenceError>;

    /// Deletes the snapshot for a key. Clearing a missing draft is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn clear(&mut self, key: &DraftKey) -> Result<(), PersistenceError>;
}

/// A draft store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    drafts: HashMap<DraftKey, DraftRecord>,
}

impl InMemoryDraftStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored drafts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Returns true when no drafts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn save(
        &mut self,
        key: &DraftKey,
        form: &FormState,
        current_ordinal: usize,
    ) -> Result<DraftRecord, PersistenceError> {
        let revision: u64 = self.drafts.get(key).map_or(0, |d| d.revision) + 1;
        let record: DraftRecord = DraftRecord {
            key: key.clone(),
            form: form.without_file_handles(),
            current_ordinal,
            revision,
            saved_at: OffsetDateTime::now_utc(),
        };
        self.drafts.insert(key.clone(), record.clone());
        Ok(record)
    }

    fn load(&mut self, key: &DraftKey) -> Result<Option<DraftRecord>, PersistenceError> {
        Ok(self.drafts.get(key).cloned())
    }

    fn clear(&mut self, key: &DraftKey) -> Result<(), PersistenceError> {
        self.drafts.remove(key);
        Ok(())
    }
}
