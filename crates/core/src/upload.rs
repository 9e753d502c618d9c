// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use upscalex_domain::FileRef;

/// Progress value of a finished upload.
pub const COMPLETE_PROGRESS: u8 = 100;

/// Lifecycle of a single upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Error,
}

/// A file being transferred, with its progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFileRef {
    /// The upload identifier (same as the file's id).
    pub id: String,
    /// The file being transferred.
    pub file: FileRef,
    /// Progress from 0 to 100. Never decreases.
    pub progress: u8,
    /// Current status.
    pub status: UploadStatus,
    /// Why the upload failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadedFileRef {
    /// Returns true while the upload can still make progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, UploadStatus::Pending | UploadStatus::Uploading)
    }
}

/// Tracks independent simulated uploads for one session.
///
/// Each file progresses on its own; removing or failing one never affects
/// another. Entries are kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadTracker {
    uploads: Vec<UploadedFileRef>,
}

impl UploadTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            uploads: Vec::new(),
        }
    }

    /// Starts tracking a file at zero progress.
    ///
    /// Adding a file whose id is already tracked restarts that upload.
    pub fn add_file(&mut self, file: FileRef) -> UploadedFileRef {
        let entry: UploadedFileRef = UploadedFileRef {
            id: file.id.clone(),
            file,
            progress: 0,
            status: UploadStatus::Pending,
            error: None,
        };
        if let Some(existing) = self.uploads.iter_mut().find(|u| u.id == entry.id) {
            *existing = entry.clone();
        } else {
            self.uploads.push(entry.clone());
        }
        entry
    }

    /// Moves one upload forward by `increment` points.
    ///
    /// Increments are clamped to at least one point so an upload always
    /// terminates, and progress is capped at 100, where the upload becomes
    /// `Completed`. Finished, failed, and unknown uploads are left alone.
    ///
    /// # Returns
    ///
    /// The updated entry, or `None` if the id is unknown.
    pub fn advance(&mut self, id: &str, increment: u8) -> Option<&UploadedFileRef> {
        let upload: &mut UploadedFileRef = self.uploads.iter_mut().find(|u| u.id == id)?;
        if upload.is_active() {
            upload.progress = upload
                .progress
                .saturating_add(increment.max(1))
                .min(COMPLETE_PROGRESS);
            upload.status = if upload.progress == COMPLETE_PROGRESS {
                UploadStatus::Completed
            } else {
                UploadStatus::Uploading
            };
        }
        Some(upload)
    }

    /// Advances every active upload, drawing one increment per upload.
    ///
    /// # Returns
    ///
    /// The ids of uploads that completed during this tick.
    pub fn tick(&mut self, mut increment: impl FnMut() -> u8) -> Vec<String> {
        let active: Vec<String> = self
            .uploads
            .iter()
            .filter(|u| u.is_active())
            .map(|u| u.id.clone())
            .collect();

        active
            .into_iter()
            .filter(|id| {
                self.advance(id, increment())
                    .is_some_and(|u| u.status == UploadStatus::Completed)
            })
            .collect()
    }

    /// Marks an upload as failed. A completed upload can still fail when
    /// its file could not be attached to the form.
    ///
    /// # Returns
    ///
    /// The updated entry, or `None` if the id is unknown.
    pub fn fail(&mut self, id: &str, reason: impl Into<String>) -> Option<&UploadedFileRef> {
        let upload: &mut UploadedFileRef = self.uploads.iter_mut().find(|u| u.id == id)?;
        if upload.status != UploadStatus::Error {
            upload.status = UploadStatus::Error;
            upload.error = Some(reason.into());
        }
        Some(upload)
    }

    /// Stops tracking an upload regardless of its progress.
    pub fn remove_file(&mut self, id: &str) -> Option<UploadedFileRef> {
        let index: usize = self.uploads.iter().position(|u| u.id == id)?;
        Some(self.uploads.remove(index))
    }

    /// Returns one upload.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&UploadedFileRef> {
        self.uploads.iter().find(|u| u.id == id)
    }

    /// Returns every tracked upload in insertion order.
    #[must_use]
    pub fn uploads(&self) -> &[UploadedFileRef] {
        &self.uploads
    }

    /// Returns the uploads still in progress.
    pub fn active(&self) -> impl Iterator<Item = &UploadedFileRef> {
        self.uploads.iter().filter(|u| u.is_active())
    }

    /// Returns the files of completed uploads in insertion order.
    #[must_use]
    pub fn completed_files(&self) -> Vec<FileRef> {
        self.uploads
            .iter()
            .filter(|u| u.status == UploadStatus::Completed)
            .map(|u| u.file.clone())
            .collect()
    }
}
