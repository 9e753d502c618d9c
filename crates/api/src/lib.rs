// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service layer of the UpscaleX wizards.
//!
//! Wraps the pure engine with everything that has a side: live sessions,
//! debounced draft persistence, the submission pipeline, simulated uploads
//! and the notification fan-out. Transports (the HTTP server) talk only to
//! [`WizardService`] and translate [`ApiError`] into their own status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod config;
mod drafts;
mod error;
mod flows;
mod notify;
mod pipeline;
mod request_response;
mod service;
mod view;

#[cfg(test)]
mod tests;

pub use config::WizardConfig;
pub use drafts::{DraftWriter, SharedDraftStore, share_store};
pub use error::{ApiError, translate_core_error};
pub use flows::{ATTACHMENTS_FIELD, FlowKind, SERVICES, STARTUP_STAGES, TICKET_TYPES};
pub use notify::NotificationHub;
pub use pipeline::{
    SimulatedBackend, SubmissionBackend, SubmissionError, SubmissionPipeline, SubmissionReceipt,
    SubmissionRequest,
};
pub use request_response::{
    AddUploadRequest, ErrorResponse, JumpRequest, SetFieldRequest, StartSessionRequest,
};
pub use service::{MAX_SESSION_ID_LEN, MAX_UPLOAD_BYTES, WizardService};
pub use view::{FieldView, SessionView, StepSummary};
