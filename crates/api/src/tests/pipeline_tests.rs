// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use upscalex_domain::FormState;

use crate::{
    ApiError, SimulatedBackend, SubmissionError, SubmissionPipeline, SubmissionReceipt,
    SubmissionRequest,
};

use super::helpers::ScriptedBackend;

fn create_request(flow: &str) -> SubmissionRequest {
    SubmissionRequest {
        flow: String::from(flow),
        session_id: String::from("session-1"),
        fields: FormState::new(),
        hints: BTreeMap::new(),
        profile: None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_simulated_backend_references_carry_flow_prefix() {
    let pipeline: SubmissionPipeline = SubmissionPipeline::new(
        Arc::new(SimulatedBackend::new(
            Duration::from_millis(400),
            Duration::from_millis(1_200),
            0.0,
        )),
        Duration::from_secs(10),
    );

    let first: SubmissionReceipt = pipeline.submit(&create_request("apply")).await.unwrap();
    let second: SubmissionReceipt = pipeline
        .submit(&create_request("event-registration"))
        .await
        .unwrap();

    assert_eq!(first.reference, "APP-000001");
    assert_eq!(second.reference, "EVT-000002");
    assert!(first.message.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_simulated_backend_with_certain_failure_is_unavailable() {
    let pipeline: SubmissionPipeline = SubmissionPipeline::new(
        Arc::new(SimulatedBackend::new(Duration::ZERO, Duration::ZERO, 1.0)),
        Duration::from_secs(10),
    );

    let result: Result<SubmissionReceipt, SubmissionError> =
        pipeline.submit(&create_request("signup")).await;
    assert!(matches!(result, Err(SubmissionError::Unavailable(_))));
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_times_out() {
    let backend: Arc<ScriptedBackend> =
        Arc::new(ScriptedBackend::accepting(Duration::from_secs(30)));
    let pipeline: SubmissionPipeline =
        SubmissionPipeline::new(backend.clone(), Duration::from_secs(10));

    let result: Result<SubmissionReceipt, SubmissionError> =
        pipeline.submit(&create_request("signup")).await;

    assert_eq!(
        result,
        Err(SubmissionError::TimedOut(Duration::from_secs(10)))
    );
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_submission_errors_map_to_api_errors() {
    let timed_out: ApiError = SubmissionError::TimedOut(Duration::from_secs(10)).into();
    assert!(matches!(timed_out, ApiError::SubmissionTimedOut { .. }));

    let rejected: ApiError = SubmissionError::Rejected(String::from("duplicate email")).into();
    assert!(matches!(
        rejected,
        ApiError::SubmissionFailed { ref message } if message.contains("duplicate email")
    ));
}

#[tokio::test(start_paused = true)]
async fn test_simulated_backend_with_unbounded_latency_times_out() {
    let pipeline: SubmissionPipeline = SubmissionPipeline::new(
        Arc::new(SimulatedBackend::new(Duration::ZERO, Duration::MAX, 0.0)),
        Duration::from_secs(1),
    );

    let result: Result<SubmissionReceipt, SubmissionError> =
        pipeline.submit(&create_request("apply")).await;

    assert!(matches!(result, Ok(_) | Err(SubmissionError::TimedOut(_))));
}
