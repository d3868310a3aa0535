//! Context store behavior through the public API

mod common;

use common::*;
use kumo_orchestrator::errors::OrchestratorError;
use kumo_orchestrator::models::status::DeploymentState;

#[tokio::test]
async fn test_create_context_initializes_ready_status() {
    let h = harness(MockExecutor::succeeding("https://x", 100), MockRetryEngine::accepting());

    let context = h
        .orchestrator
        .create_context("r1", "p1", "demo", sample_files(), None)
        .await
        .unwrap();
    assert_eq!(context.request_id, "r1");
    assert_eq!(context.project_id, "p1");

    let status = h.orchestrator.get_status("r1").await;
    assert_eq!(status.state, DeploymentState::Ready);
    assert_eq!(status.retry_attempt, 0);
    assert_eq!(status.max_retry_attempts, 3);
}

#[tokio::test]
async fn test_create_context_rejects_empty_files() {
    let h = harness(MockExecutor::succeeding("https://x", 100), MockRetryEngine::accepting());

    let result = h
        .orchestrator
        .create_context("r1", "p1", "demo", Default::default(), None)
        .await;
    assert!(matches!(result, Err(OrchestratorError::Validation(_))));
    assert!(h.orchestrator.get_context("r1").await.is_none());
}

#[tokio::test]
async fn test_unknown_status_lookup_returns_ready_default() {
    let h = harness(MockExecutor::succeeding("https://x", 100), MockRetryEngine::accepting());

    let status = h.orchestrator.get_status("nope").await;
    assert_eq!(status.state, DeploymentState::Ready);
    assert!(status.error.is_none());
}

#[tokio::test]
async fn test_new_context_evicts_failed_sibling() {
    let h = harness(MockExecutor::succeeding("https://x", 100), MockRetryEngine::declining());

    h.orchestrator
        .create_context("r1", "p1", "demo", sample_files(), None)
        .await
        .unwrap();
    h.orchestrator.handle_error("r1", "compile error").await;
    assert_eq!(
        h.orchestrator.get_status("r1").await.state,
        DeploymentState::Error
    );

    h.orchestrator
        .create_context("r2", "p1", "demo", sample_files(), None)
        .await
        .unwrap();

    // At most one non-terminal context per project survives
    assert!(h.orchestrator.get_context("r1").await.is_none());
    assert!(h.orchestrator.get_context("r2").await.is_some());

    let snapshot = h.orchestrator.snapshot().await;
    let ids: Vec<&str> = snapshot.active.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["r2"]);
}

#[tokio::test]
async fn test_successful_sibling_survives_new_context() {
    let h = harness(MockExecutor::succeeding("https://x", 100), MockRetryEngine::accepting());

    h.orchestrator
        .create_context("r1", "p1", "demo", sample_files(), None)
        .await
        .unwrap();
    h.orchestrator.handle_success("r1", "https://x", 100).await;

    h.orchestrator
        .create_context("r2", "p1", "demo", sample_files(), None)
        .await
        .unwrap();

    // Settled requests stay around for historical lookup
    assert!(h.orchestrator.get_context("r1").await.is_some());
    assert_eq!(
        h.orchestrator.get_status("r1").await.state,
        DeploymentState::Success
    );
}
