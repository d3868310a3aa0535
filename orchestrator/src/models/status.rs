//! Deployment status models

use serde::{Deserialize, Serialize};

/// Lifecycle state of a deployment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    /// Created, not yet started
    Ready,

    /// Publish in progress
    Deploying,

    /// Published and reachable
    Success,

    /// Publish failed
    Error,
}

impl DeploymentState {
    /// Ready and Success requests are settled. Deploying and Error ones
    /// still have an attempt in flight or pending recovery, and are evicted
    /// when a newer context for the same project supersedes them.
    pub fn is_unsettled(&self) -> bool {
        matches!(self, DeploymentState::Deploying | DeploymentState::Error)
    }
}

/// Mutable lifecycle record tracking one request's progress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    /// Current lifecycle state
    pub state: DeploymentState,

    /// Completion percentage, meaningful only while deploying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    /// Error message, present only after a failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Reachable URL, present only after success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,

    /// Publish duration in milliseconds, present only after success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Whether the external retry engine is driving this request
    pub is_auto_retrying: bool,

    /// Read-only projection of the authoritative retry counter
    pub retry_attempt: u32,

    /// Process-wide retry bound
    pub max_retry_attempts: u32,

    /// Set once an external signal confirms the artifact is reachable
    pub live_preview_activated: bool,
}

impl DeploymentStatus {
    /// Fresh status for a newly created request. Also returned for lookups
    /// of unknown request ids, which never fail.
    pub fn ready(max_retry_attempts: u32) -> Self {
        Self {
            state: DeploymentState::Ready,
            progress: None,
            error: None,
            deployed_url: None,
            duration_ms: None,
            is_auto_retrying: false,
            retry_attempt: 0,
            max_retry_attempts,
            live_preview_activated: false,
        }
    }
}
