//! Deployment executor seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::OrchestratorError;
use crate::models::context::DeploymentContext;

/// Request handed to the executor: the context plus an explicit auto-start
/// flag so the executor can tell an orchestrated attempt from a
/// user-triggered one.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub context: DeploymentContext,
    pub auto_start: bool,
}

/// Result of a successful publish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOutcome {
    /// Reachable URL of the published artifact
    pub deployed_url: String,

    /// Publish duration in milliseconds
    pub duration_ms: u64,
}

/// Opaque publish operation against the remote execution target
#[async_trait]
pub trait DeployExecutor: Send + Sync {
    async fn deploy(&self, request: DeployRequest) -> Result<DeployOutcome, OrchestratorError>;
}
