//! Auto-retry workflow models
//!
//! Workflows are owned and driven by the external retry engine; the core
//! only reads their phase and reports deployment outcomes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of an external remediation workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    CodeGeneration,
    FileApplication,
    Deployment,
    Completed,
    Failed,
}

/// A remediation workflow active for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRetryWorkflow {
    /// Unique workflow ID
    pub workflow_id: String,

    /// Project the workflow remediates
    pub project_id: String,

    /// Current phase
    pub phase: WorkflowPhase,

    /// Number of remediation passes executed so far
    pub execution_count: u32,

    /// When the workflow started
    pub started_at: DateTime<Utc>,
}

/// Outcome report sent back to the engine after a deployment settles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOutcome {
    pub success: bool,

    pub phase: WorkflowPhase,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowOutcome {
    /// Successful deployment report
    pub fn deployed(url: &str, duration_ms: u64) -> Self {
        Self {
            success: true,
            phase: WorkflowPhase::Deployment,
            deployed_url: Some(url.to_string()),
            duration_ms: Some(duration_ms),
            error: None,
        }
    }

    /// Failed deployment report
    pub fn deploy_failed(error: &str) -> Self {
        Self {
            success: false,
            phase: WorkflowPhase::Deployment,
            deployed_url: None,
            duration_ms: None,
            error: Some(error.to_string()),
        }
    }
}
