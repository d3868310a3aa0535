//! Auto-retry workflow engine seam

use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::workflow::{AutoRetryWorkflow, WorkflowOutcome};

/// Multi-phase remediation engine (regenerate, apply, deploy). The engine
/// owns workflow lifecycles; the core only queries activity and reports
/// deployment outcomes.
#[async_trait]
pub trait RetryEngine: Send + Sync {
    /// Whether a remediation workflow is currently active for the project.
    /// This is ground truth; local `is_auto_retrying` flags are hints.
    async fn is_project_active(&self, project_id: &str) -> bool;

    /// The active workflow for the project, if any
    async fn get_workflow(&self, project_id: &str) -> Option<AutoRetryWorkflow>;

    /// Start a new workflow seeded with the file snapshot. Returns the
    /// workflow ID, or None when the engine declines (e.g. at capacity).
    async fn start(
        &self,
        project_id: &str,
        files: &HashMap<String, String>,
        trigger_request_id: &str,
    ) -> Option<String>;

    /// Report a phase outcome back to the engine
    async fn report_outcome(&self, workflow_id: &str, outcome: WorkflowOutcome);
}
