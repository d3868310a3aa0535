//! Project deployment resolver
//!
//! Asynchronous external signals (e.g. "the previewed artifact is now
//! reachable") arrive without a request id and must be reconciled against
//! whichever request is the authoritative one for the project.

use serde::Deserialize;

use crate::models::context::DeploymentContext;
use crate::models::status::DeploymentState;
use crate::state::CoordinationState;

/// External activation signal consumed by
/// [`Orchestrator::handle_external_activation`](crate::Orchestrator::handle_external_activation)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationSignal {
    pub project_id: String,
    pub deployed_url: String,
}

impl ActivationSignal {
    /// Validate a loosely-shaped external payload at the boundary.
    /// Returns None when either required field is missing or empty.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let signal: Self = serde_json::from_value(value.clone()).ok()?;
        if signal.project_id.is_empty() || signal.deployed_url.is_empty() {
            return None;
        }
        Some(signal)
    }
}

impl CoordinationState {
    /// Locate the authoritative live request for a project.
    ///
    /// Ready requests win over in-flight or failed ones so a fresh,
    /// not-yet-started attempt is never clobbered by a signal meant for a
    /// request mid-flight under a different code path. Ties go to the most
    /// recently created context.
    pub fn find_by_project(&self, project_id: &str) -> Option<&DeploymentContext> {
        let matches: Vec<&DeploymentContext> = self
            .active_deployments
            .values()
            .filter(|ctx| ctx.project_id == project_id)
            .collect();

        if matches.is_empty() {
            return None;
        }

        if let Some(ready) = matches
            .iter()
            .copied()
            .filter(|ctx| self.status_of(&ctx.request_id).state == DeploymentState::Ready)
            .max_by_key(|ctx| ctx.created_at)
        {
            return Some(ready);
        }

        matches.into_iter().max_by_key(|ctx| ctx.created_at)
    }
}
