//! DeploymentContext store: creation, pruning, removal

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use crate::errors::OrchestratorError;
use crate::models::context::DeploymentContext;
use crate::models::status::DeploymentStatus;
use crate::state::CoordinationState;

impl CoordinationState {
    /// Insert a new deployment context with a fresh ready status.
    ///
    /// Any other context for the same project whose state is neither ready
    /// nor success is evicted first, so a previous failed or mid-flight
    /// attempt cannot shadow or race the new one. At most one non-terminal
    /// context per project survives a create.
    pub fn create_context(
        &mut self,
        request_id: &str,
        project_id: &str,
        project_name: &str,
        files: HashMap<String, String>,
        server_pair_id: Option<String>,
    ) -> Result<DeploymentContext, OrchestratorError> {
        if files.is_empty() {
            return Err(OrchestratorError::Validation(
                "deployment context requires at least one file".to_string(),
            ));
        }

        let mut stale = Vec::new();
        for (id, ctx) in &self.active_deployments {
            if id.as_str() == request_id || ctx.project_id != project_id {
                continue;
            }
            let unsettled = self
                .deployment_states
                .get(id)
                .map(|s| s.state.is_unsettled())
                .unwrap_or(false);
            if unsettled {
                stale.push(id.clone());
            }
        }

        for id in &stale {
            info!("Evicting stale deployment {} for project {}", id, project_id);
            self.remove_request(id);
        }

        let context = DeploymentContext {
            request_id: request_id.to_string(),
            project_id: project_id.to_string(),
            project_name: project_name.to_string(),
            files,
            created_at: Utc::now(),
            server_pair_id,
        };

        self.active_deployments
            .insert(request_id.to_string(), context.clone());
        self.retry_attempts.insert(request_id.to_string(), 0);
        self.put_status(request_id, DeploymentStatus::ready(self.max_retry_attempts));
        self.touch();

        Ok(context)
    }

    /// Drop every trace of a request: context, status and retry counter.
    /// Late callbacks targeting a removed id become silent misses.
    pub fn remove_request(&mut self, request_id: &str) {
        self.active_deployments.remove(request_id);
        self.deployment_states.remove(request_id);
        self.retry_attempts.remove(request_id);
    }
}
