//! Stuck-deployment recovery
//!
//! A request can wedge in `deploying` when its executor call is orphaned
//! (e.g. the process driving it went away). The reaper force-resets such
//! requests so the slot is recovered for a future attempt instead of
//! staying wedged forever.

use chrono::{Duration as ChronoDuration, Utc};
use tracing::warn;

use crate::models::status::{DeploymentState, DeploymentStatus};
use crate::state::CoordinationState;

/// Informational message recorded on force-reset statuses
pub const STUCK_RESET_MESSAGE: &str = "Deployment timed out and was reset";

impl CoordinationState {
    /// Force-reset requests stuck in `deploying` whose context is older
    /// than `threshold`. Returns the ids that were reset.
    ///
    /// Purely local: no network calls, no side effects beyond state, and a
    /// second pass with nothing newly stuck is a no-op.
    pub fn reap_stuck(&mut self, threshold: std::time::Duration) -> Vec<String> {
        let threshold = ChronoDuration::from_std(threshold)
            .unwrap_or_else(|_| ChronoDuration::minutes(5));
        let cutoff = Utc::now() - threshold;

        let mut stuck = Vec::new();
        for (id, status) in &self.deployment_states {
            if status.state != DeploymentState::Deploying {
                continue;
            }
            let expired = self
                .active_deployments
                .get(id)
                .map(|ctx| ctx.created_at < cutoff)
                .unwrap_or(false);
            if expired {
                stuck.push(id.clone());
            }
        }

        for id in &stuck {
            warn!("Deployment {} stuck in deploying, force-resetting", id);
            self.reset_retry(id);
            let mut status = DeploymentStatus::ready(self.max_retry_attempts);
            status.error = Some(STUCK_RESET_MESSAGE.to_string());
            self.put_status(id, status);
        }

        if !stuck.is_empty() {
            self.touch();
        }
        stuck
    }
}
