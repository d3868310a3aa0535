//! Retry attempt tracking

use serde::Serialize;

use crate::state::CoordinationState;

/// Progress of the bounded auto-retry loop for one request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryProgress {
    pub attempt: u32,

    pub max_attempts: u32,

    /// Whether the retry engine currently has a workflow for the project
    pub is_retrying: bool,

    /// Time since the active workflow started, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl CoordinationState {
    /// Increment the retry counter, returning the new count
    pub fn increment_retry(&mut self, request_id: &str) -> u32 {
        let count = self
            .retry_attempts
            .entry(request_id.to_string())
            .or_insert(0);
        *count += 1;
        let count = *count;
        self.sync_retry_projection(request_id);
        count
    }

    /// Reset the retry counter to zero
    pub fn reset_retry(&mut self, request_id: &str) {
        self.set_retry(request_id, 0);
    }

    /// Set the retry counter to an explicit value
    pub fn set_retry(&mut self, request_id: &str, count: u32) {
        self.retry_attempts.insert(request_id.to_string(), count);
        self.sync_retry_projection(request_id);
    }

    /// Current retry count, zero for unknown ids
    pub fn retry_count(&self, request_id: &str) -> u32 {
        self.retry_attempts.get(request_id).copied().unwrap_or(0)
    }

    /// Whether another automatic retry is permitted
    pub fn can_auto_retry(&self, request_id: &str) -> bool {
        self.retry_count(request_id) < self.max_retry_attempts
    }

    fn sync_retry_projection(&mut self, request_id: &str) {
        let count = self.retry_count(request_id);
        if let Some(status) = self.deployment_states.get_mut(request_id) {
            status.retry_attempt = count;
        }
    }
}
