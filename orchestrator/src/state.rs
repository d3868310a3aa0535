//! Shared coordination state

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::context::DeploymentContext;
use crate::models::status::DeploymentStatus;

/// The single shared mutable resource of the orchestrator.
///
/// All components read and write it under the orchestrator's lock; UI
/// consumers observe it only through notifier snapshots, never by polling
/// fields ad hoc.
#[derive(Debug, Clone)]
pub struct CoordinationState {
    /// Live deployment contexts, request id -> context
    pub active_deployments: HashMap<String, DeploymentContext>,

    /// Lifecycle records, request id -> status
    pub deployment_states: HashMap<String, DeploymentStatus>,

    /// True while a request is actively being driven
    pub is_coordinating: bool,

    /// The request currently being driven, if any
    pub current_request_id: Option<String>,

    /// Authoritative retry counters. `DeploymentStatus.retry_attempt` is a
    /// projection kept in sync on every status write.
    pub retry_attempts: HashMap<String, u32>,

    /// Bumped on every mutation; the cheap "did anything change" signal
    pub last_update_time: DateTime<Utc>,

    /// Process-wide retry bound applied to new statuses
    pub max_retry_attempts: u32,
}

impl CoordinationState {
    pub fn new(max_retry_attempts: u32) -> Self {
        Self {
            active_deployments: HashMap::new(),
            deployment_states: HashMap::new(),
            is_coordinating: false,
            current_request_id: None,
            retry_attempts: HashMap::new(),
            last_update_time: Utc::now(),
            max_retry_attempts,
        }
    }

    /// Bump the change signal. Every mutating operation ends with this.
    pub fn touch(&mut self) {
        self.last_update_time = Utc::now();
    }

    /// Look up a context
    pub fn context(&self, request_id: &str) -> Option<&DeploymentContext> {
        self.active_deployments.get(request_id)
    }

    /// Look up a status, falling back to the ready default for unknown ids
    pub fn status_of(&self, request_id: &str) -> DeploymentStatus {
        self.deployment_states
            .get(request_id)
            .cloned()
            .unwrap_or_else(|| DeploymentStatus::ready(self.max_retry_attempts))
    }

    /// Write a status record, keeping the retry-attempt projection in sync
    /// with the authoritative counter.
    pub fn put_status(&mut self, request_id: &str, mut status: DeploymentStatus) {
        status.retry_attempt = self.retry_attempts.get(request_id).copied().unwrap_or(0);
        self.deployment_states.insert(request_id.to_string(), status);
    }

    /// Clear the coordination flags after a drive pass completes
    pub fn clear_coordination(&mut self) {
        self.is_coordinating = false;
        self.current_request_id = None;
    }

    /// Cheap observable projection delivered to subscribers
    pub fn snapshot(&self) -> CoordinationSnapshot {
        let mut active: Vec<(String, DateTime<Utc>)> = self
            .active_deployments
            .iter()
            .map(|(id, ctx)| (id.clone(), ctx.created_at))
            .collect();
        active.sort_by(|a, b| a.0.cmp(&b.0));

        CoordinationSnapshot {
            active,
            is_coordinating: self.is_coordinating,
            current_request_id: self.current_request_id.clone(),
            last_update_time: self.last_update_time,
        }
    }
}

/// Snapshot of the coordination state delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinationSnapshot {
    /// Active request ids with their creation timestamps, sorted by id
    pub active: Vec<(String, DateTime<Utc>)>,

    pub is_coordinating: bool,

    pub current_request_id: Option<String>,

    pub last_update_time: DateTime<Utc>,
}

impl CoordinationSnapshot {
    /// Default subscriber comparator: the active id/timestamp set plus the
    /// update clock. Churn in unrelated status fields is deliberately
    /// ignored so it cannot trigger redundant notifications.
    pub fn coordination_eq(a: &Self, b: &Self) -> bool {
        a.active == b.active && a.last_update_time == b.last_update_time
    }
}
