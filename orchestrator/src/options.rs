//! Orchestrator configuration options

use std::time::Duration;

/// Tuning knobs for the orchestration core
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Maximum automatic retry attempts per request
    pub max_retry_attempts: u32,

    /// Settling delay between the tab-switch hint and the executor call
    pub settle_delay: Duration,

    /// Delay before the post-success preview hint fires
    pub preview_hint_delay: Duration,

    /// Age past which a request stuck in deploying is force-reset
    pub stuck_threshold: Duration,

    /// Display bound for recorded error messages
    pub error_display_limit: usize,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            max_retry_attempts: 3,
            settle_delay: Duration::from_millis(500),
            preview_hint_delay: Duration::from_millis(800),
            stuck_threshold: Duration::from_secs(300), // 5 minutes
            error_display_limit: 500,
        }
    }
}
