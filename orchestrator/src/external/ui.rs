//! UI notification sink seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::OrchestratorError;

/// Surface the studio UI can be switched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiSurface {
    Editor,
    Preview,
    Chat,
}

/// Sink the core calls to reflect state in the UI. The core never owns UI
/// behavior; hints are fire-and-forget.
#[async_trait]
pub trait UiSink: Send + Sync {
    /// Surface switch hint
    async fn switch_surface(&self, surface: UiSurface);

    /// Submit a remediation prompt through the chat surface
    async fn submit_fix(&self, prompt: String) -> Result<(), OrchestratorError>;
}
