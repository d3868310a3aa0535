//! Deployment request models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One deployment request: a project reference plus a snapshot of the
/// generated files to publish.
///
/// Contexts are immutable once inserted into the coordination state; a new
/// attempt for the same project always creates a new context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentContext {
    /// Unique request ID
    pub request_id: String,

    /// Project this request belongs to
    pub project_id: String,

    /// Human-readable project name
    pub project_name: String,

    /// Snapshot of generated files, filename -> text content
    pub files: HashMap<String, String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Optional execution-environment reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_pair_id: Option<String>,
}
