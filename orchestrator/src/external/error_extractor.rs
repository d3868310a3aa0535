//! Error extraction seam for the manual remediation fallback

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Structured view of a raw deployment error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredError {
    /// Short human-readable summary
    pub summary: String,

    /// File the error points at, when recognizable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Line number, when recognizable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Original diagnostic text
    pub raw: String,
}

/// Turns opaque executor diagnostics into a fix prompt the user can submit
/// through the chat surface.
pub trait ErrorExtractor: Send + Sync {
    /// Parse a raw diagnostic against the file snapshot
    fn extract(&self, raw_error: &str, files: &HashMap<String, String>) -> StructuredError;

    /// Render a structured error as a remediation prompt
    fn to_fix_prompt(&self, error: &StructuredError, project_name: &str) -> String;
}
