//! Utility functions

/// Generate a random UUID v4
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Truncate a message to `limit` characters for display
pub fn truncate_message(msg: &str, limit: usize) -> String {
    if msg.chars().count() <= limit {
        return msg.to_string();
    }
    let cut: String = msg.chars().take(limit).collect();
    format!("{}...", cut)
}
