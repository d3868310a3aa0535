//! Data models for deployment coordination

pub mod context;
pub mod status;
pub mod workflow;
