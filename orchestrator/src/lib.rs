//! Kumo Orchestration Core
//!
//! Client-side coordination of deployment attempts for generated project
//! artifacts: context store, status lifecycle, bounded auto-retry against
//! an external workflow engine, stuck-deployment recovery and subscriber
//! notification.

pub mod errors;
pub mod external;
pub mod logs;
pub mod models;
pub mod notify;
pub mod options;
pub mod orchestrator;
pub mod reaper;
pub mod resolver;
pub mod retry;
pub mod sched;
pub mod state;
pub mod store;
pub mod utils;

pub use errors::OrchestratorError;
pub use orchestrator::Orchestrator;
