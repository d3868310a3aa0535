//! Interface boundaries of the external collaborators
//!
//! The core consumes these seams and never implements them itself: the
//! deployment executor publishes artifacts, the retry engine runs
//! remediation workflows, the error extractor turns raw failures into fix
//! prompts, and the UI sink reflects coordination state to the user.

pub mod error_extractor;
pub mod executor;
pub mod retry_engine;
pub mod ui;
