//! Shared mock collaborators for orchestrator tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use kumo_orchestrator::errors::OrchestratorError;
use kumo_orchestrator::external::error_extractor::{ErrorExtractor, StructuredError};
use kumo_orchestrator::external::executor::{DeployExecutor, DeployOutcome, DeployRequest};
use kumo_orchestrator::external::retry_engine::RetryEngine;
use kumo_orchestrator::external::ui::{UiSink, UiSurface};
use kumo_orchestrator::models::workflow::{AutoRetryWorkflow, WorkflowOutcome, WorkflowPhase};
use kumo_orchestrator::options::OrchestratorOptions;
use kumo_orchestrator::Orchestrator;

/// Options with short delays so tests run quickly
pub fn test_options() -> OrchestratorOptions {
    OrchestratorOptions {
        settle_delay: Duration::from_millis(1),
        preview_hint_delay: Duration::from_millis(1),
        ..Default::default()
    }
}

pub fn sample_files() -> HashMap<String, String> {
    HashMap::from([("main.mo".to_string(), "actor {}".to_string())])
}

// ------------------------------------------------------------------
// Executor
// ------------------------------------------------------------------

pub enum ExecutorBehavior {
    Succeed(DeployOutcome),
    Fail(String),
    /// Never settles within a test's lifetime
    Hang,
}

pub struct MockExecutor {
    behavior: ExecutorBehavior,
    pub calls: AtomicUsize,
}

impl MockExecutor {
    pub fn succeeding(url: &str, duration_ms: u64) -> Self {
        Self {
            behavior: ExecutorBehavior::Succeed(DeployOutcome {
                deployed_url: url.to_string(),
                duration_ms,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behavior: ExecutorBehavior::Fail(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn hanging() -> Self {
        Self {
            behavior: ExecutorBehavior::Hang,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DeployExecutor for MockExecutor {
    async fn deploy(&self, _request: DeployRequest) -> Result<DeployOutcome, OrchestratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ExecutorBehavior::Succeed(outcome) => Ok(outcome.clone()),
            ExecutorBehavior::Fail(message) => Err(OrchestratorError::Executor(message.clone())),
            ExecutorBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(OrchestratorError::Executor("hung".to_string()))
            }
        }
    }
}

// ------------------------------------------------------------------
// Retry engine
// ------------------------------------------------------------------

pub struct MockRetryEngine {
    accept_start: bool,
    pub active: Mutex<HashMap<String, AutoRetryWorkflow>>,
    pub started: AtomicUsize,
    pub outcomes: Mutex<Vec<(String, WorkflowOutcome)>>,
}

impl MockRetryEngine {
    pub fn accepting() -> Self {
        Self {
            accept_start: true,
            active: Mutex::new(HashMap::new()),
            started: AtomicUsize::new(0),
            outcomes: Mutex::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            accept_start: false,
            active: Mutex::new(HashMap::new()),
            started: AtomicUsize::new(0),
            outcomes: Mutex::new(Vec::new()),
        }
    }

    /// Pre-register an active workflow for a project
    pub fn with_active_workflow(self, project_id: &str, workflow_id: &str) -> Self {
        self.active.lock().unwrap().insert(
            project_id.to_string(),
            AutoRetryWorkflow {
                workflow_id: workflow_id.to_string(),
                project_id: project_id.to_string(),
                phase: WorkflowPhase::Deployment,
                execution_count: 1,
                started_at: Utc::now(),
            },
        );
        self
    }

    pub fn reported_outcomes(&self) -> Vec<(String, WorkflowOutcome)> {
        self.outcomes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetryEngine for MockRetryEngine {
    async fn is_project_active(&self, project_id: &str) -> bool {
        self.active.lock().unwrap().contains_key(project_id)
    }

    async fn get_workflow(&self, project_id: &str) -> Option<AutoRetryWorkflow> {
        self.active.lock().unwrap().get(project_id).cloned()
    }

    async fn start(
        &self,
        project_id: &str,
        _files: &HashMap<String, String>,
        trigger_request_id: &str,
    ) -> Option<String> {
        if !self.accept_start {
            return None;
        }
        self.started.fetch_add(1, Ordering::SeqCst);
        let workflow_id = format!("wf-{}", trigger_request_id);
        self.active.lock().unwrap().insert(
            project_id.to_string(),
            AutoRetryWorkflow {
                workflow_id: workflow_id.clone(),
                project_id: project_id.to_string(),
                phase: WorkflowPhase::CodeGeneration,
                execution_count: 1,
                started_at: Utc::now(),
            },
        );
        Some(workflow_id)
    }

    async fn report_outcome(&self, workflow_id: &str, outcome: WorkflowOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .push((workflow_id.to_string(), outcome));
    }
}

// ------------------------------------------------------------------
// Error extractor
// ------------------------------------------------------------------

pub struct MockExtractor;

impl ErrorExtractor for MockExtractor {
    fn extract(&self, raw_error: &str, _files: &HashMap<String, String>) -> StructuredError {
        StructuredError {
            summary: raw_error.lines().next().unwrap_or(raw_error).to_string(),
            file: None,
            line: None,
            raw: raw_error.to_string(),
        }
    }

    fn to_fix_prompt(&self, error: &StructuredError, project_name: &str) -> String {
        format!("Fix this error in {}: {}", project_name, error.summary)
    }
}

// ------------------------------------------------------------------
// UI sink
// ------------------------------------------------------------------

#[derive(Default)]
pub struct MockUi {
    pub surfaces: Mutex<Vec<UiSurface>>,
    pub fixes: Mutex<Vec<String>>,
}

impl MockUi {
    pub fn surfaces(&self) -> Vec<UiSurface> {
        self.surfaces.lock().unwrap().clone()
    }

    pub fn fixes(&self) -> Vec<String> {
        self.fixes.lock().unwrap().clone()
    }
}

#[async_trait]
impl UiSink for MockUi {
    async fn switch_surface(&self, surface: UiSurface) {
        self.surfaces.lock().unwrap().push(surface);
    }

    async fn submit_fix(&self, prompt: String) -> Result<(), OrchestratorError> {
        self.fixes.lock().unwrap().push(prompt);
        Ok(())
    }
}

// ------------------------------------------------------------------
// Harness
// ------------------------------------------------------------------

pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub executor: Arc<MockExecutor>,
    pub engine: Arc<MockRetryEngine>,
    pub ui: Arc<MockUi>,
}

pub fn harness(executor: MockExecutor, engine: MockRetryEngine) -> Harness {
    harness_with_options(test_options(), executor, engine)
}

pub fn harness_with_options(
    options: OrchestratorOptions,
    executor: MockExecutor,
    engine: MockRetryEngine,
) -> Harness {
    let executor = Arc::new(executor);
    let engine = Arc::new(engine);
    let ui = Arc::new(MockUi::default());
    let orchestrator = Arc::new(Orchestrator::new(
        options,
        executor.clone(),
        engine.clone(),
        Arc::new(MockExtractor),
        ui.clone(),
    ));
    Harness {
        orchestrator,
        executor,
        engine,
        ui,
    }
}
