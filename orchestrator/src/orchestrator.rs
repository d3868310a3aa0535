//! Deployment attempt orchestration
//!
//! Ties the context store, status lifecycle, retry tracker, resolver,
//! reaper and notifier together behind one public API. All coordination
//! state lives in a single `CoordinationState` guarded by an RwLock;
//! collaborator calls are awaited outside the lock so a slow executor or
//! engine never blocks state reads.
//!
//! No failure crosses this boundary except `create_context`'s validation
//! error: every other operation either resolves to updated state or
//! completes a fallback path.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::errors::OrchestratorError;
use crate::external::error_extractor::ErrorExtractor;
use crate::external::executor::{DeployExecutor, DeployRequest};
use crate::external::retry_engine::RetryEngine;
use crate::external::ui::{UiSink, UiSurface};
use crate::models::context::DeploymentContext;
use crate::models::status::{DeploymentState, DeploymentStatus};
use crate::models::workflow::WorkflowOutcome;
use crate::notify::{Comparator, Listener, Notifier};
use crate::options::OrchestratorOptions;
use crate::resolver::ActivationSignal;
use crate::retry::RetryProgress;
use crate::sched::{self, DelayedTask};
use crate::state::{CoordinationSnapshot, CoordinationState};
use crate::utils::truncate_message;

/// Client-side orchestrator for deployment attempts
pub struct Orchestrator {
    options: OrchestratorOptions,
    state: RwLock<CoordinationState>,
    notifier: Mutex<Notifier>,
    executor: Arc<dyn DeployExecutor>,
    retry_engine: Arc<dyn RetryEngine>,
    error_extractor: Arc<dyn ErrorExtractor>,
    ui: Arc<dyn UiSink>,
    preview_hint: Mutex<Option<DelayedTask>>,
}

impl Orchestrator {
    pub fn new(
        options: OrchestratorOptions,
        executor: Arc<dyn DeployExecutor>,
        retry_engine: Arc<dyn RetryEngine>,
        error_extractor: Arc<dyn ErrorExtractor>,
        ui: Arc<dyn UiSink>,
    ) -> Self {
        let state = CoordinationState::new(options.max_retry_attempts);
        Self {
            options,
            state: RwLock::new(state),
            notifier: Mutex::new(Notifier::new()),
            executor,
            retry_engine,
            error_extractor,
            ui,
            preview_hint: Mutex::new(None),
        }
    }

    // ------------------------------------------------------------------
    // Context store
    // ------------------------------------------------------------------

    /// Create a new deployment context, evicting any unsettled prior
    /// attempt for the same project.
    pub async fn create_context(
        &self,
        request_id: &str,
        project_id: &str,
        project_name: &str,
        files: HashMap<String, String>,
        server_pair_id: Option<String>,
    ) -> Result<DeploymentContext, OrchestratorError> {
        let context = {
            let mut state = self.state.write().await;
            state.create_context(request_id, project_id, project_name, files, server_pair_id)?
        };
        info!(
            "Created deployment context {} for project {}",
            request_id, project_id
        );
        self.publish().await;
        Ok(context)
    }

    /// Look up a context
    pub async fn get_context(&self, request_id: &str) -> Option<DeploymentContext> {
        let state = self.state.read().await;
        state.context(request_id).cloned()
    }

    /// Look up a status; unknown ids get the ready default
    pub async fn get_status(&self, request_id: &str) -> DeploymentStatus {
        let state = self.state.read().await;
        state.status_of(request_id)
    }

    /// Current coordination snapshot
    pub async fn snapshot(&self) -> CoordinationSnapshot {
        let state = self.state.read().await;
        state.snapshot()
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    /// Start driving a deployment attempt.
    ///
    /// A missing context is a logged no-op: requests legitimately race
    /// with cleanup. Executor failure is caught locally and recorded on
    /// the status; it never propagates to the caller.
    pub async fn start_deployment(&self, request_id: &str) -> Result<(), OrchestratorError> {
        let context = {
            let mut state = self.state.write().await;
            let Some(context) = state.context(request_id).cloned() else {
                warn!(
                    "start_deployment: no context for request {}, skipping",
                    request_id
                );
                return Ok(());
            };
            state.reset_retry(request_id);
            let mut status = state.status_of(request_id);
            status.state = DeploymentState::Deploying;
            status.progress = Some(0);
            status.error = None;
            state.put_status(request_id, status);
            state.is_coordinating = true;
            state.current_request_id = Some(request_id.to_string());
            state.touch();
            context
        };
        self.publish().await;
        info!(
            "Starting deployment {} for project {}",
            request_id, context.project_id
        );

        self.ui.switch_surface(UiSurface::Editor).await;
        tokio::time::sleep(self.options.settle_delay).await;

        let request = DeployRequest {
            context,
            auto_start: true,
        };
        match self.executor.deploy(request).await {
            Ok(outcome) => {
                self.handle_success(request_id, &outcome.deployed_url, outcome.duration_ms)
                    .await;
            }
            Err(e) => {
                // Local catch: the failure is observable through state only
                error!("Executor failed for request {}: {}", request_id, e);
                {
                    let mut state = self.state.write().await;
                    if state.context(request_id).is_some() {
                        let mut status = state.status_of(request_id);
                        status.state = DeploymentState::Error;
                        status.error = Some(truncate_message(
                            &e.to_string(),
                            self.options.error_display_limit,
                        ));
                        status.progress = None;
                        state.put_status(request_id, status);
                    }
                    state.clear_coordination();
                    state.touch();
                }
                self.publish().await;
            }
        }
        Ok(())
    }

    /// Finalize a request as successfully deployed.
    ///
    /// A late call for a pruned id is a silent miss.
    pub async fn handle_success(&self, request_id: &str, deployed_url: &str, duration_ms: u64) {
        let context = {
            let mut state = self.state.write().await;
            let Some(context) = state.context(request_id).cloned() else {
                debug!(
                    "handle_success: request {} no longer tracked, ignoring",
                    request_id
                );
                return;
            };
            state.reset_retry(request_id);
            let mut status = state.status_of(request_id);
            status.state = DeploymentState::Success;
            status.deployed_url = Some(deployed_url.to_string());
            status.duration_ms = Some(duration_ms);
            status.progress = Some(100);
            status.error = None;
            status.is_auto_retrying = false;
            status.live_preview_activated = true;
            state.put_status(request_id, status);
            state.clear_coordination();
            state.touch();
            context
        };
        self.publish().await;
        info!(
            "Deployment {} succeeded at {} ({} ms)",
            request_id, deployed_url, duration_ms
        );

        if let Some(workflow) = self.retry_engine.get_workflow(&context.project_id).await {
            self.retry_engine
                .report_outcome(
                    &workflow.workflow_id,
                    WorkflowOutcome::deployed(deployed_url, duration_ms),
                )
                .await;
        }

        // Scheduled separately so observers see the success state before
        // the hint fires. A newer success replaces a pending hint.
        let ui = self.ui.clone();
        let task = sched::schedule(
            self.options.preview_hint_delay,
            Box::pin(async move {
                ui.switch_surface(UiSurface::Preview).await;
            }),
        );
        let mut pending = self.preview_hint.lock().await;
        *pending = Some(task);
    }

    /// Record a deployment failure and drive recovery.
    ///
    /// If the retry engine already owns a workflow for the project the
    /// failure is forwarded to it; otherwise a new workflow is started.
    /// When the engine declines, the degraded manual path derives a fix
    /// prompt and submits it through the chat surface. The coordination
    /// flags are cleared on completion of every branch, including handler
    /// failure.
    pub async fn handle_error(&self, request_id: &str, raw_error: &str) {
        if let Err(e) = self.handle_error_impl(request_id, raw_error).await {
            error!("Error handler for request {} failed: {}", request_id, e);
        }
        {
            let mut state = self.state.write().await;
            state.clear_coordination();
            state.touch();
        }
        self.publish().await;
    }

    async fn handle_error_impl(
        &self,
        request_id: &str,
        raw_error: &str,
    ) -> Result<(), OrchestratorError> {
        let display = truncate_message(raw_error, self.options.error_display_limit);
        let context = {
            let mut state = self.state.write().await;
            let Some(context) = state.context(request_id).cloned() else {
                debug!(
                    "handle_error: request {} no longer tracked, ignoring",
                    request_id
                );
                return Ok(());
            };
            let mut status = state.status_of(request_id);
            status.state = DeploymentState::Error;
            status.error = Some(display.clone());
            status.progress = None;
            state.put_status(request_id, status);
            state.touch();
            context
        };
        self.publish().await;

        // The engine owns recovery once a workflow is active
        if let Some(workflow) = self.retry_engine.get_workflow(&context.project_id).await {
            info!(
                "Forwarding deployment failure for project {} to workflow {}",
                context.project_id, workflow.workflow_id
            );
            self.retry_engine
                .report_outcome(&workflow.workflow_id, WorkflowOutcome::deploy_failed(&display))
                .await;
            return Ok(());
        }

        match self
            .retry_engine
            .start(&context.project_id, &context.files, request_id)
            .await
        {
            Some(workflow_id) => {
                info!(
                    "Started auto-retry workflow {} for project {}",
                    workflow_id, context.project_id
                );
                {
                    let mut state = self.state.write().await;
                    if state.context(request_id).is_some() {
                        state.set_retry(request_id, 1);
                        let mut status = state.status_of(request_id);
                        // The engine drives the actual redeploy
                        status.state = DeploymentState::Deploying;
                        status.is_auto_retrying = true;
                        status.progress = Some(0);
                        state.put_status(request_id, status);
                        state.touch();
                    }
                }
                self.publish().await;
                Ok(())
            }
            None => {
                info!(
                    "Retry engine declined for project {}, falling back to fix prompt",
                    context.project_id
                );
                let structured = self.error_extractor.extract(raw_error, &context.files);
                let prompt = self
                    .error_extractor
                    .to_fix_prompt(&structured, &context.project_name);
                self.ui.switch_surface(UiSurface::Chat).await;
                self.ui.submit_fix(prompt).await
            }
        }
    }

    // ------------------------------------------------------------------
    // Resolver
    // ------------------------------------------------------------------

    /// Locate the authoritative live request for a project
    pub async fn find_by_project(&self, project_id: &str) -> Option<DeploymentContext> {
        let state = self.state.read().await;
        state.find_by_project(project_id).cloned()
    }

    /// Reconcile an external "artifact is reachable" signal against the
    /// project's live request. With no matching request this clears any
    /// dangling coordination flags and returns.
    pub async fn handle_external_activation(&self, signal: ActivationSignal) {
        let resolved = {
            let state = self.state.read().await;
            state.find_by_project(&signal.project_id).cloned()
        };

        match resolved {
            Some(context) => {
                let duration_ms =
                    (Utc::now() - context.created_at).num_milliseconds().max(0) as u64;
                self.handle_success(&context.request_id, &signal.deployed_url, duration_ms)
                    .await;
            }
            None => {
                debug!(
                    "Activation for project {} matched no live request",
                    signal.project_id
                );
                {
                    let mut state = self.state.write().await;
                    if state.is_coordinating || state.current_request_id.is_some() {
                        state.clear_coordination();
                        state.touch();
                    }
                }
                self.publish().await;
            }
        }
    }

    // ------------------------------------------------------------------
    // Reaper
    // ------------------------------------------------------------------

    /// Force-reset requests stuck in deploying past the configured
    /// threshold. Returns the ids that were reset.
    pub async fn reap(&self) -> Vec<String> {
        let reset = {
            let mut state = self.state.write().await;
            state.reap_stuck(self.options.stuck_threshold)
        };
        if !reset.is_empty() {
            info!("Reaper reset {} stuck deployment(s)", reset.len());
            self.publish().await;
        }
        reset
    }

    // ------------------------------------------------------------------
    // Retry tracker
    // ------------------------------------------------------------------

    /// Current retry count for a request
    pub async fn retry_count(&self, request_id: &str) -> u32 {
        let state = self.state.read().await;
        state.retry_count(request_id)
    }

    /// Whether another automatic retry is permitted
    pub async fn can_auto_retry(&self, request_id: &str) -> bool {
        let state = self.state.read().await;
        state.can_auto_retry(request_id)
    }

    /// Whether the request's project has an active remediation workflow.
    /// Delegates to the engine; the local flag is only a hint.
    pub async fn is_in_auto_retry_mode(&self, request_id: &str) -> bool {
        let project_id = {
            let state = self.state.read().await;
            state.context(request_id).map(|c| c.project_id.clone())
        };
        match project_id {
            Some(project_id) => self.retry_engine.is_project_active(&project_id).await,
            None => false,
        }
    }

    /// Retry progress for a request, with elapsed time derived from the
    /// active workflow's start time when one exists
    pub async fn retry_progress(&self, request_id: &str) -> RetryProgress {
        let (attempt, max_attempts, project_id) = {
            let state = self.state.read().await;
            (
                state.retry_count(request_id),
                state.max_retry_attempts,
                state.context(request_id).map(|c| c.project_id.clone()),
            )
        };

        let workflow = match &project_id {
            Some(project_id) => self.retry_engine.get_workflow(project_id).await,
            None => None,
        };

        RetryProgress {
            attempt,
            max_attempts,
            is_retrying: workflow.is_some(),
            elapsed_ms: workflow
                .map(|w| (Utc::now() - w.started_at).num_milliseconds().max(0) as u64),
        }
    }

    // ------------------------------------------------------------------
    // Notifier
    // ------------------------------------------------------------------

    /// Register a listener with a custom comparator. Returns the
    /// subscription id.
    pub async fn subscribe(&self, listener: Listener, comparator: Comparator) -> String {
        let mut notifier = self.notifier.lock().await;
        notifier.subscribe(listener, comparator)
    }

    /// Register a listener with the default coordination comparator
    pub async fn subscribe_default(&self, listener: Listener) -> String {
        self.subscribe(listener, Box::new(CoordinationSnapshot::coordination_eq))
            .await
    }

    /// Remove a subscription
    pub async fn unsubscribe(&self, subscription_id: &str) -> bool {
        let mut notifier = self.notifier.lock().await;
        notifier.unsubscribe(subscription_id)
    }

    async fn publish(&self) {
        let snapshot = {
            let state = self.state.read().await;
            state.snapshot()
        };
        let mut notifier = self.notifier.lock().await;
        notifier.publish(&snapshot);
    }
}
