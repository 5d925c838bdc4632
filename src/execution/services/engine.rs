//! Public execution engine and its worker pool.

use super::invoker::{EngineCore, agent_lookup_error};
use super::{EngineConfig, ExecutionError, ExecutionScope, ExecutionServiceResult};
use crate::agent_registry::{
    domain::{AgentId, AgentKind, AgentStatus},
    ports::AgentRepository,
    services::AgentRegistry,
};
use crate::capability::Parameters;
use crate::discovery::{domain::CapabilityRequest, services::DiscoveryService};
use crate::execution::{
    adapters::BuiltinHandler,
    domain::{
        ChainExecution, ExecutionContext, ExecutionId, ExecutionRequest, ExecutionResult,
        ExecutionStatus, ExecutionStep, ResultQuery,
    },
    ports::{AgentHandler, ExecutionResultRepository},
};
use mockable::Clock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Point-in-time view of engine activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Results held in memory; persisted results beyond
    /// [`EngineConfig::retained_results`] are evicted.
    pub total_results: usize,
    /// Result counts keyed by status.
    pub by_status: BTreeMap<ExecutionStatus, usize>,
    /// Requests waiting in the queue.
    pub queue_depth: usize,
    /// Maximum queue length.
    pub queue_capacity: usize,
    /// Configured worker count.
    pub worker_count: usize,
    /// Whether workers are running.
    pub running: bool,
}

#[derive(Default)]
struct Lifecycle {
    shutdown: Option<watch::Sender<bool>>,
    workers: Vec<JoinHandle<()>>,
}

/// Routes capability requests to agent handlers.
///
/// Synchronous requests run on the caller's task. Asynchronous requests are
/// queued and drained by a fixed pool of workers started with
/// [`ExecutionEngine::start`].
pub struct ExecutionEngine<R, S, C>
where
    R: AgentRepository + 'static,
    S: ExecutionResultRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    core: Arc<EngineCore<R, S, C>>,
    lifecycle: Mutex<Lifecycle>,
}

impl<R, S, C> ExecutionEngine<R, S, C>
where
    R: AgentRepository + 'static,
    S: ExecutionResultRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an engine over `discovery` and its registry.
    ///
    /// Agents whose kind has no registered handler run on the
    /// [`BuiltinHandler`].
    #[must_use]
    pub fn new(
        discovery: Arc<DiscoveryService<R, C>>,
        repository: Arc<S>,
        clock: Arc<C>,
        config: EngineConfig,
    ) -> Self {
        Self {
            core: Arc::new(EngineCore::new(
                discovery,
                repository,
                clock,
                config,
                Arc::new(BuiltinHandler::new()),
            )),
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.core.config
    }

    /// Returns the agent registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<AgentRegistry<R, C>> {
        &self.core.registry
    }

    /// Returns the discovery service.
    #[must_use]
    pub fn discovery(&self) -> &Arc<DiscoveryService<R, C>> {
        &self.core.discovery
    }

    /// Routes agents of `kind` to `handler`, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::State`] when the handler table is poisoned.
    pub fn register_handler(
        &self,
        kind: AgentKind,
        handler: Arc<dyn AgentHandler>,
    ) -> ExecutionServiceResult<()> {
        self.core.register_handler(kind, handler)
    }

    fn lifecycle(&self) -> ExecutionServiceResult<MutexGuard<'_, Lifecycle>> {
        self.lifecycle
            .lock()
            .map_err(|err| ExecutionError::State(err.to_string()))
    }

    /// Spawns the worker pool. Calling it while running is a no-op.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::State`] when the lifecycle lock is poisoned.
    pub fn start(&self) -> ExecutionServiceResult<()> {
        let mut lifecycle = self.lifecycle()?;
        if lifecycle.shutdown.is_some() {
            tracing::debug!("execution engine already running");
            return Ok(());
        }

        let (sender, receiver) = watch::channel(false);
        let worker_count = self.core.config.worker_count;
        lifecycle.workers = (0..worker_count)
            .map(|worker| {
                tokio::spawn(run_worker(
                    Arc::clone(&self.core),
                    worker,
                    receiver.clone(),
                ))
            })
            .collect();
        lifecycle.shutdown = Some(sender);
        tracing::info!(workers = worker_count, "execution engine started");
        Ok(())
    }

    /// Signals the workers to stop and waits for them to exit.
    ///
    /// A job already picked up runs to completion first. Jobs still queued
    /// stay pending until the engine is started again.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::State`] when the lifecycle lock is poisoned.
    pub async fn stop(&self) -> ExecutionServiceResult<()> {
        let (shutdown, workers) = {
            let mut lifecycle = self.lifecycle()?;
            (
                lifecycle.shutdown.take(),
                std::mem::take(&mut lifecycle.workers),
            )
        };
        let Some(sender) = shutdown else {
            return Ok(());
        };

        sender.send_modify(|stop| *stop = true);
        for worker in workers {
            if let Err(err) = worker.await {
                tracing::warn!(error = %err, "execution worker ended abnormally");
            }
        }
        tracing::info!("execution engine stopped");
        Ok(())
    }

    /// Returns whether the worker pool is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lifecycle
            .lock()
            .is_ok_and(|lifecycle| lifecycle.shutdown.is_some())
    }

    /// Executes `request`.
    ///
    /// A synchronous request returns its completed result. An asynchronous
    /// request returns the pending result immediately; poll
    /// [`ExecutionEngine::get_result`] for the outcome.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any result is stored,
    /// [`ExecutionError::QueueFull`] when the queue cannot accept the request,
    /// or [`ExecutionError::Terminated`] carrying the failed, timed out or
    /// canceled result.
    pub async fn execute(
        &self,
        request: ExecutionRequest,
        scope: &ExecutionScope,
    ) -> ExecutionServiceResult<ExecutionResult> {
        if request.is_async() {
            self.core.submit(request, scope)
        } else {
            self.core.execute_now(request, scope).await
        }
    }

    /// Resolves `intent` to the best capability and executes it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::Discovery`] when nothing matches the intent,
    /// otherwise as [`ExecutionEngine::execute`].
    pub async fn execute_intent(
        &self,
        intent: &str,
        parameters: Parameters,
        context: ExecutionContext,
        scope: &ExecutionScope,
    ) -> ExecutionServiceResult<ExecutionResult> {
        let best = self
            .core
            .discovery
            .discover_best(&CapabilityRequest::for_intent(intent))?;
        tracing::debug!(
            intent,
            agent_id = %best.agent_id(),
            capability = %best.capability().capability_type(),
            "intent resolved"
        );
        let request = ExecutionRequest::new(best.capability().capability_type().clone())
            .for_agent(best.agent_id().clone())
            .with_parameters(parameters)
            .with_context(context);
        self.execute(request, scope).await
    }

    /// Runs `steps` in order, stopping at the first failure.
    ///
    /// Every step runs synchronously with `context` and the chain identifier
    /// as its parent.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::ChainFailed`] with the failing step index
    /// and the failed chain.
    pub async fn execute_chain(
        &self,
        steps: Vec<ExecutionStep>,
        context: ExecutionContext,
        scope: &ExecutionScope,
    ) -> ExecutionServiceResult<ChainExecution> {
        let clock = &*self.core.clock;
        let mut chain = ChainExecution::new(steps, clock);
        chain.start()?;
        let parent = chain.id().into_inner();
        let planned = chain.steps().to_vec();
        tracing::info!(chain_id = %chain.id(), steps = planned.len(), "chain started");

        for (index, step) in planned.into_iter().enumerate() {
            let mut request = ExecutionRequest::new(step.capability_type().clone())
                .with_parameters(step.parameters().clone())
                .with_context(context.clone().with_parent(parent));
            if let Some(agent_id) = step.agent_id() {
                request = request.for_agent(agent_id.clone());
            }

            match self.core.execute_now(request, scope).await {
                Ok(result) => chain.record_step(result),
                Err(err) => {
                    if let Some(result) = err.result() {
                        chain.record_failed_step(result.clone());
                    }
                    chain.fail(err.to_string(), clock)?;
                    tracing::warn!(chain_id = %chain.id(), step = index, error = %err, "chain step failed");
                    return Err(ExecutionError::ChainFailed {
                        step: index,
                        chain: Box::new(chain),
                        source: Box::new(err),
                    });
                }
            }
        }

        chain.complete(clock)?;
        tracing::info!(chain_id = %chain.id(), "chain completed");
        Ok(chain)
    }

    /// Cancels a queued execution that has not started.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::ResultNotFound`] for unknown identifiers and
    /// [`ExecutionError::NotCancellable`] once the execution has started.
    pub fn cancel(&self, execution_id: ExecutionId) -> ExecutionServiceResult<ExecutionResult> {
        self.core.cancel(execution_id)
    }

    /// Returns a result from memory, falling back to the repository.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::ResultNotFound`] when neither holds it.
    pub async fn get_result(
        &self,
        execution_id: ExecutionId,
    ) -> ExecutionServiceResult<ExecutionResult> {
        if let Some(result) = self.core.stored(execution_id)? {
            return Ok(result);
        }
        self.core
            .repository
            .find_by_id(execution_id)
            .await?
            .ok_or(ExecutionError::ResultNotFound(execution_id))
    }

    /// Lists persisted results, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::Repository`] when the repository fails.
    pub async fn list_results(
        &self,
        query: ResultQuery,
    ) -> ExecutionServiceResult<Vec<ExecutionResult>> {
        let results = match query.status() {
            Some(status) => {
                self.core
                    .repository
                    .list_by_status(status, query.limit())
                    .await?
            }
            None => self.core.repository.list_recent(query.limit()).await?,
        };
        Ok(results)
    }

    /// Probes an agent through its handler and reconciles its status.
    ///
    /// An active agent that fails the probe moves to
    /// [`AgentStatus::Error`]; an errored agent that passes moves back to
    /// [`AgentStatus::Active`]. Other statuses are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::AgentNotFound`] for unknown agents and
    /// [`ExecutionError::Registry`] when the status update fails.
    pub async fn check_health(&self, agent_id: &AgentId) -> ExecutionServiceResult<bool> {
        let registry = &self.core.registry;
        let agent = registry.get(agent_id).map_err(agent_lookup_error)?;
        let handler = self.core.handler_for(agent.kind())?;
        let healthy = match handler.health_check(&agent).await {
            Ok(healthy) => healthy,
            Err(err) => {
                tracing::warn!(%agent_id, error = %err, "health probe failed");
                false
            }
        };

        registry.health_check(agent_id).await.map_err(agent_lookup_error)?;
        let next = match (healthy, agent.status()) {
            (false, AgentStatus::Active) => Some(AgentStatus::Error),
            (true, AgentStatus::Error) => Some(AgentStatus::Active),
            _ => None,
        };
        if let Some(status) = next {
            tracing::info!(%agent_id, %status, "agent status changed by health check");
            registry
                .update_status(agent_id, status)
                .await
                .map_err(agent_lookup_error)?;
        }
        Ok(healthy)
    }

    /// Returns counts of held results and queue occupancy.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::State`] when the result map is poisoned.
    pub fn stats(&self) -> ExecutionServiceResult<EngineStats> {
        let results = self.core.snapshot()?;
        let mut by_status = BTreeMap::new();
        for result in &results {
            *by_status.entry(result.status()).or_insert(0_usize) += 1;
        }
        Ok(EngineStats {
            total_results: results.len(),
            by_status,
            queue_depth: self.core.queue_depth(),
            queue_capacity: self.core.queue_capacity(),
            worker_count: self.core.config.worker_count,
            running: self.is_running(),
        })
    }
}

async fn run_worker<R, S, C>(
    core: Arc<EngineCore<R, S, C>>,
    worker: usize,
    mut shutdown: watch::Receiver<bool>,
) where
    R: AgentRepository + 'static,
    S: ExecutionResultRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    tracing::debug!(worker, "execution worker started");
    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.wait_for(|stop| *stop) => None,
            job = core.next_job() => job,
        };
        let Some(job) = next else {
            break;
        };
        core.process(job).await;
    }
    tracing::debug!(worker, "execution worker stopped");
}
