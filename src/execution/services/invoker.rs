//! Invocation core shared by synchronous calls and queue workers.

use super::{EngineConfig, ExecutionError, ExecutionScope, ExecutionServiceResult, ScopeEnd};
use crate::agent_registry::{
    domain::{Agent, AgentKind},
    ports::AgentRepository,
    services::{AgentRegistry, RegistryServiceError},
};
use crate::capability::ParameterValue;
use crate::discovery::{domain::CapabilityRequest, services::DiscoveryService};
use crate::execution::{
    domain::{ExecutionId, ExecutionRequest, ExecutionResult, ExecutionStatus},
    ports::{AgentHandler, ExecutionResultRepository},
};
use mockable::Clock;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;

/// A request waiting in the asynchronous queue.
pub(super) struct QueuedExecution {
    pub(super) execution_id: ExecutionId,
    pub(super) request: ExecutionRequest,
    pub(super) scope: ExecutionScope,
}

/// A validated request bound to its agent.
struct Prepared {
    request: ExecutionRequest,
    agent: Agent,
}

/// In-memory results plus the persisted terminal ids eligible for eviction,
/// oldest first.
#[derive(Default)]
struct ResultCache {
    entries: HashMap<ExecutionId, ExecutionResult>,
    persisted: VecDeque<ExecutionId>,
}

impl ResultCache {
    fn mark_persisted(&mut self, id: ExecutionId, retained: usize) {
        self.persisted.push_back(id);
        while self.entries.len() > retained {
            let Some(oldest) = self.persisted.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

type AttemptOutcome = Result<ParameterValue, (ExecutionStatus, String)>;

pub(super) fn agent_lookup_error(err: RegistryServiceError) -> ExecutionError {
    match err {
        RegistryServiceError::NotFound(agent_id) => ExecutionError::AgentNotFound(agent_id),
        other => ExecutionError::Registry(other),
    }
}

fn scope_failure(end: ScopeEnd, last_error: Option<&str>) -> (ExecutionStatus, String) {
    let (status, reason) = match end {
        ScopeEnd::Canceled => (ExecutionStatus::Canceled, "execution canceled"),
        ScopeEnd::DeadlineExceeded => (ExecutionStatus::Timeout, "execution timed out"),
    };
    let message = last_error.map_or_else(
        || reason.to_owned(),
        |error| format!("{reason}; last error: {error}"),
    );
    (status, message)
}

#[expect(
    clippy::float_arithmetic,
    reason = "latency feeds the registry's floating-point running mean"
)]
fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

pub(super) struct EngineCore<R, S, C>
where
    R: AgentRepository + 'static,
    S: ExecutionResultRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub(super) registry: Arc<AgentRegistry<R, C>>,
    pub(super) discovery: Arc<DiscoveryService<R, C>>,
    pub(super) repository: Arc<S>,
    pub(super) clock: Arc<C>,
    pub(super) config: EngineConfig,
    handlers: RwLock<HashMap<AgentKind, Arc<dyn AgentHandler>>>,
    fallback: Arc<dyn AgentHandler>,
    results: Arc<RwLock<ResultCache>>,
    queue_tx: mpsc::Sender<QueuedExecution>,
    queue_rx: Mutex<mpsc::Receiver<QueuedExecution>>,
}

impl<R, S, C> EngineCore<R, S, C>
where
    R: AgentRepository + 'static,
    S: ExecutionResultRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub(super) fn new(
        discovery: Arc<DiscoveryService<R, C>>,
        repository: Arc<S>,
        clock: Arc<C>,
        config: EngineConfig,
        fallback: Arc<dyn AgentHandler>,
    ) -> Self {
        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity.max(1));
        Self {
            registry: Arc::clone(discovery.registry()),
            discovery,
            repository,
            clock,
            config,
            handlers: RwLock::new(HashMap::new()),
            fallback,
            results: Arc::new(RwLock::new(ResultCache::default())),
            queue_tx,
            queue_rx: Mutex::new(queue_rx),
        }
    }

    fn read_results(&self) -> ExecutionServiceResult<RwLockReadGuard<'_, ResultCache>> {
        self.results
            .read()
            .map_err(|err| ExecutionError::State(err.to_string()))
    }

    fn write_results(&self) -> ExecutionServiceResult<RwLockWriteGuard<'_, ResultCache>> {
        self.results
            .write()
            .map_err(|err| ExecutionError::State(err.to_string()))
    }

    pub(super) fn register_handler(
        &self,
        kind: AgentKind,
        handler: Arc<dyn AgentHandler>,
    ) -> ExecutionServiceResult<()> {
        let mut handlers = self
            .handlers
            .write()
            .map_err(|err| ExecutionError::State(err.to_string()))?;
        handlers.insert(kind, handler);
        Ok(())
    }

    pub(super) fn handler_for(&self, kind: AgentKind) -> ExecutionServiceResult<Arc<dyn AgentHandler>> {
        let handlers = self
            .handlers
            .read()
            .map_err(|err| ExecutionError::State(err.to_string()))?;
        Ok(handlers
            .get(&kind)
            .map_or_else(|| Arc::clone(&self.fallback), Arc::clone))
    }

    pub(super) fn stored(&self, id: ExecutionId) -> ExecutionServiceResult<Option<ExecutionResult>> {
        Ok(self.read_results()?.entries.get(&id).cloned())
    }

    pub(super) fn snapshot(&self) -> ExecutionServiceResult<Vec<ExecutionResult>> {
        Ok(self.read_results()?.entries.values().cloned().collect())
    }

    pub(super) fn queue_depth(&self) -> usize {
        self.queue_tx
            .max_capacity()
            .saturating_sub(self.queue_tx.capacity())
    }

    pub(super) fn queue_capacity(&self) -> usize {
        self.queue_tx.max_capacity()
    }

    fn store(&self, result: &ExecutionResult) -> ExecutionServiceResult<()> {
        self.write_results()?
            .entries
            .insert(result.id(), result.clone());
        Ok(())
    }

    /// Writes a terminal `result` to the repository in the background;
    /// failures are logged only.
    ///
    /// Once saved, the result may be evicted from memory when more than
    /// `retained_results` are held. Unsaved results are never evicted.
    fn persist(&self, result: ExecutionResult) {
        let repository = Arc::clone(&self.repository);
        let cache = Arc::clone(&self.results);
        let retained = self.config.retained_results;
        drop(tokio::spawn(async move {
            let execution_id = result.id();
            if let Err(err) = repository.save(&result).await {
                tracing::warn!(%execution_id, error = %err, "failed to persist execution result");
                return;
            }
            match cache.write() {
                Ok(mut entries) => entries.mark_persisted(execution_id, retained),
                Err(err) => {
                    tracing::warn!(%execution_id, error = %err, "result cache lock poisoned");
                }
            }
        }));
    }

    /// Validates the request and resolves its agent and parameters.
    fn prepare(&self, mut request: ExecutionRequest) -> ExecutionServiceResult<Prepared> {
        if request.capability_type().as_str().trim().is_empty() {
            return Err(ExecutionError::InvalidRequest(
                "capability type must not be empty".to_owned(),
            ));
        }

        let agent = match request.agent_id() {
            Some(agent_id) => self.registry.get(agent_id).map_err(agent_lookup_error)?,
            None => self
                .discovery
                .discover_best(&CapabilityRequest::for_type(
                    request.capability_type().clone(),
                ))?
                .agent()
                .clone(),
        };

        let capability = agent
            .capability(request.capability_type())
            .ok_or_else(|| ExecutionError::CapabilityNotOffered {
                agent_id: agent.id().clone(),
                capability_type: request.capability_type().clone(),
            })?;
        let parameters = capability.validate(request.parameters())?;
        request.resolve(agent.id().clone(), parameters);
        Ok(Prepared { request, agent })
    }

    /// Moves the stored pending result to running.
    ///
    /// A result that ended while queued is returned as
    /// [`ExecutionError::Terminated`].
    fn begin(&self, prepared: &Prepared, id: ExecutionId) -> ExecutionServiceResult<ExecutionResult> {
        let mut results = self.write_results()?;
        let result = results
            .entries
            .get_mut(&id)
            .ok_or(ExecutionError::ResultNotFound(id))?;
        if result.status().is_terminal() {
            return Err(ExecutionError::Terminated {
                result: Box::new(result.clone()),
            });
        }
        result.start(prepared.agent.id().clone(), &*self.clock)?;
        Ok(result.clone())
    }

    /// Runs a request inline on the caller's task.
    pub(super) async fn execute_now(
        &self,
        request: ExecutionRequest,
        scope: &ExecutionScope,
    ) -> ExecutionServiceResult<ExecutionResult> {
        let prepared = self.prepare(request)?;
        let pending = ExecutionResult::pending(&prepared.request, &*self.clock);
        let execution_id = pending.id();
        self.store(&pending)?;
        self.invoke(prepared, execution_id, scope).await
    }

    /// Stores a pending result and enqueues the request without blocking.
    pub(super) fn submit(
        &self,
        request: ExecutionRequest,
        scope: &ExecutionScope,
    ) -> ExecutionServiceResult<ExecutionResult> {
        let mut result = ExecutionResult::pending(&request, &*self.clock);
        self.store(&result)?;

        let job = QueuedExecution {
            execution_id: result.id(),
            request,
            scope: scope.clone(),
        };
        let reason = match self.queue_tx.try_send(job) {
            Ok(()) => {
                tracing::debug!(execution_id = %result.id(), "execution queued");
                return Ok(result);
            }
            Err(mpsc::error::TrySendError::Full(_)) => "execution queue full",
            Err(mpsc::error::TrySendError::Closed(_)) => "execution queue closed",
        };

        result.end_with(ExecutionStatus::Failed, reason, &*self.clock)?;
        self.store(&result)?;
        self.persist(result.clone());
        tracing::warn!(
            execution_id = %result.id(),
            capacity = self.queue_capacity(),
            "{reason}"
        );
        Err(ExecutionError::QueueFull {
            result: Box::new(result),
        })
    }

    /// Cancels a result that is still waiting in the queue.
    pub(super) fn cancel(&self, id: ExecutionId) -> ExecutionServiceResult<ExecutionResult> {
        let canceled = {
            let mut results = self.write_results()?;
            let result = results
                .entries
                .get_mut(&id)
                .ok_or(ExecutionError::ResultNotFound(id))?;
            if result.status() != ExecutionStatus::Pending {
                return Err(ExecutionError::NotCancellable {
                    execution_id: id,
                    status: result.status(),
                });
            }
            result.end_with(
                ExecutionStatus::Canceled,
                "canceled before execution",
                &*self.clock,
            )?;
            result.clone()
        };
        tracing::info!(execution_id = %id, "queued execution canceled");
        self.persist(canceled.clone());
        Ok(canceled)
    }

    /// Runs a queued request on a worker.
    pub(super) async fn process(&self, job: QueuedExecution) {
        let QueuedExecution {
            execution_id,
            request,
            scope,
        } = job;

        match self.prepare(request) {
            Ok(prepared) => {
                if let Err(err) = self.invoke(prepared, execution_id, &scope).await {
                    tracing::debug!(%execution_id, error = %err, "queued execution did not complete");
                }
            }
            Err(err) => {
                if let Err(reject_err) = self.reject(execution_id, &err) {
                    tracing::warn!(%execution_id, error = %reject_err, "failed to record rejection");
                }
            }
        }
    }

    fn reject(&self, id: ExecutionId, cause: &ExecutionError) -> ExecutionServiceResult<()> {
        let rejected = {
            let mut results = self.write_results()?;
            let Some(result) = results.entries.get_mut(&id) else {
                return Err(ExecutionError::ResultNotFound(id));
            };
            if result.status().is_terminal() {
                return Ok(());
            }
            result.end_with(ExecutionStatus::Failed, cause.to_string(), &*self.clock)?;
            result.clone()
        };
        tracing::info!(execution_id = %id, error = %cause, "queued execution rejected");
        self.persist(rejected);
        Ok(())
    }

    pub(super) async fn next_job(&self) -> Option<QueuedExecution> {
        self.queue_rx.lock().await.recv().await
    }

    async fn invoke(
        &self,
        prepared: Prepared,
        execution_id: ExecutionId,
        scope: &ExecutionScope,
    ) -> ExecutionServiceResult<ExecutionResult> {
        let mut result = self.begin(&prepared, execution_id)?;
        let Prepared { request, agent } = prepared;
        let bounded =
            scope.child_with_timeout(request.timeout().unwrap_or(self.config.default_timeout));
        let handler = self.handler_for(agent.kind())?;
        let max_retries = request.max_retries().unwrap_or(self.config.max_retries);

        let started = Instant::now();
        let (outcome, retries) = self
            .attempt(handler.as_ref(), &agent, &request, &bounded, max_retries)
            .await;
        let latency_ms = elapsed_ms(started);

        result.set_retry_count(retries);
        let success = match outcome {
            Ok(output) => {
                result.complete(output, &*self.clock)?;
                true
            }
            Err((status, message)) => {
                result.end_with(status, message, &*self.clock)?;
                false
            }
        };

        if let Err(err) = self
            .registry
            .record_call(agent.id(), success, latency_ms)
            .await
        {
            tracing::warn!(agent_id = %agent.id(), error = %err, "failed to record agent call");
        }
        self.store(&result)?;
        self.persist(result.clone());

        tracing::info!(
            %execution_id,
            agent_id = %agent.id(),
            capability = %request.capability_type(),
            status = %result.status(),
            retries,
            "execution finished"
        );

        if success {
            Ok(result)
        } else {
            Err(ExecutionError::Terminated {
                result: Box::new(result),
            })
        }
    }

    /// Attempts the handler up to `1 + max_retries` times, returning the
    /// outcome and the number of retries performed.
    async fn attempt(
        &self,
        handler: &dyn AgentHandler,
        agent: &Agent,
        request: &ExecutionRequest,
        scope: &ExecutionScope,
        max_retries: u32,
    ) -> (AttemptOutcome, u32) {
        let mut attempt: u32 = 0;
        let mut last_error: Option<String> = None;

        loop {
            if attempt > 0 {
                let backoff = self.config.retry_backoff.saturating_mul(attempt);
                tracing::warn!(
                    agent_id = %agent.id(),
                    attempt,
                    ?backoff,
                    "retrying execution"
                );
                tokio::select! {
                    biased;
                    end = scope.done() => {
                        return (Err(scope_failure(end, last_error.as_deref())), attempt);
                    }
                    () = tokio::time::sleep(backoff) => {}
                }
            }

            if let Some(end) = scope.state() {
                return (Err(scope_failure(end, last_error.as_deref())), attempt);
            }

            let call = tokio::select! {
                biased;
                end = scope.done() => Err(end),
                output = handler.execute(agent, request) => Ok(output),
            };

            match call {
                Err(end) => return (Err(scope_failure(end, last_error.as_deref())), attempt),
                Ok(Ok(output)) => return (Ok(output), attempt),
                Ok(Err(err)) => {
                    tracing::debug!(agent_id = %agent.id(), attempt, error = %err, "handler attempt failed");
                    if attempt >= max_retries {
                        let attempts = attempt.saturating_add(1);
                        let message = format!("failed after {attempts} attempt(s): {err}");
                        return (Err((ExecutionStatus::Failed, message)), attempt);
                    }
                    last_error = Some(err.to_string());
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }
}
